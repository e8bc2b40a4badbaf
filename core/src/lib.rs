pub mod api;
pub mod cli;
pub mod error;
pub mod extraction;
pub mod image;
pub mod metrics;
pub mod pipeline;
pub mod roi;
pub mod types;

pub use api::PhantomAnalyzer;
pub use cli::report::TextReport;
pub use error::{PhantomQaError, Result};
pub use types::*;
