pub mod cli;
pub mod exporter;
pub mod fetcher;
pub mod pipeline;

pub use fetcher::ContentFetcher;
pub use pipeline::{Pipeline, RunSummary};
