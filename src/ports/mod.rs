mod content_api;
mod environment_sink;

pub use content_api::{ContentApi, ContentRequest};
pub use environment_sink::EnvironmentSink;
