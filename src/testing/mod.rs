mod fake_content_api;
mod memory_sink;

pub use fake_content_api::{FakeContentApi, Journal, ScriptedResponse};
pub use memory_sink::MemorySink;
