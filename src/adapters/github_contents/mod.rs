pub mod http;
pub mod retrying;

pub use self::http::HttpContentClient;
pub use self::retrying::{RetryPolicy, RetryingContentClient};
