pub mod http_fetcher;
pub mod throttle;

use async_trait::async_trait;

use crate::app::Result;

pub use http_fetcher::HttpFetcher;
pub use throttle::RequestDelay;

/// A single GET of an HTML page. Non-2xx statuses are errors.
#[async_trait]
pub trait Fetcher {
    async fn fetch(&self, url: &str) -> Result<String>;
}
