// * Transport boundary: everything that talks to the remote provider goes through `Fetcher`.

pub mod client;
pub mod errors;
pub mod identity;

pub use client::PageClient;
pub use errors::NetworkError;
pub use identity::IdentityProfile;

use async_trait::async_trait;
use std::path::Path;

/// Blocking-free access to the remote provider.
///
/// The pipeline only depends on this trait, so tests can script responses
/// without opening sockets.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Returns the body of a successful (2xx) GET as text
    async fn fetch_page(&self, url: &str) -> Result<String, NetworkError>;

    /// Writes the body of a successful GET to `dest`, returning the byte count
    async fn download(&self, url: &str, dest: &Path) -> Result<u64, NetworkError>;
}
