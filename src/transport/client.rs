//! Peer HTTP Client
//!
//! Fetches values from a remote peer over the group+key wire contract.

use reqwest::{Client, Url};

use crate::error::CacheError;
use crate::peers::{FetchFuture, PeerFetcher};

// == HTTP Fetcher ==
/// One remote peer reachable at `<base>/<group>/<key>`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    base: Url,
}

impl HttpFetcher {
    /// Creates a fetcher for a peer's base endpoint.
    pub fn new(client: Client, base: Url) -> Self {
        Self { client, base }
    }
}

impl PeerFetcher for HttpFetcher {
    /// GETs `<base>/<group>/<key>`, percent-encoding both path segments,
    /// and returns the raw response bytes.
    fn fetch<'a>(&'a self, group: &'a str, key: &'a str) -> FetchFuture<'a> {
        Box::pin(async move {
            let mut url = self.base.clone();
            url.path_segments_mut()
                .map_err(|_| CacheError::PeerFetch("peer address cannot be a base".to_string()))?
                .extend([group, key]);

            let response = self
                .client
                .get(url)
                .send()
                .await
                .map_err(|err| CacheError::PeerFetch(err.to_string()))?;

            if !response.status().is_success() {
                return Err(CacheError::PeerFetch(format!(
                    "peer returned {}",
                    response.status()
                )));
            }

            let bytes = response
                .bytes()
                .await
                .map_err(|err| CacheError::PeerFetch(err.to_string()))?;
            Ok(bytes.to_vec())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetcher_url_segments_are_escaped() {
        let base = Url::parse("http://127.0.0.1:8002/_cache").unwrap();
        let mut url = base;
        url.path_segments_mut()
            .unwrap()
            .extend(["scores", "key with spaces"]);
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:8002/_cache/scores/key%20with%20spaces"
        );
    }
}
