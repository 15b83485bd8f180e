use std::future::Future;
use std::io;

use log::info;
use reqwest::{Client, StatusCode};
use thiserror::Error;

use crate::cache::Cache;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url}: got HTTP {status}")]
    Status { url: String, status: StatusCode },
    #[error("failed to write {url} back to the cache")]
    Cache {
        url: String,
        #[source]
        source: io::Error,
    },
}

/// Something that can hand out the body of a page.
pub trait Fetch {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, FetchError>>;
}

/// Downloads pages over HTTP unless they are already in the cache, and stores
/// every download back into it.
pub struct CachedFetcher {
    client: Client,
    cache: Cache,
}

impl CachedFetcher {
    pub fn new(cache: Cache) -> reqwest::Result<Self> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, cache })
    }

    async fn download(&self, url: &str) -> Result<String, FetchError> {
        let request_error = |source| FetchError::Request {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(request_error)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        response.text().await.map_err(request_error)
    }
}

impl Fetch for CachedFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        if let Some(body) = self.cache.get(url).await {
            return Ok(body);
        }

        info!("Downloading {url}");
        let body = self.download(url).await?;

        self.cache
            .insert(url, &body)
            .await
            .map_err(|source| FetchError::Cache {
                url: url.to_string(),
                source,
            })?;

        Ok(body)
    }
}
