//! Image download and base64 encoding.

use crate::error::ApiError;
use crate::provider::build_provider_http_client;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::{Client, StatusCode};
use tracing::warn;

/// Downloads a generated image. Not retried; failure yields `None`.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch_base64(&self, url: &str) -> Option<String>;
}

/// Encode inline image bytes the same way fetched images are encoded.
pub fn encode_image(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

pub struct HttpImageFetcher {
    client: Client,
}

impl HttpImageFetcher {
    pub fn new() -> Result<Self, ApiError> {
        Ok(Self {
            client: build_provider_http_client()?,
        })
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch_base64(&self, url: &str) -> Option<String> {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(url, error = %e, "Unable to download image");
                return None;
            }
        };

        if response.status() != StatusCode::OK {
            warn!(url, status = %response.status(), "Unable to download image");
            return None;
        }

        match response.bytes().await {
            Ok(bytes) => Some(encode_image(&bytes)),
            Err(e) => {
                warn!(url, error = %e, "Unable to read image body");
                None
            }
        }
    }
}
