use reqwest::blocking::Client;
use reqwest::header::AUTHORIZATION;
use std::fs;

use crate::error::ConvertError;

/// Source of raw instance-mask bytes.
///
/// Mask downloads sit behind this trait so the conversion pipeline can be
/// exercised in tests with in-memory masks instead of network calls.
pub trait MaskSource {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, ConvertError>;
}

/// Fetches masks from the annotation service over blocking HTTP, sending the
/// configured value as the `Authorization` header.
pub struct HttpMaskSource {
    client: Client,
    api_key: String,
}

impl HttpMaskSource {
    pub fn new(client: Client, api_key: String) -> Self {
        Self { client, api_key }
    }
}

impl MaskSource for HttpMaskSource {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, ConvertError> {
        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, self.api_key.as_str())
            .send()?
            .error_for_status()?;
        Ok(response.bytes()?.to_vec())
    }
}

/// Read source image bytes from a locator: HTTP URL or local path.
pub fn fetch_image_bytes(client: &Client, locator: &str) -> Result<Vec<u8>, ConvertError> {
    if locator.starts_with("http://") || locator.starts_with("https://") {
        let response = client.get(locator).send()?.error_for_status()?;
        Ok(response.bytes()?.to_vec())
    } else {
        Ok(fs::read(locator)?)
    }
}
