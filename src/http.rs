//! Blocking HTTP access with a fixed delay between requests.

use std::thread;
use std::time::{Duration, Instant};

use reqwest::blocking::Client;
use serde_json::Value;

use crate::config;
use crate::error::{CatalogError, Result};

/// Source of web pages, implemented by [`Http`] and by test fakes.
pub trait PageFetcher {
    /// Fetch the body of `url` as text.
    fn fetch_page(&mut self, url: &str) -> Result<String>;
}

/// Sequential HTTP client.
///
/// Requests never overlap, and at least `delay` passes between the start of
/// one request and the start of the next.
pub struct Http {
    timeout: Duration,
    delay: Duration,
    client: Option<Client>,
    last_request: Option<Instant>,
}

impl Http {
    pub fn new(timeout: Duration, delay: Duration) -> Self {
        Self {
            timeout,
            delay,
            client: None,
            last_request: None,
        }
    }

    /// Lazy HTTP client, created on first use.
    fn client(&mut self) -> Result<Client> {
        if let Some(client) = &self.client {
            return Ok(client.clone());
        }
        let client = Client::builder()
            .timeout(self.timeout)
            .user_agent(config::USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        self.client = Some(client.clone());
        Ok(client)
    }

    fn throttle(&mut self) {
        if let Some(last) = self.last_request {
            let elapsed = last.elapsed();
            if elapsed < self.delay {
                thread::sleep(self.delay - elapsed);
            }
        }
        self.last_request = Some(Instant::now());
    }

    fn get(&mut self, url: &str) -> Result<reqwest::blocking::Response> {
        let client = self.client()?;
        self.throttle();
        log::debug!("GET {}", url);
        client
            .get(url)
            .send()
            .and_then(|resp| resp.error_for_status())
            .map_err(|e| CatalogError::SourceUnavailable(format!("{url}: {e}")))
    }

    /// GET `url` and parse the body as JSON.
    pub fn get_json(&mut self, url: &str) -> Result<Value> {
        let resp = self.get(url)?;
        resp.json()
            .map_err(|e| CatalogError::SourceUnavailable(format!("{url}: {e}")))
    }

    /// GET `url` and return the body as text.
    pub fn get_text(&mut self, url: &str) -> Result<String> {
        let resp = self.get(url)?;
        resp.text()
            .map_err(|e| CatalogError::SourceUnavailable(format!("{url}: {e}")))
    }
}

impl PageFetcher for Http {
    fn fetch_page(&mut self, url: &str) -> Result<String> {
        self.get_text(url)
    }
}
