//! Synchronous client for the **Kolada API (v2)**.
//!
//! Covers the three endpoints the reports need: the municipality list,
//! per-municipality/year KPI data and per-KPI metadata. Pagination is handled
//! automatically by following the server's `next_page` locator.
//!
//! ### Notes
//! - The first data request carries a `per_page` hint. Continuation requests use
//!   the `next_page` URL verbatim since it already encodes every parameter.
//! - There is no retry: any non-success status or malformed body on mandatory
//!   data aborts the call.
//! - HTTP goes through the [`Transport`] trait so the client can be driven by a
//!   scripted transport in tests.
//!
//! Typical usage:
//! ```no_run
//! # use kolada_rs::Client;
//! let client = Client::new()?;
//! let records = client.fetch_year_data("1860", 2010)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::models::{KpiMetadata, Municipality, Page, RawKpiRecord};
use anyhow::{Context, Result, bail};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};
use reqwest::blocking::Client as HttpClient;
use reqwest::redirect::Policy;
use serde::de::DeserializeOwned;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://api.kolada.se/v2";
pub const DEFAULT_PER_PAGE: u32 = 5000;

/// Status and body of one HTTP GET.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Minimal GET capability the client is built on.
pub trait Transport {
    /// Issue a GET. `query` is appended to `url`; an empty slice leaves the URL untouched.
    fn get(&self, url: &str, query: &[(&str, String)]) -> Result<HttpResponse>;
}

/// Default transport backed by a blocking reqwest client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: HttpClient,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .redirect(Policy::limited(5))
            .user_agent(concat!("kolada_rs/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("build http client")?;
        Ok(Self { http })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str, query: &[(&str, String)]) -> Result<HttpResponse> {
        let mut req = self.http.get(url);
        if !query.is_empty() {
            req = req.query(query);
        }
        let resp = req.send()?;
        let status = resp.status().as_u16();
        let body = resp.text().context("read response body")?;
        Ok(HttpResponse { status, body })
    }
}

// Allow -, _, . unescaped in ids
const SAFE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

fn enc(segment: &str) -> String {
    percent_encoding::utf8_percent_encode(segment.trim(), SAFE).to_string()
}

/// Kolada client generic over its transport.
#[derive(Debug, Clone)]
pub struct Client<T = HttpTransport> {
    pub base_url: String,
    pub per_page: u32,
    http: T,
}

impl Client<HttpTransport> {
    /// Client against the public API with the default page-size hint.
    pub fn new() -> Result<Self> {
        Ok(Self::with_transport(HttpTransport::new()?))
    }
}

impl<T: Transport> Client<T> {
    pub fn with_transport(http: T) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            per_page: DEFAULT_PER_PAGE,
            http,
        }
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    pub fn transport(&self) -> &T {
        &self.http
    }

    fn get_page<V: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<Page<V>> {
        let resp = self.http.get(url, query)?;
        if !resp.is_success() {
            bail!("request failed with HTTP {}", resp.status);
        }
        serde_json::from_str(&resp.body).context("decode json")
    }

    /// Fetch every municipality.
    pub fn fetch_municipalities(&self) -> Result<Vec<Municipality>> {
        let url = format!("{}/municipality", self.base_url);
        let page: Page<Municipality> = self
            .get_page(&url, &[])
            .with_context(|| format!("GET {}", url))?;
        Ok(page.values)
    }

    /// Fetch all KPI records for one municipality and year, following `next_page`.
    ///
    /// ### Errors
    /// - Network/HTTP error on any page
    /// - JSON decoding error on any page
    /// - More than 1000 pages
    pub fn fetch_year_data(
        &self,
        municipality_id: &str,
        year: i32,
    ) -> Result<Vec<RawKpiRecord>> {
        // Safety cap to avoid pathological jobs
        let max_pages = 1000u32;

        let mut url = format!(
            "{}/data/municipality/{}/year/{}",
            self.base_url,
            enc(municipality_id),
            year
        );
        let mut query = vec![("per_page", self.per_page.to_string())];
        let mut pages = 0u32;
        let mut out: Vec<RawKpiRecord> = Vec::new();
        loop {
            pages += 1;
            if pages > max_pages {
                bail!("page limit exceeded ({})", max_pages);
            }
            log::info!(
                "Fetching data for municipality {} year {} from: {}",
                municipality_id,
                year,
                url
            );
            let page: Page<RawKpiRecord> = self
                .get_page(&url, &query)
                .with_context(|| format!("GET {}", url))?;
            out.extend(page.values);

            match page.next_page {
                Some(next) if !next.is_empty() => {
                    url = next;
                    // next_page already encodes the original parameters
                    query.clear();
                }
                _ => break,
            }
        }
        Ok(out)
    }

    /// Fetch metadata for one KPI.
    ///
    /// Returns `Ok(None)` when the server answers with a non-success status or an
    /// empty result list. Transport and decoding failures are errors.
    pub fn fetch_kpi_metadata(&self, kpi_id: &str) -> Result<Option<KpiMetadata>> {
        let url = format!("{}/kpi/{}", self.base_url, enc(kpi_id));
        let resp = self
            .http
            .get(&url, &[])
            .with_context(|| format!("GET {}", url))?;
        if !resp.is_success() {
            log::debug!("GET {} answered HTTP {}", url, resp.status);
            return Ok(None);
        }
        let page: Page<KpiMetadata> =
            serde_json::from_str(&resp.body).with_context(|| format!("decode {}", url))?;
        Ok(page.values.into_iter().next())
    }
}
