use chrono::Utc;
use reqwest::Url;
use reqwest::header::ACCEPT;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;

use crate::Error;
use crate::Result;
use crate::parse::TopSitesPage;
use crate::parse::parse_error;
use crate::parse::parse_top_sites;
use crate::signer::Credentials;
use crate::signer::Signer;

pub const DEFAULT_ENDPOINT: &str = "https://ats.us-west-1.amazonaws.com";
pub const REGION: &str = "us-west-1";
pub const SERVICE: &str = "AlexaTopSites";
pub const API_PATH: &str = "/api";
pub const ACTION: &str = "TopSites";
pub const RESPONSE_GROUP: &str = "Country";
/// Largest `Count` a single `TopSites` call accepts.
pub const MAX_PAGE_SIZE: u32 = 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub country_code: String,
    pub start: u32,
    pub count: u32,
}

impl PageRequest {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Action", ACTION.to_string()),
            ("ResponseGroup", RESPONSE_GROUP.to_string()),
            ("Start", self.start.to_string()),
            ("Count", self.count.to_string()),
            ("CountryCode", self.country_code.clone()),
        ]
    }
}

/// Splits `count` entries from `start` into consecutive pages of at most `page_size`.
///
/// Pages that would start past `u32::MAX` are not planned.
pub fn plan_pages(country_code: &str, start: u32, count: u32, page_size: u32) -> Vec<PageRequest> {
    let page_size = page_size.max(1);
    let mut pages = Vec::new();
    let mut offset = 0;
    while offset < count {
        let Some(page_start) = start.checked_add(offset) else {
            break;
        };
        let size = page_size.min(count - offset);
        pages.push(PageRequest {
            country_code: country_code.to_string(),
            start: page_start,
            count: size,
        });
        offset += size;
    }
    pages
}

#[derive(Debug, Clone)]
pub struct TopSitesClient {
    http: reqwest::Client,
    endpoint: Url,
    signer: Signer,
}

impl TopSitesClient {
    pub fn new(http: reqwest::Client, credentials: Credentials) -> Result<Self> {
        Self::with_endpoint(http, credentials, DEFAULT_ENDPOINT)
    }

    pub fn with_endpoint(
        http: reqwest::Client,
        credentials: Credentials,
        endpoint: &str,
    ) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason: reason.to_string(),
        };

        let endpoint_url = Url::parse(endpoint).map_err(|e| invalid(&e.to_string()))?;
        if !matches!(endpoint_url.scheme(), "http" | "https") {
            return Err(invalid("scheme must be http or https"));
        }
        if endpoint_url.host_str().is_none() {
            return Err(invalid("missing host"));
        }

        Ok(Self {
            http,
            endpoint: endpoint_url,
            signer: Signer::new(credentials, REGION, SERVICE),
        })
    }

    /// The URL a page is fetched from; this exact string is what gets signed.
    pub fn page_url(&self, request: &PageRequest) -> Url {
        let mut url = self.endpoint.clone();
        url.set_path(API_PATH);
        url.query_pairs_mut()
            .clear()
            .extend_pairs(request.query_pairs());
        url
    }

    pub async fn fetch_page(&self, request: &PageRequest) -> Result<TopSitesPage> {
        let url = self.page_url(request);
        let signed = self.signer.sign_get(url.as_str(), Utc::now())?;
        debug!(%url, "requesting top sites page");

        let mut request_builder = self
            .http
            .get(url)
            .header(ACCEPT, "application/xml")
            .header(CONTENT_TYPE, "application/xml");
        for (name, value) in &signed.headers {
            request_builder = request_builder.header(name.as_str(), value.as_str());
        }
        let response = request_builder.send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(parse_error(&body).unwrap_or(Error::Status {
                status: status.as_u16(),
                body,
            }));
        }

        parse_top_sites(&body)
    }
}
