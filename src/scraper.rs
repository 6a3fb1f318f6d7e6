use std::collections::BTreeSet;
use std::time::Duration;

use log::debug;
use once_cell::sync::Lazy;
use reqwest::blocking::Client;
use reqwest::header;
use scraper::{Html, Selector};
use url::Url;

use crate::config::Config;
use crate::error::TransportError;
use crate::snapshot::Snapshot;

const FETCH_TIMEOUT: Duration = Duration::from_secs(20);
const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

// product listings link into /us/en/product/
static PRODUCT_LINK: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("a[href*='/us/en/product/']").expect("product selector is valid css")
});

/// Anything that can hand back the markup of a page.
pub trait PageSource {
    fn fetch(&self, url: &Url) -> Result<String, TransportError>;
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &Config) -> Result<Self, TransportError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT_LANGUAGE,
            header::HeaderValue::from_static(ACCEPT_LANGUAGE),
        );
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(TransportError::Client)?;
        Ok(Self { client })
    }
}

impl PageSource for HttpFetcher {
    fn fetch(&self, url: &Url) -> Result<String, TransportError> {
        let request_failed = |source| TransportError::Request {
            url: url.to_string(),
            source,
        };
        let res = self
            .client
            .get(url.clone())
            .send()
            .and_then(|res| res.error_for_status())
            .map_err(request_failed)?;
        debug!("GET {url} -> {}", res.status());
        res.text().map_err(request_failed)
    }
}

/// Reduces a page to the sorted, deduplicated set of product names it lists.
///
/// Each text node under a link is trimmed on its own and the non-blank
/// pieces are joined with nothing between them. Only the set of resulting
/// names matters, so the result does not depend on DOM order. A page with
/// no product links yields the `NO_PRODUCTS_FOUND` sentinel rather than an
/// error.
pub fn extract_snapshot(markup: &str) -> Snapshot {
    let document = Html::parse_document(markup);
    let names: BTreeSet<String> = document
        .select(&PRODUCT_LINK)
        .map(|link| {
            link.text()
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .collect::<String>()
        })
        .filter(|name| !name.is_empty())
        .collect();
    debug!("extracted {} product names", names.len());
    Snapshot::from_names(names)
}
