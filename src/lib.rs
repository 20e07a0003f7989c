pub mod client;
pub mod error;
pub mod output;
pub mod parse;
pub mod signer;

use std::io::Write;

use tracing::info;
use tracing::warn;

pub use client::MAX_PAGE_SIZE;
pub use client::TopSitesClient;
pub use error::Error;
pub use error::Result;
pub use output::Ranking;
pub use signer::Credentials;
pub use signer::static_credentials;

/// A validated request for `count` ranked sites of one country starting at `start`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankingQuery {
    country_code: String,
    start: u32,
    count: u32,
    page_size: u32,
}

impl RankingQuery {
    pub fn new(country_code: &str, start: u32, count: u32, page_size: u32) -> Result<Self> {
        if count < 1 {
            return Err(Error::InvalidCount);
        }
        if start < 1 {
            return Err(Error::InvalidStart);
        }
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(Error::InvalidPageSize {
                got: page_size,
                max: MAX_PAGE_SIZE,
            });
        }
        if u64::from(start) + u64::from(count) - 1 > u64::from(u32::MAX) {
            return Err(Error::RangeOverflow { start, count });
        }
        let country_code = country_code.trim();
        if country_code.len() != 2 || !country_code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(Error::InvalidCountryCode(country_code.to_string()));
        }

        Ok(Self {
            country_code: country_code.to_ascii_uppercase(),
            start,
            count,
            page_size,
        })
    }

    pub fn country_code(&self) -> &str {
        &self.country_code
    }

    pub fn pages(&self) -> Vec<client::PageRequest> {
        client::plan_pages(&self.country_code, self.start, self.count, self.page_size)
    }
}

/// Fetches every page of `query` in order, printing each page to `out` as it arrives
/// and merging it into `ranking`.
///
/// Pages merged before a failing page stay in `ranking`.
pub async fn fetch_ranking<W: Write>(
    client: &TopSitesClient,
    query: &RankingQuery,
    ranking: &mut Ranking,
    out: &mut W,
) -> Result<()> {
    for page_request in query.pages() {
        info!(
            country = %page_request.country_code,
            start = page_request.start,
            count = page_request.count,
            "fetching top sites"
        );
        let page = client.fetch_page(&page_request).await?;
        info!(
            sites = page.sites.len(),
            total = ?page.total_sites,
            "received top sites page"
        );

        output::print_sites(&mut *out, &page.sites)?;
        output::merge_sites(ranking, &page.sites);

        if (page.sites.len() as u64) < u64::from(page_request.count) {
            warn!(
                requested = page_request.count,
                received = page.sites.len(),
                "reached the end of the list"
            );
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_normalizes_country_code() {
        let query = RankingQuery::new(" de ", 1, 10, MAX_PAGE_SIZE).unwrap();
        assert_eq!(query.country_code(), "DE");
    }

    #[test]
    fn test_query_validation() {
        assert!(matches!(RankingQuery::new("US", 1, 0, 1000), Err(Error::InvalidCount)));
        assert!(matches!(RankingQuery::new("US", 0, 1, 1000), Err(Error::InvalidStart)));
        assert!(matches!(
            RankingQuery::new("US", 1, 1, 1001),
            Err(Error::InvalidPageSize { got: 1001, .. })
        ));
        assert!(matches!(
            RankingQuery::new("US", u32::MAX, 3, 1),
            Err(Error::RangeOverflow { start: u32::MAX, count: 3 })
        ));
        assert!(RankingQuery::new("US", u32::MAX, 1, 1).is_ok());
        assert!(matches!(
            RankingQuery::new("USA", 1, 1, 1000),
            Err(Error::InvalidCountryCode(_))
        ));
        assert!(matches!(
            RankingQuery::new("1a", 1, 1, 1000),
            Err(Error::InvalidCountryCode(_))
        ));
    }

    #[test]
    fn test_query_pages() {
        let query = RankingQuery::new("us", 1, 1500, MAX_PAGE_SIZE).unwrap();
        let pages = query.pages();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[1].start, 1001);
        assert_eq!(pages[1].count, 500);
        assert_eq!(pages[1].country_code, "US");
    }
}
