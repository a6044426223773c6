//! Typed API groups, one per upstream section.

pub mod account;
pub mod backlinks;
pub mod domains;
pub mod keywords;
pub mod scrape;
pub mod serp;

pub use account::AccountApi;
pub use backlinks::{BacklinkMode, BacklinksApi, BacklinksRequest};
pub use domains::{DomainListRequest, DomainsApi};
pub use keywords::{KeywordListRequest, KeywordQuery, KeywordsApi};
pub use scrape::{ScrapeApi, ScrapeRequest};
pub use serp::{Device, RankCheckRequest, SerpApi, SerpBatchRequest, SerpQuery};
