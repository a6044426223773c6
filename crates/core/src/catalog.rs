//! The fixed catalog of upstream operations exposed as MCP tools.
//!
//! Every entry maps one tool name onto exactly one upstream endpoint. The
//! catalog is declarative: argument placement (path, query string or JSON
//! body) and the upstream parameter names live here, and
//! [`crate::request::build_request`] turns a set of tool arguments into the
//! concrete request.

use crate::schema::{
    json_schema_array, json_schema_boolean, json_schema_enum, json_schema_integer,
    json_schema_map, json_schema_object, json_schema_string,
};
use crate::types::HttpMethod;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Where an argument ends up in the upstream request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamLocation {
    /// Substituted into a `{name}` placeholder of the path template
    Path,
    /// Appended to the query string
    Query,
    /// Field of the JSON request body
    Body,
}

/// Accepted JSON type of an argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    String,
    Integer { min: Option<i64>, max: Option<i64> },
    Boolean,
    StringList,
    Object,
    Enum(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    /// Argument name as seen by the MCP client
    pub name: &'static str,
    /// Parameter name expected by the upstream API
    pub wire_name: &'static str,
    pub kind: ParamKind,
    pub location: ParamLocation,
    pub required: bool,
    pub description: &'static str,
}

impl ParamSpec {
    fn schema(&self) -> Value {
        match self.kind {
            ParamKind::String => json_schema_string(self.description),
            ParamKind::Integer { min, max } => json_schema_integer(self.description, min, max),
            ParamKind::Boolean => json_schema_boolean(self.description),
            ParamKind::StringList => {
                json_schema_array(serde_json::json!({ "type": "string" }), self.description)
            }
            ParamKind::Object => json_schema_map(self.description),
            ParamKind::Enum(choices) => json_schema_enum(choices, self.description),
        }
    }
}

/// Tool grouping, mirrors the upstream API sections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolCategory {
    Backlinks,
    Serp,
    Domain,
    Scrape,
    Keywords,
    Account,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointSpec {
    pub name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub category: ToolCategory,
    pub method: HttpMethod,
    /// Path relative to the API base URL, `{name}` marks a path argument
    pub path: &'static str,
    pub params: &'static [ParamSpec],
}

impl EndpointSpec {
    /// JSON schema for the tool's `inputSchema`
    pub fn input_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .params
            .iter()
            .map(|p| (p.name.to_string(), p.schema()))
            .collect();
        let required = self
            .params
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name)
            .collect();
        json_schema_object(Value::Object(properties), required)
    }

    pub fn param(&self, name: &str) -> Option<&ParamSpec> {
        self.params.iter().find(|p| p.name == name)
    }

    pub fn path_params(&self) -> impl Iterator<Item = &ParamSpec> {
        self.params
            .iter()
            .filter(|p| p.location == ParamLocation::Path)
    }
}

/// All upstream operations, in the order they are listed to clients
pub fn catalog() -> &'static [EndpointSpec] {
    CATALOG
}

/// Find an operation by tool name
pub fn lookup(name: &str) -> Option<&'static EndpointSpec> {
    CATALOG.iter().find(|spec| spec.name == name)
}

const fn param(
    name: &'static str,
    wire_name: &'static str,
    kind: ParamKind,
    location: ParamLocation,
    required: bool,
    description: &'static str,
) -> ParamSpec {
    ParamSpec {
        name,
        wire_name,
        kind,
        location,
        required,
        description,
    }
}

const DEVICES: &[&str] = &["desktop", "mobile"];
const BACKLINK_MODES: &[&str] = &["domain", "subdomain", "url"];

const DOMAIN_QUERY: ParamSpec = param(
    "domain",
    "domain",
    ParamKind::String,
    ParamLocation::Query,
    true,
    "Target domain or URL, e.g. example.com",
);
const DOMAIN_PATH: ParamSpec = param(
    "domain",
    "domain",
    ParamKind::String,
    ParamLocation::Path,
    true,
    "Target domain, e.g. example.com",
);
const COUNTRY_QUERY: ParamSpec = param(
    "country",
    "country",
    ParamKind::String,
    ParamLocation::Query,
    false,
    "Two-letter country code for localized data (default: us)",
);
const COUNTRY_BODY: ParamSpec = param(
    "country",
    "country",
    ParamKind::String,
    ParamLocation::Body,
    false,
    "Two-letter country code for localized data (default: us)",
);
const LANGUAGE_QUERY: ParamSpec = param(
    "language",
    "hl",
    ParamKind::String,
    ParamLocation::Query,
    false,
    "Interface language code, e.g. en",
);
const LANGUAGE_BODY: ParamSpec = param(
    "language",
    "hl",
    ParamKind::String,
    ParamLocation::Body,
    false,
    "Interface language code, e.g. en",
);
const LIMIT_QUERY: ParamSpec = param(
    "limit",
    "limit",
    ParamKind::Integer {
        min: Some(1),
        max: Some(1000),
    },
    ParamLocation::Query,
    false,
    "Maximum number of rows to return (default: 100)",
);
const KEYWORDS_BODY: ParamSpec = param(
    "keywords",
    "keywords",
    ParamKind::StringList,
    ParamLocation::Body,
    true,
    "Keywords to analyze (up to 100)",
);
const URL_BODY: ParamSpec = param(
    "url",
    "url",
    ParamKind::String,
    ParamLocation::Body,
    true,
    "Absolute URL of the page",
);

static CATALOG: &[EndpointSpec] = &[
    // Backlinks
    EndpointSpec {
        name: "get_backlinks",
        title: "Backlinks",
        description: "List backlinks pointing to a domain, subdomain or URL, with source page, anchor text and link attributes.",
        category: ToolCategory::Backlinks,
        method: HttpMethod::Get,
        path: "backlinks",
        params: &[
            DOMAIN_QUERY,
            param(
                "mode",
                "mode",
                ParamKind::Enum(BACKLINK_MODES),
                ParamLocation::Query,
                false,
                "Scope of the target: whole domain, exact subdomain or single URL (default: domain)",
            ),
            LIMIT_QUERY,
        ],
    },
    EndpointSpec {
        name: "get_backlinks_summary",
        title: "Backlinks summary",
        description: "Aggregate backlink profile of a domain: total backlinks, referring domains, dofollow ratio and trend.",
        category: ToolCategory::Backlinks,
        method: HttpMethod::Get,
        path: "backlinks/summary",
        params: &[DOMAIN_QUERY],
    },
    EndpointSpec {
        name: "get_referring_domains",
        title: "Referring domains",
        description: "List domains linking to the target, with backlink counts and first-seen dates.",
        category: ToolCategory::Backlinks,
        method: HttpMethod::Get,
        path: "backlinks/referring-domains",
        params: &[DOMAIN_QUERY, LIMIT_QUERY],
    },
    EndpointSpec {
        name: "get_anchor_texts",
        title: "Anchor texts",
        description: "Most frequent anchor texts used in backlinks to the target.",
        category: ToolCategory::Backlinks,
        method: HttpMethod::Get,
        path: "backlinks/anchors",
        params: &[DOMAIN_QUERY, LIMIT_QUERY],
    },
    // SERP
    EndpointSpec {
        name: "fetch_serp",
        title: "Search results",
        description: "Fetch a live search engine results page for a query: organic results, ads, featured snippets and other SERP features.",
        category: ToolCategory::Serp,
        method: HttpMethod::Get,
        path: "serp",
        params: &[
            param(
                "query",
                "q",
                ParamKind::String,
                ParamLocation::Query,
                true,
                "Search query",
            ),
            COUNTRY_QUERY,
            LANGUAGE_QUERY,
            param(
                "device",
                "device",
                ParamKind::Enum(DEVICES),
                ParamLocation::Query,
                false,
                "Device type to emulate (default: desktop)",
            ),
            param(
                "num",
                "num",
                ParamKind::Integer {
                    min: Some(1),
                    max: Some(100),
                },
                ParamLocation::Query,
                false,
                "Number of results per page (default: 10)",
            ),
            param(
                "page",
                "page",
                ParamKind::Integer {
                    min: Some(1),
                    max: Some(10),
                },
                ParamLocation::Query,
                false,
                "Results page number (default: 1)",
            ),
        ],
    },
    EndpointSpec {
        name: "fetch_serp_batch",
        title: "Batch search results",
        description: "Fetch search results pages for several queries in one request.",
        category: ToolCategory::Serp,
        method: HttpMethod::Post,
        path: "serp/batch",
        params: &[
            param(
                "queries",
                "queries",
                ParamKind::StringList,
                ParamLocation::Body,
                true,
                "Search queries (up to 50)",
            ),
            COUNTRY_BODY,
            LANGUAGE_BODY,
            param(
                "device",
                "device",
                ParamKind::Enum(DEVICES),
                ParamLocation::Body,
                false,
                "Device type to emulate (default: desktop)",
            ),
        ],
    },
    EndpointSpec {
        name: "check_rank",
        title: "Rank check",
        description: "Find the position of a domain in the search results for a keyword.",
        category: ToolCategory::Serp,
        method: HttpMethod::Get,
        path: "serp/rank",
        params: &[
            DOMAIN_QUERY,
            param(
                "keyword",
                "q",
                ParamKind::String,
                ParamLocation::Query,
                true,
                "Keyword to check the ranking for",
            ),
            COUNTRY_QUERY,
            param(
                "depth",
                "depth",
                ParamKind::Integer {
                    min: Some(10),
                    max: Some(100),
                },
                ParamLocation::Query,
                false,
                "How many results to scan (default: 100)",
            ),
        ],
    },
    // Domains
    EndpointSpec {
        name: "get_domain_info",
        title: "Domain overview",
        description: "Overview of a domain: estimated organic traffic, ranking keywords, technologies and top pages.",
        category: ToolCategory::Domain,
        method: HttpMethod::Get,
        path: "domains/{domain}",
        params: &[DOMAIN_PATH],
    },
    EndpointSpec {
        name: "get_domain_authority",
        title: "Domain authority",
        description: "Authority and trust scores of a domain.",
        category: ToolCategory::Domain,
        method: HttpMethod::Get,
        path: "domains/{domain}/authority",
        params: &[DOMAIN_PATH],
    },
    EndpointSpec {
        name: "get_domain_keywords",
        title: "Domain keywords",
        description: "Keywords a domain ranks for organically, with position, volume and landing URL.",
        category: ToolCategory::Domain,
        method: HttpMethod::Get,
        path: "domains/{domain}/keywords",
        params: &[DOMAIN_PATH, COUNTRY_QUERY, LIMIT_QUERY],
    },
    EndpointSpec {
        name: "get_domain_competitors",
        title: "Domain competitors",
        description: "Domains competing for the same organic keywords as the target.",
        category: ToolCategory::Domain,
        method: HttpMethod::Get,
        path: "domains/{domain}/competitors",
        params: &[DOMAIN_PATH, COUNTRY_QUERY, LIMIT_QUERY],
    },
    EndpointSpec {
        name: "get_whois",
        title: "WHOIS",
        description: "WHOIS registration record of a domain: registrar, creation and expiry dates, name servers.",
        category: ToolCategory::Domain,
        method: HttpMethod::Get,
        path: "domains/{domain}/whois",
        params: &[DOMAIN_PATH],
    },
    // Scraping
    EndpointSpec {
        name: "scrape_url",
        title: "Scrape page",
        description: "Download a web page, optionally rendering JavaScript, and return its HTML and extracted text.",
        category: ToolCategory::Scrape,
        method: HttpMethod::Post,
        path: "scrape",
        params: &[
            URL_BODY,
            param(
                "render_js",
                "render_js",
                ParamKind::Boolean,
                ParamLocation::Body,
                false,
                "Render the page in a headless browser (default: false)",
            ),
            param(
                "wait_for_ms",
                "wait_for",
                ParamKind::Integer {
                    min: Some(0),
                    max: Some(30_000),
                },
                ParamLocation::Body,
                false,
                "Milliseconds to wait after load when rendering JavaScript",
            ),
            param(
                "headers",
                "headers",
                ParamKind::Object,
                ParamLocation::Body,
                false,
                "Extra HTTP headers to send with the page request",
            ),
        ],
    },
    EndpointSpec {
        name: "extract_links",
        title: "Extract links",
        description: "List the links found on a web page with their anchor text and rel attributes.",
        category: ToolCategory::Scrape,
        method: HttpMethod::Post,
        path: "scrape/links",
        params: &[
            URL_BODY,
            param(
                "internal_only",
                "internal_only",
                ParamKind::Boolean,
                ParamLocation::Body,
                false,
                "Only return links to the same host (default: false)",
            ),
        ],
    },
    EndpointSpec {
        name: "get_page_metadata",
        title: "Page metadata",
        description: "On-page SEO metadata of a URL: title, meta description, canonical, headings, Open Graph and structured data.",
        category: ToolCategory::Scrape,
        method: HttpMethod::Get,
        path: "scrape/metadata",
        params: &[param(
            "url",
            "url",
            ParamKind::String,
            ParamLocation::Query,
            true,
            "Absolute URL of the page",
        )],
    },
    // Keywords
    EndpointSpec {
        name: "keyword_suggestions",
        title: "Keyword suggestions",
        description: "Keyword ideas related to a seed keyword, with search volume and competition.",
        category: ToolCategory::Keywords,
        method: HttpMethod::Get,
        path: "keywords/suggestions",
        params: &[
            param(
                "keyword",
                "q",
                ParamKind::String,
                ParamLocation::Query,
                true,
                "Seed keyword",
            ),
            COUNTRY_QUERY,
            LANGUAGE_QUERY,
            LIMIT_QUERY,
        ],
    },
    EndpointSpec {
        name: "keyword_volume",
        title: "Keyword volume",
        description: "Monthly search volume, CPC and trend for a list of keywords.",
        category: ToolCategory::Keywords,
        method: HttpMethod::Post,
        path: "keywords/volume",
        params: &[KEYWORDS_BODY, COUNTRY_BODY],
    },
    EndpointSpec {
        name: "keyword_difficulty",
        title: "Keyword difficulty",
        description: "Ranking difficulty score (0-100) for a list of keywords.",
        category: ToolCategory::Keywords,
        method: HttpMethod::Post,
        path: "keywords/difficulty",
        params: &[KEYWORDS_BODY, COUNTRY_BODY],
    },
    EndpointSpec {
        name: "related_questions",
        title: "Related questions",
        description: "\"People also ask\" questions shown in search results for a keyword.",
        category: ToolCategory::Keywords,
        method: HttpMethod::Get,
        path: "keywords/questions",
        params: &[
            param(
                "keyword",
                "q",
                ParamKind::String,
                ParamLocation::Query,
                true,
                "Keyword to collect questions for",
            ),
            COUNTRY_QUERY,
            LANGUAGE_QUERY,
        ],
    },
    EndpointSpec {
        name: "autocomplete",
        title: "Autocomplete",
        description: "Search engine autocomplete suggestions for a partial query.",
        category: ToolCategory::Keywords,
        method: HttpMethod::Get,
        path: "keywords/autocomplete",
        params: &[
            param(
                "query",
                "q",
                ParamKind::String,
                ParamLocation::Query,
                true,
                "Partial search query",
            ),
            COUNTRY_QUERY,
            LANGUAGE_QUERY,
        ],
    },
    // Account
    EndpointSpec {
        name: "get_account_usage",
        title: "Account usage",
        description: "Remaining API credits and usage of the current billing period for the calling API key.",
        category: ToolCategory::Account,
        method: HttpMethod::Get,
        path: "account/usage",
        params: &[],
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn placeholders(path: &str) -> Vec<&str> {
        path.split('/')
            .filter_map(|seg| seg.strip_prefix('{').and_then(|s| s.strip_suffix('}')))
            .collect()
    }

    #[test]
    fn test_catalog_size() {
        assert_eq!(catalog().len(), 21);
    }

    #[test]
    fn test_tool_names_unique() {
        let names: HashSet<_> = catalog().iter().map(|s| s.name).collect();
        assert_eq!(names.len(), catalog().len());
    }

    #[test]
    fn test_path_placeholders_match_path_params() {
        for spec in catalog() {
            let mut from_path = placeholders(spec.path);
            let mut from_params: Vec<_> = spec.path_params().map(|p| p.name).collect();
            from_path.sort();
            from_params.sort();
            assert_eq!(from_path, from_params, "path params of {}", spec.name);
        }
    }

    #[test]
    fn test_get_endpoints_have_no_body_params() {
        for spec in catalog().iter().filter(|s| s.method == HttpMethod::Get) {
            assert!(
                spec.params.iter().all(|p| p.location != ParamLocation::Body),
                "{} is GET but declares body params",
                spec.name
            );
        }
    }

    #[test]
    fn test_paths_are_relative() {
        for spec in catalog() {
            assert!(!spec.path.starts_with('/'), "{}", spec.name);
            assert!(!spec.path.ends_with('/'), "{}", spec.name);
        }
    }

    #[test]
    fn test_param_names_unique_per_tool() {
        for spec in catalog() {
            let names: HashSet<_> = spec.params.iter().map(|p| p.name).collect();
            assert_eq!(names.len(), spec.params.len(), "{}", spec.name);
        }
    }

    #[test]
    fn test_lookup() {
        let spec = lookup("fetch_serp").unwrap();
        assert_eq!(spec.method, HttpMethod::Get);
        assert_eq!(spec.path, "serp");
        assert_eq!(spec.param("query").unwrap().wire_name, "q");
        assert!(lookup("does_not_exist").is_none());
    }

    #[test]
    fn test_input_schema_lists_required() {
        let schema = lookup("check_rank").unwrap().input_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["required"], serde_json::json!(["domain", "keyword"]));
        assert_eq!(schema["properties"]["depth"]["type"], "integer");
        assert_eq!(schema["properties"]["depth"]["minimum"], 10);

        let schema = lookup("get_account_usage").unwrap().input_schema();
        assert_eq!(schema["required"], serde_json::json!([]));
        assert_eq!(schema["properties"], serde_json::json!({}));
    }

    #[test]
    fn test_every_category_is_populated() {
        let categories: HashSet<_> = catalog().iter().map(|s| s.category).collect();
        assert_eq!(categories.len(), 6);
    }
}
