//! Address input handling
//!
//! - Bare hosts get the default scheme prepended
//! - Search verbs build their target URL, query percent-encoded

use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use url::Url;

use crate::error::NavigationError;
use crate::Result;

pub const DEFAULT_SCHEME: &str = "https://";
pub const DEFAULT_WIKIPEDIA_HOST: &str = "es.wikipedia.org";

/// Inputs starting with one of these are used as typed
const RECOGNIZED_SCHEMES: [&str; 4] = ["http://", "https://", "file://", "about:"];

const CAT_SEARCH_URI: &str = "https://www.google.com/search?q=gatos+graciosos&tbm=isch";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchEngine {
    Google,
    YouTube,
    Wikipedia,
    DuckDuckGo,
}

impl SearchEngine {
    /// Console verb that selects this engine
    pub fn from_verb(verb: &str) -> Option<Self> {
        match verb {
            "google" => Some(SearchEngine::Google),
            "yt" => Some(SearchEngine::YouTube),
            "wiki" => Some(SearchEngine::Wikipedia),
            "duckduckgo" => Some(SearchEngine::DuckDuckGo),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchEngine::Google => "google",
            SearchEngine::YouTube => "youtube",
            SearchEngine::Wikipedia => "wikipedia",
            SearchEngine::DuckDuckGo => "duckduckgo",
        }
    }
}

impl std::fmt::Display for SearchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct InputResolver {
    wikipedia_host: String,
}

impl InputResolver {
    pub fn new() -> Self {
        Self::with_wikipedia_host(DEFAULT_WIKIPEDIA_HOST.to_string())
    }

    pub fn with_wikipedia_host(host: String) -> Self {
        Self {
            wikipedia_host: host,
        }
    }

    pub fn wikipedia_host(&self) -> &str {
        &self.wikipedia_host
    }

    /// Trim `input` and prepend the default scheme unless it already carries
    /// a recognized one
    pub fn normalize(&self, input: &str) -> Result<String> {
        let input = input.trim();
        if input.is_empty() {
            return Err(NavigationError::InvalidUri(input.to_string()));
        }

        let lower = input.to_ascii_lowercase();
        if RECOGNIZED_SCHEMES.iter().any(|s| lower.starts_with(s)) {
            return Ok(input.to_string());
        }

        let (host, rest) = split_host_and_rest(input);
        if matches!(parse_ip_host(host), Some(IpAddr::V6(_))) && !host.starts_with('[') {
            return Ok(format!("{DEFAULT_SCHEME}[{host}]{rest}"));
        }

        Ok(format!("{DEFAULT_SCHEME}{input}"))
    }

    /// Search URL for `query`, or the engine's front page when there is none
    pub fn search_url(&self, engine: SearchEngine, query: Option<&str>) -> Result<String> {
        let query = query.map(str::trim).filter(|q| !q.is_empty());
        let Some(query) = query else {
            return Ok(self.front_page(engine));
        };

        let url = match engine {
            SearchEngine::Google => with_query("https://www.google.com/search", "q", query)?,
            SearchEngine::YouTube => {
                with_query("https://www.youtube.com/results", "search_query", query)?
            }
            SearchEngine::DuckDuckGo => with_query("https://duckduckgo.com/", "q", query)?,
            SearchEngine::Wikipedia => {
                let base = format!("https://{}/wiki", self.wikipedia_host);
                let mut url = parse(&base)?;
                let title = query.replace(' ', "_");
                url.path_segments_mut()
                    .map_err(|_| NavigationError::InvalidUri(base.clone()))?
                    .push(&title);
                url
            }
        };

        Ok(url.to_string())
    }

    fn front_page(&self, engine: SearchEngine) -> String {
        match engine {
            SearchEngine::Google => "https://www.google.com".to_string(),
            SearchEngine::YouTube => "https://www.youtube.com".to_string(),
            SearchEngine::Wikipedia => format!("https://{}", self.wikipedia_host),
            SearchEngine::DuckDuckGo => "https://duckduckgo.com".to_string(),
        }
    }

    pub fn cat_url(&self) -> &'static str {
        CAT_SEARCH_URI
    }
}

impl Default for InputResolver {
    fn default() -> Self {
        Self::new()
    }
}

fn parse(uri: &str) -> Result<Url> {
    Url::parse(uri).map_err(|_| NavigationError::InvalidUri(uri.to_string()))
}

fn with_query(base: &str, key: &str, value: &str) -> Result<Url> {
    let mut url = parse(base)?;
    url.query_pairs_mut().append_pair(key, value);
    // Spaces as %20; a literal '+' was already escaped to %2B
    let query = url.query().map(|q| q.replace('+', "%20"));
    url.set_query(query.as_deref());
    Ok(url)
}

fn split_host_and_rest(input: &str) -> (&str, &str) {
    let cut = input.find(['/', '?', '#']).unwrap_or(input.len());
    input.split_at(cut)
}

fn parse_ip_host(host: &str) -> Option<IpAddr> {
    let host = if let Some(inner) = host.strip_prefix('[') {
        inner.split(']').next().unwrap_or(inner)
    } else if host.matches(':').count() == 1 {
        host.split(':').next().unwrap_or(host)
    } else {
        host
    };

    host.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_prepends_scheme() {
        let resolver = InputResolver::new();
        assert_eq!(resolver.normalize("example.com").unwrap(), "https://example.com");
        assert_eq!(
            resolver.normalize("  localhost:8080/docs ").unwrap(),
            "https://localhost:8080/docs"
        );
    }

    #[test]
    fn test_normalize_keeps_recognized_schemes() {
        let resolver = InputResolver::new();
        for uri in [
            "http://example.com",
            "HTTPS://example.com",
            "file:///tmp/page.html",
            "about:blank",
        ] {
            assert_eq!(resolver.normalize(uri).unwrap(), uri);
        }
    }

    #[test]
    fn test_normalize_ipv6() {
        let resolver = InputResolver::new();
        assert_eq!(resolver.normalize("::1").unwrap(), "https://[::1]");
        assert_eq!(
            resolver.normalize("2001:db8::1/path").unwrap(),
            "https://[2001:db8::1]/path"
        );
        assert_eq!(resolver.normalize("[::1]:8080").unwrap(), "https://[::1]:8080");
    }

    #[test]
    fn test_normalize_empty() {
        let resolver = InputResolver::new();
        assert!(matches!(
            resolver.normalize("   "),
            Err(NavigationError::InvalidUri(_))
        ));
    }

    #[test]
    fn test_search_urls_are_encoded() {
        let resolver = InputResolver::new();
        assert_eq!(
            resolver
                .search_url(SearchEngine::Google, Some("rust lang"))
                .unwrap(),
            "https://www.google.com/search?q=rust%20lang"
        );
        assert_eq!(
            resolver
                .search_url(SearchEngine::DuckDuckGo, Some("c++ & go"))
                .unwrap(),
            "https://duckduckgo.com/?q=c%2B%2B%20%26%20go"
        );
        assert_eq!(
            resolver
                .search_url(SearchEngine::YouTube, Some("lofi"))
                .unwrap(),
            "https://www.youtube.com/results?search_query=lofi"
        );
    }

    #[test]
    fn test_wikipedia_title() {
        let resolver = InputResolver::new();
        assert_eq!(
            resolver
                .search_url(SearchEngine::Wikipedia, Some("Gato doméstico"))
                .unwrap(),
            "https://es.wikipedia.org/wiki/Gato_dom%C3%A9stico"
        );

        let english = InputResolver::with_wikipedia_host("en.wikipedia.org".to_string());
        assert_eq!(
            english
                .search_url(SearchEngine::Wikipedia, Some("Rust"))
                .unwrap(),
            "https://en.wikipedia.org/wiki/Rust"
        );
    }

    #[test]
    fn test_front_pages() {
        let resolver = InputResolver::new();
        assert_eq!(
            resolver.search_url(SearchEngine::Google, None).unwrap(),
            "https://www.google.com"
        );
        assert_eq!(
            resolver.search_url(SearchEngine::Wikipedia, Some("  ")).unwrap(),
            "https://es.wikipedia.org"
        );
        assert_eq!(SearchEngine::from_verb("yt"), Some(SearchEngine::YouTube));
        assert_eq!(SearchEngine::from_verb("bing"), None);
    }
}
