//! Tab host resolution

use prekt_tabs::Identity;
use serde::Serialize;
use std::io;
use std::net::{IpAddr, ToSocketAddrs};
use url::{Host, Url};

use crate::error::ProbeError;
use crate::Result;

/// Blocking hostname lookup. Only ever called from a blocking worker.
pub trait HostResolver: Send + Sync {
    fn resolve(&self, host: &str) -> io::Result<IpAddr>;
}

/// The operating system's resolver
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemResolver;

impl HostResolver for SystemResolver {
    fn resolve(&self, host: &str) -> io::Result<IpAddr> {
        let addrs: Vec<IpAddr> = (host, 0).to_socket_addrs()?.map(|a| a.ip()).collect();
        addrs
            .iter()
            .find(|ip| ip.is_ipv4())
            .or_else(|| addrs.first())
            .copied()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no addresses found"))
    }
}

/// What a probe needs to know about one tab
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TabTarget {
    pub slot: usize,
    pub identity: Identity,
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum HostOutcome {
    Resolved { host: String, ip: IpAddr },
    /// Blank, local or host-less page
    NoPage,
    Failed { host: String, error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostReport {
    pub slot: usize,
    pub outcome: HostOutcome,
}

impl std::fmt::Display for HostReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tab = self.slot + 1;
        match &self.outcome {
            HostOutcome::Resolved { host, ip } => write!(f, "Tab {tab}: {host} → {ip}"),
            HostOutcome::NoPage => write!(f, "Tab {tab}: no page loaded"),
            HostOutcome::Failed { host, error } => {
                write!(f, "Tab {tab}: {host} → could not resolve ({error})")
            }
        }
    }
}

/// Refuse when any target is anonymized. Must pass before any lookup runs.
pub fn check_scope(targets: &[TabTarget]) -> Result<()> {
    let slots: Vec<usize> = targets
        .iter()
        .filter(|t| t.identity.is_anonymized())
        .map(|t| t.slot)
        .collect();

    if slots.is_empty() {
        Ok(())
    } else {
        Err(ProbeError::SecurityRefusal { slots })
    }
}

/// Host part of a page URI, without port. `None` for blank, local and
/// host-less pages.
pub fn extract_host(uri: &str) -> Option<String> {
    let uri = uri.trim();
    if uri.is_empty() || uri.starts_with("about:") || uri.starts_with("file://") {
        return None;
    }

    let url = Url::parse(uri).ok()?;
    match url.host()? {
        Host::Domain(domain) if !domain.is_empty() => Some(domain.to_string()),
        Host::Domain(_) => None,
        Host::Ipv4(ip) => Some(ip.to_string()),
        Host::Ipv6(ip) => Some(ip.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(slot: usize, identity: Identity) -> TabTarget {
        TabTarget {
            slot,
            identity,
            uri: "https://example.com".to_string(),
        }
    }

    #[test]
    fn test_extract_host() {
        assert_eq!(
            extract_host("https://www.example.com:8443/path?q=1"),
            Some("www.example.com".to_string())
        );
        assert_eq!(extract_host("http://[::1]:8080/"), Some("::1".to_string()));
        assert_eq!(extract_host("http://127.0.0.1/"), Some("127.0.0.1".to_string()));
        assert_eq!(extract_host("file:///home/user/newtab.html"), None);
        assert_eq!(extract_host("about:blank"), None);
        assert_eq!(extract_host(""), None);
    }

    #[test]
    fn test_scope() {
        let direct = vec![target(0, Identity::Direct), target(1, Identity::Direct)];
        assert!(check_scope(&direct).is_ok());

        let mixed = vec![
            target(0, Identity::Direct),
            target(1, Identity::Anonymized),
            target(2, Identity::Direct),
        ];
        assert_eq!(
            check_scope(&mixed),
            Err(ProbeError::SecurityRefusal { slots: vec![1] })
        );
    }

    #[test]
    fn test_report_display() {
        let report = HostReport {
            slot: 0,
            outcome: HostOutcome::Resolved {
                host: "example.com".to_string(),
                ip: "93.184.216.34".parse().unwrap(),
            },
        };
        assert_eq!(report.to_string(), "Tab 1: example.com → 93.184.216.34");

        let report = HostReport {
            slot: 2,
            outcome: HostOutcome::NoPage,
        };
        assert_eq!(report.to_string(), "Tab 3: no page loaded");
    }

    #[test]
    fn test_system_resolver_literal() {
        let ip = SystemResolver.resolve("127.0.0.1").unwrap();
        assert_eq!(ip, "127.0.0.1".parse::<IpAddr>().unwrap());
    }
}
