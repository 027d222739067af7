//! Network probe
//!
//! Both operations are plain async functions over owned inputs, so the caller
//! can move them onto a spawned task and keep interacting while they run.
//! Neither caches anything; running a probe again repeats the request.

use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::error::ProbeError;
use crate::hosts::{
    check_scope, extract_host, HostOutcome, HostReport, HostResolver, SystemResolver, TabTarget,
};
use crate::Result;

pub const DEFAULT_IP_ECHO_URL: &str = "https://api.ipify.org";
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct NetworkProbe {
    client: Client,
    ip_echo_url: Url,
    timeout: Duration,
    resolver: Arc<dyn HostResolver>,
}

impl NetworkProbe {
    pub fn new(ip_echo_url: Url, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProbeError::Client(e.to_string()))?;

        Ok(Self {
            client,
            ip_echo_url,
            timeout,
            resolver: Arc::new(SystemResolver),
        })
    }

    pub fn with_resolver(mut self, resolver: Arc<dyn HostResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn ip_echo_url(&self) -> &Url {
        &self.ip_echo_url
    }

    /// The host's public address as reported by the IP echo service.
    ///
    /// Goes out over the host network, not through any tab's session, so it
    /// is available whatever the tabs' identities are.
    pub async fn public_ip(&self) -> Result<String> {
        tracing::debug!(url = %self.ip_echo_url, "Querying public IP");

        let response = self
            .client
            .get(self.ip_echo_url.clone())
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProbeError::Status(status.as_u16()));
        }

        let body = response.text().await.map_err(|e| self.classify(e))?;
        let ip = body.trim();
        if ip.is_empty() {
            return Err(ProbeError::EmptyResponse);
        }

        Ok(ip.to_string())
    }

    /// Resolve the host of every target's page, in slot order.
    ///
    /// Refused as a whole if any target is anonymized; no lookup is made in
    /// that case. Lookups run one at a time on the blocking pool.
    pub async fn resolve_tab_hosts(&self, mut targets: Vec<TabTarget>) -> Result<Vec<HostReport>> {
        check_scope(&targets)?;
        targets.sort_by_key(|t| t.slot);

        let mut reports = Vec::with_capacity(targets.len());
        for target in targets {
            let outcome = match extract_host(&target.uri) {
                None => HostOutcome::NoPage,
                Some(host) => self.lookup(host).await,
            };
            reports.push(HostReport {
                slot: target.slot,
                outcome,
            });
        }

        tracing::debug!(tabs = reports.len(), "Resolved tab hosts");
        Ok(reports)
    }

    async fn lookup(&self, host: String) -> HostOutcome {
        let resolver = Arc::clone(&self.resolver);
        let query = host.clone();

        match tokio::task::spawn_blocking(move || resolver.resolve(&query)).await {
            Ok(Ok(ip)) => HostOutcome::Resolved { host, ip },
            Ok(Err(e)) => {
                tracing::warn!(host = %host, error = %e, "Host resolution failed");
                HostOutcome::Failed {
                    host,
                    error: e.to_string(),
                }
            }
            Err(e) => HostOutcome::Failed {
                host,
                error: e.to_string(),
            },
        }
    }

    fn classify(&self, e: reqwest::Error) -> ProbeError {
        if e.is_timeout() {
            return ProbeError::Timeout {
                secs: self.timeout.as_secs(),
            };
        }

        let message = e.to_string();
        let lowered = message.to_lowercase();
        let kind = if e.is_connect() {
            if lowered.contains("dns") || lowered.contains("resolve") {
                "dns"
            } else if lowered.contains("tls") || lowered.contains("certificate") {
                "tls"
            } else {
                "connect"
            }
        } else if e.is_request() {
            "request"
        } else {
            "unknown"
        };

        tracing::warn!(kind, error = %message, "Probe request failed");
        ProbeError::Request { kind, message }
    }
}
