//! PrekT Network Probes
//!
//! Network work the console runs off the interaction loop:
//! - `public_ip`: asks an IP echo service for the host's public address
//! - `resolve_tab_hosts`: resolves the host of every tab's page, refused
//!   outright while any tab is anonymized
//!
//! Probes work on snapshots of tab state, never on the sessions themselves.

mod error;
mod hosts;
mod probe;

pub use error::ProbeError;
pub use hosts::{
    check_scope, extract_host, HostOutcome, HostReport, HostResolver, SystemResolver, TabTarget,
};
pub use probe::{NetworkProbe, DEFAULT_IP_ECHO_URL, DEFAULT_PROBE_TIMEOUT};

pub type Result<T> = std::result::Result<T, ProbeError>;
