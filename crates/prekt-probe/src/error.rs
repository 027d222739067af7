//! Probe error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    #[error("request timed out after {secs}s")]
    Timeout { secs: u64 },

    /// `kind` is one of connect, dns, tls, request or unknown
    #[error("{kind} error: {message}")]
    Request { kind: &'static str, message: String },

    #[error("IP echo service answered with HTTP {0}")]
    Status(u16),

    #[error("IP echo service returned an empty answer")]
    EmptyResponse,

    #[error(
        "serverip is not available while {tabs} anonymized: resolving hostnames \
         outside the proxy could deanonymize the session",
        tabs = describe_slots(.slots)
    )]
    SecurityRefusal { slots: Vec<usize> },

    #[error("could not build HTTP client: {0}")]
    Client(String),
}

fn describe_slots(slots: &[usize]) -> String {
    let names: Vec<String> = slots.iter().map(|s| (s + 1).to_string()).collect();
    match names.len() {
        1 => format!("tab {} is", names[0]),
        _ => format!("tabs {} are", names.join(", ")),
    }
}
