//! Session factory
//!
//! Builds a [`RenderingSession`] for a requested identity. Anonymized sessions
//! get an ephemeral network session routed through the SOCKS endpoint, WebRTC,
//! media-source and encrypted-media disabled, and a neutral user agent.
//!
//! If the engine refuses the custom proxy the factory does not fail: it builds
//! the session with an environment-level proxy hint instead and reports a
//! [`FactoryWarning`] to the caller.

use prekt_engine::{
    EngineBackend, EngineError, EngineEvent, EngineSettings, EventSink, ProxyMode, SessionId,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

use crate::identity::Identity;
use crate::session::RenderingSession;
use crate::Result;

pub const DEFAULT_SOCKS_PROXY: &str = "socks5://127.0.0.1:9050";
pub const DEFAULT_ANONYMIZED_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; rv:128.0) Gecko/20100101 Firefox/128.0";
const PROXY_ENV_VAR: &str = "SOCKS_PROXY";

/// Engine configuration applied to anonymized sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnonymityProfile {
    pub socks_proxy: String,
    pub user_agent: String,
}

impl AnonymityProfile {
    pub fn new(socks_proxy: String, user_agent: String) -> Self {
        Self {
            socks_proxy,
            user_agent,
        }
    }

    fn restricted(&self, proxy: ProxyMode) -> EngineSettings {
        EngineSettings {
            proxy,
            ephemeral: true,
            webrtc: false,
            media_source: false,
            encrypted_media: false,
            user_agent: Some(self.user_agent.clone()),
        }
    }

    pub fn engine_settings(&self) -> EngineSettings {
        self.restricted(ProxyMode::Custom(self.socks_proxy.clone()))
    }

    /// Same restrictions, proxy advertised through the environment
    pub fn fallback_settings(&self) -> EngineSettings {
        self.restricted(ProxyMode::EnvironmentHint {
            var: PROXY_ENV_VAR.to_string(),
            value: self.socks_proxy.clone(),
        })
    }
}

impl Default for AnonymityProfile {
    fn default() -> Self {
        Self::new(
            DEFAULT_SOCKS_PROXY.to_string(),
            DEFAULT_ANONYMIZED_USER_AGENT.to_string(),
        )
    }
}

/// The session was built, but not the way it was asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactoryWarning {
    pub reason: String,
    pub fallback: String,
}

impl std::fmt::Display for FactoryWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "proxy configuration failed ({}); using fallback {}",
            self.reason, self.fallback
        )
    }
}

#[derive(Debug)]
pub struct SessionBuild {
    pub session: RenderingSession,
    pub warning: Option<FactoryWarning>,
}

pub struct SessionFactory {
    backend: Arc<dyn EngineBackend>,
    profile: AnonymityProfile,
    events: UnboundedSender<EngineEvent>,
}

impl SessionFactory {
    pub fn new(
        backend: Arc<dyn EngineBackend>,
        profile: AnonymityProfile,
        events: UnboundedSender<EngineEvent>,
    ) -> Self {
        Self {
            backend,
            profile,
            events,
        }
    }

    pub fn settings_for(&self, identity: Identity) -> EngineSettings {
        match identity {
            Identity::Direct => EngineSettings::direct(),
            Identity::Anonymized => self.profile.engine_settings(),
        }
    }

    /// Build a new session for `identity`
    pub fn create(&self, identity: Identity) -> Result<SessionBuild> {
        let id = SessionId::new();
        let settings = self.settings_for(identity);

        match self.backend.create(&settings, self.sink(id)) {
            Ok(engine) => {
                tracing::info!(session = %id, identity = %identity, "Created rendering session");
                Ok(SessionBuild {
                    session: RenderingSession::new(id, engine, identity),
                    warning: None,
                })
            }
            Err(EngineError::ProxyRejected(reason)) if identity.is_anonymized() => {
                let fallback = self.profile.fallback_settings();
                let warning = FactoryWarning {
                    reason,
                    fallback: format!("{}={}", PROXY_ENV_VAR, self.profile.socks_proxy),
                };
                tracing::warn!(session = %id, %warning, "Degraded anonymized session");

                let engine = self.backend.create(&fallback, self.sink(id))?;
                Ok(SessionBuild {
                    session: RenderingSession::new(id, engine, identity),
                    warning: Some(warning),
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    fn sink(&self, id: SessionId) -> EventSink {
        EventSink::new(id, self.events.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prekt_engine::HeadlessBackend;
    use tokio::sync::mpsc;

    fn factory(backend: HeadlessBackend) -> SessionFactory {
        let (tx, _rx) = mpsc::unbounded_channel();
        SessionFactory::new(Arc::new(backend), AnonymityProfile::default(), tx)
    }

    #[test]
    fn test_direct_session_is_unrestricted() {
        let backend = HeadlessBackend::new();
        let build = factory(backend.clone()).create(Identity::Direct).unwrap();

        assert!(build.warning.is_none());
        assert_eq!(build.session.identity(), Identity::Direct);
        let record = backend.record(build.session.id()).unwrap();
        assert_eq!(record.settings, EngineSettings::direct());
    }

    #[test]
    fn test_anonymized_session_is_restricted() {
        let backend = HeadlessBackend::new();
        let build = factory(backend.clone()).create(Identity::Anonymized).unwrap();

        assert!(build.warning.is_none());
        let settings = backend.record(build.session.id()).unwrap().settings;
        assert_eq!(
            settings.proxy,
            ProxyMode::Custom("socks5://127.0.0.1:9050".to_string())
        );
        assert!(settings.ephemeral);
        assert!(!settings.webrtc);
        assert!(!settings.media_source);
        assert!(!settings.encrypted_media);
        assert_eq!(
            settings.user_agent.as_deref(),
            Some(DEFAULT_ANONYMIZED_USER_AGENT)
        );
    }

    #[test]
    fn test_proxy_rejection_degrades() {
        let backend = HeadlessBackend::new().rejecting_custom_proxy();
        let build = factory(backend.clone()).create(Identity::Anonymized).unwrap();

        let warning = build.warning.expect("fallback should be reported");
        assert_eq!(warning.fallback, "SOCKS_PROXY=socks5://127.0.0.1:9050");
        assert_eq!(build.session.identity(), Identity::Anonymized);

        let settings = backend.record(build.session.id()).unwrap().settings;
        assert!(matches!(settings.proxy, ProxyMode::EnvironmentHint { .. }));
        assert!(!settings.webrtc);
    }

    #[test]
    fn test_unavailable_engine_is_an_error() {
        let result = factory(HeadlessBackend::new().unavailable()).create(Identity::Direct);
        assert!(matches!(
            result,
            Err(crate::TabError::Engine(EngineError::Unavailable(_)))
        ));
    }
}
