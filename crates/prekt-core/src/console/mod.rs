//! Command console
//!
//! Reads one line at a time and dispatches it through a fixed verb table.
//! Every submitted line ends in exactly one prompt:
//!
//! - synchronous handlers finish before `submit` returns, which then writes a
//!   blank line and the prompt
//! - asynchronous handlers start a probe task and return without a prompt;
//!   the task's completion comes back through a channel and `complete`
//!   writes its output and the prompt
//!
//! All transcript writes happen on the task that owns the console. The console
//! also owns the engine notification queue and drains it before running a
//! command, so a command never acts on a session whose notifications are still
//! queued.

mod commands;
mod transcript;

pub use transcript::{Transcript, TranscriptDelta, PROMPT};

use prekt_calc::Evaluator;
use prekt_engine::{EngineBackend, EngineEvent};
use prekt_navigation::Command;
use prekt_probe::{HostReport, HostResolver, NetworkProbe, ProbeError};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::browser::Browser;
use crate::config::Config;
use crate::error::CoreError;
use crate::Result;

use commands::Reply;

/// Result of a background probe, delivered back to the console
#[derive(Debug)]
pub enum ProbeCompletion {
    PublicIp(std::result::Result<String, ProbeError>),
    TabHosts(std::result::Result<Vec<HostReport>, ProbeError>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Console {
    browser: Browser,
    transcript: Transcript,
    probe: NetworkProbe,
    evaluator: Evaluator,
    engine_events: UnboundedReceiver<EngineEvent>,
    completions: UnboundedSender<ProbeCompletion>,
    pending_async: usize,
}

impl Console {
    pub fn new(
        config: Config,
        backend: Arc<dyn EngineBackend>,
        resolver: Arc<dyn HostResolver>,
        completions: UnboundedSender<ProbeCompletion>,
    ) -> Result<Self> {
        config.validate()?;
        let probe = NetworkProbe::new(config.ip_echo_url()?, config.probe_timeout())?
            .with_resolver(resolver);
        let (engine_tx, engine_events) = mpsc::unbounded_channel();
        let browser = Browser::new(config, backend, engine_tx)?;

        Ok(Self {
            browser,
            transcript: Transcript::new(),
            probe,
            evaluator: Evaluator::default(),
            engine_events,
            completions,
            pending_async: 0,
        })
    }

    /// Banner and the first prompt
    pub fn start(&mut self) {
        self.transcript.line("PrekT-BR terminal");
        self.transcript.line("Type 'help' to list all commands.");
        self.transcript.blank();
        self.transcript.prompt();
    }

    pub fn browser(&self) -> &Browser {
        &self.browser
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Output appended since the last call
    pub fn take_output(&mut self) -> Option<TranscriptDelta> {
        self.transcript.take_delta()
    }

    /// Probes started and not yet completed
    pub fn pending_async(&self) -> usize {
        self.pending_async
    }

    pub fn submit(&mut self, input: &str) -> Flow {
        self.drain_engine_events();

        let line = input.trim();
        self.transcript.echo_input(line);

        let command = match Command::parse(line) {
            Ok(command) => command,
            Err(_) => {
                self.transcript.prompt();
                return Flow::Continue;
            }
        };

        let Some(spec) = commands::lookup(&command.verb) else {
            tracing::debug!(verb = %command.raw_verb, "Unknown command");
            self.transcript.line(&command.unknown().to_string());
            self.finish();
            return Flow::Continue;
        };

        match (spec.handler)(self, &command) {
            Reply::Done => {
                self.finish();
                Flow::Continue
            }
            Reply::Pending => Flow::Continue,
            Reply::Cleared => {
                self.transcript.prompt();
                Flow::Continue
            }
            Reply::Quit => Flow::Quit,
        }
    }

    /// Render a finished probe and give the prompt back
    pub fn complete(&mut self, completion: ProbeCompletion) {
        self.drain_engine_events();
        self.pending_async = self.pending_async.saturating_sub(1);

        match completion {
            ProbeCompletion::PublicIp(Ok(ip)) => {
                self.transcript.line(&format!("Public IP: {ip}"));
            }
            ProbeCompletion::PublicIp(Err(e)) => {
                self.transcript.line(&format!("Could not get public IP: {e}"));
            }
            ProbeCompletion::TabHosts(Ok(reports)) => {
                for report in reports {
                    self.transcript.line(&format!("  {report}"));
                }
            }
            ProbeCompletion::TabHosts(Err(e)) => {
                self.transcript.line(&e.to_string());
            }
        }

        self.finish();
    }

    /// Wait for the next engine notification. Cancel safe, so it can sit in a
    /// `select!` next to other sources; hand the event to `handle_engine_event`.
    pub async fn next_engine_event(&mut self) -> Option<EngineEvent> {
        self.engine_events.recv().await
    }

    pub fn handle_engine_event(&mut self, event: EngineEvent) {
        self.browser.handle_engine_event(event);
    }

    /// Handle every queued engine notification. Returns how many there were.
    pub fn drain_engine_events(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.engine_events.try_recv() {
            self.browser.handle_engine_event(event);
            handled += 1;
        }
        handled
    }

    fn finish(&mut self) {
        self.transcript.blank();
        self.transcript.prompt();
    }

    fn spawn_probe<F>(&mut self, probe: F)
    where
        F: Future<Output = ProbeCompletion> + Send + 'static,
    {
        self.pending_async += 1;
        let completions = self.completions.clone();

        tokio::spawn(async move {
            let done = probe.await;
            if completions.send(done).is_err() {
                tracing::debug!("Probe finished after the console closed");
            }
        });
    }
}

/// The message of the underlying component error, without the wrapper prefix
fn describe(error: &CoreError) -> String {
    match error {
        CoreError::Engine(e) => e.to_string(),
        CoreError::Tab(e) => e.to_string(),
        CoreError::Navigation(e) => e.to_string(),
        CoreError::Eval(e) => e.to_string(),
        CoreError::Probe(e) => e.to_string(),
        other => other.to_string(),
    }
}
