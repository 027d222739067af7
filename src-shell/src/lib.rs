//! PrekT Shell
//!
//! One task owns the console. It waits on three sources at once: lines from
//! stdin, finished probes and engine notifications. After each one it writes
//! whatever the transcript gained to stdout.

mod terminal;

use anyhow::Context;
use prekt_core::{Config, Console, Flow, HeadlessBackend, SystemResolver};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

pub fn run() -> anyhow::Result<()> {
    // Initialize logging
    prekt_core::init_logging();

    let config = Config::load().context("failed to load configuration")?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    runtime.block_on(interaction_loop(config))
}

async fn interaction_loop(config: Config) -> anyhow::Result<()> {
    let (probe_tx, mut probe_rx) = mpsc::unbounded_channel();

    let mut console = Console::new(
        config,
        Arc::new(HeadlessBackend::new()),
        Arc::new(SystemResolver),
        probe_tx,
    )
    .context("rendering engine unavailable")?;

    tracing::info!("PrekT shell started");

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    console.start();
    flush(&mut console, &mut stdout).await?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    break;
                };
                if console.submit(&line) == Flow::Quit {
                    flush(&mut console, &mut stdout).await?;
                    break;
                }
            }
            Some(done) = probe_rx.recv() => console.complete(done),
            Some(event) = console.next_engine_event() => console.handle_engine_event(event),
        }

        flush(&mut console, &mut stdout).await?;
    }

    if console.pending_async() > 0 {
        tracing::debug!(pending = console.pending_async(), "Exiting with probes in flight");
    }
    tracing::info!("PrekT shell stopped");
    Ok(())
}

async fn flush(console: &mut Console, stdout: &mut tokio::io::Stdout) -> anyhow::Result<()> {
    if let Some(delta) = console.take_output() {
        terminal::write_delta(stdout, delta)
            .await
            .context("failed to write to stdout")?;
    }
    Ok(())
}
