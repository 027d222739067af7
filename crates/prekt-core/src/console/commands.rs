//! Verb table and handlers

use prekt_calc::format_number;
use prekt_navigation::{Command, SearchEngine};
use prekt_probe::check_scope;
use prekt_tabs::Identity;

use super::{describe, Console, ProbeCompletion};
use crate::error::CoreError;

/// Entries shown by `historyten`
const HISTORY_PAGE: usize = 10;

pub(crate) enum Reply {
    /// Output written; the console adds the prompt
    Done,
    /// A probe is running; its completion adds the prompt
    Pending,
    /// Transcript wiped; the console adds only the prompt
    Cleared,
    Quit,
}

type Handler = fn(&mut Console, &Command) -> Reply;

pub(crate) struct CommandSpec {
    pub verbs: &'static [&'static str],
    pub usage: &'static str,
    pub summary: &'static str,
    pub handler: Handler,
}

pub(crate) const COMMANDS: &[CommandSpec] = &[
    CommandSpec { verbs: &["help"], usage: "help", summary: "this list", handler: help },
    CommandSpec { verbs: &["home"], usage: "home", summary: "go to the home page", handler: home },
    CommandSpec { verbs: &["google"], usage: "google [query]", summary: "search Google", handler: search },
    CommandSpec { verbs: &["yt"], usage: "yt [query]", summary: "search YouTube", handler: search },
    CommandSpec { verbs: &["wiki"], usage: "wiki [query]", summary: "look up Wikipedia", handler: search },
    CommandSpec { verbs: &["duckduckgo"], usage: "duckduckgo [query]", summary: "search DuckDuckGo", handler: search },
    CommandSpec { verbs: &["cat"], usage: "cat", summary: "pictures of cats", handler: cat },
    CommandSpec { verbs: &["new"], usage: "new <url>", summary: "open a URL in this tab", handler: open },
    CommandSpec { verbs: &["calc"], usage: "calc <expression>", summary: "evaluate math, e.g. calc 2+3*4", handler: calc },
    CommandSpec { verbs: &["time"], usage: "time", summary: "current time", handler: time },
    CommandSpec { verbs: &["date"], usage: "date", summary: "current date", handler: date },
    CommandSpec { verbs: &["dark"], usage: "dark", summary: "toggle dark mode", handler: dark },
    CommandSpec { verbs: &["tab"], usage: "tab <n>", summary: "switch to tab n", handler: tab },
    CommandSpec { verbs: &["tabs"], usage: "tabs", summary: "list tabs and their identity", handler: tabs },
    CommandSpec { verbs: &["tormode"], usage: "tormode", summary: "anonymize the active tab", handler: tormode },
    CommandSpec { verbs: &["untor"], usage: "untor", summary: "return the active tab to direct", handler: untor },
    CommandSpec { verbs: &["whoami"], usage: "whoami", summary: "your public IP", handler: whoami },
    CommandSpec { verbs: &["serverip"], usage: "serverip", summary: "server IPs of every tab", handler: serverip },
    CommandSpec { verbs: &["historyten"], usage: "historyten", summary: "last 10 pages visited", handler: historyten },
    CommandSpec { verbs: &["reload"], usage: "reload", summary: "reload the page", handler: reload },
    CommandSpec { verbs: &["back"], usage: "back", summary: "go back", handler: back },
    CommandSpec { verbs: &["forward"], usage: "forward", summary: "go forward", handler: forward },
    CommandSpec { verbs: &["echo"], usage: "echo <text>", summary: "print text", handler: echo },
    CommandSpec { verbs: &["about"], usage: "about", summary: "about this browser", handler: about },
    CommandSpec { verbs: &["clear", "clean"], usage: "clear / clean", summary: "clear the terminal", handler: clear },
    CommandSpec { verbs: &["quit", "exit"], usage: "quit / exit", summary: "close the browser", handler: quit },
];

pub(crate) fn lookup(verb: &str) -> Option<&'static CommandSpec> {
    COMMANDS.iter().find(|spec| spec.verbs.contains(&verb))
}

fn help(console: &mut Console, _: &Command) -> Reply {
    console.transcript.line("Available commands:");
    for spec in COMMANDS {
        console
            .transcript
            .line(&format!("  {:<24}{}", spec.usage, spec.summary));
    }
    Reply::Done
}

/// Load `uri` into the active tab and report it
fn load(console: &mut Console, uri: Result<String, CoreError>) -> Reply {
    let result = uri.and_then(|uri| console.browser.navigate_active(&uri).map(|_| uri));
    match result {
        Ok(uri) => console.transcript.line(&format!("Loading {uri}")),
        Err(e) => console.transcript.line(&format!("Error: {}", describe(&e))),
    }
    Reply::Done
}

fn home(console: &mut Console, _: &Command) -> Reply {
    match console.browser.go_home() {
        Ok(()) => {
            let home = console.browser.config().home_uri.clone();
            console.transcript.line(&format!("Loading {home}"));
        }
        Err(e) => console.transcript.line(&format!("Error: {}", describe(&e))),
    }
    Reply::Done
}

fn search(console: &mut Console, cmd: &Command) -> Reply {
    let Some(engine) = SearchEngine::from_verb(&cmd.verb) else {
        console.transcript.line(&cmd.unknown().to_string());
        return Reply::Done;
    };
    let uri = console
        .browser
        .input()
        .search_url(engine, cmd.argument.as_deref())
        .map_err(CoreError::from);
    load(console, uri)
}

fn cat(console: &mut Console, _: &Command) -> Reply {
    let uri = console.browser.input().cat_url().to_string();
    load(console, Ok(uri))
}

fn open(console: &mut Console, cmd: &Command) -> Reply {
    let Some(target) = cmd.argument.as_deref() else {
        console.transcript.line("Usage: new <url>");
        return Reply::Done;
    };
    let uri = console
        .browser
        .input()
        .normalize(target)
        .map_err(CoreError::from);
    load(console, uri)
}

fn calc(console: &mut Console, cmd: &Command) -> Reply {
    let Some(expr) = cmd.argument.as_deref() else {
        console.transcript.line("Usage: calc <expression>");
        return Reply::Done;
    };
    let line = match console.evaluator.evaluate(expr) {
        Ok(value) => format!("{expr} = {}", format_number(value)),
        Err(e) => format!("Error: {e}"),
    };
    console.transcript.line(&line);
    Reply::Done
}

fn time(console: &mut Console, _: &Command) -> Reply {
    let now = chrono::Local::now().format("%H:%M:%S").to_string();
    console.transcript.line(&now);
    Reply::Done
}

fn date(console: &mut Console, _: &Command) -> Reply {
    let today = chrono::Local::now().format("%Y-%m-%d").to_string();
    console.transcript.line(&today);
    Reply::Done
}

fn dark(console: &mut Console, _: &Command) -> Reply {
    let line = if console.browser.toggle_dark_mode() {
        "Dark mode on"
    } else {
        "Dark mode off"
    };
    console.transcript.line(line);
    Reply::Done
}

fn tab(console: &mut Console, cmd: &Command) -> Reply {
    let count = console.browser.tabs().len();
    let number = cmd
        .argument
        .as_deref()
        .and_then(|arg| arg.trim().parse::<usize>().ok())
        .filter(|n| *n >= 1);

    let Some(number) = number else {
        console.transcript.line(&format!("Usage: tab <1-{count}>"));
        return Reply::Done;
    };

    match console.browser.select_tab(number - 1) {
        Ok(_) => {
            let title = console.browser.window_title().to_string();
            let url = console.browser.url_field().to_string();
            console.transcript.line(&title);
            console.transcript.line(&format!("URL: {url}"));
        }
        Err(e) => console.transcript.line(&describe(&e)),
    }
    Reply::Done
}

fn tabs(console: &mut Console, _: &Command) -> Reply {
    let manager = console.browser.tabs();
    let active = manager.active_index();

    let mut lines: Vec<String> = manager
        .slots()
        .iter()
        .map(|slot| {
            let session = slot.session();
            let marker = if slot.index() == active { '*' } else { ' ' };
            format!(
                "{marker} {:>2}. {:<14} {:<10} {}",
                slot.index() + 1,
                session.tab_label(slot.index()),
                session.identity(),
                session.last_known_uri()
            )
        })
        .collect();

    let anonymized = manager.anonymized_slots();
    if !anonymized.is_empty() {
        let names: Vec<String> = anonymized.iter().map(|s| (s + 1).to_string()).collect();
        lines.push(format!("Anonymized tabs: {}", names.join(", ")));
    }

    for line in lines {
        console.transcript.line(&line);
    }
    Reply::Done
}

fn swap(console: &mut Console, target: Identity) -> Reply {
    match console.browser.swap_active_identity(target) {
        Ok(outcome) => {
            let tab = outcome.slot + 1;
            if target.is_anonymized() {
                let proxy = console.browser.config().socks_proxy.clone();
                console
                    .transcript
                    .line(&format!("  Anonymized mode enabled on tab {tab}"));
                console.transcript.line(&format!("  Traffic goes through {proxy}"));
                console.transcript.line("  WebRTC disabled.");
                console.transcript.line("  Be careful.");
                console
                    .transcript
                    .line("  Use http:// rather than https:// for .onion sites.");
            } else {
                console
                    .transcript
                    .line(&format!("  Anonymized mode disabled on tab {tab}"));
                console.transcript.line("  Back to a direct session.");
            }
            if let Some(warning) = outcome.warning {
                console.transcript.line(&format!("  Warning: {warning}"));
            }
        }
        Err(e @ CoreError::Tab(prekt_tabs::TabError::AlreadyInState { .. })) => {
            console.transcript.line(&format!("{}.", describe(&e)));
        }
        Err(e) => {
            console
                .transcript
                .line(&format!("Could not switch identity: {}", describe(&e)));
        }
    }
    Reply::Done
}

fn tormode(console: &mut Console, _: &Command) -> Reply {
    swap(console, Identity::Anonymized)
}

fn untor(console: &mut Console, _: &Command) -> Reply {
    swap(console, Identity::Direct)
}

fn whoami(console: &mut Console, _: &Command) -> Reply {
    console.transcript.line("Querying public IP...");
    let probe = console.probe.clone();
    console.spawn_probe(async move { ProbeCompletion::PublicIp(probe.public_ip().await) });
    Reply::Pending
}

fn serverip(console: &mut Console, _: &Command) -> Reply {
    let targets = console.browser.tab_targets();
    if let Err(e) = check_scope(&targets) {
        tracing::info!(error = %e, "Refused host resolution");
        console.transcript.line(&e.to_string());
        return Reply::Done;
    }

    console
        .transcript
        .line(&format!("Resolving hosts for {} tabs...", targets.len()));
    let probe = console.probe.clone();
    console.spawn_probe(async move {
        ProbeCompletion::TabHosts(probe.resolve_tab_hosts(targets).await)
    });
    Reply::Pending
}

fn historyten(console: &mut Console, _: &Command) -> Reply {
    let entries: Vec<String> = console
        .browser
        .history()
        .last(HISTORY_PAGE)
        .into_iter()
        .map(|entry| entry.uri.clone())
        .collect();

    if entries.is_empty() {
        console.transcript.line("History is empty.");
        return Reply::Done;
    }

    console.transcript.line("Recently visited:");
    for (i, uri) in entries.iter().enumerate() {
        console.transcript.line(&format!("  {:>2}. {uri}", i + 1));
    }
    Reply::Done
}

fn reload(console: &mut Console, _: &Command) -> Reply {
    console.browser.reload();
    Reply::Done
}

fn back(console: &mut Console, _: &Command) -> Reply {
    console.browser.go_back();
    Reply::Done
}

fn forward(console: &mut Console, _: &Command) -> Reply {
    console.browser.go_forward();
    Reply::Done
}

fn echo(console: &mut Console, cmd: &Command) -> Reply {
    if let Some(text) = cmd.argument.as_deref() {
        console.transcript.line(text);
    }
    Reply::Done
}

fn about(console: &mut Console, _: &Command) -> Reply {
    console.transcript.line("PrekT-BR");
    console
        .transcript
        .line("Browser shell with tabbed sessions and a command console");
    console
        .transcript
        .line(&format!("v{}", env!("CARGO_PKG_VERSION")));
    Reply::Done
}

fn clear(console: &mut Console, _: &Command) -> Reply {
    console.transcript.clear();
    Reply::Cleared
}

fn quit(console: &mut Console, _: &Command) -> Reply {
    tracing::info!("Quit requested");
    console.transcript.line("Bye.");
    Reply::Quit
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_verbs_are_unique() {
        let mut seen = HashSet::new();
        for spec in COMMANDS {
            for verb in spec.verbs {
                assert!(seen.insert(*verb), "duplicate verb {verb}");
            }
        }
    }

    #[test]
    fn test_lookup() {
        assert!(lookup("clean").is_some());
        assert!(lookup("exit").is_some());
        assert!(lookup("say").is_none());
        assert!(lookup("HELP").is_none());
    }
}
