//! Console transcript
//!
//! Append-only text with a flush cursor. The interaction loop writes out
//! whatever was appended since the last flush; a wipe is reported once so the
//! terminal can be cleared before the new text is written.

pub const PROMPT: &str = "> ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptDelta {
    /// The transcript was wiped since the last flush
    pub cleared: bool,
    pub text: String,
}

#[derive(Debug, Default)]
pub struct Transcript {
    buffer: String,
    flushed: usize,
    cleared: bool,
    prompts: usize,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&mut self, text: &str) {
        self.buffer.push_str(text);
        self.buffer.push('\n');
    }

    pub fn blank(&mut self) {
        self.buffer.push('\n');
    }

    pub fn prompt(&mut self) {
        self.buffer.push_str(PROMPT);
        self.prompts += 1;
    }

    /// Record a line the user typed. The terminal has already shown it, so
    /// it is not part of the next delta unless other output is still pending.
    pub fn echo_input(&mut self, input: &str) {
        let caught_up = self.flushed == self.buffer.len();
        self.line(input);
        if caught_up {
            self.flushed = self.buffer.len();
        }
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.flushed = 0;
        self.cleared = true;
    }

    /// Everything appended since the previous call
    pub fn take_delta(&mut self) -> Option<TranscriptDelta> {
        if !self.cleared && self.flushed == self.buffer.len() {
            return None;
        }

        let delta = TranscriptDelta {
            cleared: std::mem::take(&mut self.cleared),
            text: self.buffer[self.flushed..].to_string(),
        };
        self.flushed = self.buffer.len();
        Some(delta)
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Prompts emitted over the life of the console, wipes included
    pub fn prompt_count(&self) -> usize {
        self.prompts
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.buffer.contains(needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delta_tracks_appends() {
        let mut transcript = Transcript::new();
        transcript.line("PrekT-BR terminal");
        transcript.prompt();

        let delta = transcript.take_delta().unwrap();
        assert_eq!(delta.text, "PrekT-BR terminal\n> ");
        assert!(!delta.cleared);
        assert!(transcript.take_delta().is_none());
    }

    #[test]
    fn test_echo_is_not_replayed() {
        let mut transcript = Transcript::new();
        transcript.prompt();
        transcript.take_delta();

        transcript.echo_input("echo hi");
        transcript.line("hi");
        assert_eq!(transcript.take_delta().unwrap().text, "hi\n");
        assert_eq!(transcript.text(), "> echo hi\nhi\n");
    }

    #[test]
    fn test_clear_is_reported_once() {
        let mut transcript = Transcript::new();
        transcript.line("old output");
        transcript.take_delta();

        transcript.clear();
        transcript.prompt();
        let delta = transcript.take_delta().unwrap();
        assert!(delta.cleared);
        assert_eq!(delta.text, "> ");
        assert!(transcript.take_delta().is_none());
        assert_eq!(transcript.prompt_count(), 1);
    }
}
