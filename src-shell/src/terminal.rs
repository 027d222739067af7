//! Terminal output
//!
//! Writes transcript deltas to stdout. A wiped transcript clears the screen
//! before the new text goes out.

use prekt_core::TranscriptDelta;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Clear screen, cursor home
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

pub async fn write_delta<W>(out: &mut W, delta: TranscriptDelta) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    if delta.cleared {
        out.write_all(CLEAR_SCREEN.as_bytes()).await?;
    }
    out.write_all(delta.text.as_bytes()).await?;
    out.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_clear_precedes_text() {
        let mut out = Vec::new();
        write_delta(
            &mut out,
            TranscriptDelta {
                cleared: true,
                text: "> ".to_string(),
            },
        )
        .await
        .unwrap();
        assert_eq!(out, b"\x1b[2J\x1b[H> ");
    }

    #[tokio::test]
    async fn test_plain_delta() {
        let mut out = Vec::new();
        write_delta(
            &mut out,
            TranscriptDelta {
                cleared: false,
                text: "hi\n".to_string(),
            },
        )
        .await
        .unwrap();
        assert_eq!(out, b"hi\n");
    }
}
