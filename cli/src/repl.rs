//! Line-oriented chat loop shared by the interactive demos.

use std::io::Write;

use anyhow::Result;
use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::warn;

/// Typed to leave any session.
pub const QUIT_COMMAND: &str = "/quit";

/// A conversation driven one input line at a time.
#[async_trait]
pub trait ChatSession: Send {
    /// Shown once before the first prompt.
    fn banner(&self) -> String;

    /// Produce the reply to one non-empty line.
    async fn respond(&mut self, line: &str) -> Result<String>;
}

/// Read lines until EOF or `/quit`, printing each reply.
///
/// A failed turn is reported and the loop continues.
pub async fn run<S, R, W>(session: &mut S, input: R, output: &mut W) -> Result<()>
where
    S: ChatSession + ?Sized,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    writeln!(output, "{}", session.banner())?;
    let mut lines = input.lines();

    loop {
        write!(output, "> ")?;
        output.flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == QUIT_COMMAND {
            break;
        }

        match session.respond(line).await {
            Ok(reply) => writeln!(output, "{reply}")?,
            Err(e) => {
                warn!("Turn failed: {e:#}");
                writeln!(output, "Error: {e:#}")?;
            }
        }
    }

    writeln!(output)?;
    Ok(())
}
