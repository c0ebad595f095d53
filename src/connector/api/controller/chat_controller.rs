use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::info;

use crate::application::ChatOrchestrator;

use super::super::Container;
use super::turn::submit_bounded;

/// Default file name for `/export` without an argument.
pub const DEFAULT_EXPORT_FILE: &str = "chat_export.txt";

const HELP: &str = "Commands: /export [path], /history, /help, /quit";

/// One line of REPL input.
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Message(String),
    Export(PathBuf),
    History,
    Help,
    Quit,
    Blank,
    Unknown(String),
}

impl Input {
    fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Input::Blank;
        }

        let Some(command) = trimmed.strip_prefix('/') else {
            return Input::Message(line.trim_end_matches(['\r', '\n']).to_string());
        };

        let mut parts = command.splitn(2, char::is_whitespace);
        let name = parts.next().unwrap_or_default();
        let arg = parts.next().map(str::trim).filter(|a| !a.is_empty());

        match name {
            "export" => Input::Export(PathBuf::from(arg.unwrap_or(DEFAULT_EXPORT_FILE))),
            "history" => Input::History,
            "help" => Input::Help,
            "quit" | "exit" => Input::Quit,
            other => Input::Unknown(other.to_string()),
        }
    }
}

pub struct ChatController<'a> {
    container: &'a Container,
}

impl<'a> ChatController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    /// Interactive session on stdin/stdout.
    pub async fn chat(&self, export: Option<PathBuf>) -> Result<String> {
        let stdin = BufReader::new(tokio::io::stdin());
        let mut stdout = std::io::stdout();
        self.run_session(stdin, &mut stdout, export, true).await
    }

    /// Drive a session from `input` until EOF or `/quit`, writing to `out`.
    ///
    /// Turn failures are printed inline and the session continues.
    pub async fn run_session<R, W>(
        &self,
        input: R,
        out: &mut W,
        export: Option<PathBuf>,
        interactive: bool,
    ) -> Result<String>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut session = self.container.chat_session();
        let mut lines = input.lines();

        writeln!(
            out,
            "Chatting with {} ({}). {}",
            session.backend_name(),
            self.container.store_description(),
            HELP
        )?;

        loop {
            if interactive {
                write!(out, "> ")?;
                out.flush()?;
            }

            let Some(line) = lines.next_line().await? else {
                break;
            };

            match Input::parse(&line) {
                Input::Blank => continue,
                Input::Quit => break,
                Input::Help => writeln!(out, "{}", HELP)?,
                Input::Unknown(name) => writeln!(out, "Unknown command: /{}. {}", name, HELP)?,
                Input::History => {
                    let transcript = session.export_transcript();
                    if transcript.is_empty() {
                        writeln!(out, "(no messages yet)")?;
                    } else {
                        writeln!(out, "{}", transcript)?;
                    }
                }
                Input::Export(path) => match write_transcript(&session, &path) {
                    Ok(()) => writeln!(out, "Transcript written to {}", path.display())?,
                    Err(e) => writeln!(out, "Error: {}", e)?,
                },
                Input::Message(text) => {
                    match submit_bounded(&mut session, &text, self.container.timeout(), interactive)
                        .await
                    {
                        Ok(reply) => writeln!(out, "{}: {}", reply.role(), reply.text())?,
                        Err(e) => writeln!(out, "Error: {}", e)?,
                    }
                }
            }
        }

        if let Some(path) = export {
            write_transcript(&session, &path)?;
            writeln!(out, "Transcript written to {}", path.display())?;
        }

        let turns = session.messages().len();
        info!("Chat session ended with {} messages", turns);
        Ok(format!("Session ended ({} messages).", turns))
    }
}

fn write_transcript(session: &ChatOrchestrator, path: &Path) -> std::io::Result<()> {
    std::fs::write(path, session.export_transcript())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_input() {
        assert_eq!(Input::parse("   "), Input::Blank);
        assert_eq!(Input::parse("hello there"), Input::Message("hello there".to_string()));
        assert_eq!(Input::parse("/quit"), Input::Quit);
        assert_eq!(
            Input::parse("/export"),
            Input::Export(PathBuf::from(DEFAULT_EXPORT_FILE))
        );
        assert_eq!(
            Input::parse("/export  notes/today.txt "),
            Input::Export(PathBuf::from("notes/today.txt"))
        );
        assert_eq!(Input::parse("/frobnicate"), Input::Unknown("frobnicate".to_string()));
    }
}
