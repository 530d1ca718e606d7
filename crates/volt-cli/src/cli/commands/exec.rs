//! Exec command handler.

use std::io::Write;

use anyhow::{Context, Result};
use futures_util::StreamExt;
use volt_core::config::Config;
use volt_core::markdown::{HtmlRenderer, HtmlTranscript, diagram_block};
use volt_core::session::ChatSession;
use volt_core::stream::{MessageView, Sender, StreamOutcome, drive};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    /// Raw markdown, written as it arrives.
    Text,
    /// The settled transcript as HTML.
    Html,
}

pub async fn run(config: &Config, prompt: &str, output: Output) -> Result<()> {
    let prompt = prompt.trim();
    if prompt.is_empty() {
        anyhow::bail!("Prompt must not be empty");
    }

    let mut session = ChatSession::from_config(config).context("start chat session")?;
    tracing::info!(model = session.model(), ?output, "exec");

    match output {
        Output::Text => stream_text(&mut session, prompt).await,
        Output::Html => render_html(&mut session, prompt).await,
    }
}

async fn stream_text(session: &mut ChatSession, prompt: &str) -> Result<()> {
    let mut chunks = session.send_message_stream(prompt);
    let mut stdout = std::io::stdout().lock();
    let mut reply = String::new();

    while let Some(item) = chunks.next().await {
        match item {
            Ok(text) => {
                stdout.write_all(text.as_bytes())?;
                stdout.flush()?;
                reply.push_str(&text);
            }
            Err(e) => {
                writeln!(stdout)?;
                session.complete_turn(None);
                return Err(e).context("response failed");
            }
        }
    }

    if !reply.ends_with('\n') {
        writeln!(stdout)?;
    }
    session.complete_turn(Some(reply));
    Ok(())
}

async fn render_html(session: &mut ChatSession, prompt: &str) -> Result<()> {
    let renderer = HtmlRenderer::new().with_extension(diagram_block);
    let mut view = HtmlTranscript::new(renderer);

    view.append(Sender::User, prompt, false);
    let handle = view.append(Sender::Model, "", true);
    let chunks = session.send_message_stream(prompt);

    match drive(chunks, &mut view, &renderer, handle).await {
        StreamOutcome::Settled(reply) => {
            session.complete_turn(Some(reply));
            println!("{}", view.to_html());
            Ok(())
        }
        StreamOutcome::Failed(e) => {
            session.complete_turn(None);
            println!("{}", view.to_html());
            Err(e).context("response failed")
        }
    }
}
