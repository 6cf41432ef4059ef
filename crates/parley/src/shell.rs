// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `parley shell` command implementation.
//!
//! Resolves the API key, builds (or reuses) the agent client for it and runs
//! a readline REPL. Each line is one chat turn; the loop waits for the reply
//! before reading the next line.

use std::sync::Arc;
use std::time::Duration;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use parley_agent::{AgentClient, ChatSession, ClientCache, TranscriptEntry};
use parley_config::ParleyConfig;
use parley_core::ParleyError;
use parley_core::types::Role;
use parley_gemini::GeminiRuntime;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::debug;

use crate::credential;

/// Where Google API keys are issued.
pub const API_KEY_URL: &str = "https://aistudio.google.com/app/apikey";

/// Banner shown when no API key could be obtained.
pub const MISSING_CREDENTIAL_BANNER: &str = "Please add your Google API key to continue. \
     Get one at https://aistudio.google.com/app/apikey";

const INPUT_HINT: &str = "Ask me anything...";

const SPINNER_MESSAGE: &str = "Thinking...";

/// One parsed input line.
#[derive(Debug, PartialEq, Eq)]
enum ShellCommand<'a> {
    Quit,
    History,
    Session,
    Empty,
    Message(&'a str),
}

fn parse_command(line: &str) -> ShellCommand<'_> {
    match line.trim() {
        "" => ShellCommand::Empty,
        "/quit" | "/exit" => ShellCommand::Quit,
        "/history" => ShellCommand::History,
        "/session" => ShellCommand::Session,
        _ => ShellCommand::Message(line),
    }
}

/// Runs the `parley shell` interactive REPL.
pub async fn run_shell(config: ParleyConfig) -> Result<(), ParleyError> {
    init_tracing(&config.log_level);

    let credential = credential::resolve_credential(&config.gemini)?;

    let factory_config = config.clone();
    let mut clients = ClientCache::new(move |key| {
        let runtime = GeminiRuntime::new(&factory_config, key)?;
        Ok(AgentClient::from_config(
            Arc::new(runtime),
            &factory_config.app,
        ))
    });
    let client = clients.get_or_create(&credential)?;
    let mut chat = ChatSession::new(client);

    let mut rl = DefaultEditor::new()
        .map_err(|e| ParleyError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{}", "parley".bold().green());
    println!(
        "A chat assistant powered by Google Gemini. Get an API key at {}.",
        API_KEY_URL.underline()
    );
    println!(
        "Chatting with {} ({}). Type {} to exit, {} to show the conversation.",
        config.agent.name.cyan(),
        config.agent.model.dimmed(),
        "/quit".yellow(),
        "/history".yellow()
    );
    println!("{}\n", INPUT_HINT.dimmed());

    let agent_name = config.agent.name.as_str();
    let prompt = format!("{}> ", "you".green());
    loop {
        let line = match rl.readline(&prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        };

        match parse_command(&line) {
            ShellCommand::Empty => continue,
            ShellCommand::Quit => break,
            ShellCommand::History => {
                let _ = rl.add_history_entry(line.as_str());
                render_transcript(chat.transcript().entries(), agent_name);
            }
            ShellCommand::Session => {
                let _ = rl.add_history_entry(line.as_str());
                let session = chat.session();
                println!(
                    "{} {} ({})",
                    "session".dimmed(),
                    session.id(),
                    session.provision_state()
                );
            }
            ShellCommand::Message(text) => {
                let _ = rl.add_history_entry(line.as_str());
                println!("{}", format_entry(Role::User, text, agent_name));

                let spinner = thinking_spinner();
                let result = chat.submit(text).await;
                spinner.finish_and_clear();

                match result {
                    Ok(reply) => println!("{}\n", format_entry(Role::Assistant, &reply, agent_name)),
                    Err(e) => eprintln!("{}: {e}", "error".red()),
                }
            }
        }
    }

    debug!(
        session_id = %chat.session().id(),
        entries = chat.transcript().len(),
        "shell exiting"
    );
    println!("{}", "goodbye".dimmed());
    Ok(())
}

fn thinking_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.set_message(SPINNER_MESSAGE);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

fn render_transcript(entries: &[TranscriptEntry], agent_name: &str) {
    if entries.is_empty() {
        println!("{}", "(no messages yet)".dimmed());
        return;
    }
    for entry in entries {
        println!("{}", format_entry(entry.role, &entry.content, agent_name));
    }
    println!();
}

/// One message bubble: a colored role label followed by the text.
fn format_entry(role: Role, content: &str, agent_name: &str) -> String {
    let label = match role {
        Role::User => "you".green().bold(),
        Role::Assistant => agent_name.cyan().bold(),
    };
    format!("{label}: {content}")
}

/// Installs the stderr log subscriber. `RUST_LOG` overrides `log_level`.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("parley={log_level},warn")));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .try_init();
}
