//! Interactive chat command with streamed responses.

use crate::agent::{
    stream_agent_responses, AgentGraph, AgentInput, AgentMessage, OpenAiAgent, RunConfig,
};
use crate::cli::Output;
use crate::config::{load_servers_config, Settings};
use anyhow::Result;
use console::style;
use futures::StreamExt;
use std::io::{self, BufRead, Write};

/// Run the interactive chat command.
///
/// Each turn streams through the response multiplexer, so tool-call
/// announcements appear inline with the assistant's text.
pub async fn run_chat(model: Option<String>, settings: &Settings) -> Result<()> {
    let model = model.unwrap_or_else(|| settings.agent.model.clone());
    let agent = OpenAiAgent::new(&model)?;
    let config = RunConfig::default();

    // An optional servers.json in the data directory lists external MCP
    // servers; entries referencing unset environment variables are dropped.
    let servers_path = settings.data_dir().join("servers.json");
    if servers_path.exists() {
        let (resolved, skipped) = load_servers_config(&servers_path)?;
        for server in &skipped {
            Output::warning(&format!(
                "Ignoring MCP server '{}': {}",
                server.name, server.reason
            ));
        }
        if !resolved.servers.is_empty() {
            Output::info(&format!(
                "{} MCP server(s) configured in {}",
                resolved.servers.len(),
                servers_path.display()
            ));
        }
    }

    println!("\n{}", style("vidharvest chat").bold().cyan());
    println!(
        "{}\n",
        style("Type your questions, or 'exit' to quit. Use 'clear' to reset conversation.").dim()
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut history: Vec<AgentMessage> = Vec::new();

    loop {
        print!("{} ", style("You:").green().bold());
        stdout.flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            Output::info("Goodbye!");
            break;
        }
        if input.eq_ignore_ascii_case("clear") {
            history.clear();
            Output::info("Conversation history cleared.");
            continue;
        }

        history.push(AgentMessage::user(input));

        let events = agent
            .astream(
                AgentInput {
                    messages: history.clone(),
                },
                &config,
            )
            .await?;

        print!("\n{} ", style("vidharvest:").cyan().bold());
        stdout.flush()?;

        let mut responses = stream_agent_responses(events);
        let mut turn_text = String::new();
        while let Some(fragment) = responses.next().await {
            print!("{}", style(&fragment).cyan());
            stdout.flush()?;
            turn_text.push_str(&fragment);
        }
        println!("\n");

        if !turn_text.trim().is_empty() {
            history.push(AgentMessage::assistant(&turn_text));
        }
    }

    Ok(())
}
