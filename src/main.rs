mod cli;
mod executor;
mod history;
mod logging;
mod options;
mod request;
mod response;

use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};
use console::style;
use executor::Executor;
use history::HistoryStore;
use logging::init_logging;
use request::{Request, RequestOptions};
use reqwest::Method;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // Logging is best-effort; the guard must outlive the command.
    let _guard = init_logging().ok();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{}", style("Error:").red().bold());
            eprintln!("{error:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let store = HistoryStore::new(HistoryStore::default_path()?);

    match command {
        Commands::Get { url, query, header } => {
            let options = RequestOptions {
                headers: header.unwrap_or_default(),
                query: query.unwrap_or_default(),
                data: None,
            };
            send_request(Request::new(Method::GET, url, options), &store).await?;
        }
        Commands::Post { url, data, header } => {
            let options = RequestOptions {
                headers: header.unwrap_or_default(),
                query: Default::default(),
                data,
            };
            send_request(Request::new(Method::POST, url, options), &store).await?;
        }
        Commands::History => print_history(&store),
    }

    Ok(())
}

/// Execute one request, print its outcome, and record successful responses.
///
/// A transport failure propagates (non-zero exit); a remote error status has
/// already been answered by the server, so it is reported but completes the
/// command normally. A history write failure never suppresses the response
/// that was already printed.
async fn send_request(request: Request, store: &HistoryStore) -> anyhow::Result<()> {
    let executor = Executor::new();

    let response = executor.execute(&request).await?;
    executor.render_output(&response)?;

    if response.status.is_success() {
        if let Err(error) = store.append(
            request.method.as_str(),
            &request.url,
            request.options,
            response.status.as_u16(),
        ) {
            eprintln!(
                "{} {}",
                style("Warning:").yellow().bold(),
                style(format!("could not save history: {error}")).yellow()
            );
        }
    }

    Ok(())
}

fn print_history(store: &HistoryStore) {
    let records = store.load();

    if records.is_empty() {
        println!("{}", style("No history found.").yellow());
        return;
    }

    for (index, record) in records.iter().enumerate() {
        println!(
            "{}",
            style(format!(
                "Request {}: {} {}",
                index + 1,
                record.method,
                record.url
            ))
            .cyan()
        );
        println!("Timestamp: {}", record.timestamp.to_rfc3339());
        println!("Status: {}", record.status);
        println!("---");
    }
}
