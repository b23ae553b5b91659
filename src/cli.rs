use crate::options::{parse_pairs, OptionParseError};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::collections::HashMap;

/// A CLI for poking HTTP APIs: send requests, inspect responses, and keep a
/// local history of what was sent.
#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// The primary command to execute.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Top-level commands for the CLI.
#[derive(Subcommand)]
pub enum Commands {
    /// Send a GET request to an API endpoint.
    Get {
        /// The endpoint URL.
        url: String,

        /// Query parameters (e.g. key=value,key2=value2).
        #[arg(short = 'q', long = "query", value_parser = parse_option_pairs)]
        query: Option<HashMap<String, String>>,

        /// Custom headers (e.g. key=value,key2=value2).
        #[arg(short = 'H', long = "header", value_parser = parse_option_pairs)]
        header: Option<HashMap<String, String>>,
    },
    /// Send a POST request to an API endpoint.
    Post {
        /// The endpoint URL.
        url: String,

        /// JSON body for the request.
        #[arg(short = 'd', long = "data", value_parser = parse_json_body)]
        data: Option<Value>,

        /// Custom headers (e.g. key=value,key2=value2).
        #[arg(short = 'H', long = "header", value_parser = parse_option_pairs)]
        header: Option<HashMap<String, String>>,
    },
    /// Show request history.
    History,
}

// Coercion happens at argument-parse time, so a malformed option string or
// body fails the command before any network activity.
fn parse_option_pairs(raw: &str) -> Result<HashMap<String, String>, OptionParseError> {
    parse_pairs(raw)
}

fn parse_json_body(raw: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str(raw)
}
