//! Command-line client for the key-value server
//!
//! Issues exactly one request per invocation and prints the reply

use clap::{builder::NonEmptyStringValueParser, Parser, ValueEnum};
use kvstore::{Client, KvError};
use reqwest::Method;
use std::process::ExitCode;

const AFTER_HELP: &str = "\
Examples:
  Set a key-value pair:
    kv-client -m=put --key=foo --value=bar

  Get the value of a key:
    kv-client -m=get --key=foo

  Delete a key:
    kv-client -m=delete --key=foo";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Op {
    Put,
    Get,
    Delete,
}

impl Op {
    fn method(self) -> Method {
        match self {
            Op::Put => Method::PUT,
            Op::Get => Method::GET,
            Op::Delete => Method::DELETE,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "kv-client", about = "Issue one request to the key-value server")]
#[command(after_help = AFTER_HELP)]
struct Args {
    /// Method: put, get, or delete
    #[arg(short = 'm', value_enum, ignore_case = true)]
    method: Op,

    /// The key to interact with
    #[arg(long, value_parser = NonEmptyStringValueParser::new())]
    key: String,

    /// The value to set (only for put)
    #[arg(long)]
    value: Option<String>,

    /// Server base URL
    #[arg(long, default_value = "http://127.0.0.1:8080")]
    server: String,
}

fn error_line(err: &KvError) -> String {
    match err {
        KvError::KeyNotFound => "Error: key not found".to_string(),
        KvError::MethodNotAllowed => "Error: method not allowed".to_string(),
        KvError::Status(status) => format!("Error: {}", status),
        other => format!("Error executing request: {}", other),
    }
}

/// Failures reported by the server: printed, but the request itself completed
fn is_reply_status(err: &KvError) -> bool {
    matches!(
        err,
        KvError::KeyNotFound | KvError::MethodNotAllowed | KvError::Status(_)
    )
}

async fn run(args: Args) -> kvstore::Result<String> {
    let value = match (args.method, args.value.as_deref()) {
        (Op::Put, None | Some("")) => {
            return Err(KvError::InvalidArgument(
                "value flag must be provided for put method".to_string(),
            ))
        }
        (Op::Put, Some(value)) => Some(value),
        _ => None,
    };

    let client = Client::new(args.server);
    client
        .send(args.method.method(), &args.key, value)
        .await?
        .into_result()
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    match run(args).await {
        Ok(body) => {
            println!("{}", body);
            ExitCode::SUCCESS
        }
        Err(KvError::InvalidArgument(message)) => {
            eprintln!("Error: {}", message);
            ExitCode::FAILURE
        }
        Err(e) if is_reply_status(&e) => {
            eprintln!("{}", error_line(&e));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", error_line(&e));
            ExitCode::FAILURE
        }
    }
}
