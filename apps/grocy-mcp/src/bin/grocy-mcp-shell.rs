//! # grocy-mcp-shell
//!
//! Interactive dev client: spawns `ssh <args>` whose remote end runs
//! `grocy-mcp`, speaks MCP over the child's stdio, and reads commands from
//! stdin.
//!
//! ```text
//! > list
//! > call match_product_by_name {"name": "milk"}
//! > exit
//! ```
//!
//! `MCP_SSH_ARGS` (JSON array of strings) replaces the default ssh arguments.

use clap::Parser;
use rmcp::{
    RoleClient, ServiceExt,
    service::RunningService,
    transport::{ConfigureCommandExt, TokioChildProcess},
};
use serde_json::{Map, Value, json};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt, BufReader};

type McpClient = RunningService<RoleClient, ()>;

/// ssh arguments used when `MCP_SSH_ARGS` is not set.
const DEFAULT_SSH_ARGS: [&str; 6] = [
    "grocy@localhost",
    "docker",
    "exec",
    "-i",
    "grocy-mcp",
    "grocy-mcp",
];

const HELP: &str = "Commands: list | call <toolName> <jsonArgs> | help | exit";

/// Grocy MCP dev shell
#[derive(Parser, Debug)]
#[command(name = "grocy-mcp-shell")]
#[command(version, about, long_about = None)]
struct Cli {
    /// ssh arguments as a JSON array of strings
    #[arg(long, env = "MCP_SSH_ARGS")]
    ssh_args: Option<String>,
}

/// One line of REPL input.
#[derive(Debug, PartialEq)]
enum Command {
    Empty,
    List,
    Call {
        name: String,
        arguments: Map<String, Value>,
    },
    Help,
    Exit,
    Unknown(String),
}

fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (head, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));

    match head {
        "" => Ok(Command::Empty),
        "list" => Ok(Command::List),
        "help" => Ok(Command::Help),
        "exit" | "quit" => Ok(Command::Exit),
        "call" => {
            let rest = rest.trim();
            let (name, raw_args) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            if name.is_empty() {
                return Err("usage: call <toolName> <jsonArgs>".to_string());
            }
            let raw_args = if raw_args.trim().is_empty() {
                "{}"
            } else {
                raw_args.trim()
            };
            match serde_json::from_str::<Value>(raw_args) {
                Ok(Value::Object(arguments)) => Ok(Command::Call {
                    name: name.to_string(),
                    arguments,
                }),
                Ok(_) => Err("arguments must be a JSON object".to_string()),
                Err(e) => Err(format!("invalid JSON arguments: {e}")),
            }
        }
        other => Ok(Command::Unknown(other.to_string())),
    }
}

fn ssh_args(raw: Option<&str>) -> Result<Vec<String>, String> {
    match raw {
        Some(raw) if !raw.trim().is_empty() => serde_json::from_str(raw)
            .map_err(|e| format!("MCP_SSH_ARGS must be a JSON array of strings: {e}")),
        _ => Ok(DEFAULT_SSH_ARGS.iter().map(ToString::to_string).collect()),
    }
}

fn pretty<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("<unprintable: {e}>"))
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Failed to connect to MCP server: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let args = ssh_args(cli.ssh_args.as_deref())?;
    println!("Spawning: ssh {}", args.join(" "));

    let transport = TokioChildProcess::new(tokio::process::Command::new("ssh").configure(|cmd| {
        cmd.args(&args);
    }))?;
    let client = ().serve(transport).await?;
    println!("Connected to MCP server over ssh/stdio.");

    repl(&client, BufReader::new(tokio::io::stdin())).await?;
    client.cancel().await?;
    Ok(())
}

/// Read commands until `exit` or end of input. A failing command is
/// reported and the loop goes on.
async fn repl<R: AsyncBufRead + Unpin>(client: &McpClient, input: R) -> std::io::Result<()> {
    let mut lines = input.lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        match parse_command(&line) {
            Ok(Command::Exit) => {
                println!("Exiting...");
                break;
            }
            Ok(command) => {
                if let Err(e) = execute(client, command).await {
                    eprintln!("Error: {e}");
                }
            }
            Err(e) => eprintln!("Error: {e}"),
        }
    }
    Ok(())
}

async fn execute(client: &McpClient, command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Empty | Command::Exit => {}
        Command::List => {
            let tools = client.list_all_tools().await?;
            println!("{}", pretty(&json!({ "tools": tools })));
        }
        Command::Call { name, arguments } => {
            let request = serde_json::from_value(json!({
                "name": name,
                "arguments": arguments,
            }))?;
            let result = client.call_tool(request).await?;
            println!("{}", pretty(&result));
        }
        Command::Help => println!("{HELP}"),
        Command::Unknown(cmd) => println!("Unknown command {cmd:?}. Type help for usage."),
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
