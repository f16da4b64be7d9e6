//! Act - Entry Point
//!
//! Resolves actor commands and prints the resulting bus messages. Runs one
//! command given on the command line, or reads commands from stdin.

use act_resolver::catalog::HttpChannelCatalog;
use act_resolver::command::{Dispatcher, OutputFormat, Publisher, WriterPublisher};
use act_resolver::core::error::{ActError, Result};
use act_resolver::core::ActConfig;
use act_resolver::registry::{build_registry, Registry};
use clap::Parser;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::runtime::Runtime;

/// Resolve actor commands into bus messages
#[derive(Parser, Debug)]
#[command(name = "act")]
#[command(about = "Resolve actor commands into bus messages")]
struct Args {
    /// Actor configuration (TOML); the built-in venue setup when omitted
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Skip the remote channel catalog
    #[arg(long)]
    no_catalog: bool,

    /// Override the maximum macro nesting depth
    #[arg(long)]
    max_depth: Option<usize>,

    /// Print messages as JSON lines
    #[arg(long)]
    json: bool,

    /// List all actors with their usage
    #[arg(long)]
    list: bool,

    /// Show usage for one actor
    #[arg(long, value_name = "ACTOR")]
    help_actor: Option<String>,

    /// Command to run, e.g. `dmx all red`; starts a prompt when empty
    command: Vec<String>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "act_resolver=info".into()))
        .with_writer(io::stderr)
        .init();

    match run(&args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<ExitCode> {
    let mut config = match &args.config {
        Some(path) => ActConfig::load(path)?,
        None => ActConfig::default(),
    };
    if args.no_catalog {
        config.catalog.enabled = false;
    }
    if let Some(depth) = args.max_depth {
        config.dispatch.max_depth = depth;
    }

    // The runtime only drives the one-time catalog fetch
    let rt = Runtime::new()?;
    let catalog = HttpChannelCatalog::from_config(&config.catalog);
    let registry = rt.block_on(build_registry(&config, &catalog))?;
    drop(rt);

    if args.list {
        for actor in registry.iter() {
            println!("{}", actor.help_text());
        }
        return Ok(ExitCode::SUCCESS);
    }

    if let Some(name) = &args.help_actor {
        println!("{}", registry.help_text(name)?);
        return Ok(ExitCode::SUCCESS);
    }

    let dispatcher = Dispatcher::from_config(&registry, &config.dispatch);
    let format = if args.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    let publisher = WriterPublisher::stdout(format);

    if !args.command.is_empty() {
        let line = args.command.join(" ");
        let code = if run_command(&dispatcher, &registry, &publisher, &line) {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        };
        return Ok(code);
    }

    run_prompt(&dispatcher, &registry, &publisher)?;
    Ok(ExitCode::SUCCESS)
}

/// Dispatch and publish one line, reporting any error on stderr
///
/// Returns whether the command went through.
fn run_command<P: Publisher>(
    dispatcher: &Dispatcher,
    registry: &Registry,
    publisher: &P,
    line: &str,
) -> bool {
    match dispatcher.dispatch_and_publish(line, publisher) {
        Ok(instructions) => {
            tracing::info!(command = line, messages = instructions.len(), "command resolved");
            true
        }
        Err(e) => {
            report_error(registry, &e);
            false
        }
    }
}

fn run_prompt<P: Publisher>(
    dispatcher: &Dispatcher,
    registry: &Registry,
    publisher: &P,
) -> Result<()> {
    println!("Actors: {}", registry.exported_names().join(", "));
    println!("Type `help` or `help <actor>` for usage, `quit` to exit.");

    let stdin = io::stdin();
    loop {
        print!("act> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        if input.is_empty() {
            continue;
        }
        if input == "quit" || input == "q" {
            break;
        }
        if input == "help" {
            for actor in registry.iter() {
                println!("{}", actor.help_text());
            }
            continue;
        }
        if let Some(name) = input.strip_prefix("help ") {
            match registry.help_text(name.trim()) {
                Ok(help) => println!("{}", help),
                Err(e) => println!("{}", e),
            }
            continue;
        }

        // Errors are reported and the prompt keeps going
        run_command(dispatcher, registry, publisher, input);
    }

    Ok(())
}

fn report_error(registry: &Registry, error: &ActError) {
    eprintln!("error: {}", error);

    if error.is_usage_error() {
        if let Some(help) = error.actor().and_then(|name| registry.help_text(name).ok()) {
            eprintln!("usage: {}", help);
        }
    } else if matches!(error, ActError::UnknownActor(_)) {
        eprintln!("known actors: {}", registry.names().join(", "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn venue() -> Registry {
        Registry::from_config(&ActConfig::default(), &[]).unwrap()
    }

    #[test]
    fn test_run_command_reports_failure() {
        let registry = venue();
        let dispatcher = Dispatcher::new(&registry);
        let publisher = WriterPublisher::new(Vec::new(), OutputFormat::Text);

        assert!(!run_command(&dispatcher, &registry, &publisher, "frobnicate on"));
        assert!(!run_command(&dispatcher, &registry, &publisher, "bulb dim"));
        assert!(publisher.into_inner().is_empty());
    }

    #[test]
    fn test_run_command_publishes_on_success() {
        let registry = venue();
        let dispatcher = Dispatcher::new(&registry);
        let publisher = WriterPublisher::new(Vec::new(), OutputFormat::Text);

        assert!(run_command(&dispatcher, &registry, &publisher, "bulb on"));
        let output = String::from_utf8(publisher.into_inner()).unwrap();
        assert_eq!(output, "act_433mhz [ ] 11111 2 1\n");
    }
}
