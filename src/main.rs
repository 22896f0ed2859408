//! mixspeak CLI - translate mixing instructions into console commands

use clap::{Parser, Subcommand};
use mixspeak::{Engine, EngineConfig, ProtocolCommand};
use serde::Serialize;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mixspeak")]
#[command(about = "Translate spoken mixing instructions into console RCP commands", long_about = None)]
struct Cli {
    /// TOML file with console limits
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Log every rule that fires
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate one or more utterances, in order, against one session
    Translate {
        /// Utterances to translate
        #[arg(required = true)]
        utterances: Vec<String>,
    },

    /// Read utterances from stdin, one per line
    ///
    /// Meta commands: `:labels`, `:info`, `:reset`
    Repl,

    /// Show limits, label counts and rule counts
    Info,
}

#[derive(Serialize)]
struct Translation<'a> {
    input: &'a str,
    commands: &'a [ProtocolCommand],
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    let mut engine = Engine::new(config)?;

    match cli.command {
        Commands::Translate { utterances } => {
            let mut out = io::stdout().lock();
            for utterance in &utterances {
                let commands = engine.process_command(utterance);
                print_translation(&mut out, utterance, &commands, cli.json)?;
            }
        }

        Commands::Repl => {
            let stdin = io::stdin();
            let mut out = io::stdout().lock();
            if !cli.json {
                writeln!(out, "mixspeak - type an instruction, :labels, :info, :reset, or Ctrl-D to quit")?;
            }
            for line in stdin.lock().lines() {
                let line = line?;
                let input = line.trim();
                match input {
                    "" => continue,
                    ":labels" => print_json(&mut out, engine.session())?,
                    ":info" => print_json(&mut out, &engine.get_system_info())?,
                    ":reset" => {
                        engine.reset_session();
                        if !cli.json {
                            writeln!(out, "session cleared")?;
                        }
                    }
                    _ => {
                        let commands = engine.process_command(input);
                        print_translation(&mut out, input, &commands, cli.json)?;
                    }
                }
                out.flush()?;
            }
        }

        Commands::Info => {
            let mut out = io::stdout().lock();
            print_json(&mut out, &engine.get_system_info())?;
        }
    }

    Ok(())
}

fn print_translation(
    out: &mut impl Write,
    input: &str,
    commands: &[ProtocolCommand],
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        serde_json::to_writer(&mut *out, &Translation { input, commands })?;
        writeln!(out)?;
        return Ok(());
    }

    if commands.is_empty() {
        writeln!(out, "{}: could not interpret command", input)?;
        return Ok(());
    }
    writeln!(out, "{}:", input)?;
    for command in commands {
        writeln!(out, "  {}", command)?;
    }
    Ok(())
}

fn print_json(out: &mut impl Write, value: &impl Serialize) -> Result<(), Box<dyn std::error::Error>> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}
