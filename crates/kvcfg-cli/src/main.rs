//! kvcfg - inspect flat key/value configuration files

mod handler;
mod reply;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use kvcfg::{ConfigStore, DEFAULT_CACHE_CAPACITY};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::handler::CommandHandler;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file to load
    file: PathBuf,

    /// Cache capacity (number of slots, 0 disables the cache)
    #[arg(short, long, default_value_t = DEFAULT_CACHE_CAPACITY)]
    capacity: usize,

    /// Print LIST output as JSON
    #[arg(long)]
    json: bool,

    /// Command to run; commands are read from stdin when omitted
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    command: Vec<String>,
}

fn main() -> Result<()> {
    // Logs go to stderr so replies on stdout stay clean
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();

    let mut store = ConfigStore::new(Some(args.capacity))?;
    store
        .parse_file(&args.file)
        .with_context(|| format!("failed to load {}", args.file.display()))?;
    info!(
        "Loaded {} entries from {}",
        store.len(),
        args.file.display()
    );

    let mut handler = CommandHandler::new(store, Some(args.file.clone())).with_json(args.json);

    // One-shot mode
    if !args.command.is_empty() {
        let words: Vec<&str> = args.command.iter().map(String::as_str).collect();
        let reply = handler.handle(&words);
        println!("{}", reply);
        if reply.is_error() {
            std::process::exit(1);
        }
        return Ok(());
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    for line in stdin.lock().lines() {
        let line = line?;
        let words: Vec<&str> = line.split_whitespace().collect();

        match words.first().map(|w| w.to_ascii_uppercase()) {
            None => continue,
            Some(w) if w == "QUIT" || w == "EXIT" => break,
            Some(_) => {}
        }

        writeln!(stdout, "{}", handler.handle(&words))?;
        stdout.flush()?;
    }

    info!("stdin closed, exiting");
    Ok(())
}
