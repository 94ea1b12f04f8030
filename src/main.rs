//! bldconf — layered build-tool configuration CLI.
//!
//! Entry point and error handling boundary. Uses `anyhow` for
//! ergonomic error propagation and user-facing messages.

mod cli;

use bldconf::config;
use bldconf::env;
use bldconf::handler;
use bldconf::logger;
use bldconf::platform;
use bldconf::store;

use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

use cli::args::{Cli, Command};
use config::{BuildConfig, Sources};
use env::Env;
use handler::HandlerRegistry;
use platform::Platform;
use store::Store;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    logger::init(logger::level_for(cli.verbose)).context("failed to initialise logging")?;

    let env = Env::real();
    let store = Store::locate(cli.rc.as_deref()).context("failed to load configuration store")?;
    let overrides = cli.overrides();
    let platform = Platform::detect();
    let registry = HandlerRegistry::with_builtins();

    let config = BuildConfig::resolve(Sources {
        env: &env,
        store: &store,
        overrides: &overrides,
        platform: &platform,
        registry: &registry,
    })
    .context("failed to resolve build configuration")?;

    match cli.command() {
        Command::Show => run_show(&config),
        Command::Explain => run_explain(&config, &store),
        Command::Handlers => run_handlers(&config, &registry),
    }
}

/// Print the one-line-per-field configuration summary.
fn run_show(config: &BuildConfig) -> Result<()> {
    for (label, value) in config.summary() {
        println!("{}: {}", label.bold(), value);
    }
    Ok(())
}

/// Print every setting with its provenance, then the derived paths.
fn run_explain(config: &BuildConfig, store: &Store) -> Result<()> {
    match store.path() {
        Some(path) => println!("{}  {}", "store:".dimmed(), path.display()),
        None => println!("{}  {}", "store:".dimmed(), "(none)".dimmed()),
    }
    println!();

    let width = config
        .provenance()
        .iter()
        .map(|(name, _, _)| name.len())
        .max()
        .unwrap_or(0);
    for (name, value, layer) in config.provenance() {
        println!(
            "  {:width$}  {}  {}",
            name.bold(),
            value,
            format!("[{layer}]").cyan(),
        );
    }
    println!();
    for (name, path) in config.derived_paths() {
        println!("  {:width$}  {}", name.bold(), path.display());
    }
    Ok(())
}

/// List registered handlers, marking the active one.
fn run_handlers(config: &BuildConfig, registry: &HandlerRegistry) -> Result<()> {
    let active = config.link_handler.reference().to_string();
    for reference in registry.references() {
        if reference == active {
            println!("  {} {}", "*".green().bold(), reference.bold());
        } else {
            println!("    {reference}");
        }
    }
    Ok(())
}
