//! pacc CLI - a package manager for C and C++ projects

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use pacc::util::diagnostic::emit;
use pacc::util::GlobalContext;
use pacc::ResolveError;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color;

    if let Err(e) = run(cli) {
        match e.downcast_ref::<ResolveError>() {
            Some(err) => emit(&err.to_diagnostic(), color),
            None => eprintln!("error: {:#}", e),
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("pacc=debug")
    } else {
        EnvFilter::new("pacc=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let mut ctx = match cli.directory {
        Some(dir) => GlobalContext::with_cwd(dir)?,
        None => GlobalContext::new()?,
    };
    ctx.set_verbose(cli.verbose);
    ctx.set_color(!cli.no_color);

    // Execute command
    match cli.command {
        Commands::Resolve(args) => commands::resolve::execute(&ctx, args),
        Commands::Flags(args) => commands::flags::execute(&ctx, args),
        Commands::Tree(args) => commands::tree::execute(&ctx, args),
    }
}
