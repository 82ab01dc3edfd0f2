use std::io::{self, IsTerminal};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use mdshell::client::OfflineClient;
use mdshell::config::{self, APP_VERSION, ShellConfig};
use mdshell::core::{Registry, Shell, ShellState, TerminalPrompter};
use mdshell::models::Domain;
use mdshell::repl::{EditorSource, LineSource, StdinSource};

/// Interactive shell for managing accounts, profiles and contact information.
///
/// Everything is driven by commands typed at the prompt; type `help` to
/// list them.
#[derive(Parser, Debug)]
#[command(name = config::APP_NAME, version, about)]
struct Cli {}

fn init_tracing(default_filter: &str) {
    let env_filter = EnvFilter::try_from_env(config::LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    let _cli = Cli::parse();

    let config = ShellConfig::load().context("failed to load configuration")?;
    init_tracing(&config.log_filter);
    info!(version = APP_VERSION, data_dir = %config.data_dir.display(), "starting");

    let default_domain = match config.default_domain.as_deref().map(str::parse::<Domain>) {
        Some(Ok(domain)) => Some(domain),
        Some(Err(err)) => {
            warn!(%err, "ignoring default_domain");
            None
        }
        None => None,
    };
    let client = OfflineClient::open(&config.data_dir)
        .with_context(|| format!("failed to open {}", config.data_dir.display()))?
        .with_default_domain(default_domain);

    // Alias conflicts surface here, before any input is read
    let registry = Registry::with_builtins().context("failed to register commands")?;
    let state = ShellState::new(Box::new(client), Box::new(TerminalPrompter));
    let shell = Shell::new(registry, state);

    let mut source: Box<dyn LineSource> = if io::stdin().is_terminal() {
        Box::new(EditorSource::new(&shell, &config)?)
    } else {
        Box::new(StdinSource)
    };

    shell.run(source.as_mut(), &mut io::stdout(), &config.prompt)?;
    Ok(())
}
