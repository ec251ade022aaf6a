//! SQL sandbox - an in-memory SQL playground with sample data.

mod cli;

use cli::Cli;
use sql_sandbox::config::Config;
use sql_sandbox::db::{SqliteStore, TableId};
use sql_sandbox::error::{Result, SandboxError};
use sql_sandbox::logging::{self, LogTarget};
use sql_sandbox::render::Renderer;
use sql_sandbox::repl::Repl;
use sql_sandbox::session::Session;
use std::io::IsTerminal;
use tokio::io::BufReader;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();
    logging::init(LogTarget::for_mode(cli.is_interactive()));

    match run(cli).await {
        Ok(0) => {}
        Ok(failures) => {
            info!("{failures} statement(s) failed");
            std::process::exit(1);
        }
        Err(e) => {
            error!("{}: {}", e.category(), e);
            std::process::exit(1);
        }
    }
}

/// Runs the sandbox; returns how many one-shot statements failed.
async fn run(cli: Cli) -> Result<usize> {
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let mut config = Config::load_from_file(&config_path)?;
    cli.apply_to(&mut config);
    config.validate()?;

    let store = open_store(&config).await?;
    let default_table = TableId::new(&config.view.default_table);
    let session = Session::open(store, default_table.clone()).await?;
    let view = session.navigation().await.active_view;
    if view.table() != Some(&default_table) {
        warn!("Default table {default_table} does not exist, showing {view}");
    }
    let renderer = Renderer::new(config.view.format, config.view.max_rows);
    let stdout = tokio::io::stdout();

    let failures = if !cli.execute.is_empty() {
        let mut repl = Repl::new(&session, renderer, stdout);
        for sql in &cli.execute {
            repl.execute(sql).await?;
        }
        repl.failures()
    } else if let Some(script) = &cli.script {
        let mut repl = Repl::new(&session, renderer, stdout);
        if script == "-" {
            repl.run(BufReader::new(tokio::io::stdin()), false).await?;
        } else {
            let content = tokio::fs::read_to_string(script).await.map_err(|e| {
                SandboxError::input(format!("Failed to read script {script}: {e}"))
            })?;
            repl.run(content.as_bytes(), false).await?;
        }
        repl.failures()
    } else {
        let prompt = std::io::stdin().is_terminal();
        if prompt {
            println!("SQL sandbox v{}. Type .help for help.", env!("CARGO_PKG_VERSION"));
        }
        let mut repl = Repl::new(&session, renderer, stdout);
        repl.run(BufReader::new(tokio::io::stdin()), prompt).await?;
        0
    };

    session.store().close().await;
    Ok(failures)
}

async fn open_store(config: &Config) -> Result<SqliteStore> {
    let store = if config.store.sample_data {
        SqliteStore::with_sample_data().await?
    } else {
        SqliteStore::open_in_memory().await?
    };

    if let Some(seed) = config.seed_sql()? {
        store.run_script(&seed).await?;
        info!("Ran seed script");
    }

    Ok(store)
}
