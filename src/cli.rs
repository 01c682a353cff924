use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use dataprepper::config::AppConfig;
use dataprepper::http::form::parse_list;
use dataprepper::lifecycle::{ActionParams, MemoryStore, SessionRegistry, TransformationEngine};
use dataprepper::{diagnostics, frame, http, logging};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "dataprepper", version, about = "CSV cleaning service with undoable sessions")]
pub struct Cli {
    /// Path to a JSON configuration file
    #[arg(long, global = true, env = "DATAPREPPER_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API
    Serve {
        /// Listen host (overrides config and DATAPREPPER_HOST)
        #[arg(long)]
        host: Option<String>,

        /// Listen port (overrides config and DATAPREPPER_PORT)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print the first rows of a CSV file as JSON
    Preview {
        file: PathBuf,

        /// Rows to show. Defaults to `preview.default_rows`.
        #[arg(short, long)]
        rows: Option<usize>,
    },
    /// Print column diagnostics of a CSV file as JSON
    Stats { file: PathBuf },
    /// Apply one session action (drop or impute) to a CSV file
    Apply {
        file: PathBuf,

        /// Action name: drop or impute
        #[arg(long)]
        action: String,

        /// Column names as a JSON array, or a single bare name
        #[arg(long)]
        columns: String,

        /// Action parameters as a JSON object, e.g. {"method": "median"}
        #[arg(long, default_value = "{}")]
        params: String,

        /// Write the resulting table here as CSV instead of printing a preview
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(short, long)]
        rows: Option<usize>,
    },
    /// Write the effective configuration to a JSON file
    InitConfig {
        path: PathBuf,

        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
}

pub async fn run(cli: Cli) -> Result<()> {
    let mut config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Commands::Serve { host, port } = &cli.command {
        if let Some(host) = host {
            config.server.host.clone_from(host);
        }
        if let Some(port) = port {
            config.server.port = *port;
        }
    }
    logging::init(&config.logging).context("Failed to initialize logging")?;

    match cli.command {
        Commands::Serve { .. } => http::serve(config).await,
        Commands::Preview { file, rows } => {
            let bytes = read_input(&file)?;
            let rows = rows.unwrap_or(config.preview.default_rows);
            let preview = dataprepper::ops::flows::preview(&bytes, rows)?;
            print_json(&preview)
        }
        Commands::Stats { file } => {
            let bytes = read_input(&file)?;
            let report = diagnostics::analyze(&frame::decode(&bytes)?)?;
            print_json(&report)
        }
        Commands::Apply {
            file,
            action,
            columns,
            params,
            output,
            rows,
        } => handle_apply(
            &file,
            &action,
            &columns,
            &params,
            output.as_deref(),
            rows.unwrap_or(config.preview.default_rows),
        ),
        Commands::InitConfig { path, force } => {
            handle_init_config(&config, &path, force)?;
            println!("Wrote {}", path.display());
            Ok(())
        }
    }
}

fn handle_init_config(config: &AppConfig, path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!("{} already exists, pass --force to replace it", path.display());
    }
    config
        .save(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("Saved configuration to {}", path.display());
    Ok(())
}

fn handle_apply(
    file: &Path,
    action: &str,
    columns: &str,
    params: &str,
    output: Option<&Path>,
    rows: usize,
) -> Result<()> {
    let bytes = read_input(file)?;
    let columns = parse_list(columns).context("Invalid --columns")?;
    let params = ActionParams::from_json(params).context("Invalid --params")?;

    let sessions = SessionRegistry::new(Arc::new(MemoryStore::unbounded()));
    let engine = TransformationEngine::new(sessions.clone());
    let session_id = sessions.create(&bytes)?;
    let applied = engine.apply(&session_id, action, columns, &params, &bytes, rows)?;

    match output {
        Some(path) => {
            let table = sessions.get_top(&session_id)?;
            std::fs::write(path, frame::encode(&table)?)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Wrote {}", path.display());
            Ok(())
        }
        None => print_json(&serde_json::json!({
            "columns": applied.preview.columns,
            "data": applied.preview.data,
            "can_undo": applied.can_undo,
        })),
    }
}

fn read_input(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_config_writes_loadable_file() -> Result<()> {
        let dir = tempfile::TempDir::new()?;
        let path = dir.path().join("conf").join("dataprepper.json");
        let mut config = AppConfig::default();
        config.preview.default_rows = 25;

        handle_init_config(&config, &path, false)?;
        assert_eq!(AppConfig::load(Some(&path))?, config);
        Ok(())
    }

    #[test]
    fn test_init_config_keeps_existing_file_without_force() -> Result<()> {
        let dir = tempfile::TempDir::new()?;
        let path = dir.path().join("dataprepper.json");
        std::fs::write(&path, "{}")?;

        assert!(handle_init_config(&AppConfig::default(), &path, false).is_err());
        assert_eq!(std::fs::read_to_string(&path)?, "{}");

        handle_init_config(&AppConfig::default(), &path, true)?;
        assert_eq!(AppConfig::load(Some(&path))?, AppConfig::default());
        Ok(())
    }
}
