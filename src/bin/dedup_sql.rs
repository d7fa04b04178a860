//! dedup_sql — render a deduplication query from a JSON job document.
//!
//! Reads a job (see [`sqlengine_dedup::config::DedupJob`]) from a file or
//! stdin and prints the generated SQL to stdout. Diagnostics go to stderr;
//! set `DEDUP_SQL_LOG=debug` to see them.

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use sqlengine_dedup::config::DedupJob;
use sqlengine_dedup::error::DedupSqlError;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "dedup_sql", version, about = "Render a ROW_NUMBER() deduplication query")]
struct Cli {
    /// Job document to read; `-` reads stdin.
    #[arg(short, long, default_value = "-")]
    request: PathBuf,

    /// Override the alias of the derived table wrapping the base query.
    #[arg(long, env = "DEDUP_SQL_SUBQUERY_ALIAS")]
    subquery_alias: Option<String>,

    /// Override the alias of the generated ranking column.
    #[arg(long, env = "DEDUP_SQL_ROW_NUMBER_ALIAS")]
    row_number_alias: Option<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("DEDUP_SQL_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(sql) => {
            println!("{sql}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(kind = %e.kind(), "{e}");
            eprintln!("dedup_sql: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<String, DedupSqlError> {
    let text = if cli.request.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(&cli.request)?
    };

    let mut job = DedupJob::from_json(&text)?;
    if let Some(alias) = &cli.subquery_alias {
        job.subquery_alias = Some(alias.clone());
    }
    if let Some(alias) = &cli.row_number_alias {
        job.row_number_alias = Some(alias.clone());
    }
    tracing::debug!(request = %cli.request.display(), "rendering deduplication job");
    job.render()
}
