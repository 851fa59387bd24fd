//! LazyMemo command-line front end.
//!
//! # Responsibility
//! - Translate one command into exactly one memo use-case call.
//! - Render results and map failures to exit codes.
//!
//! # Invariants
//! - Schema initialization runs before any command; failure aborts startup.
//! - Exit codes: 0 ok, 1 internal/startup, 2 bad request, 3 not found.

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use lazymemo_core::{
    default_log_level, init_logging, AppConfig, Memo, MemoFilter, MemoId, MemoService,
    MemoServiceError, MemoStore, StatusClass,
};
use log::warn;
use std::process::ExitCode;

const EXIT_INTERNAL: u8 = 1;
const EXIT_BAD_REQUEST: u8 = 2;
const EXIT_NOT_FOUND: u8 = 3;
const STDERR_DEFAULT_LEVEL: &str = "warn";

#[derive(Parser, Debug)]
#[command(
    name = "lazymemo",
    version,
    about = "Keep short text memos in a local SQLite store",
    long_about = "Keep short text memos in a local SQLite store. Connection settings come \
                  from DB_HOST, DB_USER, DB_PASSWORD, DB_NAME and DB_DATA_DIR (a .env file \
                  in the working directory is honored)."
)]
struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create the memos table if it does not exist yet
    Init,
    /// List every memo
    List,
    /// Create a memo
    Add(AddArgs),
    /// Look up memos by exact id and/or title
    Find(FindArgs),
    /// Show one memo
    Show {
        id: i64,
    },
    /// Replace the title and content of a memo
    Edit(EditArgs),
    /// Delete a memo
    Rm {
        id: i64,
    },
}

#[derive(Args, Debug)]
struct AddArgs {
    #[arg(long, short)]
    title: String,
    #[arg(long, short)]
    content: String,
    /// Creation date, YYYY-MM-DD
    #[arg(long, short)]
    date: Option<NaiveDate>,
}

#[derive(Args, Debug)]
struct FindArgs {
    #[arg(long)]
    id: Option<i64>,
    #[arg(long, short)]
    title: Option<String>,
}

#[derive(Args, Debug)]
struct EditArgs {
    id: i64,
    #[arg(long, short)]
    title: String,
    #[arg(long, short)]
    content: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", render_error(&err));
            ExitCode::from(exit_code_for(&err))
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::from_env().context("invalid configuration")?;
    start_logging(&config)?;
    config.log_summary();
    if config.db.uses_default_password() {
        warn!("event=config_check module=app status=warn reason=default_db_password");
    }

    let store = MemoStore::new(&config.db);
    store
        .initialize_schema()
        .context("schema initialization failed")?;
    let service = MemoService::new(store);

    match cli.command {
        Commands::Init => {
            if !cli.json {
                println!("Schema ready at {}", config.db.database_path().display());
            }
            Ok(())
        }
        Commands::List => print_memos(&service.list_memos(), cli.json),
        Commands::Add(args) => {
            let memo = service.create_memo(&args.title, &args.content, args.date)?;
            if cli.json {
                print_json(&memo)
            } else {
                println!("Created memo {}", memo.id);
                Ok(())
            }
        }
        Commands::Find(args) => {
            let filter = MemoFilter {
                id: args.id.map(MemoId::new),
                title: args.title,
            };
            print_memos(&service.find_memos(&filter)?, cli.json)
        }
        Commands::Show { id } => {
            let memo = service.get_memo(MemoId::new(id))?;
            if cli.json {
                print_json(&memo)
            } else {
                print_detail(&memo);
                Ok(())
            }
        }
        Commands::Edit(args) => {
            let id = MemoId::new(args.id);
            // Reports success for unknown ids too; the store logs a warning.
            let updated = service.update_memo(id, &args.title, &args.content)?;
            if cli.json {
                print_json(&serde_json::json!({ "id": id, "updated": updated }))
            } else {
                println!("Updated memo {id}");
                Ok(())
            }
        }
        Commands::Rm { id } => {
            service.delete_memo(MemoId::new(id))?;
            if !cli.json {
                println!("Deleted memo {id}");
            }
            Ok(())
        }
    }
}

fn start_logging(config: &AppConfig) -> Result<()> {
    let level = match (&config.log_level, &config.log_dir) {
        (Some(level), _) => level.as_str(),
        (None, Some(_)) => default_log_level(),
        (None, None) => STDERR_DEFAULT_LEVEL,
    };
    init_logging(level, config.log_dir.as_deref())
        .map_err(|err| anyhow!("logging setup failed: {err}"))
}

fn exit_code_for(err: &anyhow::Error) -> u8 {
    match err
        .downcast_ref::<MemoServiceError>()
        .map(MemoServiceError::status_class)
    {
        Some(StatusClass::BadRequest) => EXIT_BAD_REQUEST,
        Some(StatusClass::NotFound) => EXIT_NOT_FOUND,
        Some(StatusClass::Internal) | None => EXIT_INTERNAL,
    }
}

/// Joins the cause chain, skipping causes already spelled out by their
/// wrapper.
fn render_error(err: &anyhow::Error) -> String {
    let mut parts: Vec<String> = Vec::new();
    for cause in err.chain() {
        let message = cause.to_string();
        if !parts.last().is_some_and(|last| last.contains(&message)) {
            parts.push(message);
        }
    }
    parts.join(": ")
}

fn print_memos(memos: &[Memo], json: bool) -> Result<()> {
    if json {
        return print_json(&memos);
    }
    if memos.is_empty() {
        println!("No memos.");
        return Ok(());
    }
    for memo in memos {
        println!("{}\t{}\t{}", memo.id, format_date(memo.create_date), memo.title);
    }
    Ok(())
}

fn print_detail(memo: &Memo) {
    println!(
        "#{} {} ({})",
        memo.id,
        memo.title,
        format_date(memo.create_date)
    );
    println!("{}", memo.content);
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to encode JSON output")?;
    println!("{rendered}");
    Ok(())
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|value| value.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::{exit_code_for, format_date, render_error, Cli};
    use chrono::NaiveDate;
    use clap::CommandFactory;
    use lazymemo_core::{MemoId, MemoServiceError, MemoValidationError};

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn exit_codes_follow_status_class() {
        let bad = anyhow::Error::new(MemoServiceError::Validation(
            MemoValidationError::EmptyContent,
        ));
        assert_eq!(exit_code_for(&bad), 2);

        let missing = anyhow::Error::new(MemoServiceError::NotFound(MemoId::new(1)));
        assert_eq!(exit_code_for(&missing), 3);

        assert_eq!(exit_code_for(&anyhow::anyhow!("startup")), 1);
    }

    #[test]
    fn error_rendering_skips_repeated_causes() {
        let err = anyhow::Error::new(MemoServiceError::Validation(
            MemoValidationError::EmptyTitle,
        ))
        .context("add failed");
        assert_eq!(render_error(&err), "add failed: title must not be empty");
    }

    #[test]
    fn dates_render_as_iso_or_dash() {
        assert_eq!(format_date(NaiveDate::from_ymd_opt(2024, 1, 9)), "2024-01-09");
        assert_eq!(format_date(None), "-");
    }
}
