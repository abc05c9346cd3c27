//! Read-only inspector for the score database.
//!
//! With no subcommand it prints the newest attempts followed by the summary.

use clap::{Parser, Subcommand};
use rusqlite::Connection;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use spelling_bee::config::{AppConfig, DEFAULT_LIST_LIMIT};
use spelling_bee::db::{self, inspect};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Score database to open (defaults to the app's configured path)
    #[arg(long)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List recorded attempts, newest first
    List {
        #[arg(short, long, default_value_t = DEFAULT_LIST_LIMIT)]
        limit: i64,
        #[arg(short, long, default_value_t = 0)]
        offset: i64,
    },
    /// Totals and accuracy across all attempts
    Stats,
    /// Run a single read-only SQL statement
    Query { sql: String },
    /// Prompt for commands until `exit`
    Interactive,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let path = args.db.unwrap_or_else(|| AppConfig::load().database_path);

    let conn = match inspect::open_read_only(&path) {
        Ok(conn) => conn,
        Err(e) => {
            tracing::error!("Cannot open {}: {}", path.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let result = match args.command {
        None => print_list(&conn, DEFAULT_LIST_LIMIT, 0).and_then(|_| print_stats(&conn)),
        Some(Command::List { limit, offset }) => print_list(&conn, limit, offset),
        Some(Command::Stats) => print_stats(&conn),
        Some(Command::Query { sql }) => print_query(&conn, &sql),
        Some(Command::Interactive) => interactive(&conn),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn print_list(conn: &Connection, limit: i64, offset: i64) -> CliResult {
    let total = db::count_attempts(conn)?;
    let attempts = db::list_attempts(conn, limit, offset)?;

    println!("{:>6}  {:<10}  {:<24}  {:<7}  {:>3}  {}", "id", "date", "word", "result", "try", "mode");
    for a in &attempts {
        let r = &a.record;
        println!(
            "{:>6}  {:<10}  {:<24}  {:<7}  {:>3}  {}",
            a.id,
            r.date.format("%Y-%m-%d"),
            r.word,
            if r.correct { "correct" } else { "wrong" },
            r.attempt_number,
            r.mode
        );
    }

    let shown_to = offset + attempts.len() as i64;
    if attempts.is_empty() {
        println!("(no attempts in range, {} total)", total);
    } else {
        println!("rows {}-{} of {}", offset + 1, shown_to, total);
    }
    Ok(())
}

fn print_stats(conn: &Connection) -> CliResult {
    let summary = db::score_summary(conn)?;
    println!();
    println!("Total attempts: {}", summary.total);
    println!("Correct:        {}", summary.correct);
    println!("Incorrect:      {}", summary.incorrect());
    println!("Accuracy:       {:.1}%", summary.accuracy());
    if let (Some(first), Some(last)) = (&summary.first_date, &summary.last_date) {
        println!("Date range:     {} to {}", first, last);
    }
    Ok(())
}

fn print_query(conn: &Connection, sql: &str) -> CliResult {
    let result = inspect::run_query(conn, sql)?;
    if result.columns.is_empty() {
        println!("(no columns)");
        return Ok(());
    }

    let widths: Vec<usize> = result
        .columns
        .iter()
        .enumerate()
        .map(|(i, name)| {
            result
                .rows
                .iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(name.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, w)| format!("{:<w$}", cell, w = *w))
            .collect::<Vec<_>>()
            .join(" | ")
    };

    println!("{}", line(&result.columns));
    println!("{}", widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("-+-"));
    for row in &result.rows {
        println!("{}", line(row));
    }
    println!("({} rows)", result.rows.len());
    Ok(())
}

const HELP: &str = "commands:
  list [limit] [offset]   recent attempts
  stats                   totals and accuracy
  <SELECT ...>            any read-only SQL
  help                    this text
  exit                    quit";

fn interactive(conn: &Connection) -> CliResult {
    println!("{}", HELP);
    let stdin = io::stdin();
    let mut input = String::new();

    loop {
        print!("scores> ");
        io::stdout().flush()?;
        input.clear();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }

        let line = input.trim();
        let mut words = line.split_whitespace();
        let result = match words.next() {
            None => continue,
            Some("exit" | "quit") => break,
            Some("help") => {
                println!("{}", HELP);
                Ok(())
            }
            Some("stats") => print_stats(conn),
            Some("list") => {
                let limit = words.next().and_then(|s| s.parse().ok()).unwrap_or(DEFAULT_LIST_LIMIT);
                let offset = words.next().and_then(|s| s.parse().ok()).unwrap_or(0);
                print_list(conn, limit, offset)
            }
            Some(_) => print_query(conn, line),
        };

        // Errors end the statement, not the session
        if let Err(e) = result {
            println!("error: {}", e);
        }
    }
    Ok(())
}
