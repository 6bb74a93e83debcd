// retable CLI - headless tabular reshaping
//
// One-shot subcommands apply a single operation to a file; `session`
// starts an interactive loop with undo and history.

mod exit_codes;
mod output;
mod session;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use retable_engine::ops::Operation;
use retable_engine::value::Value;

use exit_codes::{EXIT_ERROR, EXIT_SUCCESS};

#[derive(Parser)]
#[command(name = "rtbl")]
#[command(about = "Reshape tabular data: transpose, clean, rename, replace, compute")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a file and print it as an aligned grid
    Show {
        /// Input file (csv, tsv, txt, json, xlsx)
        file: PathBuf,
    },

    /// Turn rows into columns (the first column supplies the new headers)
    Transpose {
        file: PathBuf,

        /// Output file; CSV to stdout when omitted
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Drop all-blank rows, trim text cells, normalize blanks to null
    Clean {
        file: PathBuf,

        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Rename a column
    #[command(after_help = "\
Examples:
  rtbl rename data.csv --from qty --to quantity
  rtbl rename data.csv --from qty --to quantity -o renamed.csv")]
    Rename {
        file: PathBuf,

        /// Current column name
        #[arg(long)]
        from: String,

        /// New column name
        #[arg(long)]
        to: String,

        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Replace every matching cell in one column
    #[command(after_help = "\
Examples:
  rtbl replace data.csv --column price --from 4 --to 4.5
  rtbl replace data.csv --column status --from N/A --to ''")]
    Replace {
        file: PathBuf,

        #[arg(long)]
        column: String,

        /// Value to match (typed: numbers and true/false are not text)
        #[arg(long)]
        from: String,

        /// Replacement value
        #[arg(long)]
        to: String,

        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Add a column computed from other columns
    #[command(after_help = "\
Examples:
  rtbl compute orders.csv --formula 'qty * price' --into total
  rtbl compute orders.csv --formula '(net + tax) / qty'")]
    Compute {
        file: PathBuf,

        /// Arithmetic over column names and numbers: + - * / and parentheses
        #[arg(long)]
        formula: String,

        /// Name for the computed column (derived from the formula when omitted)
        #[arg(long)]
        into: Option<String>,

        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Load a table from a SQLite database
    #[command(after_help = "\
Examples:
  rtbl load-db data.sqlite --table orders -o orders.csv
  rtbl load-db data.sqlite          (lists available tables)")]
    LoadDb {
        database: PathBuf,

        /// Table to load; omit to list tables
        #[arg(long)]
        table: Option<String>,

        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Interactive reshaping session with undo and history
    Session {
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli.command) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(msg) => {
            eprintln!("error: {msg}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn run(command: Commands) -> Result<(), String> {
    match command {
        Commands::Show { file } => {
            let table = load(&file)?;
            output::print_grid(&table);
            Ok(())
        }
        Commands::Transpose { file, output } => apply_one(&file, Operation::Transpose, output),
        Commands::Clean { file, output } => apply_one(&file, Operation::Clean, output),
        Commands::Rename { file, from, to, output } => apply_one(
            &file,
            Operation::RenameColumn { old: from, new: to },
            output,
        ),
        Commands::Replace { file, column, from, to, output } => apply_one(
            &file,
            Operation::ReplaceValue {
                column,
                from: Value::from_input(&from),
                to: Value::from_input(&to),
            },
            output,
        ),
        Commands::Compute { file, formula, into, output } => apply_one(
            &file,
            Operation::ComputeColumn { formula, column: into },
            output,
        ),
        Commands::LoadDb { database, table, output } => match table {
            Some(name) => {
                let table = retable_io::database::load_table(&database, &name)
                    .map_err(|e| e.to_string())?;
                log::debug!("loaded {} rows from table '{}'", table.row_count(), name);
                output::write_result(&table, output.as_deref())
            }
            None => {
                let names =
                    retable_io::database::list_tables(&database).map_err(|e| e.to_string())?;
                for name in names {
                    println!("{name}");
                }
                Ok(())
            }
        },
        Commands::Session { file } => {
            let table = load(&file)?;
            session::run(table)
        }
    }
}

fn load(file: &std::path::Path) -> Result<retable_engine::table::Table, String> {
    let table = retable_io::import(file).map_err(|e| e.to_string())?;
    log::debug!(
        "loaded {} columns, {} rows from {}",
        table.columns().len(),
        table.row_count(),
        file.display()
    );
    Ok(table)
}

fn apply_one(
    file: &std::path::Path,
    op: Operation,
    output: Option<PathBuf>,
) -> Result<(), String> {
    let table = load(file)?;
    log::debug!("applying: {}", op.label());
    let result = op.apply(&table).map_err(|e| e.to_string())?;
    output::write_result(&result, output.as_deref())
}
