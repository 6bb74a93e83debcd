// Interactive reshaping session: one engine, one table, undoable steps.
//
// Commands mirror the one-shot subcommands plus undo/history/save. Errors
// print and leave the table untouched, so a failed step can be retried
// with corrected arguments.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use retable_engine::engine::Engine;
use retable_engine::ops::Operation;
use retable_engine::table::Table;
use retable_engine::value::Value;

use crate::output;

const HELP: &str = "\
Commands:
  show                          print the current table
  transpose                     first column becomes the header row
  clean                         drop all-blank rows, trim text cells
  rename <old> <new>            rename a column
  replace <column> <from> <to>  replace matching cells in a column
  compute <name> = <formula>    add a computed column (name optional)
  undo                          revert the most recent operation
  history                       list applied operations, oldest first
  clear                         forget the history (keeps the table)
  save <path>                   write the current table (csv/json by extension)
  help                          show this help
  quit                          exit the session";

pub fn run(table: Table) -> Result<(), String> {
    let mut engine = Engine::new(table);
    let stdin = io::stdin();

    println!(
        "{} columns, {} rows loaded; type 'help' for commands",
        engine.table().columns().len(),
        engine.table().row_count()
    );

    loop {
        print!("rtbl> ");
        io::stdout().flush().map_err(|e| e.to_string())?;

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break, // EOF
            Ok(_) => {}
            Err(e) => return Err(e.to_string()),
        }

        match parse_command(line.trim()) {
            Ok(Command::Empty) => {}
            Ok(Command::Quit) => break,
            Ok(Command::Help) => println!("{HELP}"),
            Ok(Command::Show) => output::print_grid(engine.table()),
            Ok(Command::History) => print_history(&engine),
            Ok(Command::Clear) => {
                engine.clear_history();
                println!("history cleared");
            }
            Ok(Command::Save(path)) => match retable_io::export(engine.table(), &path) {
                Ok(()) => println!("saved {}", path.display()),
                Err(e) => println!("error: {e}"),
            },
            Ok(Command::Undo) => match engine.undo() {
                Ok(table) => println!("undone; {} rows", table.row_count()),
                Err(e) => println!("error: {e}"),
            },
            Ok(Command::Apply(op)) => {
                let label = op.label();
                match engine.apply(op) {
                    Ok(table) => println!("{}; {} rows", label, table.row_count()),
                    Err(e) => println!("error: {e}"),
                }
            }
            Err(msg) => println!("error: {msg}"),
        }
    }

    Ok(())
}

enum Command {
    Empty,
    Quit,
    Help,
    Show,
    History,
    Clear,
    Undo,
    Save(PathBuf),
    Apply(Operation),
}

fn parse_command(line: &str) -> Result<Command, String> {
    let mut parts = line.split_whitespace();
    let Some(verb) = parts.next() else {
        return Ok(Command::Empty);
    };

    match verb {
        "quit" | "exit" => Ok(Command::Quit),
        "help" => Ok(Command::Help),
        "show" => Ok(Command::Show),
        "history" => Ok(Command::History),
        "clear" => Ok(Command::Clear),
        "undo" => Ok(Command::Undo),
        "transpose" => Ok(Command::Apply(Operation::Transpose)),
        "clean" => Ok(Command::Apply(Operation::Clean)),
        "save" => {
            let rest = line["save".len()..].trim();
            if rest.is_empty() {
                return Err("usage: save <path>".to_string());
            }
            Ok(Command::Save(Path::new(rest).to_path_buf()))
        }
        "rename" => {
            let args: Vec<&str> = parts.collect();
            match args.as_slice() {
                [old, new] => Ok(Command::Apply(Operation::RenameColumn {
                    old: old.to_string(),
                    new: new.to_string(),
                })),
                _ => Err("usage: rename <old> <new>".to_string()),
            }
        }
        "replace" => {
            let args: Vec<&str> = parts.collect();
            match args.as_slice() {
                [column, from, to] => Ok(Command::Apply(Operation::ReplaceValue {
                    column: column.to_string(),
                    from: Value::from_input(from),
                    to: Value::from_input(to),
                })),
                _ => Err("usage: replace <column> <from> <to>".to_string()),
            }
        }
        "compute" => {
            let rest = line["compute".len()..].trim();
            if rest.is_empty() {
                return Err("usage: compute [<name> =] <formula>".to_string());
            }
            // "compute total = qty * price" names the column; a bare
            // "compute qty * price" derives one from the formula
            let (column, formula) = match rest.split_once('=') {
                Some((name, formula)) if !name.trim().is_empty() => {
                    (Some(name.trim().to_string()), formula.trim().to_string())
                }
                Some((_, formula)) => (None, formula.trim().to_string()),
                None => (None, rest.to_string()),
            };
            if formula.is_empty() {
                return Err("usage: compute [<name> =] <formula>".to_string());
            }
            Ok(Command::Apply(Operation::ComputeColumn { formula, column }))
        }
        other => Err(format!("unknown command '{other}' (try 'help')")),
    }
}

fn print_history(engine: &Engine) {
    let descriptors = engine.history().list();
    if descriptors.is_empty() {
        println!("(no operations applied)");
        return;
    }
    for (idx, descriptor) in descriptors.iter().enumerate() {
        println!(
            "{:>3}. [{}] {}",
            idx + 1,
            descriptor.timestamp.format("%H:%M:%S"),
            descriptor.label
        );
    }
}
