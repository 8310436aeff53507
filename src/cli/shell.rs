//! Line-oriented interactive session

use super::commands::{parse_add, parse_constant, split_pair};
use crate::core::analysis::AnalysisKind;
use crate::core::editor::{Edit, Fill};
use crate::core::session::{switchable_sheets, Session};
use crate::error::{GridError, GridResult};
use crate::types::ColumnType;
use colored::Colorize;
use std::io::{BufRead, Write};
use std::path::PathBuf;

const HELP: &str = "\
Commands:
  open <file> [sheet]          load a CSV/TSV file or workbook
  sheets                       list the sheets of the open workbook
  sheet <name>                 switch to another sheet
  columns                      list columns with their types
  preview                      show the first rows
  add <name>[=<value>]         add a column (null or constant filled)
  rename <old>=<new> ...       rename columns
  delete <col> ...             delete columns
  retype <type> <col> ...      convert columns to integer|float|datetime|boolean|text
  analyze <kind> [col ...]     summary|profile|missing|duplicates|outliers|correlation|timeseries
  save <file>                  write .csv, .tsv or .xlsx
  reset                        close the open table
  log                          show the activity log
  clear-log                    empty the activity log
  help                         show this help
  quit                         leave the shell

Quote names that contain spaces: rename \"unit price\"=price";

#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    Open { path: PathBuf, sheet: Option<String> },
    Sheets,
    Sheet(String),
    Columns,
    Preview,
    Edit(Edit),
    Analyze { kind: AnalysisKind, columns: Vec<String> },
    Save(PathBuf),
    Reset,
    Log,
    ClearLog,
    Help,
    Quit,
}

/// Split a command line on whitespace, honouring double quotes
pub fn tokenize(line: &str) -> GridResult<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_token = false;

    for ch in line.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                has_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_token {
                    tokens.push(std::mem::take(&mut current));
                    has_token = false;
                }
            }
            c => {
                current.push(c);
                has_token = true;
            }
        }
    }

    if in_quotes {
        return Err(GridError::Command("unterminated quote".to_string()));
    }
    if has_token {
        tokens.push(current);
    }
    Ok(tokens)
}

/// Parse one input line; blank lines yield `None`
pub fn parse_line(line: &str) -> GridResult<Option<ShellCommand>> {
    let tokens = tokenize(line)?;
    let Some((head, args)) = tokens.split_first() else {
        return Ok(None);
    };

    let command = match head.to_lowercase().as_str() {
        "open" => match args {
            [path] => ShellCommand::Open {
                path: PathBuf::from(path),
                sheet: None,
            },
            [path, sheet] => ShellCommand::Open {
                path: PathBuf::from(path),
                sheet: Some(sheet.clone()),
            },
            _ => return Err(usage("open <file> [sheet]")),
        },
        "sheets" => ShellCommand::Sheets,
        "sheet" => match args {
            [name] => ShellCommand::Sheet(name.clone()),
            _ => return Err(usage("sheet <name>")),
        },
        "columns" => ShellCommand::Columns,
        "preview" => ShellCommand::Preview,
        "add" => match args {
            [spec] => ShellCommand::Edit(parse_add(spec)?),
            [name, value] => ShellCommand::Edit(Edit::add(
                name.as_str(),
                Fill::Constant(parse_constant(value)),
            )),
            _ => return Err(usage("add <name>[=<value>]")),
        },
        "rename" => {
            if args.is_empty() {
                return Err(usage("rename <old>=<new> ..."));
            }
            let pairs = args
                .iter()
                .map(|spec| split_pair(spec, "rename"))
                .collect::<GridResult<Vec<_>>>()?;
            ShellCommand::Edit(Edit::rename(pairs))
        }
        "delete" | "drop" => {
            if args.is_empty() {
                return Err(usage("delete <col> ..."));
            }
            ShellCommand::Edit(Edit::delete(args.iter().cloned()))
        }
        "retype" => match args {
            [ty, columns @ ..] if !columns.is_empty() => {
                ShellCommand::Edit(Edit::retype(columns.iter().cloned(), ColumnType::parse(ty)?))
            }
            _ => return Err(usage("retype <type> <col> ...")),
        },
        "analyze" => match args {
            [kind, columns @ ..] => ShellCommand::Analyze {
                kind: kind.parse()?,
                columns: columns.to_vec(),
            },
            _ => return Err(usage("analyze <kind> [col ...]")),
        },
        "save" => match args {
            [path] => ShellCommand::Save(PathBuf::from(path)),
            _ => return Err(usage("save <file>")),
        },
        "reset" => ShellCommand::Reset,
        "log" => ShellCommand::Log,
        "clear-log" => ShellCommand::ClearLog,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        other => {
            return Err(GridError::Command(format!(
                "unknown command '{}' (try 'help')",
                other
            )))
        }
    };
    Ok(Some(command))
}

fn usage(text: &str) -> GridError {
    GridError::Command(format!("usage: {}", text))
}

/// Run the read-eval-print loop until `quit` or end of input.
///
/// Command errors are printed and the loop continues; only I/O failures on
/// `output` end it early.
pub fn run<R: BufRead, W: Write>(
    session: &mut Session,
    file: Option<PathBuf>,
    input: R,
    mut output: W,
) -> GridResult<()> {
    let io_err = |e: std::io::Error| GridError::Command(format!("Failed to write output: {}", e));

    writeln!(output, "{}", "GridX shell - type 'help' for commands".bold().green()).map_err(io_err)?;
    if let Some(path) = file {
        let command = ShellCommand::Open { path, sheet: None };
        let text = execute(session, command).unwrap_or_else(|e| error_text(&e));
        writeln!(output, "{}", text).map_err(io_err)?;
    }

    for line in input.lines() {
        let line = line.map_err(|e| GridError::Command(format!("Failed to read input: {}", e)))?;
        let command = match parse_line(&line) {
            Ok(Some(ShellCommand::Quit)) => break,
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                writeln!(output, "{}", error_text(&e)).map_err(io_err)?;
                continue;
            }
        };
        let text = execute(session, command).unwrap_or_else(|e| error_text(&e));
        writeln!(output, "{}", text).map_err(io_err)?;
    }
    Ok(())
}

fn error_text(e: &GridError) -> String {
    format!("{} {}", "error:".red().bold(), e)
}

/// Run one command against the session and return its printable result
fn execute(session: &mut Session, command: ShellCommand) -> GridResult<String> {
    match command {
        ShellCommand::Open { path, sheet } => {
            session.open(&path, sheet.as_deref())?;
            Ok(session.preview()?.render())
        }
        ShellCommand::Sheets => {
            let sheets = switchable_sheets(session)?;
            Ok(sheets
                .names()
                .iter()
                .map(|name| {
                    if Some(name.as_str()) == sheets.active() {
                        format!("* {}", name)
                    } else {
                        format!("  {}", name)
                    }
                })
                .collect::<Vec<_>>()
                .join("\n"))
        }
        ShellCommand::Sheet(name) => {
            session.select_sheet(&name)?;
            Ok(session.preview()?.render())
        }
        ShellCommand::Columns => Ok(session.preview()?.column_listing().join("\n")),
        ShellCommand::Preview => Ok(session.preview()?.render()),
        ShellCommand::Edit(edit) => {
            let message = session.apply(&edit)?;
            Ok(format!("{}\n{}", message, session.preview()?.summary_line()))
        }
        ShellCommand::Analyze { kind, columns } => session.analyze(kind, &columns),
        ShellCommand::Save(path) => {
            session.save(&path)?;
            Ok(format!("saved {}", path.display()))
        }
        ShellCommand::Reset => {
            session.reset();
            Ok("session reset".to_string())
        }
        ShellCommand::Log => {
            let entries = session.log().entries();
            if entries.is_empty() {
                return Ok("(log is empty)".to_string());
            }
            Ok(entries
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("\n"))
        }
        ShellCommand::ClearLog => {
            session.clear_log();
            Ok("log cleared".to_string())
        }
        ShellCommand::Help => Ok(HELP.to_string()),
        ShellCommand::Quit => Ok(String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::types::CellValue;
    use std::fs;
    use tempfile::TempDir;

    fn run_script(session: &mut Session, file: Option<PathBuf>, script: &str) -> String {
        colored::control::set_override(false);
        let mut out = Vec::new();
        run(session, file, script.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_tokenize_quotes() {
        assert_eq!(
            tokenize(r#"rename "unit price"=price  qty=amount"#).unwrap(),
            vec!["unit price=price", "qty=amount"]
        );
        assert_eq!(tokenize(r#"add """#).unwrap(), vec!["add", ""]);
        assert!(tokenize(r#"open "broken"#).is_err());
    }

    #[test]
    fn test_parse_line_commands() {
        assert_eq!(parse_line("   ").unwrap(), None);
        assert_eq!(parse_line("quit").unwrap(), Some(ShellCommand::Quit));
        assert_eq!(
            parse_line("retype float a b").unwrap(),
            Some(ShellCommand::Edit(Edit::retype(["a", "b"], ColumnType::Float)))
        );
        assert_eq!(
            parse_line("add bonus 10").unwrap(),
            Some(ShellCommand::Edit(Edit::add(
                "bonus",
                Fill::Constant(CellValue::Integer(10))
            )))
        );
        assert!(matches!(
            parse_line("analyze corr").unwrap(),
            Some(ShellCommand::Analyze {
                kind: AnalysisKind::Correlation,
                ..
            })
        ));
    }

    #[test]
    fn test_parse_line_errors() {
        assert!(matches!(parse_line("frobnicate"), Err(GridError::Command(_))));
        assert!(parse_line("retype float").is_err());
        assert!(parse_line("retype money a").is_err());
        assert!(parse_line("rename a").is_err());
    }

    #[test]
    fn test_shell_session_flow() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("in.csv");
        fs::write(&input, "name,qty\nA,1\nB,2\n").unwrap();
        let output = dir.path().join("out.csv");

        let mut session = Session::new(Settings::default()).unwrap();
        let script = format!(
            "add flag=true\nrename qty=amount\npreview\nsave {}\nquit\nreset\n",
            output.display()
        );
        let text = run_script(&mut session, Some(input), &script);

        assert!(text.contains("added column 'flag'"));
        assert!(text.contains("name │ amount │ flag"));
        assert!(text.contains("saved"));
        // quit stops before reset
        assert!(session.table().is_some());

        let saved = fs::read_to_string(&output).unwrap();
        assert!(saved.contains("name,amount,flag"));
    }

    #[test]
    fn test_shell_continues_after_errors() {
        let mut session = Session::new(Settings::default()).unwrap();
        let text = run_script(&mut session, None, "preview\nbogus\nhelp\n");
        assert!(text.contains("error: No table loaded"));
        assert!(text.contains("unknown command 'bogus'"));
        assert!(text.contains("Commands:"));
    }
}
