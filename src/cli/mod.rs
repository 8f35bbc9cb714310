use crate::domain::{ElementName, LogLine, SelectableEntry, SmartLog};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CliInvocation {
    PrintHelp,
    PrintVersion,
    Pick { sl_binary: Option<PathBuf> },
    Dump { sl_binary: Option<PathBuf>, json: bool },
}

#[derive(Debug, Error)]
pub enum CliParseError {
    #[error("unknown subcommand: {0}")]
    UnknownSubcommand(String),

    #[error("unknown flag: {0}")]
    UnknownFlag(String),

    #[error("missing value for flag: {0}")]
    MissingFlagValue(String),

    #[error("unexpected argument: {0}")]
    UnexpectedArgument(String),
}

#[derive(Debug, Error)]
pub enum CliRunError {
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),

    #[error("failed to encode json: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn parse_invocation(args: &[String]) -> Result<CliInvocation, CliParseError> {
    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        return Ok(CliInvocation::PrintHelp);
    }
    if args.iter().any(|arg| arg == "--version" || arg == "-V") {
        return Ok(CliInvocation::PrintVersion);
    }

    let mut sl_binary: Option<PathBuf> = None;
    let mut json = false;
    let mut subcommand: Option<String> = None;

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--sl" => {
                let value = iter
                    .next()
                    .ok_or_else(|| CliParseError::MissingFlagValue("--sl".to_string()))?;
                sl_binary = Some(PathBuf::from(value));
            }
            "--json" => {
                json = true;
            }
            _ if arg.starts_with('-') => {
                return Err(CliParseError::UnknownFlag(arg.to_string()));
            }
            _ if subcommand.is_none() => {
                subcommand = Some(arg.to_string());
            }
            _ => {
                return Err(CliParseError::UnexpectedArgument(arg.to_string()));
            }
        }
    }

    match subcommand.as_deref() {
        None => {
            if json {
                return Err(CliParseError::UnknownFlag("--json".to_string()));
            }
            Ok(CliInvocation::Pick { sl_binary })
        }
        Some("dump") => Ok(CliInvocation::Dump { sl_binary, json }),
        Some(other) => Err(CliParseError::UnknownSubcommand(other.to_string())),
    }
}

pub fn print_help() {
    let text = format!(
        "{name} — pick a commit from the Sapling smartlog and go to it\n\nUSAGE:\n  {name} [--sl PATH]                 Start the picker\n  {name} dump [--sl PATH] [--json]   Print how each smartlog line is parsed\n  {name} --help | --version\n\nKEYS:\n  Up/Down, k/j   Move between commits\n  Enter          Go to the selected commit\n  Esc, q, Ctrl+C Quit without changing anything\n\nENV:\n  SL_UP_SL_BINARY  Path of the `sl` executable (default: sl)\n  SL_UP_LOG        Append logs to this file\n  RUST_LOG         Log filter (default: info)\n",
        name = env!("CARGO_PKG_NAME")
    );
    let mut out = io::stdout().lock();
    let _ = write!(out, "{text}");
}

#[derive(Serialize)]
struct DumpReport<'a> {
    lines: &'a [LogLine],
    entries: &'a [SelectableEntry],
    commit_line_indices: Vec<usize>,
    current_checkout_position: Option<usize>,
}

pub fn run_dump(log: &SmartLog, json: bool, out: &mut impl Write) -> Result<(), CliRunError> {
    if json {
        let report = DumpReport {
            lines: log.lines(),
            entries: log.entries(),
            commit_line_indices: log.commit_line_indices(),
            current_checkout_position: log.current_checkout_position().ok(),
        };
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
        return Ok(());
    }

    for (index, line) in log.lines().iter().enumerate() {
        let trunk = if line.is_in_trunk { "trunk" } else { "" };
        writeln!(
            out,
            "{index:>4}  {kind:<7}  {trunk:<5}  {text}",
            kind = line.kind.label(),
            text = line.text
        )?;
        for element in line.elements.values() {
            writeln!(
                out,
                "{:>6}{:<14}{:>4}..{:<4}{}",
                "",
                element.name.as_str(),
                element.columns.start,
                element.columns.end,
                element.text
            )?;
        }
    }

    for (position, entry) in log.entries().iter().enumerate() {
        let marker = if entry.selected { "@" } else { "" };
        let commit = entry
            .element(ElementName::Commit)
            .map(|element| element.text.as_str())
            .unwrap_or("?");
        let indices: Vec<String> = entry.line_indices.iter().map(usize::to_string).collect();
        writeln!(
            out,
            "entry {position:>3} {marker:<1}  lines {:<7} {commit}",
            indices.join(",")
        )?;
    }

    match log.current_checkout_position() {
        Ok(position) => writeln!(out, "current checkout: entry {position}")?,
        Err(error) => writeln!(out, "current checkout: {error}")?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::EXAMPLE_SMARTLOG;

    fn args(items: &[&str]) -> Vec<String> {
        std::iter::once("sl-up")
            .chain(items.iter().copied())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn no_arguments_start_the_picker() {
        assert_eq!(
            parse_invocation(&args(&[])).expect("parse"),
            CliInvocation::Pick { sl_binary: None }
        );
    }

    #[test]
    fn parses_dump_with_flags_in_any_order() {
        assert_eq!(
            parse_invocation(&args(&["--sl", "/opt/sl", "dump", "--json"])).expect("parse"),
            CliInvocation::Dump {
                sl_binary: Some(PathBuf::from("/opt/sl")),
                json: true
            }
        );
    }

    #[test]
    fn help_and_version_win() {
        assert_eq!(
            parse_invocation(&args(&["dump", "--help"])).expect("parse"),
            CliInvocation::PrintHelp
        );
        assert_eq!(
            parse_invocation(&args(&["-V"])).expect("parse"),
            CliInvocation::PrintVersion
        );
    }

    #[test]
    fn rejects_bad_arguments() {
        assert!(matches!(
            parse_invocation(&args(&["--sl"])),
            Err(CliParseError::MissingFlagValue(_))
        ));
        assert!(matches!(
            parse_invocation(&args(&["--verbose"])),
            Err(CliParseError::UnknownFlag(_))
        ));
        assert!(matches!(
            parse_invocation(&args(&["--json"])),
            Err(CliParseError::UnknownFlag(_))
        ));
        assert!(matches!(
            parse_invocation(&args(&["goto"])),
            Err(CliParseError::UnknownSubcommand(_))
        ));
        assert!(matches!(
            parse_invocation(&args(&["dump", "extra"])),
            Err(CliParseError::UnexpectedArgument(_))
        ));
    }

    #[test]
    fn dump_lists_lines_and_elements() {
        let log = SmartLog::parse(EXAMPLE_SMARTLOG);
        let mut out = Vec::new();
        run_dump(&log, false, &mut out).expect("dump");
        let text = String::from_utf8(out).expect("utf8");

        assert!(text.contains("   9  commit   trunk  o  b7e6cf068"));
        assert!(text.contains("      bookmark        47..58  remote/main"));
        assert!(text.contains("   2  other             │"));
        assert!(text.contains("entry   1 @  lines 3,4     04b66ceaf\n"));
        assert!(text.contains("entry   3    lines 9,10    b7e6cf068\n"));
        assert!(text.ends_with("current checkout: entry 1\n"));
    }

    #[test]
    fn dump_json_is_machine_readable() {
        let log = SmartLog::parse(EXAMPLE_SMARTLOG);
        let mut out = Vec::new();
        run_dump(&log, true, &mut out).expect("dump");
        let value: serde_json::Value = serde_json::from_slice(&out).expect("json");

        assert_eq!(value["commit_line_indices"], serde_json::json!([0, 3, 6, 9]));
        assert_eq!(value["current_checkout_position"], 1);
        assert_eq!(value["lines"][0]["elements"]["status_emoji"]["text"], "✗");
        assert_eq!(value["lines"][0]["elements"]["commit"]["columns"]["start"], 5);
        assert_eq!(value["entries"][1]["line_indices"], serde_json::json!([3, 4]));
    }
}
