use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use thiserror::Error;

pub const SL_BINARY_ENV: &str = "SL_UP_SL_BINARY";
pub const DEFAULT_SL_BINARY: &str = "sl";

const SMARTLOG_SUBCOMMAND: &str = "ssl";
const GOTO_SUBCOMMAND: &str = "goto";

#[derive(Debug, Error)]
pub enum SaplingError {
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("`{command}` exited with {status}{detail}")]
    Failed {
        command: String,
        status: ExitStatus,
        detail: String,
    },

    #[error("`{command}` printed output that is not valid UTF-8")]
    InvalidUtf8 { command: String },
}

/// `--sl` flag first, then `SL_UP_SL_BINARY`, then `sl` from `PATH`.
pub fn resolve_sl_binary(flag: Option<PathBuf>) -> PathBuf {
    if let Some(path) = flag {
        return path;
    }
    if let Some(path) = std::env::var_os(SL_BINARY_ENV) {
        return PathBuf::from(path);
    }
    PathBuf::from(DEFAULT_SL_BINARY)
}

/// Runs `sl ssl` and returns its output without surrounding newlines.
pub fn load_smartlog(binary: &Path) -> Result<String, SaplingError> {
    let command = describe(binary, &[SMARTLOG_SUBCOMMAND]);
    tracing::debug!(%command, "loading smartlog");

    let output = Command::new(binary)
        .arg(SMARTLOG_SUBCOMMAND)
        .stdin(Stdio::null())
        .output()
        .map_err(|source| SaplingError::Spawn {
            command: command.clone(),
            source,
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        tracing::warn!(%command, status = %output.status, %stderr, "smartlog failed");
        return Err(SaplingError::Failed {
            command,
            status: output.status,
            detail: if stderr.is_empty() {
                String::new()
            } else {
                format!(": {stderr}")
            },
        });
    }

    let text = String::from_utf8(output.stdout)
        .map_err(|_| SaplingError::InvalidUtf8 { command })?;
    Ok(text.trim_matches('\n').to_string())
}

/// Runs `sl goto <commit>` with the terminal handed over to `sl`.
pub fn goto_commit(binary: &Path, commit: &str) -> Result<(), SaplingError> {
    let command = describe(binary, &[GOTO_SUBCOMMAND, commit]);
    tracing::info!(%command, "checking out");

    let status = Command::new(binary)
        .arg(GOTO_SUBCOMMAND)
        .arg(commit)
        .status()
        .map_err(|source| SaplingError::Spawn {
            command: command.clone(),
            source,
        })?;

    if !status.success() {
        return Err(SaplingError::Failed {
            command,
            status,
            detail: String::new(),
        });
    }
    Ok(())
}

fn describe(binary: &Path, args: &[&str]) -> String {
    let mut command = binary.display().to_string();
    for arg in args {
        command.push(' ');
        command.push_str(arg);
    }
    command
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_wins_over_default() {
        assert_eq!(
            resolve_sl_binary(Some(PathBuf::from("/opt/sapling/sl"))),
            PathBuf::from("/opt/sapling/sl")
        );
    }

    #[test]
    fn missing_binary_is_a_spawn_error() {
        let binary = Path::new("/nonexistent/sl-up-test/sl");
        let error = load_smartlog(binary).expect_err("spawn should fail");
        assert!(matches!(error, SaplingError::Spawn { .. }));
        assert!(error.to_string().contains("/nonexistent/sl-up-test/sl ssl"));

        let error = goto_commit(binary, "abc").expect_err("spawn should fail");
        assert!(matches!(error, SaplingError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn smartlog_output_is_trimmed() {
        // `echo ssl` stands in for `sl ssl`.
        let text = load_smartlog(Path::new("echo")).expect("echo runs");
        assert_eq!(text, "ssl");
    }

    #[cfg(unix)]
    #[test]
    fn failing_commands_report_their_status() {
        let error = load_smartlog(Path::new("false")).expect_err("false fails");
        assert!(matches!(error, SaplingError::Failed { .. }));
        assert!(error.to_string().starts_with("`false ssl` exited with"));

        let error = goto_commit(Path::new("false"), "abc").expect_err("false fails");
        assert!(matches!(error, SaplingError::Failed { .. }));
        assert!(goto_commit(Path::new("true"), "abc").is_ok());
    }
}
