use std::ffi::OsStr;
use std::io;
use std::process::{Command, ExitStatus, Stdio};

/// Runs a system command with the given arguments and returns its standard output as a `String`.
///
/// - Returns an `io::Error` if the command cannot be run.
/// - Returns an error if the command exits with non-zero status.
/// - Returns a `FromUtf8Error` if stdout isn't valid UTF-8.
pub fn run_cmd<S: AsRef<OsStr>>(
    cmd: S,
    args: &[&str],
) -> Result<String, Box<dyn std::error::Error>> {
    let cmd = cmd.as_ref();
    let output = Command::new(cmd).args(args).output()?;

    if !output.status.success() {
        let stderr_len = output.stderr.len();
        let stderr_msg = String::from_utf8(output.stderr)
            .unwrap_or_else(|_| format!("<non-UTF-8 stderr data: {} bytes>", stderr_len));

        return Err(io::Error::other(format!(
            "Command '{}' failed with status {:?}: {}",
            cmd.to_string_lossy(),
            output.status.code(),
            stderr_msg
        ))
        .into());
    }

    let stdout = String::from_utf8(output.stdout)?;
    Ok(stdout)
}

/// Runs `command` to completion with stdin, stdout and stderr attached to
/// ours, so its progress output reaches the terminal as it is written.
pub fn run_cmd_inherit(command: &mut Command) -> io::Result<ExitStatus> {
    command
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_cmd_echo() {
        let result = run_cmd("echo", &["hello"]);
        assert!(result.is_ok());
        assert_eq!(result.unwrap().trim(), "hello");
    }

    #[test]
    fn test_run_cmd_captures_stdout() {
        let result = run_cmd("printf", &["test output"]);
        assert_eq!(result.unwrap(), "test output");
    }

    #[test]
    fn test_run_cmd_nonexistent_command() {
        let result = run_cmd("this_command_does_not_exist_12345", &[]);
        assert!(result.is_err());
    }

    #[test]
    fn test_run_cmd_non_zero_exit_code() {
        let result = run_cmd("false", &[]);
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("failed"));
    }

    #[test]
    fn test_error_message_contains_stderr() {
        let result = run_cmd("sh", &["-c", "echo 'custom error message' >&2; exit 1"]);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("custom error message"));
        assert!(err.contains("sh"));
    }

    #[test]
    fn test_run_cmd_inherit_reports_exit_code() {
        let status = run_cmd_inherit(Command::new("sh").args(["-c", "exit 23"])).unwrap();
        assert_eq!(status.code(), Some(23));
    }

    #[test]
    fn test_run_cmd_inherit_success() {
        let status = run_cmd_inherit(&mut Command::new("true")).unwrap();
        assert!(status.success());
    }

    #[test]
    fn test_run_cmd_inherit_missing_program() {
        let result = run_cmd_inherit(&mut Command::new("this_command_does_not_exist_12345"));
        assert!(result.is_err());
    }
}
