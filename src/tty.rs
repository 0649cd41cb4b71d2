//! Terminal I/O utilities for CLI.
//!
//! Provides TTY detection, user prompting, and the typed confirmation gate
//! used before destructive runs.

use std::io::{self, BufRead, IsTerminal, Write};

/// Token the user must type to confirm a destructive run.
pub const CONFIRM_TOKEN: &str = "DELETE";

pub fn is_stdin_tty() -> bool {
    io::stdin().is_terminal()
}

pub fn prompt(message: &str) -> tracklint::Result<String> {
    eprint!("{}", message);
    io::stderr().flush().ok();

    let stdin = io::stdin();
    let mut line = String::new();
    stdin.lock().read_line(&mut line).map_err(|e| {
        tracklint::Error::new(
            tracklint::ErrorCode::InternalIoError,
            format!("Failed to read input: {}", e),
            serde_json::Value::Null,
        )
    })?;

    Ok(line.trim().to_string())
}

/// Ask the user to type [`CONFIRM_TOKEN`] verbatim. Anything else, or a
/// read failure, declines.
pub fn confirm_with_token(what: &str) -> bool {
    match prompt(&format!(
        "Type {} to permanently remove {}: ",
        CONFIRM_TOKEN, what
    )) {
        Ok(answer) => answer == CONFIRM_TOKEN,
        Err(_) => false,
    }
}

/// Print status message to stderr if running in a terminal.
pub fn status(message: &str) {
    if io::stderr().is_terminal() {
        eprintln!("{}", message);
    }
}

// log_status! macro is defined in lib.rs (#[macro_export]) and available crate-wide.
