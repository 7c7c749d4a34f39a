// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use anyhow::Result;
use crossterm::{
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use std::io::{IsTerminal, Write};

pub(super) fn print_with_green_check_stdout(message: &str) -> Result<()> {
    write_stdout_with_status_symbols(&status_line('✓', message))
}

pub(super) fn print_with_red_cross_stdout(message: &str) -> Result<()> {
    write_stdout_with_status_symbols(&status_line('✗', message))
}

fn status_line(symbol: char, message: &str) -> String {
    let mut line = String::with_capacity(message.len() + 4);
    line.push(symbol);
    line.push(' ');
    line.push_str(message);
    line.push('\n');
    line
}

fn write_stdout_with_status_symbols(text: &str) -> Result<()> {
    let mut stdout = std::io::stdout();
    if !stdout.is_terminal() {
        return write_all(&mut stdout, text.as_bytes());
    }
    for line in text.split_inclusive('\n') {
        if let Some(rest) = line.strip_prefix('✓') {
            execute!(
                stdout,
                SetForegroundColor(Color::Green),
                Print("✓"),
                ResetColor,
                Print(rest)
            )?;
        } else if let Some(rest) = line.strip_prefix('✗') {
            execute!(
                stdout,
                SetForegroundColor(Color::Red),
                Print("✗"),
                ResetColor,
                Print(rest)
            )?;
        } else {
            write_all(&mut stdout, line.as_bytes())?;
        }
    }
    Ok(())
}

/// Writes `Error: <message>.` to stderr, with the prefix in red on a TTY.
pub(super) fn print_error_stderr(message: &str) -> Result<()> {
    let mut stderr = std::io::stderr();
    let body = format!(" {}.\n", message.trim_end_matches('.'));
    if !stderr.is_terminal() {
        return write_all(&mut stderr, format!("Error:{body}").as_bytes());
    }
    execute!(
        stderr,
        SetForegroundColor(Color::Red),
        Print("Error:"),
        ResetColor,
        Print(body)
    )?;
    Ok(())
}

fn write_all<W: Write>(w: &mut W, buf: &[u8]) -> Result<()> {
    w.write_all(buf)?;
    w.flush()?;
    Ok(())
}
