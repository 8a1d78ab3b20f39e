//! User interaction prompts and colored output macros
//!
//! ERROR HANDLING STRATEGY FOR DECORATIVE I/O:
//! All termcolor operations use `let _ =` to deliberately ignore errors.
//! Colored output is decorative and non-essential. If stderr/stdout is unavailable
//! (broken pipe, no TTY, etc.), the program continues gracefully without colors.
//!
//! Reading answers is CRITICAL I/O: stdin and flush errors propagate with `?`.

use crate::error::Result;
use std::collections::VecDeque;
use std::io::{self, Write};

/// Macro for printing warnings with yellow color
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {{
        use std::io::Write as _;
        use termcolor::WriteColor as _;
        let bufwtr = termcolor::BufferWriter::stderr(termcolor::ColorChoice::Auto);
        let mut buffer = bufwtr.buffer();
        let _ = buffer.set_color(termcolor::ColorSpec::new().set_fg(Some(termcolor::Color::Yellow)));
        let _ = write!(&mut buffer, "⚠️  ");
        let _ = buffer.reset();
        let _ = writeln!(&mut buffer, $($arg)*);
        let _ = bufwtr.print(&buffer);
    }};
}

/// Macro for printing errors with red color
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {{
        use std::io::Write as _;
        use termcolor::WriteColor as _;
        let bufwtr = termcolor::BufferWriter::stderr(termcolor::ColorChoice::Auto);
        let mut buffer = bufwtr.buffer();
        let _ = buffer.set_color(termcolor::ColorSpec::new().set_fg(Some(termcolor::Color::Red)));
        let _ = write!(&mut buffer, "❌ ");
        let _ = buffer.reset();
        let _ = writeln!(&mut buffer, $($arg)*);
        let _ = bufwtr.print(&buffer);
    }};
}

/// Macro for printing success messages with green color
#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {{
        use std::io::Write as _;
        use termcolor::WriteColor as _;
        let bufwtr = termcolor::BufferWriter::stdout(termcolor::ColorChoice::Auto);
        let mut buffer = bufwtr.buffer();
        let _ = buffer.set_color(termcolor::ColorSpec::new().set_fg(Some(termcolor::Color::Green)));
        let _ = write!(&mut buffer, "✓ ");
        let _ = buffer.reset();
        let _ = writeln!(&mut buffer, $($arg)*);
        let _ = bufwtr.print(&buffer);
    }};
}

/// Macro for printing informational notes with cyan color
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {{
        use std::io::Write as _;
        use termcolor::WriteColor as _;
        let bufwtr = termcolor::BufferWriter::stdout(termcolor::ColorChoice::Auto);
        let mut buffer = bufwtr.buffer();
        let _ = buffer.set_color(termcolor::ColorSpec::new().set_fg(Some(termcolor::Color::Cyan)));
        let _ = write!(&mut buffer, "ℹ️  ");
        let _ = buffer.reset();
        let _ = writeln!(&mut buffer, $($arg)*);
        let _ = bufwtr.print(&buffer);
    }};
}

/// Print a titled section banner
pub fn section(title: &str) {
    use termcolor::{BufferWriter, ColorChoice};

    let bufwtr = BufferWriter::stdout(ColorChoice::Auto);
    let mut buffer = bufwtr.buffer();
    let _ = writeln!(&mut buffer, "\n{}", "=".repeat(60));
    let _ = writeln!(&mut buffer, "{title}");
    let _ = writeln!(&mut buffer, "{}", "=".repeat(60));
    let _ = bufwtr.print(&buffer);
}

/// Source of user answers.
///
/// The flow never touches stdin directly so it can be driven by
/// [`ScriptedConsole`] as well as the real terminal.
pub trait Console {
    /// Show `prompt` and read one trimmed line. `Ok(None)` means end of input.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;
}

/// Interactive terminal on stdin/stdout
#[derive(Debug, Default)]
pub struct Terminal;

impl Console for Terminal {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        print!("{prompt}");
        io::stdout().flush()?;

        let mut input = String::new();
        let bytes_read = io::stdin().read_line(&mut input)?;

        // EOF (Ctrl+D on Unix, Ctrl+Z on Windows)
        if bytes_read == 0 {
            println!();
            return Ok(None);
        }

        Ok(Some(input.trim().to_string()))
    }
}

/// Pre-recorded answers, consumed in order.
///
/// Running out of answers behaves like end of input.
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    answers: VecDeque<String>,
    prompts: Vec<String>,
}

impl ScriptedConsole {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
        }
    }

    /// Prompts shown so far
    #[must_use]
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    /// Answers not yet consumed
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Console for ScriptedConsole {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        self.prompts.push(prompt.to_string());
        Ok(self.answers.pop_front().map(|answer| answer.trim().to_string()))
    }
}

/// Prompt for a required value, looping until something is entered
///
/// Features:
/// - Re-prompts on empty input
/// - Allows graceful cancellation via "q", "quit", or Ctrl+D (EOF)
/// - Returns Some(value) on success, None if user cancels
pub fn prompt_required<C: Console + ?Sized>(console: &mut C, label: &str) -> Result<Option<String>> {
    loop {
        let Some(input) = console.read_line(&format!("\nEnter {label} (or 'q' to cancel): "))? else {
            return Ok(None);
        };

        if input.eq_ignore_ascii_case("q") || input.eq_ignore_ascii_case("quit") {
            return Ok(None);
        }

        if input.is_empty() {
            crate::error!("{label} is required.");
            println!("   Enter 'q' to cancel setup");
            continue;
        }

        return Ok(Some(input));
    }
}

/// Prompt user for yes/no answer, looping until valid input
///
/// Features:
/// - Accepts "y", "yes", "n", "no" (case insensitive)
/// - Empty input selects `default`
/// - Re-prompts on invalid input with clear error message
/// - Handles EOF (Ctrl+D) gracefully, treating as "no"
pub fn prompt_yes_no<C: Console + ?Sized>(console: &mut C, question: &str, default: bool) -> Result<bool> {
    let hint = if default { "Y/n" } else { "y/N" };

    loop {
        let Some(response) = console.read_line(&format!("{question} ({hint}): "))? else {
            println!("EOF detected, treating as 'no'");
            return Ok(false);
        };

        match response.to_lowercase().as_str() {
            "" => return Ok(default),
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            other => {
                crate::warn!("Invalid input: '{other}'. Please enter 'y' or 'n'.");
                continue;
            }
        }
    }
}

/// Prompt for a value that falls back to `default` when left empty
pub fn prompt_with_default<C: Console + ?Sized>(
    console: &mut C,
    label: &str,
    default: &str,
) -> Result<String> {
    let input = console.read_line(&format!("{label} (default: {default}): "))?;

    Ok(match input {
        Some(value) if !value.is_empty() => value,
        _ => default.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_skips_blank_answers() {
        let mut console = ScriptedConsole::new(["", "   ", "abc123"]);
        let value = prompt_required(&mut console, "Unbound API Key").unwrap();
        assert_eq!(value.as_deref(), Some("abc123"));
        assert_eq!(console.prompts().len(), 3);
    }

    #[test]
    fn required_cancels_on_quit_or_eof() {
        let mut console = ScriptedConsole::new(["Quit"]);
        assert_eq!(prompt_required(&mut console, "key").unwrap(), None);

        let mut console = ScriptedConsole::new(Vec::<String>::new());
        assert_eq!(prompt_required(&mut console, "key").unwrap(), None);
    }

    #[test]
    fn yes_no_uses_default_on_empty() {
        let mut console = ScriptedConsole::new(["", ""]);
        assert!(prompt_yes_no(&mut console, "Retry?", true).unwrap());
        assert!(!prompt_yes_no(&mut console, "Use Vertex?", false).unwrap());
        assert!(console.prompts()[0].ends_with("(Y/n): "));
        assert!(console.prompts()[1].ends_with("(y/N): "));
    }

    #[test]
    fn yes_no_reprompts_on_garbage() {
        let mut console = ScriptedConsole::new(["maybe", "YES"]);
        assert!(prompt_yes_no(&mut console, "Retry?", false).unwrap());
        assert_eq!(console.remaining(), 0);
    }

    #[test]
    fn yes_no_treats_eof_as_no() {
        let mut console = ScriptedConsole::default();
        assert!(!prompt_yes_no(&mut console, "Retry?", true).unwrap());
    }

    #[test]
    fn default_prompt_falls_back() {
        let mut console = ScriptedConsole::new(["", "custom-model"]);
        assert_eq!(prompt_with_default(&mut console, "Primary model", "m1").unwrap(), "m1");
        assert_eq!(
            prompt_with_default(&mut console, "Primary model", "m1").unwrap(),
            "custom-model"
        );
        assert_eq!(prompt_with_default(&mut console, "Primary model", "m1").unwrap(), "m1");
    }
}
