//! User prompt abstraction for provisioning decisions.
//!
//! Lets the CLI ask for confirmation and for the toolkit choice without
//! coupling the install flow to stdin.
//!
//! # Feature Flags
//!
//! - `cli`: Enables `CliPrompt` which uses stdin/stdout for interactive prompts.
//!   Without this feature, only `NonInteractivePrompt` and `AutoConfirmPrompt`
//!   are available.
//!
//! # Design
//!
//! `NonInteractivePrompt` returns `Err(RuntimeError::PromptRequired)` rather
//! than silently confirming, so an unattended run never installs a toolkit
//! nobody asked for.

use super::error::{RuntimeError, RuntimeResult};

/// Trait for handling user prompts during provisioning.
pub trait InstallPrompt: Send + Sync {
    /// Ask the user to confirm an action.
    ///
    /// # Returns
    /// - `Ok(true)` if user confirmed
    /// - `Ok(false)` if user declined
    /// - `Err(RuntimeError::PromptRequired)` if prompting is not supported
    fn confirm(&self, message: &str, default: bool) -> RuntimeResult<bool>;

    /// Ask the user to pick one of `options`; returns the chosen index.
    fn select(&self, message: &str, options: &[&str], default: usize) -> RuntimeResult<usize>;

    /// Ask for free-form text.
    fn input(&self, message: &str) -> RuntimeResult<String>;

    /// Display an informational message to the user.
    fn info(&self, message: &str);

    /// Display a warning message to the user.
    fn warn(&self, message: &str);
}

/// Non-interactive prompt that returns errors instead of prompting.
#[derive(Debug, Default, Clone, Copy)]
pub struct NonInteractivePrompt;

impl InstallPrompt for NonInteractivePrompt {
    fn confirm(&self, message: &str, _default: bool) -> RuntimeResult<bool> {
        Err(RuntimeError::prompt_required(message))
    }

    fn select(&self, message: &str, _options: &[&str], _default: usize) -> RuntimeResult<usize> {
        Err(RuntimeError::prompt_required(message))
    }

    fn input(&self, message: &str) -> RuntimeResult<String> {
        Err(RuntimeError::prompt_required(message))
    }

    fn info(&self, _message: &str) {}

    fn warn(&self, _message: &str) {}
}

/// Auto-confirm prompt for `--auto` runs: confirms everything and takes
/// the default of every selection.
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoConfirmPrompt;

impl InstallPrompt for AutoConfirmPrompt {
    fn confirm(&self, _message: &str, _default: bool) -> RuntimeResult<bool> {
        Ok(true)
    }

    fn select(&self, _message: &str, _options: &[&str], default: usize) -> RuntimeResult<usize> {
        Ok(default)
    }

    fn input(&self, message: &str) -> RuntimeResult<String> {
        Err(RuntimeError::prompt_required(message))
    }

    fn info(&self, message: &str) {
        println!("{message}");
    }

    fn warn(&self, message: &str) {
        eprintln!("Warning: {message}");
    }
}

/// Interpret a line typed at a selection prompt.
///
/// Accepts a 1-based index; blank input picks `default`.
pub fn parse_selection(input: &str, option_count: usize, default: usize) -> Option<usize> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Some(default);
    }
    trimmed
        .parse::<usize>()
        .ok()
        .filter(|n| (1..=option_count).contains(n))
        .map(|n| n - 1)
}

/// Interpret a raw line read at a yes/no prompt.
///
/// `line` is exactly what `read_line` produced, so an empty string means
/// stdin hit EOF and the prompt is cancelled. A bare newline picks
/// `default`. Anything other than y/yes/n/no is `None` and should be asked
/// again.
pub fn parse_confirmation(line: &str, default: bool) -> RuntimeResult<Option<bool>> {
    if line.is_empty() {
        return Err(RuntimeError::Cancelled);
    }
    Ok(match line.trim().to_lowercase().as_str() {
        "" => Some(default),
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    })
}

/// CLI prompt using stdin/stdout for interactive confirmation.
///
/// This is only available with the `cli` feature flag.
#[cfg(feature = "cli")]
pub mod cli_prompt {
    use super::*;
    use std::io::{self, BufRead, Write};

    /// CLI prompt that reads from stdin.
    #[derive(Debug, Default)]
    pub struct CliPrompt;

    impl CliPrompt {
        pub fn new() -> Self {
            Self
        }

        fn read_line() -> RuntimeResult<String> {
            let mut input = String::new();
            io::stdin().lock().read_line(&mut input)?;
            Ok(input)
        }
    }

    impl InstallPrompt for CliPrompt {
        fn confirm(&self, message: &str, default: bool) -> RuntimeResult<bool> {
            let prompt_suffix = if default { "[Y/n]" } else { "[y/N]" };
            loop {
                print!("{message} {prompt_suffix}: ");
                io::stdout().flush()?;
                match parse_confirmation(&Self::read_line()?, default)? {
                    Some(answer) => return Ok(answer),
                    None => println!("Please answer y or n"),
                }
            }
        }

        fn select(&self, message: &str, options: &[&str], default: usize) -> RuntimeResult<usize> {
            println!("{message}");
            for (i, option) in options.iter().enumerate() {
                let marker = if i == default { " (default)" } else { "" };
                println!("  {}) {option}{marker}", i + 1);
            }
            loop {
                print!("Choice [{}]: ", default + 1);
                io::stdout().flush()?;
                let line = Self::read_line()?;
                if line.is_empty() {
                    // EOF
                    return Err(RuntimeError::Cancelled);
                }
                match parse_selection(&line, options.len(), default) {
                    Some(choice) => return Ok(choice),
                    None => println!("Enter a number between 1 and {}", options.len()),
                }
            }
        }

        fn input(&self, message: &str) -> RuntimeResult<String> {
            print!("{message}: ");
            io::stdout().flush()?;
            let line = Self::read_line()?;
            if line.is_empty() {
                return Err(RuntimeError::Cancelled);
            }
            Ok(line.trim().to_string())
        }

        fn info(&self, message: &str) {
            println!("{message}");
        }

        fn warn(&self, message: &str) {
            eprintln!("⚠️  {message}");
        }
    }
}

#[cfg(feature = "cli")]
pub use cli_prompt::CliPrompt;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_interactive_returns_error() {
        let prompt = NonInteractivePrompt;
        match prompt.confirm("Install CUDA 12.9?", true) {
            Err(RuntimeError::PromptRequired { message }) => {
                assert_eq!(message, "Install CUDA 12.9?");
            }
            other => panic!("Expected PromptRequired error, got {other:?}"),
        }
        assert!(prompt.select("Pick", &["a", "b"], 0).is_err());
    }

    #[test]
    fn test_auto_confirm_takes_defaults() {
        let prompt = AutoConfirmPrompt;
        assert!(prompt.confirm("Install?", false).unwrap());
        assert_eq!(prompt.select("Pick", &["keep", "latest"], 1).unwrap(), 1);
    }

    #[test]
    fn test_parse_selection() {
        assert_eq!(parse_selection("\n", 3, 1), Some(1));
        assert_eq!(parse_selection(" 3 ", 3, 0), Some(2));
        assert_eq!(parse_selection("0", 3, 0), None);
        assert_eq!(parse_selection("4", 3, 0), None);
        assert_eq!(parse_selection("latest", 3, 0), None);
    }

    #[test]
    fn test_parse_confirmation() {
        assert!(matches!(parse_confirmation("", true), Err(RuntimeError::Cancelled)));
        assert_eq!(parse_confirmation("\n", true).unwrap(), Some(true));
        assert_eq!(parse_confirmation("\n", false).unwrap(), Some(false));
        assert_eq!(parse_confirmation(" Yes\n", false).unwrap(), Some(true));
        assert_eq!(parse_confirmation("n\n", true).unwrap(), Some(false));
        assert_eq!(parse_confirmation("sure\n", true).unwrap(), None);
    }
}
