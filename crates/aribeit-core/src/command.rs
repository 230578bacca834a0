//! Analyzer command construction
//!
//! The analyzer is configured as a single command line such as
//! `"/usr/local/bin/eitdump --mode=eit"`. The first whitespace-delimited token
//! is the executable; the remainder is split into arguments with the host
//! platform's rules (POSIX shell words, or the Windows command-line
//! convention where backslashes in paths stay literal). The recording path is appended last as its own argument and is
//! never parsed, so spaces or quotes in it cannot split it apart.

use crate::error::CommandError;
use std::fmt;

/// Argument vector for one analyzer invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub executable: String,
    pub fixed_args: Vec<String>,
    pub target_path: String,
}

impl CommandSpec {
    /// Build the invocation for `target_path` from a configured template.
    ///
    /// Returns `Ok(None)` when the template is blank (analyzer not configured).
    pub fn from_template(
        template: &str,
        target_path: &str,
    ) -> Result<Option<Self>, CommandError> {
        let template = template.trim();
        if template.is_empty() {
            return Ok(None);
        }

        let (executable, rest) = match template.split_once(char::is_whitespace) {
            Some((exe, rest)) => (exe, rest),
            None => (template, ""),
        };

        Ok(Some(Self {
            executable: executable.to_string(),
            fixed_args: split_args(rest)?,
            target_path: target_path.to_string(),
        }))
    }

    /// Full argument list passed to the child: fixed arguments, then the path
    pub fn args(&self) -> impl Iterator<Item = &str> {
        self.fixed_args
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.target_path.as_str()))
    }

    /// Shell-quoted rendering for log lines
    pub fn display(&self) -> String {
        std::iter::once(self.executable.as_str())
            .chain(self.args())
            .map(quote_sh)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// Check a template without building a full invocation
pub fn validate_template(template: &str) -> Result<(), CommandError> {
    CommandSpec::from_template(template, "").map(|_| ())
}

/// Split fixed analyzer arguments with the host platform's rules
pub fn split_args(input: &str) -> Result<Vec<String>, CommandError> {
    if cfg!(windows) {
        split_windows_args(input)
    } else {
        split_posix_args(input)
    }
}

/// Split an argument string the way a POSIX shell splits words.
///
/// Whitespace separates words, single quotes are literal, double quotes
/// group and honour `\"`, `\\`, `\$` and `` \` `` escapes, and a backslash
/// outside quotes escapes the next character. No expansion is performed.
pub fn split_posix_args(input: &str) -> Result<Vec<String>, CommandError> {
    let mut args = Vec::new();
    let mut current = String::new();
    // A word may be an empty quoted string, so track presence separately.
    let mut in_word = false;
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        match c {
            c if c.is_whitespace() => {
                if in_word {
                    args.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            '\'' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(ch) => current.push(ch),
                        None => return Err(CommandError::UnterminatedQuote('\'')),
                    }
                }
            }
            '"' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(ch @ ('"' | '\\' | '$' | '`')) => current.push(ch),
                            Some('\n') => {}
                            Some(ch) => {
                                current.push('\\');
                                current.push(ch);
                            }
                            None => return Err(CommandError::UnterminatedQuote('"')),
                        },
                        Some(ch) => current.push(ch),
                        None => return Err(CommandError::UnterminatedQuote('"')),
                    }
                }
            }
            '\\' => match chars.next() {
                Some('\n') => {}
                Some(ch) => {
                    in_word = true;
                    current.push(ch);
                }
                None => return Err(CommandError::TrailingEscape),
            },
            ch => {
                in_word = true;
                current.push(ch);
            }
        }
    }

    if in_word {
        args.push(current);
    }
    Ok(args)
}

/// Split an argument string with the Windows C runtime rules.
///
/// Backslashes are literal unless they precede a `"`: then each pair becomes
/// one backslash and an odd one out escapes the quote. Inside quotes, `""`
/// is a literal quote. Single quotes carry no meaning.
pub fn split_windows_args(input: &str) -> Result<Vec<String>, CommandError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut in_quotes = false;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            c if c.is_whitespace() && !in_quotes => {
                if in_word {
                    args.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            '\\' => {
                in_word = true;
                let mut backslashes = 1;
                while chars.next_if_eq(&'\\').is_some() {
                    backslashes += 1;
                }
                if chars.peek() == Some(&'"') {
                    current.extend(std::iter::repeat('\\').take(backslashes / 2));
                    if backslashes % 2 == 1 {
                        chars.next();
                        current.push('"');
                    }
                } else {
                    current.extend(std::iter::repeat('\\').take(backslashes));
                }
            }
            '"' => {
                in_word = true;
                if in_quotes && chars.next_if_eq(&'"').is_some() {
                    current.push('"');
                } else {
                    in_quotes = !in_quotes;
                }
            }
            ch => {
                in_word = true;
                current.push(ch);
            }
        }
    }

    if in_quotes {
        return Err(CommandError::UnterminatedQuote('"'));
    }
    if in_word {
        args.push(current);
    }
    Ok(args)
}

fn is_simple_word(s: &str) -> bool {
    !s.is_empty()
        && s.chars().all(|c| {
            c.is_ascii_alphanumeric()
                || matches!(c, '_' | '-' | '.' | '/' | ':' | '+' | '%' | '@' | '=' | ',')
        })
}

fn quote_sh(s: &str) -> String {
    if is_simple_word(s) {
        return s.to_string();
    }
    format!("'{}'", s.replace('\'', "'\"'\"'"))
}
