//! `agents.conf` text format.
//!
//! ```text
//! ; comment
//! [general]
//!
//! [1001]
//! fullname = Alice Smith
//! password => 1234
//! ```

use crate::error::ConfigError;

/// One `key = value` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawOption {
    pub key: String,
    pub value: String,
    pub line: usize,
}

/// One `[name]` section with its options in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSection {
    pub name: String,
    pub line: usize,
    pub options: Vec<RawOption>,
}

/// Split configuration text into sections.
///
/// Only the file syntax is checked here; option names and values are
/// validated when the sections are turned into agent records.
pub fn parse_sections(text: &str) -> Result<Vec<RawSection>, ConfigError> {
    let mut sections: Vec<RawSection> = Vec::new();

    for (index, raw_line) in text.lines().enumerate() {
        let line = index + 1;
        let content = strip_comment(raw_line);
        let content = content.trim();
        if content.is_empty() {
            continue;
        }

        if let Some(rest) = content.strip_prefix('[') {
            let (name, trailer) = rest.split_once(']').ok_or_else(|| ConfigError::Syntax {
                line,
                message: "unterminated section header".to_string(),
            })?;
            if !trailer.trim().is_empty() {
                return Err(ConfigError::Syntax {
                    line,
                    message: format!("unexpected text after section header: '{}'", trailer.trim()),
                });
            }
            let name = name.trim();
            if name.is_empty() {
                return Err(ConfigError::Syntax {
                    line,
                    message: "empty section name".to_string(),
                });
            }
            sections.push(RawSection {
                name: name.to_string(),
                line,
                options: Vec::new(),
            });
            continue;
        }

        let (key, value) = split_option(content).ok_or_else(|| ConfigError::Syntax {
            line,
            message: format!("expected 'key = value', found '{}'", content),
        })?;
        if key.is_empty() {
            return Err(ConfigError::Syntax {
                line,
                message: "option name cannot be empty".to_string(),
            });
        }

        let section = sections
            .last_mut()
            .ok_or_else(|| ConfigError::OptionOutsideSection {
                line,
                key: key.to_string(),
            })?;
        section.options.push(RawOption {
            key: key.to_string(),
            value: value.to_string(),
            line,
        });
    }

    Ok(sections)
}

/// Drop everything from the first unescaped `;` and unescape `\;`.
fn strip_comment(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&';') => {
                out.push(';');
                chars.next();
            }
            ';' => break,
            _ => out.push(c),
        }
    }
    out
}

fn split_option(content: &str) -> Option<(&str, &str)> {
    let (key, value) = content.split_once('=')?;
    let value = value.strip_prefix('>').unwrap_or(value);
    Some((key.trim(), value.trim()))
}
