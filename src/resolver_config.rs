//! Trust anchor discovery in resolver configuration.
//!
//! Understands the Unbound clauses `trust-anchor:`, `trust-anchor-file:` and
//! `auto-trust-anchor-file:`, and the BIND blocks `trusted-keys`,
//! `managed-keys` and `trust-anchors`. Block entries are turned into inline
//! DNSKEY or DS records. Everything else is skipped.

use crate::error::{ConfigError, Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Where trust anchor records are read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnchorSource {
    /// A zone file holding DNSKEY or DS records
    File(PathBuf),
    /// A single record in zone file syntax; TTL and class may be omitted
    Inline {
        record: String,
        /// Configuration line the record starts on
        line: usize,
    },
}

const BLOCK_KEYWORDS: &[&str] = &["trusted-keys", "managed-keys", "trust-anchors"];

/// Scan a resolver configuration file
pub fn scan_file<P: AsRef<Path>>(path: P) -> Result<Vec<AnchorSource>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|error| Error::Io {
        path: path.display().to_string(),
        error,
    })?;
    let sources = scan(&text, &path.display().to_string())?;
    debug!(
        "Found {} trust anchor sources in {}",
        sources.len(),
        path.display()
    );
    Ok(sources)
}

/// Scan configuration text; `path` only labels errors
pub fn scan(text: &str, path: &str) -> std::result::Result<Vec<AnchorSource>, ConfigError> {
    let mut sources = Vec::new();
    let mut block: Option<Block> = None;

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = strip_comment(raw);

        if let Some(open) = block.as_mut() {
            if open.feed(line, line_no, path)? {
                let finished = std::mem::take(open);
                block = None;
                sources.extend(finished.into_sources(path)?);
            }
            continue;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if let Some((keyword, rest)) = block_start(trimmed) {
            trace!("{}: {} block at line {}", path, keyword, line_no);
            let mut open = Block {
                line: line_no,
                ..Block::default()
            };
            if open.feed(rest, line_no, path)? {
                sources.extend(open.into_sources(path)?);
            } else {
                block = Some(open);
            }
            continue;
        }

        let Some((key, value)) = trimmed.split_once(':') else {
            continue;
        };
        let value = unquote(value.trim());
        match key.trim() {
            "trust-anchor" => sources.push(AnchorSource::Inline {
                record: value.to_string(),
                line: line_no,
            }),
            "trust-anchor-file" | "auto-trust-anchor-file" => {
                sources.push(AnchorSource::File(PathBuf::from(value)))
            }
            other => trace!("{}: skipping clause {}", path, other),
        }
    }

    if let Some(open) = block {
        return Err(ConfigError::ResolverConfig {
            path: path.to_string(),
            line: open.line,
            message: "unterminated trust anchor block".to_string(),
        });
    }
    Ok(sources)
}

/// Entries of a `{ ... }` block, possibly spanning lines
#[derive(Debug, Default)]
struct Block {
    line: usize,
    opened: bool,
    in_quote: bool,
    /// Finished entries with the line each one starts on
    entries: Vec<(usize, String)>,
    current: String,
    current_line: usize,
}

impl Block {
    /// Returns true once the closing brace has been seen
    fn feed(
        &mut self,
        text: &str,
        line: usize,
        path: &str,
    ) -> std::result::Result<bool, ConfigError> {
        for c in text.chars() {
            if !self.opened {
                if c == '{' {
                    self.opened = true;
                } else if !c.is_whitespace() {
                    return Err(ConfigError::ResolverConfig {
                        path: path.to_string(),
                        line,
                        message: format!("expected '{{' but found '{}'", c),
                    });
                }
                continue;
            }
            match c {
                ';' | '}' if !self.in_quote => {
                    self.end_entry();
                    if c == '}' {
                        return Ok(true);
                    }
                }
                c if c.is_whitespace() && self.current.is_empty() => {}
                c => {
                    if self.current.is_empty() {
                        self.current_line = line;
                    }
                    if c == '"' {
                        self.in_quote = !self.in_quote;
                    }
                    self.current.push(c);
                }
            }
        }
        if !self.current.is_empty() {
            self.current.push(' ');
        }
        Ok(false)
    }

    fn end_entry(&mut self) {
        let entry = std::mem::take(&mut self.current);
        if !entry.trim().is_empty() {
            self.entries.push((self.current_line, entry.trim().to_string()));
        }
    }

    fn into_sources(self, path: &str) -> std::result::Result<Vec<AnchorSource>, ConfigError> {
        self.entries
            .into_iter()
            .map(|(line, entry)| match block_entry_record(&entry) {
                Some(record) => Ok(AnchorSource::Inline { record, line }),
                None => Err(ConfigError::ResolverConfig {
                    path: path.to_string(),
                    line,
                    message: format!("malformed trust anchor entry '{}'", entry),
                }),
            })
            .collect()
    }
}

fn block_start(line: &str) -> Option<(&'static str, &str)> {
    BLOCK_KEYWORDS.iter().find_map(|&keyword| {
        let rest = line.strip_prefix(keyword)?;
        rest.starts_with(|c: char| c.is_whitespace() || c == '{')
            .then_some((keyword, rest))
    })
}

/// Turn `"name" [kind] fields...` into a zone file record
fn block_entry_record(entry: &str) -> Option<String> {
    let words = split_words(entry);
    let (name, rest) = words.split_first()?;

    let (rtype, fields) = match rest.first().map(String::as_str) {
        Some("initial-key" | "static-key") => ("DNSKEY", &rest[1..]),
        Some("initial-ds" | "static-ds") => ("DS", &rest[1..]),
        Some(_) => ("DNSKEY", rest),
        None => return None,
    };
    if fields.len() < 4 || !fields[0].bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let owner = if name.ends_with('.') {
        name.clone()
    } else {
        format!("{}.", name)
    };
    Some(format!("{} IN {} {}", owner, rtype, fields.join(" ")))
}

/// Split on whitespace, keeping quoted strings whole and unquoted
fn split_words(entry: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_quote = false;
    for c in entry.chars() {
        match c {
            '"' => in_quote = !in_quote,
            c if c.is_whitespace() && !in_quote => {
                if !current.is_empty() {
                    words.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Drop `#` and `//` comments outside quoted strings
fn strip_comment(line: &str) -> &str {
    let mut in_quote = false;
    let mut prev_slash = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => in_quote = !in_quote,
            '#' if !in_quote => return &line[..i],
            '/' if !in_quote && prev_slash => return &line[..i - 1],
            _ => {}
        }
        prev_slash = c == '/' && !in_quote;
    }
    line
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}
