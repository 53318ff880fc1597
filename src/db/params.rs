//! Parameter binding utilities.
//!
//! Callers pass parameters as a JSON object of name/value pairs and reference
//! them in SQL as `@name` or `:name`. None of the drivers bind by name, so the
//! statement is rewritten into the engine's positional placeholder syntax and the
//! values are laid out in matching order.

use crate::error::{DbError, DbResult};
use crate::models::{NamedParam, QueryParam};
use serde_json::Value as JsonValue;

/// Positional placeholder syntax of a driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderStyle {
    /// `?` per occurrence (SQLite, MySQL)
    QuestionMark,
    /// `$1`, `$2`, ... per distinct name (PostgreSQL)
    Dollar,
    /// `@P1`, `@P2`, ... per distinct name (SQL Server)
    AtP,
}

/// Lexical rules the binder follows for one engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindSyntax {
    pub placeholders: PlaceholderStyle,
    /// `\` escapes the next character inside `'` and `"` literals (MySQL)
    pub backslash_escapes: bool,
}

impl BindSyntax {
    pub const fn new(placeholders: PlaceholderStyle) -> Self {
        Self {
            placeholders,
            backslash_escapes: false,
        }
    }

    pub const fn with_backslash_escapes(mut self) -> Self {
        self.backslash_escapes = true;
        self
    }

    /// `[name]` quotes an identifier only in T-SQL.
    fn bracket_identifiers(&self) -> bool {
        self.placeholders == PlaceholderStyle::AtP
    }
}

impl From<PlaceholderStyle> for BindSyntax {
    fn from(placeholders: PlaceholderStyle) -> Self {
        Self::new(placeholders)
    }
}

/// A statement ready for positional binding.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundStatement {
    pub sql: String,
    pub values: Vec<QueryParam>,
}

/// Parse the raw `parameters` argument of a tool call.
///
/// Absent, blank and `{}` inputs yield no parameters. Anything other than a JSON
/// object is rejected.
pub fn parse_parameters(raw: Option<&str>) -> DbResult<Vec<NamedParam>> {
    let raw = match raw.map(str::trim) {
        None | Some("") => return Ok(Vec::new()),
        Some(raw) => raw,
    };

    let value: JsonValue = serde_json::from_str(raw)
        .map_err(|e| DbError::invalid_input(format!("Invalid parameters JSON: {}", e)))?;

    match value {
        JsonValue::Object(map) => Ok(map
            .into_iter()
            .map(|(name, value)| NamedParam::new(name, value))
            .collect()),
        JsonValue::Null => Ok(Vec::new()),
        other => Err(DbError::invalid_input(format!(
            "Parameters must be a JSON object of name/value pairs, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

/// Rewrite named references in `sql` into positional placeholders.
///
/// Only names present in `params` are rewritten (case-insensitive). String
/// literals, quoted identifiers, comments, `::` casts and `@@` system variables
/// pass through untouched.
pub fn bind_named(
    sql: &str,
    params: &[NamedParam],
    syntax: impl Into<BindSyntax>,
) -> BoundStatement {
    let syntax = syntax.into();
    let style = syntax.placeholders;
    let chars: Vec<char> = sql.chars().collect();
    let mut out = String::with_capacity(sql.len());
    let mut values = Vec::new();
    // Distinct names in first-seen order (Dollar / AtP styles)
    let mut slots: Vec<usize> = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '\'' | '"' => {
                let end = skip_quoted(&chars, i, c, syntax.backslash_escapes);
                out.extend(&chars[i..end]);
                i = end;
            }
            '`' => {
                let end = skip_quoted(&chars, i, c, false);
                out.extend(&chars[i..end]);
                i = end;
            }
            '[' if syntax.bracket_identifiers() => {
                let end = skip_quoted(&chars, i, ']', false);
                out.extend(&chars[i..end]);
                i = end;
            }
            '-' if chars.get(i + 1) == Some(&'-') => {
                let end = chars[i..]
                    .iter()
                    .position(|&ch| ch == '\n')
                    .map_or(chars.len(), |p| i + p);
                out.extend(&chars[i..end]);
                i = end;
            }
            '/' if chars.get(i + 1) == Some(&'*') => {
                let end = find_block_comment_end(&chars, i + 2);
                out.extend(&chars[i..end]);
                i = end;
            }
            '@' | ':' if chars.get(i + 1) == Some(&c) => {
                // `@@version`, `::text`
                out.push(c);
                out.push(c);
                i += 2;
            }
            '@' | ':' => {
                let start = i + 1;
                let end = identifier_end(&chars, start);
                let name: String = chars[start..end].iter().collect();
                let found = (end > start && !chars[start].is_ascii_digit())
                    .then(|| {
                        params
                            .iter()
                            .position(|p| p.name.eq_ignore_ascii_case(&name))
                    })
                    .flatten();

                match found {
                    Some(idx) => {
                        match style {
                            PlaceholderStyle::QuestionMark => {
                                out.push('?');
                                values.push(params[idx].value.clone());
                            }
                            PlaceholderStyle::Dollar | PlaceholderStyle::AtP => {
                                let slot = match slots.iter().position(|&s| s == idx) {
                                    Some(slot) => slot,
                                    None => {
                                        slots.push(idx);
                                        values.push(params[idx].value.clone());
                                        slots.len() - 1
                                    }
                                };
                                if style == PlaceholderStyle::Dollar {
                                    out.push_str(&format!("${}", slot + 1));
                                } else {
                                    out.push_str(&format!("@P{}", slot + 1));
                                }
                            }
                        }
                        i = end;
                    }
                    None => {
                        out.push(c);
                        i += 1;
                    }
                }
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }

    BoundStatement { sql: out, values }
}

/// Index just past the closing `close` of a quoted run starting at `start`.
/// Doubled closers (`''`) are escapes and keep the run open, as is any character
/// after `\` when `backslash_escapes` is set.
fn skip_quoted(chars: &[char], start: usize, close: char, backslash_escapes: bool) -> usize {
    let mut i = start + 1;
    while i < chars.len() {
        if backslash_escapes && chars[i] == '\\' {
            i += 2;
            continue;
        }
        if chars[i] == close {
            if chars.get(i + 1) == Some(&close) {
                i += 2;
                continue;
            }
            return i + 1;
        }
        i += 1;
    }
    chars.len()
}

fn find_block_comment_end(chars: &[char], from: usize) -> usize {
    let mut i = from;
    while i + 1 < chars.len() {
        if chars[i] == '*' && chars[i + 1] == '/' {
            return i + 2;
        }
        i += 1;
    }
    chars.len()
}

fn identifier_end(chars: &[char], start: usize) -> usize {
    let mut i = start;
    while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
        i += 1;
    }
    i
}
