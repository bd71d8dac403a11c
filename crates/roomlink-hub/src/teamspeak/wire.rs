//! ServerQuery line format.
//!
//! Replies are `|`-separated items of space-separated `key=value` pairs.
//! Every command ends with an `error id=<n> msg=<text>` status line.

use std::collections::HashMap;

use roomlink_core::error::{Result, RoomlinkError};

/// One reply item.
pub type Record = HashMap<String, String>;

pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '/' => out.push_str("\\/"),
            ' ' => out.push_str("\\s"),
            '|' => out.push_str("\\p"),
            '\u{07}' => out.push_str("\\a"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0b}' => out.push_str("\\v"),
            c => out.push(c),
        }
    }
    out
}

pub fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('s') => out.push(' '),
            Some('p') => out.push('|'),
            Some('/') => out.push('/'),
            Some('\\') => out.push('\\'),
            Some('a') => out.push('\u{07}'),
            Some('b') => out.push('\u{08}'),
            Some('f') => out.push('\u{0c}'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('v') => out.push('\u{0b}'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

pub fn parse_record(item: &str) -> Record {
    item.split(' ')
        .filter(|kv| !kv.is_empty())
        .map(|kv| match kv.split_once('=') {
            Some((k, v)) => (k.to_string(), unescape(v)),
            None => (kv.to_string(), String::new()),
        })
        .collect()
}

pub fn parse_items(line: &str) -> Vec<Record> {
    line.split('|').map(parse_record).collect()
}

/// Command status from an `error ...` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub id: u32,
    pub msg: String,
}

pub fn parse_status(line: &str) -> Option<Status> {
    let rec = parse_record(line.strip_prefix("error ")?);
    let id = rec.get("id")?.parse().ok()?;
    let msg = rec.get("msg").cloned().unwrap_or_default();
    Some(Status { id, msg })
}

pub fn field<'a>(rec: &'a Record, key: &str) -> Result<&'a str> {
    rec.get(key)
        .map(String::as_str)
        .ok_or_else(|| RoomlinkError::Internal(format!("serverquery reply lacks {key}")))
}

pub fn number(rec: &Record, key: &str) -> Result<u64> {
    field(rec, key)?
        .parse()
        .map_err(|e| RoomlinkError::Internal(format!("serverquery {key} is not a number: {e}")))
}
