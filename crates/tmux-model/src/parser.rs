//! Parsing of tmux list and option output.

use std::collections::BTreeMap;

use tmux_model_core::{Attributes, Error, Field, Result, Value};

/// Parse one `-F` record into an attribute snapshot.
pub fn parse_record<F: Field>(line: &str, separator: &str) -> Result<Attributes<F>> {
    let parts: Vec<&str> = line.split(separator).collect();
    let fields = F::all();
    if parts.len() != fields.len() {
        return Err(Error::Parse(format!(
            "unexpected {} field count {} (expected {}), line: {}",
            F::KIND,
            parts.len(),
            fields.len(),
            line
        )));
    }

    fields
        .iter()
        .zip(parts)
        .map(|(field, raw)| Ok((*field, field.parse_value(raw)?)))
        .collect()
}

/// Parse every non-blank record of a list command.
pub fn parse_records<F: Field>(lines: &[String], separator: &str) -> Result<Vec<Attributes<F>>> {
    lines
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| parse_record(line, separator))
        .collect()
}

/// Parse one `show-options` line into key and coerced value.
pub fn parse_option_line(line: &str) -> Option<(String, Value)> {
    let line = line.trim_end();
    if line.trim().is_empty() {
        return None;
    }
    let (key, raw) = match line.split_once(' ') {
        Some((key, raw)) => (key, raw),
        None => (line, ""),
    };
    Some((key.to_string(), Value::coerce(&unquote(raw))))
}

/// Parse full `show-options` output into a key/value map.
pub fn parse_options(lines: &[String]) -> BTreeMap<String, Value> {
    lines
        .iter()
        .filter_map(|line| parse_option_line(line))
        .collect()
}

fn unquote(raw: &str) -> String {
    let quoted = raw.len() >= 2
        && ((raw.starts_with('"') && raw.ends_with('"'))
            || (raw.starts_with('\'') && raw.ends_with('\'')));
    if !quoted {
        return raw.to_string();
    }

    let inner = &raw[1..raw.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
                continue;
            }
        }
        out.push(c);
    }
    out
}
