//! Canonical JSON serialization
//!
//! [`Algorithm::Basic`] is RFC 8785 (JCS): object keys sorted by UTF-16 code
//! units, no insignificant whitespace, ECMAScript-style numbers.
//!
//! [`Algorithm::UnorderedSets`] additionally treats arrays as sets. JSON-LD
//! property values carry no order, so two documents that differ only in the
//! order of array items must serialize identically. Items are sorted by their
//! own canonical text. Arrays directly under `@list` keep document order.

use serde_json::Value as JsonValue;
use std::cmp::Ordering;

use aspect_vocab::jsonld;

#[derive(Debug, Clone, Default)]
pub struct NormalizeOptions {
    pub algorithm: Algorithm,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Algorithm {
    /// RFC 8785
    #[default]
    Basic,
    /// RFC 8785 with arrays sorted, except `@list` values
    UnorderedSets,
}

/// Normalize JSON data to canonical form (RFC 8785)
pub fn normalize(data: &JsonValue) -> String {
    normalize_with_options(data, &NormalizeOptions::default())
}

pub fn normalize_with_options(data: &JsonValue, opts: &NormalizeOptions) -> String {
    let mut out = String::new();
    write_value(&mut out, data, opts.algorithm, false);
    out
}

fn write_value(out: &mut String, data: &JsonValue, algorithm: Algorithm, ordered: bool) {
    match data {
        JsonValue::Null => out.push_str("null"),
        JsonValue::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        JsonValue::Number(n) => out.push_str(&number_text(n)),
        JsonValue::String(s) => write_string(out, s),
        JsonValue::Array(items) => {
            let mut rendered: Vec<String> = items
                .iter()
                .map(|item| {
                    let mut buf = String::new();
                    write_value(&mut buf, item, algorithm, false);
                    buf
                })
                .collect();
            if algorithm == Algorithm::UnorderedSets && !ordered {
                rendered.sort_by(|a, b| utf16_cmp(a, b));
            }
            out.push('[');
            out.push_str(&rendered.join(","));
            out.push(']');
        }
        JsonValue::Object(map) => {
            let mut entries: Vec<(&String, &JsonValue)> = map.iter().collect();
            entries.sort_by(|a, b| utf16_cmp(a.0, b.0));

            out.push('{');
            for (i, (key, value)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_string(out, key);
                out.push(':');
                write_value(out, value, algorithm, key == jsonld::LIST);
            }
            out.push('}');
        }
    }
}

fn utf16_cmp(a: &str, b: &str) -> Ordering {
    a.encode_utf16().cmp(b.encode_utf16())
}

fn number_text(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        i.to_string()
    } else if let Some(u) = n.as_u64() {
        u.to_string()
    } else if let Some(f) = n.as_f64() {
        float_text(f)
    } else {
        n.to_string()
    }
}

fn float_text(f: f64) -> String {
    if f == 0.0 {
        return "0".to_string();
    }
    if f.fract() == 0.0 && f.abs() < 1e15 {
        return (f as i64).to_string();
    }

    let abs = f.abs();
    if abs >= 1e21 || abs < 1e-6 {
        let formatted = format!("{:e}", f);
        return match formatted.split_once('e') {
            Some((mantissa, exponent)) => {
                let mantissa = trim_fraction(mantissa);
                if exponent.starts_with('-') {
                    format!("{}e{}", mantissa, exponent)
                } else {
                    format!("{}e+{}", mantissa, exponent)
                }
            }
            None => formatted,
        };
    }

    let formatted = f.to_string();
    if formatted.contains('.') {
        trim_fraction(&formatted).to_string()
    } else {
        formatted
    }
}

/// "4.50" -> "4.5", "5.0" -> "5"
fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

fn write_string(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            c if c < '\u{0020}' => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}
