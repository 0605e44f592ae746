//! Pronunciation score replies.
//!
//! The scoring service answers an uploaded take either with a JSON object or
//! with `label: value` text lines. Both are reduced to a [`ScoreReport`] of
//! three display strings.

use crate::sink::SinkReply;
use crate::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::OnceLock;

/// Shown when no overall score was reported.
pub const NO_SCORE: &str = "--";

/// Shown when no mispronunciations were reported.
pub const NO_MISPRONUNCIATIONS: &str = "None";

const OVERALL_KEYS: &[&str] = &["overallScore", "overall", "score"];

const HEAVY_KEYS: &[&str] = &[
    "heavyMispronunciation",
    "heavyMispronunciations",
    "mispronounced_words",
    "heavy",
];

const LIGHT_KEYS: &[&str] = &[
    "lightMispronunciation",
    "lightMispronunciations",
    "slight_mispronunciation",
    "slight_mispronunciations",
    "light",
];

const ENTRY_SEPARATOR: &str = " | ";

/// Display-ready pronunciation scores for one take.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub overall: String,
    pub heavy: String,
    pub light: String,
}

impl Default for ScoreReport {
    fn default() -> Self {
        Self {
            overall: NO_SCORE.to_string(),
            heavy: NO_MISPRONUNCIATIONS.to_string(),
            light: NO_MISPRONUNCIATIONS.to_string(),
        }
    }
}

impl ScoreReport {
    /// Parse a sink reply, decoding the body as JSON when the content type says so.
    pub fn from_reply(reply: &SinkReply) -> Result<Self> {
        if reply.is_json() {
            let value: Value = serde_json::from_str(&reply.body)?;
            Ok(Self::from_json(&value))
        } else {
            Ok(Self::from_text(&reply.body))
        }
    }

    /// Build a report from a decoded JSON reply.
    ///
    /// A JSON string is treated as a text reply. Anything other than an object
    /// or a string yields the defaults.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Object(map) => {
                let overall = extract(map, OVERALL_KEYS)
                    .map(format_value)
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| NO_SCORE.to_string());

                Self {
                    overall,
                    heavy: format_mispronunciations(extract(map, HEAVY_KEYS)),
                    light: format_mispronunciations(extract(map, LIGHT_KEYS)),
                }
            }
            Value::String(text) => Self::from_text(text),
            _ => Self::default(),
        }
    }

    /// Build a report from `label: value` lines.
    ///
    /// Labels are matched case-insensitively on `overall`, `heavy` and
    /// `light`. Lines without a colon are skipped.
    pub fn from_text(text: &str) -> Self {
        let mut report = Self::default();

        for line in text.lines() {
            let line = line.trim();
            let Some((label, value)) = line.split_once(':') else {
                continue;
            };
            let label = label.trim().to_lowercase();
            let value = value.trim();

            if label.contains("overall") {
                if !value.is_empty() {
                    report.overall = value.to_string();
                }
            } else if label.contains("heavy") {
                report.heavy = format_mispronunciation_text(value);
            } else if label.contains("light") {
                report.light = format_mispronunciation_text(value);
            }
        }

        report
    }
}

impl fmt::Display for ScoreReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Overall score: {}", self.overall)?;
        writeln!(f, "Heavy mispronunciations: {}", self.heavy)?;
        write!(f, "Light mispronunciations: {}", self.light)
    }
}

/// First non-null value among `keys`.
fn extract<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| map.get(*key))
        .find(|value| !value.is_null())
}

fn format_mispronunciations(value: Option<&Value>) -> String {
    let Some(value) = value else {
        return NO_MISPRONUNCIATIONS.to_string();
    };

    match value {
        Value::Null => NO_MISPRONUNCIATIONS.to_string(),
        Value::String(text) => format_mispronunciation_text(text),
        Value::Array(entries) if entries.is_empty() => NO_MISPRONUNCIATIONS.to_string(),
        Value::Array(entries) => entries
            .iter()
            .map(format_phoneme_entry)
            .collect::<Vec<_>>()
            .join(ENTRY_SEPARATOR),
        Value::Object(_) => format_phoneme_entry(value),
        other => {
            let formatted = format_value(other);
            if formatted.is_empty() {
                NO_MISPRONUNCIATIONS.to_string()
            } else {
                formatted
            }
        }
    }
}

fn phoneme_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"\{?\s*["']?([^"':\s}]+)["']?\s*:\s*([0-9.]+)\s*\}?"#)
            .expect("phoneme pattern is valid")
    })
}

/// Format a free-text list such as `[{'th': 42.4}, {'r': 67}]`.
///
/// Recognised `phoneme: score` pairs are rendered like JSON entries; text
/// without any pair is returned with brackets removed.
fn format_mispronunciation_text(text: &str) -> String {
    let cleaned: String = text.chars().filter(|c| !matches!(c, '[' | ']')).collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return NO_MISPRONUNCIATIONS.to_string();
    }

    let pairs: Vec<String> = phoneme_pattern()
        .captures_iter(cleaned)
        .map(|caps| format!("{}: {}", &caps[1], format_score_text(&caps[2])))
        .collect();

    if pairs.is_empty() {
        cleaned.to_string()
    } else {
        pairs.join(ENTRY_SEPARATOR)
    }
}

/// Render one list entry. Objects use their first key as the phoneme.
fn format_phoneme_entry(entry: &Value) -> String {
    match entry {
        Value::Object(map) => match map.iter().next() {
            Some((phoneme, score)) if !phoneme.is_empty() => {
                format!("{}: {}", phoneme, format_score(score))
            }
            _ => format_value(entry),
        },
        other => format_value(other),
    }
}

/// Render a score as `<rounded>/100`, or as-is when it is not numeric.
fn format_score(value: &Value) -> String {
    let numeric = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => return format_score_text(s),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Null => Some(0.0),
        _ => None,
    };

    match numeric {
        Some(n) => with_denominator(n),
        None => format_value(value),
    }
}

fn format_score_text(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return with_denominator(0.0);
    }
    match parse_decimal(trimmed) {
        Some(n) => with_denominator(n),
        None => text.to_string(),
    }
}

/// Decimal literal or a signed `Infinity`. Rejects `inf`, `nan` and other
/// spellings `f64::from_str` would accept.
fn parse_decimal(text: &str) -> Option<f64> {
    match text {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }
    if !text
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
    {
        return None;
    }
    text.parse::<f64>().ok()
}

fn with_denominator(score: f64) -> String {
    // Half rounds toward positive infinity
    let rounded = if score.is_finite() {
        (score + 0.5).floor()
    } else {
        score
    };
    format!("{}/100", format_number(rounded))
}

fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let text = if n > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Plain display form of any JSON value. Null renders as an empty string.
fn format_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() => format_number(f),
            _ => n.to_string(),
        },
        Value::Bool(b) => b.to_string(),
        Value::Array(items) => items
            .iter()
            .map(format_value)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => value.to_string(),
    }
}
