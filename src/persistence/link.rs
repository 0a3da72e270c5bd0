//! Shareable link encoding
//!
//! A scenario is serialized to compact JSON, then the JSON punctuation that
//! URL encoding would mangle is swapped for single uppercase letters. Every
//! other character in the JSON is lowercase, a digit, or `-`/`+`, so the
//! substitution is reversible. Anything else is rejected on both sides.

use crate::error::ScenarioError;
use crate::sim::Vector;

use super::scenario::Scenario;

/// Query parameter carrying the encoded scenario
pub const QUERY_PARAM: &str = "sim";

const SUBSTITUTIONS: [(char, char); 8] = [
    ('"', 'Q'),
    ('{', 'O'),
    ('}', 'C'),
    ('[', 'L'),
    (']', 'R'),
    (',', 'K'),
    ('.', 'P'),
    (':', 'D'),
];

#[inline]
fn is_plain(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '+'
}

fn pack(c: char) -> Result<char, ScenarioError> {
    if let Some(&(_, letter)) = SUBSTITUTIONS.iter().find(|(raw, _)| *raw == c) {
        return Ok(letter);
    }
    if is_plain(c) {
        Ok(c)
    } else {
        Err(ScenarioError::UnexpectedChar(c))
    }
}

fn unpack(c: char) -> Result<char, ScenarioError> {
    if let Some(&(raw, _)) = SUBSTITUTIONS.iter().find(|(_, letter)| *letter == c) {
        return Ok(raw);
    }
    if is_plain(c) {
        Ok(c)
    } else {
        Err(ScenarioError::UnexpectedChar(c))
    }
}

/// Scenario to link-safe code
pub fn encode<V: Vector>(scenario: &Scenario<V>) -> Result<String, ScenarioError> {
    // serde_json writes NaN/inf as null, which would not decode back
    if !scenario.is_finite() {
        return Err(ScenarioError::NonFinite);
    }
    let json = serde_json::to_string(scenario)?;
    json.chars().map(pack).collect()
}

/// Link-safe code back to a scenario
pub fn decode<V: Vector>(code: &str) -> Result<Scenario<V>, ScenarioError> {
    let code = code.trim();
    if code.is_empty() {
        return Err(ScenarioError::Empty);
    }
    let json: String = code.chars().map(unpack).collect::<Result<_, _>>()?;
    let scenario: Scenario<V> = serde_json::from_str(&json)?;
    if !scenario.is_finite() {
        return Err(ScenarioError::NonFinite);
    }
    Ok(scenario)
}

/// `base` with the encoded scenario appended as a query parameter
pub fn share_url<V: Vector>(base: &str, scenario: &Scenario<V>) -> Result<String, ScenarioError> {
    let code = encode(scenario)?;
    let separator = if base.contains('?') { '&' } else { '?' };
    Ok(format!("{base}{separator}{QUERY_PARAM}={code}"))
}

/// Encoded scenario from a query string (`?a=1&sim=...` or `a=1&sim=...`)
pub fn code_from_query(query: &str) -> Option<&str> {
    query
        .trim_start_matches('?')
        .split('&')
        .find_map(|pair| pair.strip_prefix(QUERY_PARAM)?.strip_prefix('='))
        .filter(|code| !code.is_empty())
}
