//! `Cache-Control` directive sets
//!
//! A [`DirectiveSet`] holds boolean tokens (`public`, `no-cache`) and value
//! directives (`max-age=60`) in insertion order. Names are normalized when
//! inserted, so `must_revalidate` and `must-revalidate` are the same directive.

use crate::error::Error;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Value directive whose value is always rendered as an integer
const INTEGER_DIRECTIVE: &str = "max-age";

/// Tokens that cannot appear together
const EXCLUSIVE_TOKENS: [[&str; 2]; 1] = [["public", "private"]];

/// Value of a value directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectiveValue {
    /// `true` turns the entry into a bare token, `false` drops it
    Flag(bool),
    Number(i64),
    Text(String),
}

impl DirectiveValue {
    /// Integer view used for `max-age`
    fn as_integer(&self) -> i64 {
        match self {
            Self::Number(n) => *n,
            Self::Text(s) => lenient_integer(s),
            Self::Flag(b) => i64::from(*b),
        }
    }
}

impl fmt::Display for DirectiveValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for DirectiveValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<i64> for DirectiveValue {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<u64> for DirectiveValue {
    fn from(value: u64) -> Self {
        Self::Number(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<u32> for DirectiveValue {
    fn from(value: u32) -> Self {
        Self::Number(i64::from(value))
    }
}

impl From<&str> for DirectiveValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for DirectiveValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Ordered set of `Cache-Control` directives
///
/// # Examples
/// ```
/// use freshd::http::directives::DirectiveSet;
///
/// let set = DirectiveSet::new()
///     .token("public")
///     .token("must_revalidate")
///     .value("max_age", 60_i64);
/// assert_eq!(set.render().as_deref(), Some("public, must-revalidate, max-age=60"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct DirectiveSet {
    tokens: Vec<String>,
    values: Vec<(String, DirectiveValue)>,
}

impl DirectiveSet {
    pub const fn new() -> Self {
        Self {
            tokens: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Add a boolean token (builder form)
    #[must_use]
    pub fn token(mut self, name: &str) -> Self {
        self.insert_token(name);
        self
    }

    /// Add or replace a value directive (builder form)
    #[must_use]
    pub fn value(mut self, name: &str, value: impl Into<DirectiveValue>) -> Self {
        self.insert_value(name, value);
        self
    }

    pub fn insert_token(&mut self, name: &str) {
        let name = normalize(name);
        if !self.tokens.contains(&name) {
            self.tokens.push(name);
        }
    }

    /// Insert a value directive, overwriting an existing one in place
    pub fn insert_value(&mut self, name: &str, value: impl Into<DirectiveValue>) {
        let name = normalize(name);
        let value = value.into();
        match self.values.iter_mut().find(|(k, _)| *k == name) {
            Some(entry) => entry.1 = value,
            None => self.values.push((name, value)),
        }
    }

    pub fn remove_token(&mut self, name: &str) {
        let name = normalize(name);
        self.tokens.retain(|t| *t != name);
    }

    pub fn get(&self, name: &str) -> Option<&DirectiveValue> {
        let name = normalize(name);
        self.values.iter().find(|(k, _)| *k == name).map(|(_, v)| v)
    }

    pub fn has_token(&self, name: &str) -> bool {
        let name = normalize(name);
        self.tokens.contains(&name)
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty() && self.values.is_empty()
    }

    /// Whether `name` would render as a bare token
    fn is_set(&self, name: &str) -> bool {
        self.has_token(name) || self.get(name) == Some(&DirectiveValue::Flag(true))
    }

    /// Layer these directives over `defaults`
    ///
    /// Tokens are the union (defaults first). Values here replace default values
    /// of the same name, and a `false` flag here also suppresses a default token.
    #[must_use]
    pub fn layered_over(&self, defaults: &Self) -> Self {
        let mut merged = defaults.clone();
        for token in &self.tokens {
            merged.insert_token(token);
        }
        for (name, value) in &self.values {
            if *value == DirectiveValue::Flag(false) {
                merged.remove_token(name);
            }
            merged.insert_value(name, value.clone());
        }
        merged
    }

    /// Add directives from `other` without disturbing existing ones
    ///
    /// Existing tokens and values win. A new token is also skipped when it is
    /// mutually exclusive with one already set (`public` / `private`).
    pub fn supplement(&mut self, other: &Self) {
        for token in &other.tokens {
            if self.get(token).is_none() && !self.conflicts_with(token) {
                self.insert_token(token);
            }
        }
        for (name, value) in &other.values {
            if self.get(name).is_some() || self.has_token(name) {
                continue;
            }
            if *value == DirectiveValue::Flag(true) && self.conflicts_with(name) {
                continue;
            }
            self.insert_value(name, value.clone());
        }
    }

    fn conflicts_with(&self, token: &str) -> bool {
        EXCLUSIVE_TOKENS.iter().any(|group| {
            group.contains(&token)
                && group
                    .iter()
                    .any(|other| *other != token && self.is_set(other))
        })
    }

    /// Render the `Cache-Control` header value
    ///
    /// Returns `None` when nothing would be emitted.
    pub fn render(&self) -> Option<String> {
        let mut tokens: Vec<String> = self.tokens.clone();
        let mut pairs = Vec::new();

        for (name, value) in &self.values {
            match value {
                DirectiveValue::Flag(false) => {}
                DirectiveValue::Flag(true) => {
                    if !tokens.contains(name) {
                        tokens.push(name.clone());
                    }
                }
                _ if name == INTEGER_DIRECTIVE => {
                    pairs.push(format!("{name}={}", value.as_integer()));
                }
                _ => pairs.push(format!("{name}={value}")),
            }
        }

        tokens.extend(pairs);
        if tokens.is_empty() {
            None
        } else {
            Some(tokens.join(", "))
        }
    }
}

impl fmt::Display for DirectiveSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.render().as_deref().unwrap_or_default())
    }
}

impl FromStr for DirectiveSet {
    type Err = Error;

    /// Parse the wire form, e.g. `public, max-age=60`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut set = Self::new();
        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            match part.split_once('=') {
                Some((name, value)) => {
                    let name = name.trim();
                    if !is_valid_name(name) {
                        return Err(Error::InvalidDirective(part.to_string()));
                    }
                    set.insert_value(name, parse_value(value.trim().trim_matches('"')));
                }
                None if is_valid_name(part) => set.insert_token(part),
                None => return Err(Error::InvalidDirective(part.to_string())),
            }
        }
        Ok(set)
    }
}

impl TryFrom<String> for DirectiveSet {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

fn normalize(name: &str) -> String {
    name.trim().replace('_', "-").to_ascii_lowercase()
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn parse_value(value: &str) -> DirectiveValue {
    match value {
        "true" => DirectiveValue::Flag(true),
        "false" => DirectiveValue::Flag(false),
        _ => value
            .parse::<i64>()
            .map_or_else(|_| DirectiveValue::Text(value.to_string()), DirectiveValue::Number),
    }
}

/// Leading-integer parse: optional sign then digits, anything else yields 0
fn lenient_integer(s: &str) -> i64 {
    let s = s.trim_start();
    let (sign, rest) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    digits.parse::<i64>().map_or(0, |n| sign * n)
}
