//! Error types for the overlay controller

use std::collections::BTreeSet;

use thiserror::Error;

/// Configuration errors raised by the visibility store and the controller
///
/// Every variant describes a mistake in the fixed overlay id set or in the
/// page markup. None of them is expected during normal user interaction.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum OverlayError {
    /// An operation referenced an overlay id that was never declared
    #[error("undefined overlay '{id}'{}", format_suggestions(.suggestions))]
    UndefinedOverlay { id: String, suggestions: Vec<String> },

    /// The same overlay id was declared twice
    #[error("overlay '{0}' is declared more than once")]
    DuplicateOverlay(String),

    /// An overlay id was declared as the empty string
    #[error("overlay ids must not be empty")]
    EmptyId,

    /// A trigger in the document points at an undeclared overlay
    #[error("trigger references undefined overlay '{id}'{}", format_suggestions(.suggestions))]
    DanglingTrigger { id: String, suggestions: Vec<String> },

    /// An element handed to the controller does not carry the trigger marker
    #[error("element is not a trigger (missing '{marker}' attribute)")]
    NotATrigger { marker: String },
}

impl OverlayError {
    /// Create an undefined overlay error with typo suggestions drawn from `declared`
    pub fn undefined<'a>(
        id: impl Into<String>,
        declared: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let id = id.into();
        let suggestions = find_similar(declared, &id, 2);
        Self::UndefinedOverlay { id, suggestions }
    }

    /// Create a dangling trigger error with typo suggestions drawn from `declared`
    pub fn dangling<'a>(id: impl Into<String>, declared: impl IntoIterator<Item = &'a str>) -> Self {
        let id = id.into();
        let suggestions = find_similar(declared, &id, 2);
        Self::DanglingTrigger { id, suggestions }
    }

    /// Get suggestions if available
    pub fn suggestions(&self) -> Option<&[String]> {
        match self {
            Self::UndefinedOverlay { suggestions, .. } => Some(suggestions),
            Self::DanglingTrigger { suggestions, .. } => Some(suggestions),
            _ => None,
        }
    }
}

/// Errors that can occur when loading configuration or scenario files
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    Overlay(#[from] OverlayError),
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(" (did you mean {}?)", suggestions.join(", "))
    }
}

/// Compute Levenshtein edit distance between two strings
fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let m = a_chars.len();
    let n = b_chars.len();

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    let mut prev: Vec<usize> = (0..=n).collect();
    let mut curr = vec![0usize; n + 1];

    for i in 1..=m {
        curr[0] = i;
        for j in 1..=n {
            let cost = usize::from(a_chars[i - 1] != b_chars[j - 1]);
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}

/// Find declared ids within a maximum edit distance, closest first
fn find_similar<'a>(
    declared: impl IntoIterator<Item = &'a str>,
    target: &str,
    max_distance: usize,
) -> Vec<String> {
    let unique: BTreeSet<&str> = declared.into_iter().collect();
    let mut candidates: Vec<(usize, &str)> = unique
        .into_iter()
        .filter_map(|name| {
            let dist = levenshtein_distance(name, target);
            (dist <= max_distance && dist > 0).then_some((dist, name))
        })
        .collect();

    candidates.sort();
    candidates
        .into_iter()
        .map(|(_, name)| name.to_string())
        .take(3)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein_same() {
        assert_eq!(levenshtein_distance("modal-time", "modal-time"), 0);
    }

    #[test]
    fn test_levenshtein_one_off() {
        assert_eq!(levenshtein_distance("modal-time", "modal-tme"), 1);
        assert_eq!(levenshtein_distance("modal-time", "modal-tima"), 1);
    }

    #[test]
    fn test_levenshtein_different() {
        assert_eq!(levenshtein_distance("cat", "dog"), 3);
        assert_eq!(levenshtein_distance("", "abc"), 3);
    }

    #[test]
    fn test_undefined_suggests_close_ids() {
        let err = OverlayError::undefined("modal-tme", ["modal-time", "modal-spirit"]);
        assert_eq!(err.suggestions(), Some(&["modal-time".to_string()][..]));
        assert_eq!(
            err.to_string(),
            "undefined overlay 'modal-tme' (did you mean modal-time?)"
        );
    }

    #[test]
    fn test_undefined_without_suggestions() {
        let err = OverlayError::undefined("nothing-alike", ["modal-time"]);
        assert_eq!(err.to_string(), "undefined overlay 'nothing-alike'");
    }

    #[test]
    fn test_dangling_trigger_display() {
        let err = OverlayError::dangling("modal-thrid", ["modal-third"]);
        assert!(err.to_string().contains("trigger references undefined overlay"));
        assert!(err.to_string().contains("modal-third"));
    }
}
