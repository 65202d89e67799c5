use dashmap::DashMap;
use regex::Regex;

/// Compiled `symbol.strip` patterns, keyed by their source text.
///
/// Shared across organize passes. Dropping an entry only costs a
/// recompilation. Patterns that fail to compile are remembered as such so the
/// warning is logged once.
#[derive(Debug, Default)]
pub struct PatternCache {
    patterns: DashMap<String, Option<Regex>>,
}

impl PatternCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_compile(&self, pattern: &str) -> Option<Regex> {
        if let Some(entry) = self.patterns.get(pattern) {
            return entry.value().clone();
        }
        let compiled = match Regex::new(pattern) {
            Ok(regex) => Some(regex),
            Err(err) => {
                tracing::warn!("Ignoring invalid symbol.strip pattern {:?}: {}", pattern, err);
                None
            }
        };
        self.patterns
            .entry(pattern.to_string())
            .or_insert(compiled)
            .value()
            .clone()
    }

    /// Removes every match of `pattern` from `text`. An unusable pattern
    /// leaves the text alone.
    pub fn strip(&self, pattern: &str, text: &str) -> String {
        match self.get_or_compile(pattern) {
            Some(regex) => regex.replace_all(text, "").into_owned(),
            None => text.to_string(),
        }
    }

    pub fn clear(&self) {
        self.patterns.clear();
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
