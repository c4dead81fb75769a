//! DOMTokenList (classList)
//!
//! Space-separated token list backing `class` manipulation. The list is a
//! value: `Document` reads it from the `class` attribute and writes the
//! serialized form back.

/// DOMTokenList for managing space-separated tokens
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DOMTokenList {
    tokens: Vec<String>,
}

impl DOMTokenList {
    /// Create empty token list
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from space-separated string, dropping duplicates
    pub fn parse(s: &str) -> Self {
        let mut list = Self::new();
        for token in s.split_whitespace() {
            list.add(token);
        }
        list
    }

    /// Number of tokens
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Check if token exists
    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    /// Add a token; returns false if it was already present or empty
    pub fn add(&mut self, token: &str) -> bool {
        if token.is_empty() || self.contains(token) {
            return false;
        }
        self.tokens.push(token.to_string());
        true
    }

    /// Remove a token; returns whether it was present
    pub fn remove(&mut self, token: &str) -> bool {
        let before = self.tokens.len();
        self.tokens.retain(|t| t != token);
        before != self.tokens.len()
    }

    /// Toggle token, returns new state
    pub fn toggle(&mut self, token: &str, force: Option<bool>) -> bool {
        match force {
            Some(true) => {
                self.add(token);
                true
            }
            Some(false) => {
                self.remove(token);
                false
            }
            None => {
                if !self.remove(token) {
                    self.add(token);
                    true
                } else {
                    false
                }
            }
        }
    }

    /// First token satisfying a predicate
    pub fn find(&self, pred: impl Fn(&str) -> bool) -> Option<&str> {
        self.iter().find(|&t| pred(t))
    }

    /// Serialized value
    pub fn value(&self) -> String {
        self.tokens.join(" ")
    }

    /// Iterate over tokens
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(|s| s.as_str())
    }
}

impl std::fmt::Display for DOMTokenList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value())
    }
}
