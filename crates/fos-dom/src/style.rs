//! Inline style declarations (`element.style`)
//!
//! Only property bookkeeping: values are stored verbatim, nothing is
//! parsed as CSS values.

/// Ordered `property: value` list mirrored into the `style` attribute
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleDeclaration {
    properties: Vec<(String, String)>,
}

impl StyleDeclaration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `style` attribute value. Malformed entries are skipped.
    pub fn parse(css: &str) -> Self {
        let mut decl = Self::new();
        for entry in css.split(';') {
            let Some((name, value)) = entry.split_once(':') else { continue };
            let (name, value) = (name.trim(), value.trim());
            if !name.is_empty() && !value.is_empty() {
                decl.set(name, value);
            }
        }
        decl
    }

    /// Set a property (names are case-insensitive)
    pub fn set(&mut self, name: &str, value: &str) {
        let name = name.trim().to_ascii_lowercase();
        match self.properties.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value.trim().to_string(),
            None => self.properties.push((name, value.trim().to_string())),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.properties.iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        let pos = self.properties.iter().position(|(n, _)| n.eq_ignore_ascii_case(name))?;
        Some(self.properties.remove(pos).1)
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Serialize back to attribute form
    pub fn css_text(&self) -> String {
        self.properties.iter()
            .map(|(n, v)| format!("{n}: {v};"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_serialize() {
        let mut decl = StyleDeclaration::parse("color: red;; opacity:1 ; bogus");
        assert_eq!(decl.get("opacity"), Some("1"));

        decl.set("Opacity", "0");
        decl.set("transition", "opacity 0.3s ease");
        assert_eq!(decl.css_text(), "color: red; opacity: 0; transition: opacity 0.3s ease;");
    }

    #[test]
    fn test_remove() {
        let mut decl = StyleDeclaration::parse("opacity: 0");
        assert_eq!(decl.remove("OPACITY"), Some("0".to_string()));
        assert!(decl.is_empty());
    }
}
