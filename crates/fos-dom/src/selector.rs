//! Selector matching
//!
//! querySelector support for selector lists of compound selectors:
//! `tag`, `*`, `#id`, `.class`, `[attr]`, `[attr=v]`, `[attr*=v]`,
//! `[attr^=v]`, `[attr$=v]`. Combinators and pseudo-classes are rejected.

use crate::{DomError, DomResult, ElementData};

/// Attribute comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrOperator {
    /// `[attr]`
    Exists,
    /// `[attr=v]`
    Equals,
    /// `[attr*=v]`
    Contains,
    /// `[attr^=v]`
    Prefix,
    /// `[attr$=v]`
    Suffix,
}

/// Attribute condition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrMatch {
    pub name: String,
    pub op: AttrOperator,
    pub value: String,
}

impl AttrMatch {
    fn matches(&self, elem: &ElementData) -> bool {
        let Some(actual) = elem.get_attr(&self.name) else { return false };
        match self.op {
            AttrOperator::Exists => true,
            AttrOperator::Equals => actual == self.value,
            // Empty needles never match for substring operators
            AttrOperator::Contains => !self.value.is_empty() && actual.contains(&self.value),
            AttrOperator::Prefix => !self.value.is_empty() && actual.starts_with(&self.value),
            AttrOperator::Suffix => !self.value.is_empty() && actual.ends_with(&self.value),
        }
    }
}

/// Compound selector (all parts must match one element)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompoundSelector {
    /// Tag name; `None` for `*` or no tag
    pub tag: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attrs: Vec<AttrMatch>,
}

impl CompoundSelector {
    pub fn matches(&self, elem: &ElementData) -> bool {
        if let Some(tag) = &self.tag {
            if !elem.is(tag) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if elem.id() != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|c| elem.classes().any(|ec| ec == c)) {
            return false;
        }
        self.attrs.iter().all(|a| a.matches(elem))
    }
}

/// Parsed selector list (`a, b, c`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    pub alternatives: Vec<CompoundSelector>,
}

impl Selector {
    /// Parse a selector list
    pub fn parse(source: &str) -> DomResult<Self> {
        let invalid = |reason: &str| DomError::InvalidSelector {
            selector: source.to_string(),
            reason: reason.to_string(),
        };

        let mut alternatives = Vec::new();
        for part in source.split(',') {
            let part = part.trim();
            if part.is_empty() {
                return Err(invalid("empty selector"));
            }
            alternatives.push(parse_compound(part).map_err(|reason| invalid(&reason))?);
        }
        Ok(Self { alternatives })
    }

    /// Check whether an element matches any alternative
    pub fn matches(&self, elem: &ElementData) -> bool {
        self.alternatives.iter().any(|c| c.matches(elem))
    }
}

impl std::str::FromStr for Selector {
    type Err = DomError;

    fn from_str(s: &str) -> DomResult<Self> {
        Self::parse(s)
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}

struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn ident(&mut self) -> Result<&'a str, String> {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_char) {
            self.bump();
        }
        if start == self.pos {
            Err(format!("expected identifier at offset {start}"))
        } else {
            Ok(&self.src[start..self.pos])
        }
    }

    fn value(&mut self) -> Result<String, String> {
        match self.peek() {
            Some(q @ ('"' | '\'')) => {
                self.bump();
                let start = self.pos;
                while let Some(c) = self.bump() {
                    if c == q {
                        return Ok(self.src[start..self.pos - q.len_utf8()].to_string());
                    }
                }
                Err("unterminated string".to_string())
            }
            _ => self.ident().map(str::to_string),
        }
    }
}

fn parse_compound(src: &str) -> Result<CompoundSelector, String> {
    let mut cursor = Cursor { src, pos: 0 };
    let mut compound = CompoundSelector::default();

    if cursor.eat('*') {
        // universal: no tag constraint
    } else if cursor.peek().is_some_and(is_ident_char) {
        compound.tag = Some(cursor.ident()?.to_ascii_lowercase());
    }

    while let Some(c) = cursor.bump() {
        match c {
            '#' => compound.id = Some(cursor.ident()?.to_string()),
            '.' => compound.classes.push(cursor.ident()?.to_string()),
            '[' => compound.attrs.push(parse_attr(&mut cursor)?),
            c if c.is_whitespace() || c == '>' || c == '+' || c == '~' => {
                return Err("combinators are not supported".to_string());
            }
            ':' => return Err("pseudo-classes are not supported".to_string()),
            other => return Err(format!("unexpected character `{other}`")),
        }
    }
    Ok(compound)
}

fn parse_attr(cursor: &mut Cursor<'_>) -> Result<AttrMatch, String> {
    cursor.skip_ws();
    let name = cursor.ident()?.to_ascii_lowercase();
    cursor.skip_ws();

    let op = if cursor.eat(']') {
        return Ok(AttrMatch { name, op: AttrOperator::Exists, value: String::new() });
    } else if cursor.eat('=') {
        AttrOperator::Equals
    } else {
        let op = match cursor.bump() {
            Some('*') => AttrOperator::Contains,
            Some('^') => AttrOperator::Prefix,
            Some('$') => AttrOperator::Suffix,
            _ => return Err("unknown attribute operator".to_string()),
        };
        if !cursor.eat('=') {
            return Err("expected `=` in attribute selector".to_string());
        }
        op
    };

    cursor.skip_ws();
    let value = cursor.value()?;
    cursor.skip_ws();
    if !cursor.eat(']') {
        return Err("expected `]`".to_string());
    }
    Ok(AttrMatch { name, op, value })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn elem(tag: &str, attrs: &[(&str, &str)]) -> ElementData {
        let mut e = ElementData::new(tag);
        for (k, v) in attrs {
            e.set_attr(k, v);
        }
        e
    }

    #[test]
    fn test_parse_list() {
        let sel = Selector::parse("button, [href], input").unwrap();
        assert_eq!(sel.alternatives.len(), 3);
        assert_eq!(sel.alternatives[1].attrs[0].op, AttrOperator::Exists);
    }

    #[test]
    fn test_class_contains() {
        let sel: Selector = "[class*=\"bi-\"]".parse().unwrap();
        assert!(sel.matches(&elem("i", &[("class", "bi bi-house")])));
        assert!(!sel.matches(&elem("i", &[("class", "fa fa-house")])));
        assert!(!sel.matches(&elem("i", &[])));
    }

    #[test]
    fn test_compound() {
        let sel = Selector::parse("div.alert.alert-info#n1[role='status']").unwrap();
        let matching = elem("div", &[("class", "alert alert-info"), ("id", "n1"), ("role", "status")]);
        assert!(sel.matches(&matching));

        let wrong_role = elem("div", &[("class", "alert alert-info"), ("id", "n1"), ("role", "alert")]);
        assert!(!sel.matches(&wrong_role));
    }

    #[test]
    fn test_tag_case_insensitive() {
        let sel = Selector::parse("IMG").unwrap();
        assert!(sel.matches(&elem("img", &[])));
        assert!(Selector::parse("*").unwrap().matches(&elem("span", &[])));
    }

    #[test]
    fn test_rejects_unsupported() {
        assert!(Selector::parse("div p").is_err());
        assert!(Selector::parse("input:invalid").is_err());
        assert!(Selector::parse("a,").is_err());
        assert!(Selector::parse("[x=\"open").is_err());
    }
}
