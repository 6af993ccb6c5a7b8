use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::KagamiError;

/// Canonical token sequence of a show title, used as its identity key.
///
/// Built by [`get_root`](crate::matching::get_root). Tokens are lower-case
/// and free of punctuation; a disambiguating year stays as the last token,
/// so `"V (2009)"` and `"V"` have different roots.
///
/// `Display` joins the tokens with spaces. That is also the stored
/// release-pattern form read back by [`ShowRoot::from_release_pattern`] and
/// `FromStr`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShowRoot(Vec<String>);

impl ShowRoot {
    pub(crate) fn from_tokens(tokens: Vec<String>) -> Self {
        Self(tokens)
    }

    /// Rebuilds a root from its stored, space-separated form.
    #[must_use]
    pub fn from_release_pattern(pattern: &str) -> Self {
        Self(
            pattern
                .split_whitespace()
                .map(str::to_lowercase)
                .collect(),
        )
    }

    #[must_use]
    pub fn tokens(&self) -> &[String] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The trailing year qualifier, if the root has one.
    #[must_use]
    pub fn year(&self) -> Option<u16> {
        let (last, rest) = self.0.split_last()?;
        if rest.is_empty() || last.len() != 4 || !last.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let year: u16 = last.parse().ok()?;
        (1900..=2099).contains(&year).then_some(year)
    }

    /// First character of every token, e.g. `"himym"`.
    #[must_use]
    pub fn initials(&self) -> String {
        self.0.iter().filter_map(|token| token.chars().next()).collect()
    }

    /// Returns `true` if `prefix`'s tokens open this root.
    #[must_use]
    pub fn starts_with(&self, prefix: &ShowRoot) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for ShowRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" "))
    }
}

impl FromStr for ShowRoot {
    type Err = KagamiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let root = Self::from_release_pattern(s);
        if root.is_empty() {
            return Err(KagamiError::EmptyInput);
        }
        Ok(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root(tokens: &[&str]) -> ShowRoot {
        ShowRoot::from_tokens(tokens.iter().map(|t| t.to_string()).collect())
    }

    #[test]
    fn release_pattern_roundtrip() {
        let house = root(&["house", "md"]);
        assert_eq!(house.to_string(), "house md");
        assert_eq!(ShowRoot::from_release_pattern("house md"), house);
        assert_eq!(ShowRoot::from_release_pattern("  House   MD "), house);
        assert_eq!("house md".parse::<ShowRoot>().unwrap(), house);
    }

    #[test]
    fn blank_pattern_is_an_error() {
        assert!(matches!(
            "   ".parse::<ShowRoot>(),
            Err(KagamiError::EmptyInput)
        ));
        assert!(ShowRoot::from_release_pattern("").is_empty());
    }

    #[test]
    fn year_qualifier() {
        assert_eq!(root(&["v", "2009"]).year(), Some(2009));
        assert_eq!(root(&["v"]).year(), None);
        assert_eq!(root(&["2012"]).year(), None);
        assert_eq!(root(&["area", "5150"]).year(), None);
        assert_eq!(root(&["top", "gear"]).year(), None);
    }

    #[test]
    fn initials_and_prefixes() {
        let himym = root(&["how", "i", "met", "your", "mother"]);
        assert_eq!(himym.initials(), "himym");
        assert!(himym.starts_with(&root(&["how", "i"])));
        assert!(!himym.starts_with(&root(&["i", "met"])));
    }

    #[test]
    fn show_root_serializes_as_token_list() {
        let v = root(&["v", "2009"]);
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, r#"["v","2009"]"#);
        let back: ShowRoot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v);
    }
}
