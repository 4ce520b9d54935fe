use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PhzError, Result};

/// Slash-delimited dataset identifier, `group/subgroup/name`.
///
/// Ordering and equality are componentwise over the segments.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QualifiedName {
    segments: Vec<String>,
}

impl QualifiedName {
    pub fn new<I, S>(segments: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(PhzError::parse("qualified name has no segments"));
        }
        if let Some(bad) = segments
            .iter()
            .find(|s| s.is_empty() || s.contains('/') || s.trim() != s.as_str())
        {
            return Err(PhzError::parse(format!("invalid qualified name segment '{bad}'")));
        }
        Ok(Self { segments })
    }

    pub fn parse(name: &str) -> Result<Self> {
        Self::new(name.split('/'))
    }

    /// Enclosing groups, outermost first.
    pub fn groups(&self) -> &[String] {
        self.segments.split_last().map_or(&[], |(_, groups)| groups)
    }

    pub fn dataset_name(&self) -> &str {
        self.segments.last().map_or("", String::as_str)
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn qualified_name(&self) -> String {
        self.segments.join("/")
    }

    /// `true` for the empty (root) group and for any enclosing group path.
    pub fn belongs_in_group(&self, group: &str) -> bool {
        let group = group.trim_matches('/');
        if group.is_empty() {
            return true;
        }
        let parts: Vec<&str> = group.split('/').collect();
        parts.len() < self.segments.len()
            && parts.iter().zip(&self.segments).all(|(g, s)| *g == s)
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified_name())
    }
}

impl FromStr for QualifiedName {
    type Err = PhzError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for QualifiedName {
    type Error = PhzError;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<QualifiedName> for String {
    fn from(name: QualifiedName) -> Self {
        name.qualified_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_groups_and_name() {
        let name = QualifiedName::parse("CWW/Ell/El_B2004a").unwrap();
        assert_eq!(name.groups(), &["CWW".to_string(), "Ell".to_string()]);
        assert_eq!(name.dataset_name(), "El_B2004a");
        assert_eq!(name.to_string(), "CWW/Ell/El_B2004a");
    }

    #[test]
    fn rejects_empty_segments() {
        assert!(QualifiedName::parse("").is_err());
        assert!(QualifiedName::parse("a//b").is_err());
        assert!(QualifiedName::parse("a/b/").is_err());
    }

    #[test]
    fn ordering_is_componentwise() {
        let mut names: Vec<QualifiedName> = ["b/a", "a/z/y", "a/b", "a/z"]
            .iter()
            .map(|s| QualifiedName::parse(s).unwrap())
            .collect();
        names.sort();
        let sorted: Vec<String> = names.iter().map(ToString::to_string).collect();
        assert_eq!(sorted, vec!["a/b", "a/z", "a/z/y", "b/a"]);
    }

    #[test]
    fn group_membership() {
        let name = QualifiedName::parse("filters/SDSS/r").unwrap();
        assert!(name.belongs_in_group(""));
        assert!(name.belongs_in_group("filters"));
        assert!(name.belongs_in_group("filters/SDSS/"));
        assert!(!name.belongs_in_group("filters/SDSS/r"));
        assert!(!name.belongs_in_group("filt"));
    }
}
