/*!
`Namespace` and `QualifiedName` — the `service:action[/tag]` identifier syntax shared by actions
and condition context keys.
*/

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::str::FromStr;

use crate::error::{unexpected_value_for_type, IamFormatError};
use crate::syntax::{
    CHAR_WILD, CHAR_WILD_ALL, NAMESPACE_NAME, NAMESPACE_SEPARATOR, QUALIFIED_NAME_NAME,
    QUALIFIED_TAG_SEPARATOR,
};

// ------------------------------------------------------------------------------------------------
// Public Types
// ------------------------------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Namespace(String);

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QualifiedName(String);

// ------------------------------------------------------------------------------------------------
// Implementations
// ------------------------------------------------------------------------------------------------

lazy_static! {
    static ref NAMESPACE_SYNTAX: Regex = Regex::new(r"^([a-zA-Z][a-zA-Z0-9\-]*)$").unwrap();

    static ref QNAME_SYNTAX: Regex = Regex::new(
        r"^([a-zA-Z][a-zA-Z0-9\-]*):([a-zA-Z?*][a-zA-Z0-9\-?*]*)(/([a-zA-Z?*][a-zA-Z0-9\-?*]*)?)?$")
        .unwrap();
}

impl Display for Namespace {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Namespace> for String {
    fn from(v: Namespace) -> Self {
        v.0
    }
}

impl Deref for Namespace {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromStr for Namespace {
    type Err = IamFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if Self::is_valid(s) {
            Ok(Self(s.to_string()))
        } else {
            unexpected_value_for_type(NAMESPACE_NAME, s).into()
        }
    }
}

impl Namespace {
    pub fn new_unchecked<S>(s: S) -> Self
    where
        S: Into<String>,
    {
        Self(s.into())
    }

    pub fn is_valid(s: &str) -> bool {
        NAMESPACE_SYNTAX.is_match(s)
    }

    pub fn to_qualified_name<S>(&self, name: S) -> Result<QualifiedName, IamFormatError>
    where
        S: Into<String>,
    {
        QualifiedName::new(self.to_string(), name)
    }
}

// ------------------------------------------------------------------------------------------------

impl Display for QualifiedName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<QualifiedName> for String {
    fn from(v: QualifiedName) -> Self {
        v.0
    }
}

impl Deref for QualifiedName {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromStr for QualifiedName {
    type Err = IamFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if Self::is_valid(s) {
            Ok(Self(s.to_string()))
        } else {
            unexpected_value_for_type(QUALIFIED_NAME_NAME, s).into()
        }
    }
}

impl QualifiedName {
    pub fn new_unchecked<S>(s: S) -> Self
    where
        S: Into<String>,
    {
        Self(s.into())
    }

    pub fn new<S1, S2>(namespace: S1, name: S2) -> Result<Self, IamFormatError>
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        Self::from_str(&format!(
            "{}{}{}",
            namespace.into(),
            NAMESPACE_SEPARATOR,
            name.into()
        ))
    }

    pub fn new_tagged<S1, S2, S3>(
        namespace: S1,
        name: S2,
        tag_name: S3,
    ) -> Result<Self, IamFormatError>
    where
        S1: Into<String>,
        S2: Into<String>,
        S3: Into<String>,
    {
        let name = name.into();
        let append_slash = !name.ends_with(QUALIFIED_TAG_SEPARATOR);
        Self::from_str(&format!(
            "{}{}{}{}{}",
            namespace.into(),
            NAMESPACE_SEPARATOR,
            name,
            if append_slash {
                QUALIFIED_TAG_SEPARATOR.to_string()
            } else {
                String::new()
            },
            tag_name.into()
        ))
    }

    pub fn namespace(&self) -> Namespace {
        let (name, _, _) = self.split();
        Namespace::new_unchecked(name)
    }

    pub fn name(&self) -> &str {
        let (_, name, _) = self.split();
        name
    }

    pub fn tag(&self) -> Option<&str> {
        let (_, _, tag) = self.split();
        tag
    }

    pub fn has_wildcard(&self) -> bool {
        self.0.chars().any(|c| c == CHAR_WILD || c == CHAR_WILD_ALL)
    }

    pub fn is_valid(s: &str) -> bool {
        QNAME_SYNTAX.is_match(s)
    }

    fn split(&self) -> (&str, &str, Option<&str>) {
        let groups = QNAME_SYNTAX.captures(&self.0).unwrap();
        (
            groups.get(1).unwrap().as_str(),
            groups.get(2).unwrap().as_str(),
            groups.get(4).map(|s| s.as_str()),
        )
    }
}

// ------------------------------------------------------------------------------------------------
// Unit Tests
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualified_name_split() {
        let qn = QualifiedName::new("s3", "GetObject").unwrap();
        assert_eq!(qn.namespace().to_string(), "s3");
        assert_eq!(qn.name(), "GetObject");
        assert_eq!(qn.tag(), None);
    }

    #[test]
    fn test_qualified_name_tagged() {
        let qn = QualifiedName::new_tagged("aws", "RequestTag", "Project").unwrap();
        assert_eq!(qn.namespace().to_string(), "aws");
        assert_eq!(qn.name(), "RequestTag");
        assert_eq!(qn.tag(), Some("Project"));
    }

    #[test]
    fn test_qualified_name_wildcard() {
        let qn = QualifiedName::new("s3", "Get*").unwrap();
        assert!(qn.has_wildcard());
        let qn = QualifiedName::new("s3", "GetObject").unwrap();
        assert!(!qn.has_wildcard());
    }

    #[test]
    fn test_qualified_name_invalid() {
        assert!(QualifiedName::from_str("not-qualified").is_err());
    }
}
