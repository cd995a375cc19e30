//! The closed set of collection types.

use std::fmt;
use std::str::FromStr;

use crate::error::FactoryError;

/// Kind of remote collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeName {
    /// String-to-string dictionary.
    RDict,
    /// Ordered list of strings.
    RList,
    /// Set of strings.
    RSet,
}

impl TypeName {
    /// Every supported type.
    pub const ALL: [TypeName; 3] = [TypeName::RDict, TypeName::RList, TypeName::RSet];

    /// Wire name of the type.
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeName::RDict => "RDict",
            TypeName::RList => "RList",
            TypeName::RSet => "RSet",
        }
    }

    /// Identifier used when the caller does not supply one.
    pub fn default_identifier(&self) -> &'static str {
        match self {
            TypeName::RDict => "default_rdict",
            TypeName::RList => "default_rlist",
            TypeName::RSet => "default_rset",
        }
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TypeName {
    type Err = FactoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TypeName::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| FactoryError::InvalidType(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wire_names() {
        assert_eq!("RDict".parse::<TypeName>().unwrap(), TypeName::RDict);
        assert_eq!("RList".parse::<TypeName>().unwrap(), TypeName::RList);
        assert_eq!("RSet".parse::<TypeName>().unwrap(), TypeName::RSet);
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert!(matches!(
            "rlist".parse::<TypeName>(),
            Err(FactoryError::InvalidType(name)) if name == "rlist"
        ));
        assert!("RQueue".parse::<TypeName>().is_err());
    }

    #[test]
    fn test_default_identifiers() {
        assert_eq!(TypeName::RDict.default_identifier(), "default_rdict");
        assert_eq!(TypeName::RList.default_identifier(), "default_rlist");
        assert_eq!(TypeName::RSet.default_identifier(), "default_rset");
    }
}
