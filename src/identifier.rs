//! Names of things in the IR: dialects, ops, types, parameters, blocks.

use std::{fmt::Display, ops::Deref};

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::{location::Location, result::Error, verify_error};

static IDENTIFIER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_$.]*$").expect("Bad identifier regex"));

/// A string matching `[a-zA-Z_][a-zA-Z0-9_$.]*`.
/// The only way to get one is through [TryFrom], which checks this.
#[derive(Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct Identifier(String);

#[derive(Debug, Error)]
#[error("{0:?} is not an identifier")]
pub struct MalformedIdentifierErr(String);

impl TryFrom<String> for Identifier {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Error> {
        match IDENTIFIER_RE.is_match(&value) {
            true => Ok(Identifier(value)),
            false => Err(verify_error!(Location::Unknown, MalformedIdentifierErr(value))),
        }
    }
}

impl TryFrom<&str> for Identifier {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Error> {
        Identifier::try_from(value.to_string())
    }
}

impl From<Identifier> for String {
    fn from(value: Identifier) -> Self {
        value.0
    }
}

impl Deref for Identifier {
    type Target = String;

    fn deref(&self) -> &String {
        &self.0
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

crate::impl_printable_for_display!(Identifier);

#[cfg(test)]
mod tests {
    use super::Identifier;

    #[test]
    fn identifier_shapes() {
        assert!(Identifier::try_from("WIDTH").is_ok());
        assert!(Identifier::try_from("_tmp0").is_ok());
        assert!(Identifier::try_from("hw.param.value").is_ok());
        assert!(Identifier::try_from("0abc").is_err());
        assert!(Identifier::try_from("").is_err());

        let err = Identifier::try_from("a b").unwrap_err();
        assert_eq!(err.err.to_string(), r#""a b" is not an identifier"#);
    }
}
