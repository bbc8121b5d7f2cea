//! Error management.

use super::parser::Rule;
use derive_more::Display;

#[derive(Debug, Display, PartialEq)]
pub enum Error {
    #[display(fmt = "{}", _0)]
    Syntax(pest::error::Error<Rule>),
    #[display(fmt = "no fields specified")]
    NoFieldsSpecified(String),
    #[display(fmt = "missing relationship parameter for {}", _0)]
    MissingRelationship(String),
    #[display(fmt = "duplicate {} please use as to alias", _0)]
    DuplicateAlias(String),
}

impl std::error::Error for Error {}

impl From<pest::error::Error<Rule>> for Error {
    fn from(e: pest::error::Error<Rule>) -> Self {
        Error::Syntax(e)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            Error::NoFieldsSpecified("root".into()).to_string(),
            "no fields specified"
        );
        assert_eq!(
            Error::MissingRelationship("child".into()).to_string(),
            "missing relationship parameter for child"
        );
        assert_eq!(
            Error::DuplicateAlias("root".into()).to_string(),
            "duplicate root please use as to alias"
        );
    }
}
