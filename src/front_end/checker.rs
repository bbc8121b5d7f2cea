use super::{
    ast::QueryNode,
    error::{Error, Result},
};
use std::collections::HashSet;

/// Aliases registered so far in one parse pass.
#[derive(Debug, Default)]
pub struct Aliases {
    seen: HashSet<String>,
}

impl Aliases {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the alias of `node`, failing if it is already taken anywhere in the tree.
    pub fn register(&mut self, node: &QueryNode) -> Result<()> {
        if self.seen.insert(node.alias().to_owned()) {
            Ok(())
        } else {
            Err(Error::DuplicateAlias(node.type_name().to_owned()))
        }
    }
}

pub fn check_relationship(node: &QueryNode) -> Result<()> {
    match node.relationship() {
        None if !node.is_root() => Err(Error::MissingRelationship(node.type_name().to_owned())),
        Some("") => Err(Error::MissingRelationship(node.type_name().to_owned())),
        _ => Ok(()),
    }
}

pub fn check_fields(node: &QueryNode) -> Result<()> {
    if node.fields().is_empty() && node.children().is_empty() {
        Err(Error::NoFieldsSpecified(node.type_name().to_owned()))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases() {
        let mut aliases = Aliases::new();
        assert_eq!(aliases.register(&QueryNode::new("root", None)), Ok(()));
        assert_eq!(
            aliases.register(&QueryNode::new("child", Some("c1"))),
            Ok(())
        );
        assert_eq!(
            aliases.register(&QueryNode::new("root", None)),
            Err(Error::DuplicateAlias("root".into()))
        );
        assert_eq!(
            aliases.register(&QueryNode::new("other", Some("c1"))),
            Err(Error::DuplicateAlias("other".into()))
        );
    }

    #[test]
    fn test_check_relationship() {
        let root = QueryNode::new("root", None);
        assert_eq!(check_relationship(&root), Ok(()));
        let mut child = QueryNode::new("child", None);
        child.set_parent(Some("root"));
        assert_eq!(
            check_relationship(&child),
            Err(Error::MissingRelationship("child".into()))
        );
        child.set_relationship(":child".into());
        assert_eq!(check_relationship(&child), Ok(()));
    }

    #[test]
    fn test_check_fields() {
        let mut node = QueryNode::new("root", None);
        assert_eq!(
            check_fields(&node),
            Err(Error::NoFieldsSpecified("root".into()))
        );
        node.add_field("name".into());
        assert_eq!(check_fields(&node), Ok(()));
    }
}
