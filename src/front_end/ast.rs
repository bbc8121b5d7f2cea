use std::fmt;

/// The value of a node parameter.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ValueSpec {
    /// `<name>`, bound at execution time.
    BoundParameter(String),
    /// Bare digits, kept as written.
    LiteralNumber(String),
    /// Double-quoted text, without the quotes.
    LiteralString(String),
}

impl ValueSpec {
    /// The raw text used when the value is spliced into a relationship pattern.
    pub fn raw(&self) -> String {
        match self {
            ValueSpec::BoundParameter(name) => format!("{{{}}}", name),
            ValueSpec::LiteralNumber(raw) | ValueSpec::LiteralString(raw) => raw.clone(),
        }
    }
}

impl fmt::Display for ValueSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueSpec::BoundParameter(name) => write!(f, "{{{}}}", name),
            ValueSpec::LiteralNumber(raw) => write!(f, "{}", raw),
            ValueSpec::LiteralString(raw) => write!(f, "'{}'", raw),
        }
    }
}

/// One entity pattern of the request tree.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct QueryNode {
    type_name: String,
    alias: String,
    parameters: Vec<(String, ValueSpec)>,
    relationship: Option<String>,
    include_labels: bool,
    include_relationships: bool,
    include_graph: bool,
    fields: Vec<String>,
    children: Vec<QueryNode>,
    parent: Option<String>,
}

impl QueryNode {
    pub fn new(type_name: &str, alias: Option<&str>) -> Self {
        Self {
            type_name: type_name.to_owned(),
            alias: alias.unwrap_or(type_name).to_owned(),
            ..Self::default()
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Property filters, without the `relationship` parameter of a non-root node.
    pub fn parameters(&self) -> &[(String, ValueSpec)] {
        &self.parameters
    }

    /// The raw edge fragment to the parent, `None` on the root.
    pub fn relationship(&self) -> Option<&str> {
        self.relationship.as_deref()
    }

    pub fn include_labels(&self) -> bool {
        self.include_labels
    }

    pub fn include_relationships(&self) -> bool {
        self.include_relationships
    }

    pub fn include_graph(&self) -> bool {
        self.include_graph
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn children(&self) -> &[QueryNode] {
        &self.children
    }

    /// Alias of the enclosing node.
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Iterates over the subtree in depth-first pre-order, with depths relative to `self`.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: vec![(self, 0)],
        }
    }

    /// Generated column holding the node id.
    pub fn id_column(&self) -> String {
        format!("__{}id", self.alias)
    }

    /// Generated variable bound to the edge to the parent.
    pub fn relationship_variable(&self) -> String {
        format!("__{}r", self.alias)
    }

    pub fn labels_column(&self) -> String {
        format!("__{}labels", self.alias)
    }

    pub fn graph_column(&self) -> String {
        format!("__{}graph", self.alias)
    }

    pub fn field_column(&self, field: &str) -> String {
        format!("{}.{}", self.alias, field)
    }
}

// builder methods used by the parser
impl QueryNode {
    pub(crate) fn set_parent(&mut self, parent: Option<&str>) {
        self.parent = parent.map(str::to_owned);
    }

    pub(crate) fn set_relationship(&mut self, relationship: String) {
        self.relationship = Some(relationship);
    }

    pub(crate) fn add_parameter(&mut self, key: String, value: ValueSpec) {
        self.parameters.push((key, value));
    }

    pub(crate) fn set_include_labels(&mut self) {
        self.include_labels = true;
    }

    pub(crate) fn set_include_relationships(&mut self) {
        self.include_relationships = true;
    }

    pub(crate) fn set_include_graph(&mut self) {
        self.include_graph = true;
    }

    pub(crate) fn add_field(&mut self, field: String) {
        self.fields.push(field);
    }

    pub(crate) fn add_child(&mut self, child: QueryNode) {
        self.children.push(child);
    }
}

pub struct Walk<'a> {
    stack: Vec<(&'a QueryNode, usize)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (&'a QueryNode, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (node, depth) = self.stack.pop()?;
        self.stack
            .extend(node.children.iter().rev().map(|child| (child, depth + 1)));
        Some((node, depth))
    }
}

impl fmt::Display for QueryNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (node, depth) in self.walk() {
            write!(f, "{:indent$}{}:{}", "", node.alias, node.type_name, indent = 2 * depth)?;
            if let Some(relationship) = &node.relationship {
                write!(f, " [{}]", relationship)?;
            }
            for (flag, name) in [
                (node.include_labels, "labels"),
                (node.include_relationships, "relationships"),
                (node.include_graph, "graph"),
            ]
            .iter()
            {
                if *flag {
                    write!(f, " +{}", name)?;
                }
            }
            writeln!(f, " ({})", node.fields.join(", "))?;
        }
        Ok(())
    }
}
