//! Reconstructs nested entities from the flat rows of an executed query.

use crate::front_end::QueryNode;
use indexmap::IndexMap;
use log::debug;
use serde_json::{Map, Value};
use std::sync::Arc;

/// One result row, keyed by generated column name.
pub type Row = Map<String, Value>;

/// One reduced entity: its fields, the requested extras, and one array per child alias.
pub type Record = Map<String, Value>;

/// Entities of one scope (the roots, or one child alias under one parent), keyed by id.
type Scope = IndexMap<String, Entity>;

#[derive(Debug, Clone)]
pub struct Reducer {
    root: Arc<QueryNode>,
}

impl Reducer {
    pub fn new(root: Arc<QueryNode>) -> Self {
        Self { root }
    }

    pub fn tree(&self) -> &QueryNode {
        &self.root
    }

    /// Folds `rows` into root entities, in first-seen order.
    ///
    /// Rows without a root id are skipped.
    pub fn reduce(&self, rows: &[Row]) -> Vec<Record> {
        let mut roots = Scope::new();
        for (i, row) in rows.iter().enumerate() {
            if !accumulate(&self.root, row, &mut roots) {
                debug!("row {} has no {}, skipped", i, self.root.id_column());
            }
        }
        debug!("reduced {} rows into {} roots", rows.len(), roots.len());
        roots
            .into_iter()
            .map(|(_, entity)| entity.into_record(&self.root))
            .collect()
    }
}

#[derive(Debug)]
struct Entity {
    fields: Record,
    labels: Option<Value>,
    relationships: Vec<Value>,
    graph: Option<Value>,
    children: Vec<Scope>,
}

impl Entity {
    fn new(node: &QueryNode, row: &Row) -> Self {
        let column = |name: String| row.get(&name).cloned().unwrap_or(Value::Null);
        Self {
            fields: node
                .fields()
                .iter()
                .map(|field| (field.clone(), column(node.field_column(field))))
                .collect(),
            labels: if node.include_labels() {
                Some(
                    row.get(&node.labels_column())
                        .cloned()
                        .unwrap_or_else(|| Value::Array(vec![])),
                )
            } else {
                None
            },
            relationships: vec![],
            graph: if node.include_graph() {
                Some(column(node.graph_column()))
            } else {
                None
            },
            children: node.children().iter().map(|_| Scope::new()).collect(),
        }
    }

    fn add_relationship(&mut self, relationship: &Value) {
        if !self.relationships.contains(relationship) {
            self.relationships.push(relationship.clone());
        }
    }

    fn into_record(self, node: &QueryNode) -> Record {
        let mut record = self.fields;
        if let Some(labels) = self.labels {
            record.insert("labels".to_owned(), labels);
        }
        if node.include_relationships() {
            record.insert(
                "relationships".to_owned(),
                Value::Array(self.relationships),
            );
        }
        if let Some(graph) = self.graph {
            record.insert("graph".to_owned(), graph);
        }
        for (child, scope) in node.children().iter().zip(self.children) {
            record.insert(
                child.alias().to_owned(),
                Value::Array(
                    scope
                        .into_iter()
                        .map(|(_, entity)| Value::Object(entity.into_record(child)))
                        .collect(),
                ),
            );
        }
        record
    }
}

/// Merges the path of `row` below `node` into `scope`.
///
/// Returns `false` if the row has no id for `node`, in which case nothing is touched.
fn accumulate(node: &QueryNode, row: &Row, scope: &mut Scope) -> bool {
    let id = match row.get(&node.id_column()) {
        None | Some(Value::Null) => return false,
        Some(id) => id,
    };
    let entity = scope
        .entry(id.to_string())
        .or_insert_with(|| Entity::new(node, row));
    if node.include_relationships() && !node.is_root() {
        match row.get(&node.relationship_variable()) {
            None | Some(Value::Null) => (),
            Some(relationship) => entity.add_relationship(relationship),
        }
    }
    for (child, child_scope) in node.children().iter().zip(entity.children.iter_mut()) {
        accumulate(child, row, child_scope);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::front_end::parse;
    use serde_json::json;

    fn reducer(input: &str) -> Reducer {
        Reducer::new(Arc::new(parse(input).unwrap()))
    }

    fn rows(value: Value) -> Vec<Row> {
        match value {
            Value::Array(rows) => rows
                .into_iter()
                .map(|row| match row {
                    Value::Object(row) => row,
                    _ => unreachable!(),
                })
                .collect(),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_shared_root() {
        let reducer = reducer("user() { name, address(relationship: \":address\") { line } }");
        let result = reducer.reduce(&rows(json!([
            {"__userid": 1, "user.name": "peter", "__addressid": 10, "address.line": "a", "__addressr": {}},
            {"__userid": 1, "user.name": "peter", "__addressid": 11, "address.line": "b", "__addressr": {}},
            {"__userid": 1, "user.name": "peter", "__addressid": 10, "address.line": "a", "__addressr": {}},
        ])));
        assert_eq!(
            Value::Array(result.into_iter().map(Value::Object).collect()),
            json!([{
                "name": "peter",
                "address": [{"line": "a"}, {"line": "b"}]
            }])
        );
    }

    #[test]
    fn test_absent_branch() {
        let reducer = reducer("user() { name, address(relationship: \":address\") { line } }");
        let result = reducer.reduce(&rows(json!([
            {"__userid": 1, "user.name": "peter", "__addressid": null, "address.line": null, "__addressr": null},
            {"__userid": 2, "user.name": "paul"},
        ])));
        assert_eq!(
            Value::Array(result.into_iter().map(Value::Object).collect()),
            json!([
                {"name": "peter", "address": []},
                {"name": "paul", "address": []}
            ])
        );
    }

    #[test]
    fn test_malformed_row_skipped() {
        let reducer = reducer("user() { name }");
        let result = reducer.reduce(&rows(json!([
            {"__userid": 1, "user.name": "peter"},
            {"user.name": "nobody"},
            {"__userid": 1, "user.name": "changed"},
        ])));
        assert_eq!(result.len(), 1);
        assert_eq!(result[0]["name"], json!("peter"));
    }

    #[test]
    fn test_id_types_distinct() {
        let reducer = reducer("user() { name }");
        let result = reducer.reduce(&rows(json!([
            {"__userid": 1, "user.name": "number"},
            {"__userid": "1", "user.name": "string"},
        ])));
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_extras() {
        let reducer = reducer(
            "person() as p { labels, relationships, graph, name, beer(relationship: \":likes\") { relationships, name } }",
        );
        let result = reducer.reduce(&rows(json!([
            {
                "__pid": 1, "p.name": "peter", "__plabels": ["person"], "__pgraph": {"id": 1},
                "__beerid": 5, "beer.name": "ale", "__beerr": {"id": 100}
            },
            {
                "__pid": 1, "p.name": "peter", "__plabels": ["person"], "__pgraph": {"id": 1},
                "__beerid": 5, "beer.name": "ale", "__beerr": {"id": 101}
            },
        ])));
        let person = Value::Object(result[0].clone());
        assert_eq!(
            person,
            json!({
                "name": "peter",
                "labels": ["person"],
                "relationships": [],
                "graph": {"id": 1},
                "beer": [{"name": "ale", "relationships": [{"id": 100}, {"id": 101}]}]
            })
        );
        assert_eq!(
            result[0].keys().collect::<Vec<_>>(),
            vec!["name", "labels", "relationships", "graph", "beer"]
        );
    }
}
