use super::ast::QueryNode;
use itertools::Itertools;

/// Emits the query text of a validated tree: the pattern clause, a newline, then the return clause.
pub fn codegen(root: &QueryNode) -> String {
    let mut patterns = vec![];
    let mut items = vec![];
    emit_node(root, None, &mut patterns, &mut items);
    format!("{}\nreturn {}", patterns.join(" "), items.join(", "))
}

fn emit_node(
    node: &QueryNode,
    parent: Option<&QueryNode>,
    patterns: &mut Vec<String>,
    items: &mut Vec<String>,
) {
    patterns.push(emit_pattern(node, parent));
    emit_return_items(node, items);
    for child in node.children() {
        emit_node(child, Some(node), patterns, items);
    }
}

fn emit_pattern(node: &QueryNode, parent: Option<&QueryNode>) -> String {
    let entity = format!(
        "({}:{}{})",
        node.alias(),
        node.type_name(),
        emit_property_map(node)
    );
    match parent {
        None => format!("match{}", entity),
        Some(parent) => format!(
            "optional match({})<-[{}{}]->{}",
            parent.alias(),
            node.relationship_variable(),
            node.relationship().unwrap_or_default(),
            entity
        ),
    }
}

fn emit_property_map(node: &QueryNode) -> String {
    if node.parameters().is_empty() {
        String::new()
    } else {
        format!(
            " {{{}}}",
            node.parameters()
                .iter()
                .map(|(key, value)| format!("{}: {}", key, value))
                .join(", ")
        )
    }
}

fn emit_return_items(node: &QueryNode, items: &mut Vec<String>) {
    items.push(format!("id({}) as {}", node.alias(), node.id_column()));
    items.extend(node.fields().iter().map(|field| node.field_column(field)));
    if node.include_labels() {
        items.push(format!("labels({}) as {}", node.alias(), node.labels_column()));
    }
    if node.include_graph() {
        items.push(format!("{} as {}", node.alias(), node.graph_column()));
    }
    if !node.is_root() {
        items.push(node.relationship_variable());
    }
}
