use super::{
    ast::{QueryNode, ValueSpec},
    checker::{check_fields, check_relationship, Aliases},
    error::Result,
};
use itertools::Itertools;
use log::trace;
use pest::{iterators::Pair, Parser};
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "front_end/grammar.pest"]
struct DslParser;

/// Parses and validates the request text in one pass.
pub fn parse(input: &str) -> Result<QueryNode> {
    let pair = DslParser::parse(Rule::query, input)?.next().unwrap();
    parse_node(pair, None, &mut Aliases::new())
}

fn parse_node(pair: Pair<Rule>, parent: Option<&str>, aliases: &mut Aliases) -> Result<QueryNode> {
    let mut pairs = pair.into_inner();
    let type_name = pairs.next().unwrap().as_str();
    let params = pairs.next().unwrap();
    let (alias, body) = match (pairs.next(), pairs.next()) {
        (Some(alias), Some(body)) => (Some(alias.into_inner().next().unwrap().as_str()), body),
        (Some(body), None) => (None, body),
        _ => unreachable!(),
    };
    let mut node = QueryNode::new(type_name, alias);
    node.set_parent(parent);
    for param in params.into_inner() {
        let (key, value) = match param.into_inner().collect_tuple() {
            Some((key, value)) => (key.as_str(), parse_value(value)),
            None => unreachable!(),
        };
        if key == "relationship" && parent.is_some() {
            node.set_relationship(value.raw());
        } else {
            node.add_parameter(key.to_owned(), value);
        }
    }
    check_relationship(&node)?;
    aliases.register(&node)?;
    trace!("node {} registered as {}", node.type_name(), node.alias());
    for entry in body.into_inner() {
        match entry.as_rule() {
            Rule::labels => node.set_include_labels(),
            Rule::relationships => node.set_include_relationships(),
            Rule::graph => node.set_include_graph(),
            Rule::properties => {
                for item in entry.into_inner() {
                    parse_item(&mut node, item, aliases)?;
                }
            }
            Rule::field | Rule::node => parse_item(&mut node, entry, aliases)?,
            _ => unreachable!(),
        }
    }
    check_fields(&node)?;
    Ok(node)
}

fn parse_item(node: &mut QueryNode, item: Pair<Rule>, aliases: &mut Aliases) -> Result<()> {
    match item.as_rule() {
        Rule::field => node.add_field(item.as_str().to_owned()),
        Rule::node => {
            let child = parse_node(item, Some(node.alias()), aliases)?;
            node.add_child(child);
        }
        _ => unreachable!(),
    }
    Ok(())
}

fn parse_value(pair: Pair<Rule>) -> ValueSpec {
    match pair.as_rule() {
        Rule::bound => ValueSpec::BoundParameter(pair.into_inner().as_str().to_owned()),
        Rule::number => ValueSpec::LiteralNumber(pair.as_str().to_owned()),
        Rule::string => ValueSpec::LiteralString(pair.into_inner().as_str().to_owned()),
        _ => unreachable!(),
    }
}
