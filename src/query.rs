//! The compiled form of a request.

use crate::{
    front_end::{codegen, error::Result, parse as parse_tree, QueryNode},
    reducer::{Reducer, Record, Row},
};
use log::{debug, info};
use rayon::prelude::*;
use std::sync::Arc;

/// Query text plus the reducer bound to the same validated tree.
#[derive(Debug, Clone)]
pub struct Query {
    text: String,
    reducer: Reducer,
}

/// Parses the request, validates it, and compiles it.
///
/// Fails with the first validation error met in document order; no partial result is returned.
pub fn parse(input: &str) -> Result<Query> {
    let root = parse_tree(input)?;
    let text = codegen(&root);
    info!(
        "compiled request with {} nodes rooted at {}",
        root.walk().count(),
        root.alias()
    );
    debug!("query text:\n{}", text);
    Ok(Query {
        text,
        reducer: Reducer::new(Arc::new(root)),
    })
}

impl Query {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tree(&self) -> &QueryNode {
        self.reducer.tree()
    }

    pub fn reducer(&self) -> &Reducer {
        &self.reducer
    }

    pub fn reduce(&self, rows: &[Row]) -> Vec<Record> {
        self.reducer.reduce(rows)
    }

    /// Reduces independent result sets in parallel, keeping the input order.
    pub fn reduce_batches(&self, batches: &[Vec<Row>]) -> Vec<Vec<Record>> {
        batches.par_iter().map(|rows| self.reduce(rows)).collect()
    }
}
