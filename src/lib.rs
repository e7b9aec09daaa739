use rust_decimal::Decimal;
use std::{fs::File, path::Path};

pub mod compute;
pub mod data;
pub mod error;
pub mod graph;

pub use compute::{compute, Requirements};
pub use error::{Error, Result};
pub use graph::RecipeGraph;

/// Builds the graph from an edge list CSV on disk.
pub fn load(path: impl AsRef<Path>) -> Result<RecipeGraph> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| Error::Io {
        path: path.to_owned(),
        source,
    })?;
    let graph = RecipeGraph::from_reader(file)?;
    tracing::debug!(
        path = %path.display(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "loaded edge list"
    );
    Ok(graph)
}

pub fn round_string(d: Decimal) -> String {
    d.round_dp(3).normalize().to_string()
}

/// Upper-cases the first letter of every word and lower-cases the rest.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alphabetic = false;
    for c in s.chars() {
        if prev_alphabetic {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        prev_alphabetic = c.is_alphabetic();
    }
    out
}
