use crate::{
    error::{Error, Result},
    graph::RecipeGraph,
};
use indexmap::IndexMap;
use petgraph::visit::EdgeRef;
use rust_decimal::Decimal;
use serde_derive::Serialize;
use std::fmt::Write;
use tracing::debug;

static INDENT: &str = "    ";

/// Total quantity of every ingredient needed for some amount of one recipe.
///
/// Entries keep the graph's node order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Requirements(IndexMap<String, Decimal>);

impl Requirements {
    pub fn get(&self, ingredient: &str) -> Option<Decimal> {
        self.0.get(ingredient).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> IndexMap<String, Decimal> {
        self.0
    }
}

/// Computes how much of each ingredient `quantity` of `recipe` consumes.
///
/// An ingredient reachable through several intermediate recipes gets one
/// contribution per simple path: `quantity` times the product of the rates
/// along that path. The recipe itself is not part of the result.
pub fn compute(graph: &RecipeGraph, recipe: &str, quantity: Decimal) -> Result<Requirements> {
    let closure = graph.closure(recipe)?;
    let sg = graph.subgraph(&closure);
    let target = sg.index(recipe)?;

    let mut ingredients: IndexMap<_, _> = sg
        .graph
        .node_indices()
        .map(|n| (n, Decimal::ZERO))
        .collect();
    ingredients.insert(target, quantity);

    for (&ing, total) in ingredients.iter_mut() {
        let paths = sg.simple_paths(target, ing);
        debug!(ingredient = sg.name(ing), paths = paths.len(), "aggregating");
        for path in paths {
            let overflow = || Error::Overflow {
                ingredient: sg.name(ing).to_owned(),
            };
            let mut product = quantity;
            for edge in path {
                product = product
                    .checked_mul(sg.graph[edge].rate)
                    .ok_or_else(overflow)?;
            }
            *total = total.checked_add(product).ok_or_else(overflow)?;
        }
    }

    ingredients.shift_remove(&target);
    Ok(Requirements(
        ingredients
            .into_iter()
            .map(|(n, required)| (sg.name(n).to_owned(), required))
            .collect(),
    ))
}

/// The entries of `requirements` that no recipe in `graph` produces.
pub fn raw_materials<'a>(
    graph: &'a RecipeGraph,
    requirements: &'a Requirements,
) -> impl Iterator<Item = (&'a str, Decimal)> + 'a {
    requirements.iter().filter(move |(k, _)| graph.is_raw(k))
}

/// Graphviz description of the subgraph `recipe` draws from, labelled with totals.
pub fn render(
    graph: &RecipeGraph,
    recipe: &str,
    quantity: Decimal,
    requirements: &Requirements,
) -> Result<String, Box<dyn std::error::Error>> {
    let sg = graph.subgraph(&graph.closure(recipe)?);
    let g = &sg.graph;
    let mut f = String::new();
    writeln!(f, "digraph {{")?;
    for node in g.node_indices() {
        let name = sg.name(node);
        let required = if name == recipe {
            quantity
        } else {
            requirements.get(name).unwrap_or_default()
        };
        writeln!(
            f,
            "{INDENT}{} [label = \"{} {}\"]",
            node.index(),
            crate::round_string(required),
            name.replace('"', "\\\"")
        )?;
    }
    for edge in g.edge_references() {
        writeln!(
            f,
            "{INDENT}{} -> {} [label = \"{}\" dir=back]",
            edge.source().index(),
            edge.target().index(),
            edge.weight()
        )?;
    }
    writeln!(f, "}}")?;
    Ok(f)
}
