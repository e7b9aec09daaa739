use crate::{
    data::{self, EdgeRecord},
    error::{Error, Result},
};
use petgraph::{
    algo,
    graph::{DiGraph, EdgeIndex, NodeIndex},
    visit::Dfs,
};
use rust_decimal::Decimal;
use std::{
    collections::{HashMap, HashSet},
    fmt::Display,
    io,
};
use tracing::warn;

pub type GraphType = DiGraph<Node, Edge>;

/// Recipes and ingredients joined by `recipe -> ingredient` edges.
///
/// Node order is the order in which names were first seen, which keeps query
/// results reproducible.
#[derive(Clone, Debug, Default)]
pub struct RecipeGraph {
    pub graph: GraphType,
    indices: HashMap<String, NodeIndex>,
}

impl RecipeGraph {
    pub fn new() -> RecipeGraph {
        RecipeGraph::default()
    }

    pub fn from_edges(edges: impl IntoIterator<Item = EdgeRecord>) -> RecipeGraph {
        let mut graph = RecipeGraph::new();
        for edge in edges {
            graph.add_edge(&edge.recipe, &edge.ingredient, edge.rate, edge.attributes);
        }
        graph
    }

    pub fn from_reader<R: io::Read>(reader: R) -> Result<RecipeGraph> {
        Ok(RecipeGraph::from_edges(data::read_edges(reader)?))
    }

    /// Adds `recipe -> ingredient`. A repeated pair replaces the earlier edge.
    pub fn add_edge(
        &mut self,
        recipe: &str,
        ingredient: &str,
        rate: Decimal,
        attributes: Vec<(String, String)>,
    ) -> EdgeIndex {
        let a = self.add_node(recipe);
        let b = self.add_node(ingredient);
        if let Some(existing) = self.graph.find_edge(a, b) {
            warn!(
                recipe,
                ingredient,
                old = %self.graph[existing].rate,
                new = %rate,
                "duplicate edge, keeping the last rate"
            );
        }
        self.graph.update_edge(a, b, Edge { rate, attributes })
    }

    fn add_node(&mut self, name: &str) -> NodeIndex {
        if let Some(&node) = self.indices.get(name) {
            return node;
        }
        let node = self.graph.add_node(Node {
            name: name.to_owned(),
        });
        self.indices.insert(name.to_owned(), node);
        node
    }

    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.graph.node_weights().map(|n| n.name.as_str())
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.indices.contains_key(name)
    }

    pub fn index(&self, name: &str) -> Result<NodeIndex> {
        self.indices
            .get(name)
            .copied()
            .ok_or_else(|| Error::InvalidRecipe {
                name: name.to_owned(),
                similar: self.suggestions(name),
            })
    }

    pub fn name(&self, node: NodeIndex) -> &str {
        &self.graph[node].name
    }

    /// Names containing `name`, ignoring case.
    pub fn suggestions(&self, name: &str) -> Vec<String> {
        let needle = name.to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.nodes()
            .filter(|n| n.to_lowercase().contains(&needle))
            .map(ToOwned::to_owned)
            .collect()
    }

    /// `name` and every node reachable from it.
    pub fn closure(&self, name: &str) -> Result<Vec<NodeIndex>> {
        let start = self.index(name)?;
        let mut nodes = Vec::new();
        let mut dfs = Dfs::new(&self.graph, start);
        while let Some(nx) = dfs.next(&self.graph) {
            nodes.push(nx);
        }
        Ok(nodes)
    }

    /// Induced subgraph over `nodes`, keeping this graph's node order.
    pub fn subgraph(&self, nodes: &[NodeIndex]) -> RecipeGraph {
        let keep: HashSet<_> = nodes.iter().copied().collect();
        let graph = self.graph.filter_map(
            |i, n| keep.contains(&i).then(|| n.clone()),
            |_, e| Some(e.clone()),
        );
        let indices = graph
            .node_indices()
            .map(|i| (graph[i].name.clone(), i))
            .collect();
        RecipeGraph { graph, indices }
    }

    /// Every simple path from `from` to `to`, as edge sequences.
    ///
    /// A node has no path to itself. On a graph with cycles the number of
    /// paths can grow exponentially, but enumeration always terminates.
    pub fn simple_paths(&self, from: NodeIndex, to: NodeIndex) -> Vec<Vec<EdgeIndex>> {
        if from == to {
            return Vec::new();
        }
        algo::all_simple_paths::<Vec<_>, _>(&self.graph, from, to, 0, None)
            .map(|path| {
                path.windows(2)
                    .filter_map(|w| self.graph.find_edge(w[0], w[1]))
                    .collect()
            })
            .collect()
    }

    pub fn rate(&self, recipe: &str, ingredient: &str) -> Option<Decimal> {
        let a = *self.indices.get(recipe)?;
        let b = *self.indices.get(ingredient)?;
        self.graph.find_edge(a, b).map(|e| self.graph[e].rate)
    }

    /// True if nothing is made from `name`'s ingredients, i.e. it is a raw resource.
    pub fn is_raw(&self, name: &str) -> bool {
        self.indices.get(name).is_some_and(|&n| {
            self.graph
                .neighbors_directed(n, petgraph::Direction::Outgoing)
                .next()
                .is_none()
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub name: String,
}

impl Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    pub rate: Decimal,
    pub attributes: Vec<(String, String)>,
}

impl Display for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", crate::round_string(self.rate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(edges: &[(&str, &str, i64)]) -> RecipeGraph {
        let mut graph = RecipeGraph::new();
        for &(a, b, rate) in edges {
            graph.add_edge(a, b, Decimal::from(rate), Vec::new());
        }
        graph
    }

    fn diamond() -> RecipeGraph {
        graph(&[("A", "B", 2), ("A", "C", 3), ("B", "D", 5), ("C", "D", 7)])
    }

    fn names(graph: &RecipeGraph, nodes: &[NodeIndex]) -> Vec<String> {
        nodes.iter().map(|&n| graph.name(n).to_owned()).collect()
    }

    #[test]
    fn nodes_in_first_seen_order() {
        let graph = graph(&[("B", "C", 1), ("A", "B", 1)]);
        assert_eq!(graph.nodes().collect::<Vec<_>>(), ["B", "C", "A"]);
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn duplicate_edge_keeps_last_rate() {
        let graph = graph(&[("A", "B", 1), ("A", "B", 4)]);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.rate("A", "B"), Some(Decimal::from(4)));
        assert_eq!(graph.rate("B", "A"), None);
    }

    #[test]
    fn closure_follows_edges_forward() {
        let mut graph = diamond();
        graph.add_edge("E", "A", Decimal::ONE, Vec::new());
        let mut closure = names(&graph, &graph.closure("B").unwrap());
        closure.sort();
        assert_eq!(closure, ["B", "D"]);
        assert_eq!(graph.closure("A").unwrap().len(), 4);
        assert!(graph.closure("Z").is_err());
    }

    #[test]
    fn subgraph_is_induced() {
        let graph = diamond();
        let nodes: Vec<_> = ["A", "B", "D"]
            .iter()
            .map(|n| graph.index(n).unwrap())
            .collect();
        let sg = graph.subgraph(&nodes);
        assert_eq!(sg.nodes().collect::<Vec<_>>(), ["A", "B", "D"]);
        assert_eq!(sg.edge_count(), 2);
        assert!(sg.rate("A", "B").is_some());
        assert!(sg.rate("B", "D").is_some());
        assert!(!sg.contains("C"));
    }

    #[test]
    fn simple_paths_enumerates_every_route() {
        let graph = diamond();
        let a = graph.index("A").unwrap();
        let d = graph.index("D").unwrap();
        let paths = graph.simple_paths(a, d);
        assert_eq!(paths.len(), 2);
        assert!(paths.iter().all(|p| p.len() == 2));
        assert!(graph.simple_paths(a, a).is_empty());
        assert!(graph.simple_paths(d, a).is_empty());
    }

    #[test]
    fn simple_paths_terminate_on_cycles() {
        let graph = graph(&[
            ("A", "B", 1),
            ("B", "C", 1),
            ("C", "A", 1),
            ("B", "D", 1),
        ]);
        let a = graph.index("A").unwrap();
        let d = graph.index("D").unwrap();
        assert_eq!(graph.simple_paths(a, d).len(), 1);
    }

    #[test]
    fn suggestions_ignore_case() {
        let graph = graph(&[
            ("Iron Plate", "Iron Ingot", 1),
            ("Wire", "Copper Ingot", 1),
        ]);
        assert_eq!(graph.suggestions("ingot"), ["Iron Ingot", "Copper Ingot"]);
        assert!(graph.suggestions("").is_empty());
        match graph.index("iron") {
            Err(Error::InvalidRecipe { similar, .. }) => {
                assert_eq!(similar, ["Iron Plate", "Iron Ingot"])
            }
            _ => panic!("expected an invalid recipe"),
        }
    }

    #[test]
    fn raw_resources_have_no_ingredients() {
        let graph = diamond();
        assert!(graph.is_raw("D"));
        assert!(!graph.is_raw("A"));
        assert!(!graph.is_raw("missing"));
    }
}
