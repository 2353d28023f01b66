//! Flat Sankey arrays derived from a flow graph.
//!
//! Renderers consume parallel arrays indexed by node drawing order, the same
//! shape plotly's `go.Sankey` trace takes.

use crate::error::RenderError;
use crate::format::format_dollar_amount;
use earnviz_model::{FlowGraph, Tone};
use serde::{Deserialize, Serialize};

/// Fill of positive nodes.
pub const POSITIVE_NODE_COLOR: &str = "#60c465";
/// Fill of negative nodes.
pub const NEGATIVE_NODE_COLOR: &str = "#c22f36";
/// Fill of links into positive nodes.
pub const POSITIVE_LINK_COLOR: &str = "#92f7a8";
/// Fill of links into negative nodes.
pub const NEGATIVE_LINK_COLOR: &str = "#fc7e85";

/// Line break used inside node labels.
pub const LABEL_BREAK: &str = "<br>";

const fn node_color(tone: Tone) -> &'static str {
    match tone {
        Tone::Positive => POSITIVE_NODE_COLOR,
        Tone::Negative => NEGATIVE_NODE_COLOR,
    }
}

const fn link_color(tone: Tone) -> &'static str {
    match tone {
        Tone::Positive => POSITIVE_LINK_COLOR,
        Tone::Negative => NEGATIVE_LINK_COLOR,
    }
}

/// Node and link arrays for a Sankey renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SankeyData {
    /// Node labels, `"{name}<br>{amount}"`.
    pub labels: Vec<String>,
    /// Node fill colors.
    pub node_colors: Vec<String>,
    /// Node x positions in `[0, 1]`.
    pub x: Vec<f64>,
    /// Node y positions in `[0, 1]`.
    pub y: Vec<f64>,
    /// Link source node indices.
    pub source: Vec<usize>,
    /// Link target node indices.
    pub target: Vec<usize>,
    /// Link weights.
    pub value: Vec<u64>,
    /// Link fill colors, taken from the target node's tone.
    pub link_colors: Vec<String>,
}

impl SankeyData {
    /// Flatten a graph into renderer arrays.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::EmptyGraph`] for a graph without nodes and
    /// [`RenderError::DanglingEdge`] if an edge names a node the graph lacks.
    pub fn from_graph(graph: &FlowGraph) -> Result<Self, RenderError> {
        let nodes = graph.nodes();
        if nodes.is_empty() {
            return Err(RenderError::EmptyGraph);
        }

        let mut data = Self {
            labels: Vec::with_capacity(nodes.len()),
            node_colors: Vec::with_capacity(nodes.len()),
            x: Vec::with_capacity(nodes.len()),
            y: Vec::with_capacity(nodes.len()),
            source: Vec::with_capacity(graph.edges().len()),
            target: Vec::with_capacity(graph.edges().len()),
            value: Vec::with_capacity(graph.edges().len()),
            link_colors: Vec::with_capacity(graph.edges().len()),
        };

        for node in nodes {
            data.labels.push(format!(
                "{}{LABEL_BREAK}{}",
                node.name,
                format_dollar_amount(node.amount)
            ));
            data.node_colors.push(node_color(node.tone).to_string());
            data.x.push(node.position.x);
            data.y.push(node.position.y);
        }

        for edge in graph.edges() {
            let dangling = || RenderError::DanglingEdge {
                from: edge.source,
                to: edge.target,
            };
            let source = graph.index_of(edge.source).ok_or_else(dangling)?;
            let target = graph.index_of(edge.target).ok_or_else(dangling)?;

            data.source.push(source);
            data.target.push(target);
            data.value.push(edge.value);
            data.link_colors.push(link_color(nodes[target].tone).to_string());
        }

        Ok(data)
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.labels.len()
    }

    /// Number of links.
    pub fn link_count(&self) -> usize {
        self.value.len()
    }

    /// Weight a node carries: the larger of its summed inflow and outflow.
    pub fn node_value(&self, index: usize) -> u64 {
        let mut inflow = 0;
        let mut outflow = 0;
        for link in 0..self.link_count() {
            if self.target[link] == index {
                inflow += self.value[link];
            }
            if self.source[link] == index {
                outflow += self.value[link];
            }
        }
        inflow.max(outflow)
    }

    /// Label lines of a node, split at `<br>`.
    pub fn label_lines(&self, index: usize) -> Vec<&str> {
        self.labels
            .get(index)
            .map(|label| label.split(LABEL_BREAK).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use earnviz_model::{
        Edge, FinancialFields, Node, NodeKey, Position, Unit, assemble_graph, build_report,
    };

    fn graph() -> FlowGraph {
        let fields = FinancialFields::builder(Unit::Millions)
            .revenue(20_699)
            .cost_of_revenue(6_589)
            .operating_expense(5_169)
            .opex_item("Research and Development", 3_916)
            .opex_item("Sales, General & Admin", 1_253)
            .pretax_income(9_190)
            .income_tax(958)
            .build()
            .unwrap();
        assemble_graph(&build_report(fields))
    }

    #[test]
    fn test_labels_and_colors() {
        let data = SankeyData::from_graph(&graph()).unwrap();

        assert_eq!(data.labels[0], "Revenue<br>$20.7B");
        assert_eq!(data.node_colors[0], POSITIVE_NODE_COLOR);
        assert_eq!(data.labels[1], "Cost of Revenue<br>$6.6B");
        assert_eq!(data.node_colors[1], NEGATIVE_NODE_COLOR);
        assert_eq!(data.label_lines(1), vec!["Cost of Revenue", "$6.6B"]);
    }

    #[test]
    fn test_arrays_are_parallel() {
        let data = SankeyData::from_graph(&graph()).unwrap();

        assert_eq!(data.node_count(), data.node_colors.len());
        assert_eq!(data.node_count(), data.x.len());
        assert_eq!(data.node_count(), data.y.len());
        assert_eq!(data.link_count(), data.source.len());
        assert_eq!(data.link_count(), data.target.len());
        assert_eq!(data.link_count(), data.link_colors.len());
    }

    #[test]
    fn test_link_colors_follow_target() {
        let data = SankeyData::from_graph(&graph()).unwrap();

        for link in 0..data.link_count() {
            let expected = if data.node_colors[data.target[link]] == POSITIVE_NODE_COLOR {
                POSITIVE_LINK_COLOR
            } else {
                NEGATIVE_LINK_COLOR
            };
            assert_eq!(data.link_colors[link], expected);
        }
    }

    #[test]
    fn test_indices_follow_node_order() {
        let graph = graph();
        let data = SankeyData::from_graph(&graph).unwrap();

        for (link, edge) in graph.edges().iter().enumerate() {
            assert_eq!(graph.nodes()[data.source[link]].key, edge.source);
            assert_eq!(graph.nodes()[data.target[link]].key, edge.target);
        }
    }

    #[test]
    fn test_node_value_is_max_of_flows() {
        let graph = graph();
        let data = SankeyData::from_graph(&graph).unwrap();

        let revenue = graph.index_of(NodeKey::Revenue).unwrap();
        assert_eq!(data.node_value(revenue), 20_699_000_000);
        let pretax = graph.index_of(NodeKey::PretaxIncome).unwrap();
        assert_eq!(data.node_value(pretax), 9_190_000_000);
    }

    #[test]
    fn test_dangling_edge() {
        let graph = FlowGraph::from_parts(
            vec![Node {
                key: NodeKey::Revenue,
                name: "Revenue".to_string(),
                position: Position::new(0.0, 0.5),
                amount: 1,
                tone: Tone::Positive,
            }],
            vec![Edge {
                source: NodeKey::Revenue,
                target: NodeKey::NetProfit,
                value: 1,
            }],
        );

        assert!(matches!(
            SankeyData::from_graph(&graph),
            Err(RenderError::DanglingEdge {
                to: NodeKey::NetProfit,
                ..
            })
        ));
    }

    #[test]
    fn test_empty_graph() {
        let graph = FlowGraph::from_parts(Vec::new(), Vec::new());
        assert!(matches!(
            SankeyData::from_graph(&graph),
            Err(RenderError::EmptyGraph)
        ));
    }
}
