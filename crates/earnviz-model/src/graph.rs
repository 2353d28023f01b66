//! Flow graph assembly.
//!
//! An [`EarningsReport`] is mapped onto a fixed income-statement topology:
//! revenue splits into cost of revenue and gross profit, gross profit into
//! operating expenses and operating income, and so on down to net profit.
//! Nodes are identified by [`NodeKey`]; list order only fixes drawing order.

use crate::report::EarningsReport;
use serde::Serialize;
use std::collections::HashMap;

/// Stable identifier of a node in a [`FlowGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum NodeKey {
    /// Total revenue.
    Revenue,
    /// Cost of revenue.
    CostOfRevenue,
    /// Gross profit.
    GrossProfit,
    /// Total operating expenses.
    OperatingExpenses,
    /// Named operating-expense line item, by index into the report's items.
    OpexItem(usize),
    /// Operating expense not covered by named items.
    OtherOpex,
    /// Operating income.
    OperatingIncome,
    /// Non-operating income feeding pretax income.
    OtherIncome,
    /// Income before tax.
    PretaxIncome,
    /// Tax expense.
    Tax,
    /// Tax benefit flowing back into profit.
    TaxBenefit,
    /// Net profit.
    NetProfit,
}

impl NodeKey {
    /// Keys of the nodes every report graph may contain, in topology order.
    pub const FIXED: [Self; 11] = [
        Self::Revenue,
        Self::CostOfRevenue,
        Self::GrossProfit,
        Self::OperatingExpenses,
        Self::OtherOpex,
        Self::OperatingIncome,
        Self::OtherIncome,
        Self::PretaxIncome,
        Self::Tax,
        Self::TaxBenefit,
        Self::NetProfit,
    ];

    /// Display name of a fixed node; `None` for named line items.
    pub const fn fixed_name(self) -> Option<&'static str> {
        Some(match self {
            Self::Revenue => "Revenue",
            Self::CostOfRevenue => "Cost of Revenue",
            Self::GrossProfit => "Gross Profit",
            Self::OperatingExpenses => "Operating Expenses",
            Self::OpexItem(_) => return None,
            Self::OtherOpex => "Other",
            Self::OperatingIncome => "Operating Income",
            Self::OtherIncome => "Other Income",
            Self::PretaxIncome => "Pretax Income",
            Self::Tax => "Tax",
            Self::TaxBenefit => "Tax (benefit)",
            Self::NetProfit => "Net Profit",
        })
    }
}

/// True if `name` is taken by a fixed node (ignoring case and surrounding
/// whitespace), so a line item named this way would be ambiguous.
pub fn is_reserved_name(name: &str) -> bool {
    let name = name.trim();
    NodeKey::FIXED
        .iter()
        .filter_map(|key| key.fixed_name())
        .any(|fixed| fixed.eq_ignore_ascii_case(name))
}

/// Color flag of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    /// Income and profit (drawn green).
    Positive,
    /// Costs, expenses and losses (drawn red).
    Negative,
}

/// Node position in normalized layout space, both axes in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    /// Horizontal position, 0 at the left.
    pub x: f64,
    /// Vertical position, 0 at the top.
    pub y: f64,
}

impl Position {
    /// Create a new position.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A node of the flow graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    /// Stable identifier.
    pub key: NodeKey,
    /// Display name.
    pub name: String,
    /// Layout position.
    pub position: Position,
    /// Signed amount in whole dollars.
    pub amount: i64,
    /// Color flag.
    pub tone: Tone,
}

/// A directed, weighted edge between two nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Edge {
    /// Source node.
    pub source: NodeKey,
    /// Target node.
    pub target: NodeKey,
    /// Flow weight, never zero.
    pub value: u64,
}

/// Assembled flow graph: ordered nodes and ordered edges.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowGraph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl FlowGraph {
    /// Build a graph from raw parts without checking that edges resolve.
    ///
    /// Report graphs come from [`assemble_graph`].
    pub const fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    /// Nodes in drawing order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Edges in drawing order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Look up a node by key.
    pub fn node(&self, key: NodeKey) -> Option<&Node> {
        self.nodes.iter().find(|n| n.key == key)
    }

    /// Look up a node by display name.
    pub fn node_named(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// Drawing index of a node.
    pub fn index_of(&self, key: NodeKey) -> Option<usize> {
        self.nodes.iter().position(|n| n.key == key)
    }

    /// Total weight flowing into a node.
    pub fn inflow(&self, key: NodeKey) -> u64 {
        self.edges
            .iter()
            .filter(|e| e.target == key)
            .map(|e| e.value)
            .sum()
    }

    /// Total weight flowing out of a node.
    pub fn outflow(&self, key: NodeKey) -> u64 {
        self.edges
            .iter()
            .filter(|e| e.source == key)
            .map(|e| e.value)
            .sum()
    }

    /// True if no node is its own ancestor.
    pub fn is_acyclic(&self) -> bool {
        let mut in_degree: HashMap<NodeKey, usize> =
            self.nodes.iter().map(|n| (n.key, 0)).collect();
        for edge in &self.edges {
            *in_degree.entry(edge.target).or_default() += 1;
            in_degree.entry(edge.source).or_default();
        }

        let mut ready: Vec<NodeKey> = in_degree
            .iter()
            .filter(|&(_, &d)| d == 0)
            .map(|(&k, _)| k)
            .collect();
        let mut visited = 0;

        while let Some(key) = ready.pop() {
            visited += 1;
            for edge in self.edges.iter().filter(|e| e.source == key) {
                if let Some(d) = in_degree.get_mut(&edge.target) {
                    *d -= 1;
                    if *d == 0 {
                        ready.push(edge.target);
                    }
                }
            }
        }

        visited == in_degree.len()
    }
}

const REVENUE_POS: Position = Position::new(0.01, 0.5);
const COST_OF_REVENUE_POS: Position = Position::new(0.135, 0.7);
const GROSS_PROFIT_POS: Position = Position::new(0.25, 0.4);
const OPERATING_EXPENSES_POS: Position = Position::new(0.385, 0.7);
const OTHER_OPEX_POS: Position = Position::new(0.5, 0.95);
const OPERATING_INCOME_POS: Position = Position::new(0.5, 0.3);
const OTHER_INCOME_POS: Position = Position::new(0.6, 0.1);
const PRETAX_INCOME_POS: Position = Position::new(0.75, 0.2);
const TAX_POS: Position = Position::new(0.885, 0.4);
const NET_PROFIT_POS: Position = Position::new(0.99, 0.1);

/// Column of the named operating-expense items.
const OPEX_ITEM_X: f64 = 0.5;
/// Vertical band the named operating-expense items are spread across.
const OPEX_ITEM_BAND: (f64, f64) = (0.55, 0.85);

/// Vertical positions for `count` items spread across the opex band.
fn opex_item_rows(count: usize) -> Vec<f64> {
    let (top, bottom) = OPEX_ITEM_BAND;
    match count {
        0 => Vec::new(),
        1 => vec![(top + bottom) / 2.0],
        n => {
            let step = (bottom - top) / (n - 1) as f64;
            (0..n).map(|i| top + step * i as f64).collect()
        }
    }
}

#[derive(Debug, Default)]
struct GraphBuilder {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl GraphBuilder {
    fn node(&mut self, key: NodeKey, name: &str, position: Position, amount: i64, tone: Tone) {
        self.nodes.push(Node {
            key,
            name: name.to_string(),
            position,
            amount,
            tone,
        });
    }

    fn fixed(&mut self, key: NodeKey, position: Position, amount: i64, tone: Tone) {
        self.node(key, key.fixed_name().unwrap_or_default(), position, amount, tone);
    }

    fn edge(&mut self, source: NodeKey, target: NodeKey, amount: i64) {
        // Renderers reject zero-weight links.
        let value = amount.unsigned_abs().max(1);
        self.edges.push(Edge {
            source,
            target,
            value,
        });
    }

    fn finish(mut self) -> FlowGraph {
        for node in &mut self.nodes {
            if node.amount <= 0 {
                node.tone = Tone::Negative;
            }
        }
        FlowGraph {
            nodes: self.nodes,
            edges: self.edges,
        }
    }
}

/// Map a report onto the fixed income-statement flow topology.
pub fn assemble_graph(report: &EarningsReport) -> FlowGraph {
    use NodeKey::*;
    use Tone::*;

    let mut g = GraphBuilder::default();

    g.fixed(Revenue, REVENUE_POS, report.revenue(), Positive);
    g.fixed(
        CostOfRevenue,
        COST_OF_REVENUE_POS,
        report.cost_of_revenue(),
        Negative,
    );
    g.fixed(
        GrossProfit,
        GROSS_PROFIT_POS,
        report.gross_profit(),
        Positive,
    );
    g.fixed(
        OperatingExpenses,
        OPERATING_EXPENSES_POS,
        report.operating_expense(),
        Negative,
    );
    g.edge(Revenue, CostOfRevenue, report.cost_of_revenue());
    g.edge(Revenue, GrossProfit, report.gross_profit());
    g.edge(GrossProfit, OperatingExpenses, report.operating_expense());

    let items: Vec<(usize, &crate::report::OpexItem)> = report
        .opex_items()
        .iter()
        .enumerate()
        .filter(|(_, item)| item.amount > 0)
        .collect();
    for ((index, item), y) in items.iter().zip(opex_item_rows(items.len())) {
        let key = OpexItem(*index);
        g.node(
            key,
            &item.name,
            Position::new(OPEX_ITEM_X, y),
            item.amount,
            Negative,
        );
        g.edge(OperatingExpenses, key, item.amount);
    }

    if report.opex_other() > 0 {
        g.fixed(OtherOpex, OTHER_OPEX_POS, report.opex_other(), Negative);
        g.edge(OperatingExpenses, OtherOpex, report.opex_other());
    } else if report.opex_other() < 0 {
        tracing::warn!(
            opex_other = report.opex_other(),
            "named operating expenses exceed the reported total"
        );
    }

    g.fixed(
        OperatingIncome,
        OPERATING_INCOME_POS,
        report.operating_income(),
        Positive,
    );
    g.edge(GrossProfit, OperatingIncome, report.operating_income());

    if report.other_income() > 0 {
        g.fixed(
            OtherIncome,
            OTHER_INCOME_POS,
            report.other_income(),
            Positive,
        );
        g.edge(OtherIncome, PretaxIncome, report.other_income());
    } else {
        tracing::debug!(
            other_income = report.other_income(),
            "omitting other income"
        );
    }

    g.fixed(
        PretaxIncome,
        PRETAX_INCOME_POS,
        report.pretax_income(),
        Positive,
    );
    g.edge(OperatingIncome, PretaxIncome, report.operating_income());

    if report.income_tax() > 0 {
        g.fixed(Tax, TAX_POS, report.income_tax(), Negative);
        g.edge(PretaxIncome, Tax, report.income_tax());
    } else {
        let benefit = report.income_tax().saturating_neg();
        g.fixed(TaxBenefit, TAX_POS, benefit, Positive);
        g.edge(TaxBenefit, NetProfit, benefit);
    }

    g.fixed(NetProfit, NET_PROFIT_POS, report.net_income(), Positive);
    g.edge(PretaxIncome, NetProfit, report.net_income());

    let graph = g.finish();
    tracing::debug!(
        nodes = graph.nodes().len(),
        edges = graph.edges().len(),
        "assembled flow graph"
    );
    graph
}
