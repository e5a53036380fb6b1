//! Sociogram construction: the filtered, styled relationship graph.
//!
//! [`build_graph`] turns the resolved nominations of a group into a
//! [`StyledGraph`]: nodes with color/shape/opacity/label, edges with
//! color/style/width/opacity, and a legend listing only the mappings
//! actually in use. The result is plain data for an external renderer.

mod builder;
pub mod style;

pub use builder::build_graph;
pub use style::{LineStyle, NodeShape};

use serde::{Deserialize, Serialize};

use crate::model::{ComputationStatus, Gender, Polarity};

// ============================================================================
// Filters
// ============================================================================

/// Which members become nodes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenderFilter {
    #[default]
    All,
    Male,
    Female,
}

impl GenderFilter {
    pub fn admits(&self, gender: Gender) -> bool {
        match self {
            GenderFilter::All => true,
            GenderFilter::Male => gender == Gender::Male,
            GenderFilter::Female => gender == Gender::Female,
        }
    }
}

/// Which edges survive, by the gender pairing of their endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionGenderFilter {
    #[default]
    All,
    Same,
    Different,
}

/// Restricts the view to one member's connections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FocusMode {
    #[default]
    All,
    Outgoing,
    Incoming,
}

/// Leader marking over received positive nominations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HighlightMode {
    #[default]
    None,
    /// Mark the first N members of the leader ranking.
    TopN(usize),
    /// Mark exactly the member at rank K (1-indexed).
    Kth(usize),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabelMode {
    Initials,
    #[default]
    FullName,
    /// Sequential placeholders ("M1", "M2", …) for anonymized exports.
    Anonymous,
}

/// Caller-supplied view parameters for one graph build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphFilters {
    pub node_gender: GenderFilter,
    pub connection_gender: ConnectionGenderFilter,
    /// Keep only members that appear in at least one nomination record of
    /// the group (as nominator or as a named nominee), the only activity
    /// signal the data model carries.
    pub active_only: bool,
    /// When false, nodes with degree 0 after edge filtering are dropped.
    pub show_isolates: bool,
    /// Full name of the focus member, if any.
    pub focus: Option<String>,
    pub focus_mode: FocusMode,
    /// Render reciprocal edges dashed (unless focus-highlighted).
    pub reciprocal_style: bool,
    /// Color nodes that take part in any reciprocal edge.
    pub reciprocal_color: bool,
    pub highlight: HighlightMode,
    pub labels: LabelMode,
}

impl Default for GraphFilters {
    fn default() -> Self {
        Self {
            node_gender: GenderFilter::All,
            connection_gender: ConnectionGenderFilter::All,
            active_only: false,
            show_isolates: true,
            focus: None,
            focus_mode: FocusMode::All,
            reciprocal_style: false,
            reciprocal_color: false,
            highlight: HighlightMode::None,
            labels: LabelMode::FullName,
        }
    }
}

// ============================================================================
// Styled result
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyledNode {
    /// Canonical full-name key.
    pub name: String,
    /// Rendered label per the label mode.
    pub label: String,
    pub gender: Gender,
    pub shape: NodeShape,
    pub color: String,
    pub opacity: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyledEdge {
    pub source: String,
    pub target: String,
    pub question_key: String,
    pub choice_rank: usize,
    pub polarity: Polarity,
    pub color: String,
    pub line_style: LineStyle,
    pub width: f32,
    pub opacity: f32,
    /// True iff the reverse edge exists in the same filtered edge set.
    pub reciprocal: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeLegendEntry {
    pub color: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeLegendEntry {
    pub color: String,
    pub line_style: LineStyle,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidthLegendEntry {
    pub width: f32,
    pub description: String,
}

/// Legend of the mappings actually present in the rendered graph. Unused
/// categories are omitted so renderers never list colors nothing carries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Legend {
    pub nodes: Vec<NodeLegendEntry>,
    pub edges: Vec<EdgeLegendEntry>,
    pub widths: Vec<WidthLegendEntry>,
    /// A dashed "reciprocal" sample line should be shown.
    pub reciprocal_dashed: bool,
}

/// The styled relationship graph. Owned by the caller; carries no reference
/// back to the store and is recomputed fresh on every invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyledGraph {
    pub status: ComputationStatus,
    pub nodes: Vec<StyledNode>,
    pub edges: Vec<StyledEdge>,
    pub legend: Legend,
    pub warnings: Vec<String>,
}

impl StyledGraph {
    pub(crate) fn empty(status: ComputationStatus, warnings: Vec<String>) -> Self {
        Self {
            status,
            nodes: Vec::new(),
            edges: Vec::new(),
            legend: Legend::default(),
            warnings,
        }
    }
}
