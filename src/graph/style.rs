//! Style vocabulary for the sociogram: colors, shapes, line styles, widths.
//!
//! The palette is fixed so that exported diagrams stay comparable across
//! runs; only the *assignment* of palette colors to questions varies with
//! the selection.

use serde::{Deserialize, Serialize};

use crate::model::Gender;

// ============================================================================
// Shapes and line styles
// ============================================================================

/// Node marker shape, keyed by gender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeShape {
    Ellipse,
    Triangle,
    Rectangle,
}

impl NodeShape {
    pub fn for_gender(gender: Gender) -> Self {
        match gender {
            Gender::Male => NodeShape::Ellipse,
            Gender::Female => NodeShape::Triangle,
            Gender::Unknown => NodeShape::Rectangle,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineStyle {
    Solid,
    Dashed,
    Dotted,
}

// ============================================================================
// Node colors
// ============================================================================

pub const NODE_MALE: &str = "skyblue";
pub const NODE_FEMALE: &str = "lightcoral";
pub const NODE_UNKNOWN: &str = "lightgreen";
pub const NODE_FOCUS: &str = "darkorange";
pub const NODE_FOCUS_LINKED: &str = "#FFDB58";
pub const NODE_LEADER: &str = "gold";
pub const NODE_RECIPROCAL: &str = "mediumpurple";
pub const NODE_ISOLATE: &str = "silver";

pub fn gender_color(gender: Gender) -> &'static str {
    match gender {
        Gender::Male => NODE_MALE,
        Gender::Female => NODE_FEMALE,
        Gender::Unknown => NODE_UNKNOWN,
    }
}

// ============================================================================
// Edge colors
// ============================================================================

/// Negative-polarity edges always render in this color, overriding the
/// per-question palette.
pub const EDGE_NEGATIVE: &str = "#dc3545";
/// Assigned to selected questions in order; selections beyond the palette
/// fall back to [`EDGE_FALLBACK`].
pub const QUESTION_PALETTE: [&str; 5] = ["#007bff", "#dc3545", "#ffc107", "#6c757d", "#17a2b8"];
pub const EDGE_FALLBACK: &str = "#ccc";

pub const EDGE_FOCUS_OUTGOING: &str = "#32CD32";
pub const EDGE_FOCUS_INCOMING: &str = "#1E90FF";
pub const EDGE_FOCUS_RECIPROCAL: &str = "#FF8C00";

// ============================================================================
// Opacity and width
// ============================================================================

/// Nodes outside the focus set.
pub const DIMMED_NODE_OPACITY: f32 = 0.15;
/// Edges not relevant to the active focus mode.
pub const DIMMED_EDGE_OPACITY: f32 = 0.1;

pub const MIN_EDGE_WIDTH: f32 = 0.8;

/// Edge width by choice-order rank: first choice widest, then narrowing;
/// ranks past the named tiers share the minimal width.
pub fn width_for_rank(rank: usize) -> f32 {
    match rank {
        0 => 4.0,
        1 => 2.5,
        2 => 1.5,
        _ => MIN_EDGE_WIDTH,
    }
}

/// Legend label for the named width tiers.
pub fn rank_tier_label(rank: usize) -> Option<&'static str> {
    match rank {
        0 => Some("1st choice"),
        1 => Some("2nd choice"),
        2 => Some("3rd choice"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_decreases_then_floors() {
        assert!(width_for_rank(0) > width_for_rank(1));
        assert!(width_for_rank(1) > width_for_rank(2));
        assert!(width_for_rank(2) > width_for_rank(3));
        assert_eq!(width_for_rank(3), width_for_rank(99));
        assert_eq!(width_for_rank(99), MIN_EDGE_WIDTH);
    }

    #[test]
    fn test_named_tiers_match_widths() {
        assert!(rank_tier_label(0).is_some());
        assert!(rank_tier_label(3).is_none());
    }
}
