//! Graph construction pipeline: filter nodes, filter edges, detect
//! reciprocity, apply focus/leader styling, assemble the legend.

use hashbrown::{HashMap, HashSet};
use tracing::debug;

use crate::Result;
use crate::index::{self, ResolvedNomination};
use crate::model::{ComputationStatus, Gender, GroupRef, Polarity, QuestionDefinition};
use crate::names;
use crate::store::RecordStore;

use super::style::{self, LineStyle, NodeShape};
use super::{
    ConnectionGenderFilter, EdgeLegendEntry, FocusMode, GraphFilters, HighlightMode, LabelMode,
    Legend, NodeLegendEntry, StyledEdge, StyledGraph, StyledNode, WidthLegendEntry,
};

struct NodeInfo {
    name: String,
    initials: String,
    gender: Gender,
}

/// Build the styled relationship graph for a group.
///
/// Empty inputs never raise: an empty roster (before or after filtering)
/// yields an explicit empty-graph result, and an empty question selection
/// yields nodes without edges.
pub fn build_graph<S: RecordStore>(
    store: &S,
    group: &GroupRef,
    question_keys: &[String],
    filters: &GraphFilters,
) -> Result<StyledGraph> {
    let roster = store.members(group)?;
    let definitions = store.question_definitions(group)?;
    if roster.is_empty() {
        debug!(group = %group, "empty roster, returning empty graph");
        return Ok(StyledGraph::empty(ComputationStatus::EmptyRoster, Vec::new()));
    }

    let resolved = index::resolve_nominations(store, group, question_keys)?;

    // Activity signal: a member counts as active when any nomination record
    // of the group names them, on either end, regardless of the selection.
    let active: HashSet<String> = if filters.active_only {
        let mut set = HashSet::new();
        for record in store.nominations(group)? {
            set.insert(names::normalize(&record.nominator));
            for nominee in &record.nominees {
                set.insert(names::normalize(nominee));
            }
        }
        set
    } else {
        HashSet::new()
    };

    // Node set, data order preserved.
    let mut node_infos: Vec<NodeInfo> = roster
        .iter()
        .filter(|m| filters.node_gender.admits(m.gender))
        .filter(|m| !filters.active_only || active.contains(&m.normalized_key()))
        .map(|m| NodeInfo {
            name: m.full_name(),
            initials: m.initials(),
            gender: m.gender,
        })
        .collect();

    let gender_of: HashMap<String, Gender> = node_infos
        .iter()
        .map(|n| (n.name.clone(), n.gender))
        .collect();

    // Edge set: both endpoints must be nodes, then the connection-gender
    // filter applies.
    let edges: Vec<&ResolvedNomination> = resolved
        .entries
        .iter()
        .filter(|e| gender_of.contains_key(&e.nominator) && gender_of.contains_key(&e.nominee))
        .filter(|e| match filters.connection_gender {
            ConnectionGenderFilter::All => true,
            ConnectionGenderFilter::Same => gender_of.get(&e.nominator) == gender_of.get(&e.nominee),
            ConnectionGenderFilter::Different => {
                gender_of.get(&e.nominator) != gender_of.get(&e.nominee)
            }
        })
        .collect();

    let mut degree: HashMap<&str, usize> = HashMap::new();
    for e in &edges {
        *degree.entry(e.nominator.as_str()).or_default() += 1;
        *degree.entry(e.nominee.as_str()).or_default() += 1;
    }

    if !filters.show_isolates {
        node_infos.retain(|n| degree.get(n.name.as_str()).copied().unwrap_or(0) > 0);
    }
    if node_infos.is_empty() {
        debug!(group = %group, "no nodes survived filtering, returning empty graph");
        return Ok(StyledGraph::empty(ComputationStatus::EmptyRoster, resolved.warnings));
    }

    // Reciprocity is symmetric over the filtered edge set, regardless of
    // which question either direction came from.
    let pair_set: HashSet<(&str, &str)> = edges
        .iter()
        .map(|e| (e.nominator.as_str(), e.nominee.as_str()))
        .collect();
    let is_reciprocal =
        |e: &ResolvedNomination| pair_set.contains(&(e.nominee.as_str(), e.nominator.as_str()));

    let reciprocal_nodes: HashSet<&str> = edges
        .iter()
        .filter(|e| is_reciprocal(e))
        .flat_map(|e| [e.nominator.as_str(), e.nominee.as_str()])
        .collect();

    // Focus member, matched by normalized name against the node set.
    let focus: Option<String> = filters.focus.as_ref().and_then(|f| {
        let key = names::normalize(f);
        node_infos
            .iter()
            .find(|n| names::normalize(&n.name) == key)
            .map(|n| n.name.clone())
    });
    let focus_active = focus.is_some();

    let mut focus_set: HashSet<&str> = HashSet::new();
    if let Some(f) = &focus {
        focus_set.insert(f.as_str());
        for e in &edges {
            if e.nominator == *f
                && matches!(filters.focus_mode, FocusMode::All | FocusMode::Outgoing)
            {
                focus_set.insert(e.nominee.as_str());
            }
            if e.nominee == *f
                && matches!(filters.focus_mode, FocusMode::All | FocusMode::Incoming)
            {
                focus_set.insert(e.nominator.as_str());
            }
        }
    }

    // Leader ranking: received positive nominations, ties broken by name.
    let leaders: HashSet<String> = match filters.highlight {
        HighlightMode::None => HashSet::new(),
        mode => {
            let mut received: HashMap<&str, usize> =
                node_infos.iter().map(|n| (n.name.as_str(), 0)).collect();
            for e in &edges {
                if e.polarity == Polarity::Positive {
                    if let Some(count) = received.get_mut(e.nominee.as_str()) {
                        *count += 1;
                    }
                }
            }
            let mut ranking: Vec<(&str, usize)> = received.into_iter().collect();
            ranking.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
            match mode {
                HighlightMode::TopN(n) => {
                    ranking.iter().take(n).map(|(name, _)| name.to_string()).collect()
                }
                HighlightMode::Kth(k) if k >= 1 => ranking
                    .get(k - 1)
                    .map(|(name, _)| name.to_string())
                    .into_iter()
                    .collect(),
                _ => HashSet::new(),
            }
        }
    };

    // ------------------------------------------------------------------
    // Node styling. Color precedence, highest first:
    // focus-related > leader > reciprocal-filter > isolate > gender.
    // ------------------------------------------------------------------
    let mut styled_nodes = Vec::with_capacity(node_infos.len());
    for (i, info) in node_infos.iter().enumerate() {
        let name = info.name.as_str();
        let in_focus_set = focus_set.contains(name);
        let dimmed = focus_active && !in_focus_set;

        let color = if focus_active && in_focus_set {
            if focus.as_deref() == Some(name) {
                style::NODE_FOCUS
            } else {
                style::NODE_FOCUS_LINKED
            }
        } else if leaders.contains(name) {
            style::NODE_LEADER
        } else if filters.reciprocal_color && reciprocal_nodes.contains(name) {
            style::NODE_RECIPROCAL
        } else if filters.show_isolates && degree.get(name).copied().unwrap_or(0) == 0 {
            style::NODE_ISOLATE
        } else {
            style::gender_color(info.gender)
        };

        let label = match filters.labels {
            LabelMode::Initials => info.initials.clone(),
            LabelMode::FullName => info.name.clone(),
            LabelMode::Anonymous => format!("M{}", i + 1),
        };

        styled_nodes.push(StyledNode {
            name: info.name.clone(),
            label,
            gender: info.gender,
            shape: NodeShape::for_gender(info.gender),
            color: color.to_string(),
            opacity: if dimmed { style::DIMMED_NODE_OPACITY } else { 1.0 },
        });
    }

    // ------------------------------------------------------------------
    // Edge styling.
    // ------------------------------------------------------------------
    let palette: HashMap<&str, &'static str> = question_keys
        .iter()
        .zip(style::QUESTION_PALETTE)
        .map(|(k, c)| (k.as_str(), c))
        .collect();
    let question_color = |key: &str, polarity: Polarity| -> &'static str {
        if polarity == Polarity::Negative {
            style::EDGE_NEGATIVE
        } else {
            palette.get(key).copied().unwrap_or(style::EDGE_FALLBACK)
        }
    };

    let mut styled_edges = Vec::with_capacity(edges.len());
    for e in &edges {
        let reciprocal = is_reciprocal(e);
        let relevant = match (&focus, filters.focus_mode) {
            (None, _) => true,
            (Some(f), FocusMode::Outgoing) => e.nominator == *f,
            (Some(f), FocusMode::Incoming) => e.nominee == *f,
            (Some(f), FocusMode::All) => e.nominator == *f || e.nominee == *f,
        };

        let (color, line_style) = if focus_active && relevant {
            // Focus edges get direction colors and a dotted style,
            // overriding the per-question palette.
            let f = focus.as_deref().unwrap_or_default();
            if e.nominator == f && reciprocal && filters.focus_mode == FocusMode::All {
                (style::EDGE_FOCUS_RECIPROCAL, LineStyle::Dotted)
            } else if e.nominator == f {
                (style::EDGE_FOCUS_OUTGOING, LineStyle::Dotted)
            } else {
                (style::EDGE_FOCUS_INCOMING, LineStyle::Dotted)
            }
        } else {
            let color = question_color(&e.question_key, e.polarity);
            let line_style = if filters.reciprocal_style && reciprocal {
                LineStyle::Dashed
            } else {
                LineStyle::Solid
            };
            (color, line_style)
        };

        styled_edges.push(StyledEdge {
            source: e.nominator.clone(),
            target: e.nominee.clone(),
            question_key: e.question_key.clone(),
            choice_rank: e.choice_rank,
            polarity: e.polarity,
            color: color.to_string(),
            line_style,
            width: style::width_for_rank(e.choice_rank),
            opacity: if relevant { 1.0 } else { style::DIMMED_EDGE_OPACITY },
            reciprocal,
        });
    }

    let legend = build_legend(
        &styled_nodes,
        &styled_edges,
        focus_active,
        question_keys,
        &definitions,
        &palette,
    );

    // Nodes are still reported without a selection; the status flags why
    // there are no edges.
    let status = if question_keys.is_empty() {
        ComputationStatus::EmptySelection
    } else {
        ComputationStatus::Complete
    };

    Ok(StyledGraph {
        status,
        nodes: styled_nodes,
        edges: styled_edges,
        legend,
        warnings: resolved.warnings,
    })
}

/// Assemble the legend from the mappings actually present: dimmed nodes and
/// irrelevant edges don't contribute, so the legend never lists categories
/// nothing visible carries.
fn build_legend(
    nodes: &[StyledNode],
    edges: &[StyledEdge],
    focus_active: bool,
    question_keys: &[String],
    definitions: &[QuestionDefinition],
    palette: &HashMap<&str, &'static str>,
) -> Legend {
    let mut legend = Legend::default();

    let used_node_colors: HashSet<&str> = nodes
        .iter()
        .filter(|n| n.opacity > style::DIMMED_NODE_OPACITY)
        .map(|n| n.color.as_str())
        .collect();
    for (color, description) in [
        (style::NODE_FOCUS, "Focus"),
        (style::NODE_FOCUS_LINKED, "Connected to focus"),
        (style::NODE_LEADER, "Leader"),
        (style::NODE_RECIPROCAL, "Reciprocal"),
        (style::NODE_ISOLATE, "Not chosen"),
        (style::NODE_MALE, "Male"),
        (style::NODE_FEMALE, "Female"),
        (style::NODE_UNKNOWN, "Other/Unknown"),
    ] {
        if used_node_colors.contains(color) {
            legend.nodes.push(NodeLegendEntry {
                color: color.to_string(),
                description: description.to_string(),
            });
        }
    }

    let active_edge_colors: HashSet<&str> = edges
        .iter()
        .filter(|e| e.opacity > style::DIMMED_EDGE_OPACITY)
        .map(|e| e.color.as_str())
        .collect();

    if focus_active {
        for (color, description) in [
            (style::EDGE_FOCUS_OUTGOING, "Outgoing"),
            (style::EDGE_FOCUS_INCOMING, "Incoming"),
            (style::EDGE_FOCUS_RECIPROCAL, "Reciprocal with focus"),
        ] {
            if active_edge_colors.contains(color) {
                legend.edges.push(EdgeLegendEntry {
                    color: color.to_string(),
                    line_style: LineStyle::Dotted,
                    description: description.to_string(),
                });
            }
        }
    } else {
        let mut seen_colors: HashSet<&str> = HashSet::new();
        for key in question_keys {
            let def = definitions.iter().find(|d| d.data_key == *key);
            let polarity = def.map(|d| d.polarity).unwrap_or(Polarity::Neutral);
            let color = if polarity == Polarity::Negative {
                style::EDGE_NEGATIVE
            } else {
                palette.get(key.as_str()).copied().unwrap_or(style::EDGE_FALLBACK)
            };
            if !active_edge_colors.contains(color) || !seen_colors.insert(color) {
                continue;
            }
            let description = def
                .map(|d| d.option_label())
                .unwrap_or_else(|| format!("({}) General", Polarity::Neutral.prefix()));
            legend.edges.push(EdgeLegendEntry {
                color: color.to_string(),
                line_style: LineStyle::Solid,
                description,
            });
        }
        legend.reciprocal_dashed = edges.iter().any(|e| e.line_style == LineStyle::Dashed);
    }

    let active_ranks: HashSet<usize> = edges
        .iter()
        .filter(|e| e.opacity > style::DIMMED_EDGE_OPACITY)
        .map(|e| e.choice_rank)
        .collect();
    for rank in 0..3 {
        if active_ranks.contains(&rank) {
            if let Some(description) = style::rank_tier_label(rank) {
                legend.widths.push(WidthLegendEntry {
                    width: style::width_for_rank(rank),
                    description: description.to_string(),
                });
            }
        }
    }

    legend
}
