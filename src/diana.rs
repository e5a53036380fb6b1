//! Affinity diana: concentric-ring placement by received nominations.
//!
//! Every member gets a score (total nominations received over the selected
//! questions, any polarity mix) and a ring: the highest score sits on the
//! innermost ring, the lowest on the outermost, intermediate distinct
//! scores interpolated linearly. Members sharing a score share a ring and
//! are spaced evenly around it.
//!
//! The initial angle of each score group comes from a caller-seeded RNG:
//! equal seeds reproduce the exact layout, different seeds vary the look
//! without touching scores or radii.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;

use crate::Result;
use crate::index;
use crate::model::{ComputationStatus, Gender, GroupRef};
use crate::store::RecordStore;

/// Ring radii as fractions of the diagram's half-extent.
const INNER_RADIUS: f64 = 0.15;
const OUTER_RADIUS: f64 = 0.98;

const TAU: f64 = std::f64::consts::TAU;

// ============================================================================
// Options and result
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DianaOptions {
    /// Include the resolved nominations as connector edges between placed
    /// positions (drawn as curved arrows that stop short of the markers).
    pub show_lines: bool,
    /// Seed for the per-score-group initial angles.
    pub seed: u64,
}

impl Default for DianaOptions {
    fn default() -> Self {
        Self {
            show_lines: true,
            seed: 0,
        }
    }
}

/// Marker symbol encoding gender in the diana.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DianaMarker {
    Circle,
    Triangle,
    Square,
}

impl DianaMarker {
    pub fn for_gender(gender: Gender) -> Self {
        match gender {
            Gender::Male => DianaMarker::Circle,
            Gender::Female => DianaMarker::Triangle,
            Gender::Unknown => DianaMarker::Square,
        }
    }

    pub fn fill_color(&self) -> &'static str {
        match self {
            DianaMarker::Circle => "#ADD8E6",
            DianaMarker::Triangle => "#FFC0CB",
            DianaMarker::Square => "#A0E0A0",
        }
    }
}

/// One placed member: score, polar position, and the equivalent cartesian
/// coordinates (unit half-extent).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedMember {
    pub name: String,
    pub initials: String,
    pub gender: Gender,
    pub marker: DianaMarker,
    pub score: u32,
    /// Received counts broken down by choice-order rank (index 0 = times
    /// named as first choice).
    pub by_rank: SmallVec<[u32; 4]>,
    pub radius: f64,
    pub angle: f64,
    pub x: f64,
    pub y: f64,
}

/// One dotted score circle, annotated with its score value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRing {
    pub score: u32,
    pub radius: f64,
}

/// Optional connector between two placed members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectorEdge {
    pub nominator: String,
    pub nominee: String,
    pub question_key: String,
    pub choice_rank: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerLegendEntry {
    pub gender: Gender,
    pub marker: DianaMarker,
    pub color: String,
}

/// The computed diana. Placements are in ranking order (best first); rings
/// are in descending score order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffinityLayout {
    pub status: ComputationStatus,
    pub placements: Vec<PlacedMember>,
    pub rings: Vec<ScoreRing>,
    pub connectors: Vec<ConnectorEdge>,
    pub legend: Vec<MarkerLegendEntry>,
    pub warnings: Vec<String>,
}

impl AffinityLayout {
    fn empty(status: ComputationStatus, warnings: Vec<String>) -> Self {
        Self {
            status,
            placements: Vec::new(),
            rings: Vec::new(),
            connectors: Vec::new(),
            legend: marker_legend(),
            warnings,
        }
    }
}

fn marker_legend() -> Vec<MarkerLegendEntry> {
    [Gender::Male, Gender::Female, Gender::Unknown]
        .into_iter()
        .map(|gender| {
            let marker = DianaMarker::for_gender(gender);
            MarkerLegendEntry {
                gender,
                marker,
                color: marker.fill_color().to_string(),
            }
        })
        .collect()
}

// ============================================================================
// Ranking and placement
// ============================================================================

/// Compute the affinity ranking and radial placement for a group.
pub fn rank_affinity<S: RecordStore>(
    store: &S,
    group: &GroupRef,
    question_keys: &[String],
    options: &DianaOptions,
) -> Result<AffinityLayout> {
    let roster = store.members(group)?;
    if roster.is_empty() {
        debug!(group = %group, "empty roster, returning empty diana");
        return Ok(AffinityLayout::empty(ComputationStatus::EmptyRoster, Vec::new()));
    }
    if question_keys.is_empty() {
        debug!(group = %group, "no questions selected, returning empty diana");
        return Ok(AffinityLayout::empty(ComputationStatus::EmptySelection, Vec::new()));
    }

    let resolved = index::resolve_nominations(store, group, question_keys)?;

    // Score every roster member, including those never nominated.
    struct Scored {
        name: String,
        initials: String,
        gender: Gender,
        total: u32,
        by_rank: SmallVec<[u32; 4]>,
    }
    let mut scored: Vec<Scored> = roster
        .iter()
        .map(|m| Scored {
            name: m.full_name(),
            initials: m.initials(),
            gender: m.gender,
            total: 0,
            by_rank: SmallVec::new(),
        })
        .collect();
    for entry in &resolved.entries {
        if let Some(s) = scored.iter_mut().find(|s| s.name == entry.nominee) {
            s.total += 1;
            while s.by_rank.len() <= entry.choice_rank {
                s.by_rank.push(0);
            }
            s.by_rank[entry.choice_rank] += 1;
        }
    }

    // Deterministic ranking: total, then the per-rank breakdown, all
    // descending; name ascending as the final tie-break.
    scored.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| rank_vec_cmp(&b.by_rank, &a.by_rank))
            .then_with(|| a.name.cmp(&b.name))
    });

    // One ring per distinct score: best score innermost, worst outermost,
    // linear in between. A single distinct score means a single outer ring.
    let mut distinct_scores: Vec<u32> = scored.iter().map(|s| s.total).collect();
    distinct_scores.dedup();
    let rings: Vec<ScoreRing> = distinct_scores
        .iter()
        .map(|&score| ScoreRing {
            score,
            radius: radius_for(score, distinct_scores[0], *distinct_scores.last().unwrap_or(&0)),
        })
        .collect();

    // Place each score group evenly around its ring, starting from a seeded
    // random initial angle. Groups are visited in descending score order so
    // the RNG stream, and therefore the layout, is a pure function of
    // (input, seed).
    let mut rng = StdRng::seed_from_u64(options.seed);
    let mut placements: Vec<PlacedMember> = Vec::with_capacity(scored.len());
    let mut start = 0;
    while start < scored.len() {
        let score = scored[start].total;
        let end = scored[start..]
            .iter()
            .position(|s| s.total != score)
            .map(|p| start + p)
            .unwrap_or(scored.len());
        let group_size = end - start;
        let radius = rings
            .iter()
            .find(|r| r.score == score)
            .map(|r| r.radius)
            .unwrap_or(OUTER_RADIUS);
        let initial_angle = rng.gen_range(0.0..TAU);

        for (i, s) in scored[start..end].iter().enumerate() {
            let angle = initial_angle + i as f64 * TAU / group_size as f64;
            placements.push(PlacedMember {
                name: s.name.clone(),
                initials: s.initials.clone(),
                gender: s.gender,
                marker: DianaMarker::for_gender(s.gender),
                score: s.total,
                by_rank: s.by_rank.clone(),
                radius,
                angle,
                x: radius * angle.cos(),
                y: radius * angle.sin(),
            });
        }
        start = end;
    }

    let connectors = if options.show_lines {
        resolved
            .entries
            .iter()
            .map(|e| ConnectorEdge {
                nominator: e.nominator.clone(),
                nominee: e.nominee.clone(),
                question_key: e.question_key.clone(),
                choice_rank: e.choice_rank,
            })
            .collect()
    } else {
        Vec::new()
    };

    Ok(AffinityLayout {
        status: ComputationStatus::Complete,
        placements,
        rings,
        connectors,
        legend: marker_legend(),
        warnings: resolved.warnings,
    })
}

/// Radius for a score given the best and worst distinct scores.
fn radius_for(score: u32, best: u32, worst: u32) -> f64 {
    if best == worst {
        OUTER_RADIUS
    } else {
        let frac = (best - score) as f64 / (best - worst) as f64;
        INNER_RADIUS + frac * (OUTER_RADIUS - INNER_RADIUS)
    }
}

/// Lexicographic comparison of rank-count vectors, missing tail counts as 0.
fn rank_vec_cmp(a: &[u32], b: &[u32]) -> std::cmp::Ordering {
    let len = a.len().max(b.len());
    for i in 0..len {
        let av = a.get(i).copied().unwrap_or(0);
        let bv = b.get(i).copied().unwrap_or(0);
        match av.cmp(&bv) {
            std::cmp::Ordering::Equal => continue,
            other => return other,
        }
    }
    std::cmp::Ordering::Equal
}
