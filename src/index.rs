//! Nomination index: resolves stored answers into normalized edges.
//!
//! All three computations start here: every nomination record of a group
//! whose question key is selected becomes a sequence of resolved
//! (nominator, nominee, question, rank, polarity) entries. Free-text names
//! that do not match any current member are skipped and reported as
//! warnings, never silently dropped and never fatal.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::Result;
use crate::model::{GroupRef, Member, Polarity};
use crate::names;
use crate::store::RecordStore;

// ============================================================================
// Resolved entries
// ============================================================================

/// One resolved nomination edge. Both endpoints are canonical full-name
/// keys of current roster members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedNomination {
    pub nominator: String,
    pub nominee: String,
    pub question_key: String,
    /// Position of the nominee within the answer (0 = first choice).
    pub choice_rank: usize,
    /// Taken from the question definition; `Neutral` when no definition
    /// exists for the question key.
    pub polarity: Polarity,
}

/// Result of resolving a (group, question selection) pair: the entries in
/// stored order, plus non-fatal warnings for everything that didn't match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolvedNominations {
    pub entries: Vec<ResolvedNomination>,
    pub warnings: Vec<String>,
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve every stored nomination of `group` for the selected questions.
///
/// Entries are never reordered: records are walked in stored order and
/// nominees keep their choice rank. An unresolvable nominator skips the
/// whole record; an unresolvable nominee skips just that entry. Both are
/// reported in the warnings list.
pub fn resolve_nominations<S: RecordStore>(
    store: &S,
    group: &GroupRef,
    question_keys: &[String],
) -> Result<ResolvedNominations> {
    let roster = store.members(group)?;
    let definitions = store.question_definitions(group)?;
    let records = store.nominations(group)?;

    let member_map = member_lookup(&roster);
    let polarity_by_key: HashMap<&str, Polarity> = definitions
        .iter()
        .map(|d| (d.data_key.as_str(), d.polarity))
        .collect();

    let mut resolved = ResolvedNominations::default();
    for record in &records {
        if !question_keys.contains(&record.question_key) {
            continue;
        }

        let Some(nominator) = member_map.get(names::normalize(&record.nominator).as_str()) else {
            warn!(group = %group, nominator = %record.nominator, "nominator does not match any current member");
            resolved.warnings.push(format!(
                "nominator '{}' does not match any current member",
                record.nominator
            ));
            continue;
        };

        let polarity = match polarity_by_key.get(record.question_key.as_str()) {
            Some(p) => *p,
            None => {
                debug!(group = %group, question = %record.question_key, "no definition for question key, defaulting to neutral polarity");
                Polarity::Neutral
            }
        };

        for (rank, nominee_text) in record.nominees.iter().enumerate() {
            match member_map.get(names::normalize(nominee_text).as_str()) {
                Some(nominee) => resolved.entries.push(ResolvedNomination {
                    nominator: nominator.clone(),
                    nominee: nominee.clone(),
                    question_key: record.question_key.clone(),
                    choice_rank: rank,
                    polarity,
                }),
                None => {
                    warn!(group = %group, nominee = %nominee_text, "nominee does not match any current member");
                    resolved.warnings.push(format!(
                        "nominee '{}' does not match any current member",
                        nominee_text
                    ));
                }
            }
        }
    }

    Ok(resolved)
}

/// Normalized-name → canonical full-name map over a roster.
pub(crate) fn member_lookup(roster: &[Member]) -> HashMap<String, String> {
    roster
        .iter()
        .map(|m| (m.normalized_key(), m.full_name()))
        .collect()
}
