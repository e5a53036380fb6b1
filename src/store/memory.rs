//! In-memory record store.
//!
//! This is the reference implementation of `RecordStore`. It uses plain
//! maps protected by RwLock, keyed by `GroupRef`, with rosters kept as
//! insertion-ordered vectors (data order is an invariant downstream
//! consumers rely on).
//!
//! Record invariants are enforced here, at the write boundary, not inside
//! the engine: nominee lists are de-duplicated by normalized name, capped at
//! the question's `max_selections`, and stripped of self-nominations when
//! the question forbids them.
//!
//! Use this store for:
//! - Testing the graph builder, affinity ranker, and matrix aggregator
//! - Embedding the engine in applications that don't need persistence

use std::sync::Arc;

use hashbrown::HashMap;
use parking_lot::RwLock;
use tracing::debug;

use crate::model::{GroupRef, Member, NominationRecord, QuestionDefinition};
use crate::names;
use crate::{Error, Result};
use super::RecordStore;

// ============================================================================
// MemoryStore
// ============================================================================

/// In-memory survey record storage.
pub struct MemoryStore {
    inner: Arc<Inner>,
}

struct Inner {
    /// Registered institution names.
    institutions: RwLock<Vec<String>>,
    /// group → roster, in insertion (data) order.
    rosters: RwLock<HashMap<GroupRef, Vec<Member>>>,
    /// group → question definitions, in insertion order.
    questions: RwLock<HashMap<GroupRef, Vec<QuestionDefinition>>>,
    /// group → nomination records. One record per (nominator, question_key);
    /// re-recording replaces the previous answer.
    responses: RwLock<HashMap<GroupRef, Vec<NominationRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                institutions: RwLock::new(Vec::new()),
                rosters: RwLock::new(HashMap::new()),
                questions: RwLock::new(HashMap::new()),
                responses: RwLock::new(HashMap::new()),
            }),
        }
    }

    /// Register a group (and its institution if new). Idempotent.
    pub fn add_group(&self, group: &GroupRef) {
        {
            let mut institutions = self.inner.institutions.write();
            if !institutions.contains(&group.institution) {
                institutions.push(group.institution.clone());
            }
        }
        self.inner.rosters.write().entry(group.clone()).or_default();
        self.inner.questions.write().entry(group.clone()).or_default();
        self.inner.responses.write().entry(group.clone()).or_default();
    }

    /// Append a member to the group's roster, preserving data order.
    pub fn add_member(&self, group: &GroupRef, member: Member) -> Result<()> {
        let mut rosters = self.inner.rosters.write();
        let roster = rosters
            .get_mut(group)
            .ok_or_else(|| self.missing_group(group))?;
        roster.push(member);
        Ok(())
    }

    /// Add or replace a question definition (matched by `data_key`).
    pub fn define_question(&self, group: &GroupRef, def: QuestionDefinition) -> Result<()> {
        let mut questions = self.inner.questions.write();
        let defs = questions
            .get_mut(group)
            .ok_or_else(|| self.missing_group(group))?;
        if let Some(existing) = defs.iter_mut().find(|d| d.data_key == def.data_key) {
            *existing = def;
        } else {
            defs.push(def);
        }
        Ok(())
    }

    /// Record (or replace) one member's answer to one question, applying the
    /// record invariants: de-duplication by normalized name, self-nomination
    /// removal when disallowed, truncation to the question's max.
    pub fn record_nominations(&self, group: &GroupRef, record: NominationRecord) -> Result<()> {
        let question = self
            .question_definitions(group)?
            .into_iter()
            .find(|d| d.data_key == record.question_key);

        let nominator_key = names::normalize(&record.nominator);
        let allow_self = question.as_ref().map(|q| q.allow_self_selection).unwrap_or(true);
        let max = question.as_ref().map(|q| q.max_selections).unwrap_or(usize::MAX);

        let mut seen: Vec<String> = Vec::new();
        let mut cleaned = NominationRecord::new(
            record.nominator.clone(),
            record.question_key.clone(),
            Vec::<String>::new(),
        );
        for nominee in record.nominees {
            let key = names::normalize(&nominee);
            if key.is_empty() || seen.contains(&key) {
                continue;
            }
            if !allow_self && key == nominator_key {
                debug!(
                    nominator = %record.nominator,
                    question = %record.question_key,
                    "dropping self-nomination on a question that forbids it"
                );
                continue;
            }
            if cleaned.nominees.len() >= max {
                break;
            }
            seen.push(key);
            cleaned.nominees.push(nominee);
        }

        let mut responses = self.inner.responses.write();
        let records = responses
            .get_mut(group)
            .ok_or_else(|| self.missing_group(group))?;
        if let Some(existing) = records.iter_mut().find(|r| {
            r.question_key == cleaned.question_key
                && names::normalize(&r.nominator) == nominator_key
        }) {
            *existing = cleaned;
        } else {
            records.push(cleaned);
        }
        Ok(())
    }

    /// Remove a member and every nomination record they made. Nominations
    /// *naming* them stay as free text and simply stop resolving.
    pub fn remove_member(&self, group: &GroupRef, full_name: &str) -> Result<bool> {
        let key = names::normalize(full_name);
        let removed = {
            let mut rosters = self.inner.rosters.write();
            let roster = rosters
                .get_mut(group)
                .ok_or_else(|| self.missing_group(group))?;
            let before = roster.len();
            roster.retain(|m| m.normalized_key() != key);
            roster.len() != before
        };
        if removed {
            let mut responses = self.inner.responses.write();
            if let Some(records) = responses.get_mut(group) {
                records.retain(|r| names::normalize(&r.nominator) != key);
            }
        }
        Ok(removed)
    }

    fn missing_group(&self, group: &GroupRef) -> Error {
        if self.inner.institutions.read().contains(&group.institution) {
            Error::GroupNotFound {
                institution: group.institution.clone(),
                group: group.group.clone(),
            }
        } else {
            Error::InstitutionNotFound(group.institution.clone())
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// RecordStore impl
// ============================================================================

impl RecordStore for MemoryStore {
    fn members(&self, group: &GroupRef) -> Result<Vec<Member>> {
        self.inner
            .rosters
            .read()
            .get(group)
            .cloned()
            .ok_or_else(|| self.missing_group(group))
    }

    fn question_definitions(&self, group: &GroupRef) -> Result<Vec<QuestionDefinition>> {
        self.inner
            .questions
            .read()
            .get(group)
            .cloned()
            .ok_or_else(|| self.missing_group(group))
    }

    fn nominations(&self, group: &GroupRef) -> Result<Vec<NominationRecord>> {
        self.inner
            .responses
            .read()
            .get(group)
            .cloned()
            .ok_or_else(|| self.missing_group(group))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Gender, Polarity};

    fn group() -> GroupRef {
        GroupRef::new("Colegio Cervantes", "4to Grado A")
    }

    fn store_with_group() -> MemoryStore {
        let store = MemoryStore::new();
        store.add_group(&group());
        store
    }

    #[test]
    fn test_unknown_group_is_hard_error() {
        let store = store_with_group();
        let missing = GroupRef::new("Colegio Cervantes", "5to Grado Z");
        assert!(matches!(
            store.members(&missing),
            Err(Error::GroupNotFound { .. })
        ));
        let missing_inst = GroupRef::new("Nowhere", "4to Grado A");
        assert!(matches!(
            store.members(&missing_inst),
            Err(Error::InstitutionNotFound(_))
        ));
    }

    #[test]
    fn test_roster_keeps_data_order() {
        let store = store_with_group();
        store.add_member(&group(), Member::new("Zoe", "Álvarez", Gender::Female)).unwrap();
        store.add_member(&group(), Member::new("Ana", "Zapata", Gender::Female)).unwrap();

        let roster = store.members(&group()).unwrap();
        let names: Vec<String> = roster.iter().map(|m| m.full_name()).collect();
        assert_eq!(names, vec!["Zoe Álvarez", "Ana Zapata"]);
    }

    #[test]
    fn test_record_nominations_dedups_and_caps() {
        let store = store_with_group();
        store
            .define_question(
                &group(),
                QuestionDefinition::new("q1", "Seating", Polarity::Positive).with_max_selections(2),
            )
            .unwrap();

        store
            .record_nominations(
                &group(),
                NominationRecord::new(
                    "Ana Zapata",
                    "q1",
                    // duplicate (by normalization) + over the cap
                    vec!["José Pérez", "jose perez", "Luis Gil", "Eva Soto"],
                ),
            )
            .unwrap();

        let records = store.nominations(&group()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].nominees.as_slice(), ["José Pérez", "Luis Gil"]);
    }

    #[test]
    fn test_record_nominations_strips_disallowed_self() {
        let store = store_with_group();
        store
            .define_question(
                &group(),
                QuestionDefinition::new("q1", "Seating", Polarity::Positive).with_max_selections(2),
            )
            .unwrap();

        store
            .record_nominations(
                &group(),
                NominationRecord::new("Ana Zapata", "q1", vec!["ana zapata", "Luis Gil"]),
            )
            .unwrap();

        let records = store.nominations(&group()).unwrap();
        assert_eq!(records[0].nominees.as_slice(), ["Luis Gil"]);
    }

    #[test]
    fn test_rerecording_replaces_previous_answer() {
        let store = store_with_group();
        store
            .define_question(
                &group(),
                QuestionDefinition::new("q1", "Seating", Polarity::Positive).with_max_selections(2),
            )
            .unwrap();

        store
            .record_nominations(&group(), NominationRecord::new("Ana Zapata", "q1", vec!["Luis Gil"]))
            .unwrap();
        store
            .record_nominations(&group(), NominationRecord::new("ANA ZAPATA", "q1", vec!["Eva Soto"]))
            .unwrap();

        let records = store.nominations(&group()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].nominees.as_slice(), ["Eva Soto"]);
    }

    #[test]
    fn test_question_options_ordered_by_rank() {
        let store = store_with_group();
        store
            .define_question(
                &group(),
                QuestionDefinition::new("q_b", "Play", Polarity::Negative).with_order(2),
            )
            .unwrap();
        store
            .define_question(
                &group(),
                QuestionDefinition::new("q_a", "Seating", Polarity::Positive).with_order(1),
            )
            .unwrap();

        let options = store.question_options(&group()).unwrap();
        assert_eq!(
            options,
            vec![
                ("q_a".to_string(), "(Pos) Seating".to_string()),
                ("q_b".to_string(), "(Neg) Play".to_string()),
            ]
        );
    }

    #[test]
    fn test_remove_member_drops_their_records() {
        let store = store_with_group();
        store.add_member(&group(), Member::new("Ana", "Zapata", Gender::Female)).unwrap();
        store
            .define_question(&group(), QuestionDefinition::new("q1", "Seating", Polarity::Positive))
            .unwrap();
        store
            .record_nominations(&group(), NominationRecord::new("Ana Zapata", "q1", vec!["Luis Gil"]))
            .unwrap();

        assert!(store.remove_member(&group(), "ana ZAPATA").unwrap());
        assert!(store.members(&group()).unwrap().is_empty());
        assert!(store.nominations(&group()).unwrap().is_empty());
    }
}
