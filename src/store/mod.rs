//! # Record Store Trait
//!
//! This is THE contract between the computation engine and whatever owns the
//! survey records. The engine only ever reads through it; record CRUD, bulk
//! import, and persistence live behind it, outside this crate's scope.
//!
//! ## Implementations
//!
//! | Store | Module | Description |
//! |-------|--------|-------------|
//! | `MemoryStore` | `memory` | In-memory reference store for testing/embedding |
//!
//! All accessors take a [`GroupRef`] and fail with `GroupNotFound` /
//! `InstitutionNotFound` when the reference does not resolve, the one hard
//! precondition in the engine. A known-but-empty group is not an error.

pub mod memory;

use crate::Result;
use crate::model::{GroupRef, Member, NominationRecord, QuestionDefinition};

pub use memory::MemoryStore;

/// The universal read contract over survey records.
///
/// The returned collections are snapshots: the engine assumes they stay
/// coherent for the duration of one computation and never writes back.
pub trait RecordStore: Send + Sync {
    /// The group's roster, in original insertion order ("data order").
    ///
    /// Data order is load-bearing: sociomatrix columns must align with it,
    /// so implementations must never re-sort the roster.
    fn members(&self, group: &GroupRef) -> Result<Vec<Member>>;

    /// All question definitions of the group.
    fn question_definitions(&self, group: &GroupRef) -> Result<Vec<QuestionDefinition>>;

    /// All stored nomination records of the group.
    fn nominations(&self, group: &GroupRef) -> Result<Vec<NominationRecord>>;

    /// `(data_key, label)` pairs for building question selection UIs,
    /// ordered by the questions' `order` rank, then id.
    fn question_options(&self, group: &GroupRef) -> Result<Vec<(String, String)>> {
        let mut defs = self.question_definitions(group)?;
        defs.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
        Ok(defs
            .into_iter()
            .map(|d| {
                let label = d.option_label();
                (d.data_key, label)
            })
            .collect())
    }
}
