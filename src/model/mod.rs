//! Typed survey records and shared result vocabulary.
//!
//! The reference data for a computation (members, question definitions,
//! nomination records) is owned by the [`crate::store::RecordStore`]; the
//! engine reads it and never writes it back. Everything here is a plain
//! serde-friendly DTO.

mod member;
mod nomination;
mod question;

pub use member::{Gender, Member};
pub use nomination::NominationRecord;
pub use question::{Polarity, QuestionDefinition};

use serde::{Deserialize, Serialize};

// ============================================================================
// Group reference
// ============================================================================

/// Identifies one group within one institution. Every store accessor and
/// every computation is scoped to a `GroupRef`; a missing group is the one
/// hard precondition failure in the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupRef {
    pub institution: String,
    pub group: String,
}

impl GroupRef {
    pub fn new(institution: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            institution: institution.into(),
            group: group.into(),
        }
    }
}

impl std::fmt::Display for GroupRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.institution, self.group)
    }
}

// ============================================================================
// Computation status
// ============================================================================

/// Why a result may be empty. Empty input is not an error: a group with no
/// members or a call with no selected questions yields an explicitly empty
/// result carrying one of these flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComputationStatus {
    /// Inputs were non-empty and the result is fully populated.
    Complete,
    /// The group has no members (or none survived the node filters).
    EmptyRoster,
    /// No question keys were selected.
    EmptySelection,
}
