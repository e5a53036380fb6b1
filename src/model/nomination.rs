//! Nomination records: one member's answer to one question.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// One stored answer: an ordered list of nominee names a member gave for one
/// question. Position in the list is the choice-order rank (0 = first
/// choice). The store validates the invariants at insertion time: the list
/// is at most `max_selections` long, holds no duplicate nominee (by
/// normalized name), and contains the nominator only when the question
/// allows self-selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NominationRecord {
    /// Full-name key of the member who answered.
    pub nominator: String,
    /// `data_key` of the question answered.
    pub question_key: String,
    /// Free-text nominee names, in choice order.
    pub nominees: SmallVec<[String; 4]>,
}

impl NominationRecord {
    pub fn new(
        nominator: impl Into<String>,
        question_key: impl Into<String>,
        nominees: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            nominator: nominator.into(),
            question_key: question_key.into(),
            nominees: nominees.into_iter().map(Into::into).collect(),
        }
    }
}
