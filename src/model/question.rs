//! Question definitions: the typed prompts members answered.

use serde::{Deserialize, Serialize};

/// Whether a question expresses acceptance or rejection. Nominations inherit
/// the polarity of their question; entries whose question definition cannot
/// be found default to `Neutral` rather than failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Polarity {
    Positive,
    Negative,
    Neutral,
}

impl Polarity {
    /// Three-letter prefix used in option labels: "(Pos) Seating".
    pub fn prefix(&self) -> &'static str {
        match self {
            Polarity::Positive => "Pos",
            Polarity::Negative => "Neg",
            Polarity::Neutral => "Neu",
        }
    }
}

/// A survey question. Immutable input to the engine per computation; the
/// `data_key` is what nomination records and computation calls reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionDefinition {
    pub id: String,
    /// Key under which answers are stored. Usually equal to `id`.
    pub data_key: String,
    /// Display text of the prompt.
    pub text: String,
    /// Category label, e.g. "Seating" or "Group Work".
    pub category: String,
    pub polarity: Polarity,
    /// Sort rank for presentation; lower comes first.
    pub order: u32,
    /// Upper bound on the nominee list length of one answer.
    pub max_selections: usize,
    pub allow_self_selection: bool,
}

impl QuestionDefinition {
    pub fn new(id: impl Into<String>, category: impl Into<String>, polarity: Polarity) -> Self {
        let id = id.into();
        Self {
            data_key: id.clone(),
            id,
            text: String::new(),
            category: category.into(),
            polarity,
            order: 0,
            max_selections: 2,
            allow_self_selection: false,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_order(mut self, order: u32) -> Self {
        self.order = order;
        self
    }

    pub fn with_max_selections(mut self, max: usize) -> Self {
        self.max_selections = max;
        self
    }

    pub fn allowing_self_selection(mut self) -> Self {
        self.allow_self_selection = true;
        self
    }

    /// Checkbox/legend label: polarity prefix + category.
    pub fn option_label(&self) -> String {
        format!("({}) {}", self.polarity.prefix(), self.category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_label() {
        let q = QuestionDefinition::new("q_seat_pos", "Seating", Polarity::Positive);
        assert_eq!(q.option_label(), "(Pos) Seating");

        let q = QuestionDefinition::new("q_seat_neg", "Seating", Polarity::Negative);
        assert_eq!(q.option_label(), "(Neg) Seating");
    }
}
