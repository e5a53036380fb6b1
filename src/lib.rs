//! # sociometria: Sociometric Survey Analysis Engine
//!
//! Analyzes peer-nomination survey data: a roster of members who have each
//! nominated peers in response to typed, polarity-tagged questions. Three
//! derived artifacts share one data model:
//!
//! 1. **Sociogram**: a filterable, stylable relationship graph
//! 2. **Affinity diana**: a concentric-ring placement of members by
//!    received-nomination score
//! 3. **Sociomatrix**: a gender-bucketed nominator×nominee count table
//!
//! ## Design Principles
//!
//! 1. **Trait-first**: `RecordStore` is the contract between the engine and
//!    whatever owns the records; the engine never touches global state
//! 2. **Clean DTOs**: `StyledGraph`, `AffinityLayout`, `SociomatrixTable`
//!    are plain data with no reference back to the store
//! 3. **Pure computations**: every operation is a function of the snapshot
//!    it reads at call time; nothing is cached or mutated in place
//! 4. **Warnings, not aborts**: a nominee name that resolves to nobody is
//!    reported alongside the result, never raised
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sociometria::{Engine, GroupRef, GraphFilters, MemoryStore};
//!
//! # fn example() -> sociometria::Result<()> {
//! let store = MemoryStore::new();
//! // ... populate store with members / questions / nominations ...
//!
//! let engine = Engine::new(store);
//! let group = GroupRef::new("Colegio Cervantes", "4to Grado A");
//! let graph = engine.build_graph(
//!     &group,
//!     &["q_seat_pos".into(), "q_work_pos".into()],
//!     &GraphFilters::default(),
//! )?;
//!
//! for edge in &graph.edges {
//!     println!("{} -> {} ({})", edge.source, edge.target, edge.question_key);
//! }
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod names;
pub mod store;
pub mod index;
pub mod graph;
pub mod diana;
pub mod matrix;

// ============================================================================
// Re-exports: Model (the DTOs)
// ============================================================================

pub use model::{
    ComputationStatus, Gender, GroupRef, Member, NominationRecord, Polarity,
    QuestionDefinition,
};

// ============================================================================
// Re-exports: Store
// ============================================================================

pub use store::{MemoryStore, RecordStore};

// ============================================================================
// Re-exports: Computations
// ============================================================================

pub use index::{ResolvedNomination, ResolvedNominations};
pub use graph::{FocusMode, GraphFilters, HighlightMode, LabelMode, StyledGraph};
pub use diana::{AffinityLayout, DianaOptions};
pub use matrix::SociomatrixTable;

// ============================================================================
// Top-level Engine handle
// ============================================================================

/// The primary entry point. An `Engine` wraps a record store and provides
/// the three sociometric computations.
pub struct Engine<S: RecordStore> {
    store: S,
}

impl<S: RecordStore> Engine<S> {
    /// Create an Engine over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Build the filtered, styled relationship graph for a group.
    pub fn build_graph(
        &self,
        group: &GroupRef,
        question_keys: &[String],
        filters: &GraphFilters,
    ) -> Result<StyledGraph> {
        graph::build_graph(&self.store, group, question_keys, filters)
    }

    /// Compute received-nomination scores and the concentric-ring placement.
    pub fn rank_affinity(
        &self,
        group: &GroupRef,
        question_keys: &[String],
        options: &DianaOptions,
    ) -> Result<AffinityLayout> {
        diana::rank_affinity(&self.store, group, question_keys, options)
    }

    /// Aggregate the gender-bucketed nominator×nominee count table.
    pub fn aggregate_matrix(
        &self,
        group: &GroupRef,
        question_keys: &[String],
    ) -> Result<SociomatrixTable> {
        matrix::aggregate_matrix(&self.store, group, question_keys)
    }

    /// Access the underlying store (for advanced use).
    pub fn store(&self) -> &S {
        &self.store
    }
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Institution not found: {0}")]
    InstitutionNotFound(String),

    #[error("Group not found: {institution}/{group}")]
    GroupNotFound { institution: String, group: String },

    #[error("Store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, Error>;
