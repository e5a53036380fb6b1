//! Sociomatrix: the gender-bucketed nominator×nominee count table.
//!
//! Rows are nominators grouped into gender buckets (Female, Male,
//! Other/Unknown, in that fixed order); columns are every roster member in
//! data order, labelled by initials. Cells count how many times the row
//! member nominated the column member over the selected questions. Zero
//! renders blank, the diagonal renders a self marker, and each bucket
//! closes with a subtotal row before the final grand-total row.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::Result;
use crate::index;
use crate::model::{ComputationStatus, Gender, GroupRef};
use crate::store::RecordStore;

/// First and last header cells. The member columns sit in between.
pub const HEADER_NOMINATOR: &str = "Nominador";
pub const HEADER_TOTAL: &str = "TOTAL";

// ============================================================================
// Table shape
// ============================================================================

/// One table cell. Renderers print `Blank` as an empty cell and `SelfCell`
/// as a marker (the classic 'X' on the diagonal).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    SelfCell,
    Blank,
    Count(u32),
}

impl Cell {
    fn of(count: u32) -> Self {
        if count == 0 { Cell::Blank } else { Cell::Count(count) }
    }

    pub fn value(&self) -> u32 {
        match self {
            Cell::Count(n) => *n,
            Cell::SelfCell | Cell::Blank => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowKind {
    /// Bucket title row; carries no cells and no total.
    BucketHeader,
    /// One nominator's counts.
    Data,
    /// Per-column sums over the bucket just closed.
    BucketSubtotal,
    /// Per-column sums over the whole table.
    GrandTotal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixRow {
    pub kind: RowKind,
    /// "Last, First" for data rows; bucket label or "TOTAL" otherwise.
    pub label: String,
    /// One cell per member column, empty for bucket headers.
    pub cells: Vec<Cell>,
    /// Row total; `None` for bucket headers.
    pub total: Option<u32>,
}

/// The aggregated table. Header and columns are in roster data order and
/// are never re-sorted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SociomatrixTable {
    pub status: ComputationStatus,
    /// `["Nominador", <initials...>, "TOTAL"]`.
    pub header: Vec<String>,
    /// Canonical full names backing the member columns, same order as the
    /// initials in `header`.
    pub columns: Vec<String>,
    pub rows: Vec<MatrixRow>,
    /// Sum of every counted nomination; equals the number of resolved
    /// nominator→nominee entries (self-nominations excluded).
    pub grand_total: u32,
    pub warnings: Vec<String>,
}

impl SociomatrixTable {
    fn empty(status: ComputationStatus) -> Self {
        Self {
            status,
            header: Vec::new(),
            columns: Vec::new(),
            rows: Vec::new(),
            grand_total: 0,
            warnings: Vec::new(),
        }
    }
}

// ============================================================================
// Aggregation
// ============================================================================

/// Aggregate the sociomatrix for a group over the selected questions.
pub fn aggregate_matrix<S: RecordStore>(
    store: &S,
    group: &GroupRef,
    question_keys: &[String],
) -> Result<SociomatrixTable> {
    let roster = store.members(group)?;
    if roster.is_empty() {
        debug!(group = %group, "empty roster, returning empty matrix");
        return Ok(SociomatrixTable::empty(ComputationStatus::EmptyRoster));
    }

    let resolved = index::resolve_nominations(store, group, question_keys)?;

    // (nominator, nominee) -> count, self-nominations excluded.
    let mut counts: HashMap<(&str, &str), u32> = HashMap::new();
    let mut counted: u32 = 0;
    for entry in &resolved.entries {
        if entry.nominator == entry.nominee {
            debug!(group = %group, member = %entry.nominator, "skipping self-nomination in matrix");
            continue;
        }
        *counts
            .entry((entry.nominator.as_str(), entry.nominee.as_str()))
            .or_insert(0) += 1;
        counted += 1;
    }

    let columns: Vec<String> = roster.iter().map(|m| m.full_name()).collect();
    let mut header = Vec::with_capacity(columns.len() + 2);
    header.push(HEADER_NOMINATOR.to_string());
    header.extend(roster.iter().map(|m| m.initials()));
    header.push(HEADER_TOTAL.to_string());

    let mut rows: Vec<MatrixRow> = Vec::new();
    let mut column_totals = vec![0u32; columns.len()];

    for bucket in [Gender::Female, Gender::Male, Gender::Unknown] {
        let members: Vec<_> = roster.iter().filter(|m| m.gender == bucket).collect();
        if members.is_empty() {
            continue;
        }

        rows.push(MatrixRow {
            kind: RowKind::BucketHeader,
            label: bucket.label().to_string(),
            cells: Vec::new(),
            total: None,
        });

        let mut bucket_totals = vec![0u32; columns.len()];
        for member in &members {
            let name = member.full_name();
            let mut cells = Vec::with_capacity(columns.len());
            let mut row_total = 0u32;
            for (col, column) in columns.iter().enumerate() {
                if *column == name {
                    cells.push(Cell::SelfCell);
                    continue;
                }
                let count = counts
                    .get(&(name.as_str(), column.as_str()))
                    .copied()
                    .unwrap_or(0);
                cells.push(Cell::of(count));
                row_total += count;
                bucket_totals[col] += count;
            }
            rows.push(MatrixRow {
                kind: RowKind::Data,
                label: member.display_name(),
                cells,
                total: Some(row_total),
            });
        }

        for (col, n) in bucket_totals.iter().enumerate() {
            column_totals[col] += n;
        }
        let bucket_sum: u32 = bucket_totals.iter().sum();
        rows.push(MatrixRow {
            kind: RowKind::BucketSubtotal,
            label: format!("Subtotal {}", bucket.label()),
            cells: bucket_totals.into_iter().map(Cell::Count).collect(),
            total: Some(bucket_sum),
        });
    }

    rows.push(MatrixRow {
        kind: RowKind::GrandTotal,
        label: HEADER_TOTAL.to_string(),
        cells: column_totals.iter().copied().map(Cell::Count).collect(),
        total: Some(counted),
    });

    let status = if question_keys.is_empty() {
        ComputationStatus::EmptySelection
    } else {
        ComputationStatus::Complete
    };

    Ok(SociomatrixTable {
        status,
        header,
        columns,
        rows,
        grand_total: counted,
        warnings: resolved.warnings,
    })
}
