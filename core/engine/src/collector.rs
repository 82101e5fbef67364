//! FILENAME: core/engine/src/collector.rs
//! PURPOSE: Collects the user's selected instrument rows into grouped records.
//! CONTEXT: Below the header block (data starts at row 5) column 3 holds either
//! a 12-character instrument identifier (ISIN) or a group label. Label rows
//! open a new group; selected identifier rows become 25-slot records filed
//! under the most recent label. Collecting one sheet is a pure step that
//! returns a `Collection`; sheets are combined with `Collection::absorb`.

use crate::cell::CellValue;
use crate::grid::Grid;
use crate::matcher::SourceColumnMap;
use crate::schema::{ColumnPosition, SCHEMA_WIDTH};
use std::collections::{BTreeSet, HashMap, HashSet};

pub const FIRST_DATA_ROW: u32 = 5;
pub const LABEL_COLUMN: u32 = 3;
/// Length of an instrument identifier; any other length is a group label.
pub const IDENTIFIER_LEN: usize = 12;
/// Group that receives records seen before the first label row of a sheet.
pub const DEFAULT_GROUP: &str = "Untitled";

// ============================================================================
// RECORD
// ============================================================================

/// One selected row, laid out over the canonical positions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Record {
    slots: [CellValue; SCHEMA_WIDTH],
}

impl Record {
    pub fn new() -> Self {
        Record {
            slots: std::array::from_fn(|_| CellValue::Empty),
        }
    }

    pub fn get(&self, position: ColumnPosition) -> &CellValue {
        &self.slots[position.slot()]
    }

    pub fn set(&mut self, position: ColumnPosition, value: CellValue) {
        self.slots[position.slot()] = value;
    }

    /// All 25 slots, slot 0 = position 1.
    pub fn slots(&self) -> &[CellValue; SCHEMA_WIDTH] {
        &self.slots
    }
}

impl Default for Record {
    fn default() -> Self {
        Record::new()
    }
}

// ============================================================================
// GROUP
// ============================================================================

/// A label and the unique records filed under it, in first-seen order.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    label: String,
    records: Vec<Record>,
    seen: HashSet<Record>,
}

impl Group {
    pub fn new(label: impl Into<String>) -> Self {
        Group {
            label: label.into(),
            records: Vec::new(),
            seen: HashSet::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Inserts `record` unless an identical one is already present.
    pub fn insert(&mut self, record: Record) -> bool {
        if self.seen.contains(&record) {
            return false;
        }
        self.seen.insert(record.clone());
        self.records.push(record);
        true
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ============================================================================
// USED POSITIONS
// ============================================================================

/// Canonical positions that received a non-empty value in some record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsedPositions {
    positions: BTreeSet<ColumnPosition>,
}

impl UsedPositions {
    pub fn new() -> Self {
        UsedPositions::default()
    }

    pub fn mark(&mut self, position: ColumnPosition) {
        self.positions.insert(position);
    }

    pub fn contains(&self, position: ColumnPosition) -> bool {
        self.positions.contains(&position)
    }

    pub fn union(&mut self, other: &UsedPositions) {
        self.positions.extend(other.positions.iter().copied());
    }

    /// Ascending iteration.
    pub fn iter(&self) -> impl Iterator<Item = ColumnPosition> + '_ {
        self.positions.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

// ============================================================================
// COLLECTION
// ============================================================================

/// Groups in creation order plus the positions used across all of them.
/// The default group always exists and comes first.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    groups: Vec<Group>,
    index: HashMap<String, usize>,
    used: UsedPositions,
}

impl Collection {
    pub fn new() -> Self {
        let mut collection = Collection {
            groups: Vec::new(),
            index: HashMap::new(),
            used: UsedPositions::new(),
        };
        collection.group_mut(DEFAULT_GROUP);
        collection
    }

    /// The group named `label`, created at the end if unseen.
    pub fn group_mut(&mut self, label: &str) -> &mut Group {
        let next = self.groups.len();
        let idx = *self.index.entry(label.to_string()).or_insert(next);
        if idx == next {
            self.groups.push(Group::new(label));
        }
        &mut self.groups[idx]
    }

    pub fn group(&self, label: &str) -> Option<&Group> {
        self.index.get(label).map(|&idx| &self.groups[idx])
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn used(&self) -> &UsedPositions {
        &self.used
    }

    /// Total number of unique records over all groups.
    pub fn record_count(&self) -> usize {
        self.groups.iter().map(Group::len).sum()
    }

    /// Merge another sheet's collection into this one. Groups with the same
    /// label are combined; new labels are appended in the other's order.
    pub fn absorb(&mut self, other: Collection) {
        for group in other.groups {
            let target = self.group_mut(&group.label);
            for record in group.records {
                target.insert(record);
            }
        }
        self.used.union(&other.used);
    }
}

impl Default for Collection {
    fn default() -> Self {
        Collection::new()
    }
}

// ============================================================================
// ROW CLASSIFICATION
// ============================================================================

/// What the label column says about a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowKind {
    /// Nothing in the label column; not part of the data.
    Blank,
    /// A 12-character instrument identifier.
    Instrument,
    /// Any other text: starts a new group.
    Label(String),
}

pub fn classify(value: &CellValue) -> RowKind {
    if !value.is_truthy() {
        return RowKind::Blank;
    }
    let text = value.display_value();
    if text.chars().count() == IDENTIFIER_LEN {
        RowKind::Instrument
    } else {
        RowKind::Label(text)
    }
}

/// Copy the mapped cells of `row` into a record, marking used positions.
fn build_record(grid: &Grid, row: u32, map: &SourceColumnMap, used: &mut UsedPositions) -> Record {
    let mut record = Record::new();
    for (source_col, position) in map.iter() {
        if source_col > grid.max_col {
            continue;
        }
        let value = grid.value(row, source_col);
        if value.is_truthy() {
            used.mark(position);
        }
        record.set(position, value.clone());
    }
    record
}

/// Collect the selected rows of one worksheet.
///
/// The current group starts as [`DEFAULT_GROUP`] for every sheet. A selected
/// row only yields a record when its label cell holds an identifier.
pub fn collect_sheet(grid: &Grid, map: &SourceColumnMap, selected_rows: &BTreeSet<u32>) -> Collection {
    let mut collection = Collection::new();
    let mut current = DEFAULT_GROUP.to_string();

    for row in FIRST_DATA_ROW..=grid.max_row {
        match classify(grid.value(row, LABEL_COLUMN)) {
            RowKind::Blank => continue,
            RowKind::Label(label) => {
                collection.group_mut(&label);
                current = label;
            }
            RowKind::Instrument => {
                if !selected_rows.contains(&row) {
                    continue;
                }
                let record = build_record(grid, row, map, &mut collection.used);
                if !collection.group_mut(&current).insert(record) {
                    log::debug!("row {} duplicates a record already in '{}'", row, current);
                }
            }
        }
    }

    collection
}
