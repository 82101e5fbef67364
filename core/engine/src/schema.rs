//! FILENAME: core/engine/src/schema.rs
//! PURPOSE: The fixed 25-column reference schema of the legacy asset sheets.
//! CONTEXT: Source workbooks label their columns with two header rows. This
//! module holds the canonical labels for each output position and the alias
//! table that maps raw header pairs (including known synonyms and typos) back
//! to a canonical position.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

/// Number of canonical positions. Every record has exactly this many slots.
pub const SCHEMA_WIDTH: usize = 25;

/// A canonical output position in `1..=SCHEMA_WIDTH`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ColumnPosition(u8);

impl ColumnPosition {
    /// Bounds-checked construction from a user-facing 1-based index.
    pub fn new(position: i64) -> Option<Self> {
        if (1..=SCHEMA_WIDTH as i64).contains(&position) {
            Some(ColumnPosition(position as u8))
        } else {
            None
        }
    }

    /// The 1-based position.
    pub fn get(self) -> u8 {
        self.0
    }

    /// 0-based slot inside a record.
    pub fn slot(self) -> usize {
        self.0 as usize - 1
    }

    /// Every position in ascending order.
    pub fn all() -> impl Iterator<Item = ColumnPosition> {
        (1..=SCHEMA_WIDTH as u8).map(ColumnPosition)
    }
}

impl fmt::Display for ColumnPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A two-part raw header. `None` marks an absent part.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HeaderKey {
    pub top: Option<String>,
    pub bottom: Option<String>,
}

impl HeaderKey {
    pub fn new(top: Option<&str>, bottom: Option<&str>) -> Self {
        HeaderKey {
            top: top.map(str::to_string),
            bottom: bottom.map(str::to_string),
        }
    }
}

/// One canonical column: its position and the label written into the output header rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanonicalColumn {
    pub position: ColumnPosition,
    pub top: Option<&'static str>,
    pub bottom: Option<&'static str>,
}

const LABELS: [(Option<&str>, Option<&str>); SCHEMA_WIDTH] = [
    (Some("ISIN"), None),
    (Some("Ticker &"), Some("Exchange")),
    (Some("Ccy"), None),
    (Some("Cpn"), Some("(%)")),
    (Some("Name"), None),
    (Some("Sector"), None),
    (Some("Industry"), None),
    (Some("Maturity"), Some("(1. call date)")),
    (Some("Price"), None),
    (Some("Perf"), Some("YTD %")),
    (Some("Mk-Cap"), Some("mia")),
    (Some("YTM"), Some("MID")),
    (Some("Share"), Some("classes")),
    (Some("ER/MF"), None),
    (Some("Rating"), Some("Mood")),
    (Some("Rating"), Some("S&P")),
    (Some("Rating"), Some("Fitch")),
    (Some("Size"), Some("mio")),
    (Some("Z-"), Some("Spread")),
    (Some("ASW"), Some("spread")),
    (Some("Min"), Some("piece")),
    (Some("Min"), Some("incr")),
    (Some("Mkt of"), Some("Issue")),
    (Some("Notes"), None),
    (Some("Added"), Some("on")),
];

// Raw header pairs seen in source sheets. Several pairs alias one position;
// the reversed (absent, label) variants for 23 and 24 are kept as found.
const ALIASES: [(Option<&str>, Option<&str>, u8); 30] = [
    (Some("ISIN"), None, 1),
    (Some("Ticker &"), Some("Exchange"), 2),
    (Some("Ccy"), None, 3),
    (Some("Cpn"), Some("(%)"), 4),
    (None, Some("(%)"), 4),
    (Some("Name"), Some("1"), 5),
    (Some("Sector"), None, 6),
    (Some("Industry"), None, 7),
    (Some("Maturity"), Some("(1. call date)"), 8),
    (Some("Price"), Some("MID"), 9),
    (Some("Price"), Some("1"), 9),
    (Some("Perf"), Some("YTD %"), 10),
    (Some("Mk-Cap"), Some("mia"), 11),
    (Some("YTM"), Some("MID"), 12),
    (Some("Share class"), None, 13),
    (Some("Share"), Some("class"), 13),
    (Some("ER/MF"), None, 14),
    (Some("Rating"), Some("Moody"), 15),
    (Some("Rating"), Some("S&P"), 16),
    (Some("Rating"), Some("Fitch"), 17),
    (Some("Size"), Some("mio"), 18),
    (Some("Z-"), Some("spread"), 19),
    (Some("ASW"), Some("spread"), 20),
    (Some("Min"), Some("piece"), 21),
    (Some("Min"), Some("incr"), 22),
    (None, Some("Mkt of Issue"), 23),
    (Some("Notes"), None, 24),
    (None, Some("Notes"), 24),
    (Some("Added on"), None, 25),
    (Some("Added"), Some("on"), 25),
];

/// Header pair → canonical position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeaderLookup {
    entries: HashMap<HeaderKey, ColumnPosition>,
}

impl HeaderLookup {
    pub fn new() -> Self {
        HeaderLookup::default()
    }

    pub fn insert(&mut self, key: HeaderKey, position: ColumnPosition) {
        self.entries.insert(key, position);
    }

    /// Unknown pairs yield `None`; callers ignore such columns.
    pub fn get(&self, key: &HeaderKey) -> Option<ColumnPosition> {
        self.entries.get(key).copied()
    }

    /// All keys resolving to `position`.
    pub fn keys_for(&self, position: ColumnPosition) -> impl Iterator<Item = &HeaderKey> {
        self.entries
            .iter()
            .filter(move |(_, p)| **p == position)
            .map(|(key, _)| key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Canonical label for `position`.
pub fn column(position: ColumnPosition) -> CanonicalColumn {
    let (top, bottom) = LABELS[position.slot()];
    CanonicalColumn { position, top, bottom }
}

/// All 25 canonical columns in position order.
pub fn columns() -> impl Iterator<Item = CanonicalColumn> {
    ColumnPosition::all().map(column)
}

/// The full alias table, built once.
pub fn reference_lookup() -> &'static HeaderLookup {
    static LOOKUP: OnceLock<HeaderLookup> = OnceLock::new();
    LOOKUP.get_or_init(|| {
        let mut lookup = HeaderLookup::new();
        for (top, bottom, position) in ALIASES {
            if let Some(position) = ColumnPosition::new(position as i64) {
                lookup.insert(HeaderKey::new(top, bottom), position);
            }
        }
        lookup
    })
}
