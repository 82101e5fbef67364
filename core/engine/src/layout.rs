//! FILENAME: core/engine/src/layout.rs
//! PURPOSE: Compacts the output columns down to the positions actually used.
//! CONTEXT: A kept position that never received a value takes no output
//! column. The layout is the ascending list of used positions; a position's
//! output column is its 1-based rank in that list.

use crate::collector::UsedPositions;
use crate::schema::{ColumnPosition, SCHEMA_WIDTH};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibleLayout {
    positions: Vec<ColumnPosition>,
    /// Output column per slot, 0 when the position is hidden.
    ranks: [u32; SCHEMA_WIDTH],
}

impl VisibleLayout {
    pub fn from_used(used: &UsedPositions) -> Self {
        let positions: Vec<ColumnPosition> = used.iter().collect();
        let mut ranks = [0u32; SCHEMA_WIDTH];
        for (i, position) in positions.iter().enumerate() {
            ranks[position.slot()] = i as u32 + 1;
        }
        VisibleLayout { positions, ranks }
    }

    /// 1-based output column of `position`, if visible.
    pub fn rank(&self, position: ColumnPosition) -> Option<u32> {
        match self.ranks[position.slot()] {
            0 => None,
            rank => Some(rank),
        }
    }

    pub fn positions(&self) -> &[ColumnPosition] {
        &self.positions
    }

    /// (output column, position) pairs in output order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, ColumnPosition)> + '_ {
        self.positions
            .iter()
            .enumerate()
            .map(|(i, &position)| (i as u32 + 1, position))
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
