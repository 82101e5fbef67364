//! FILENAME: core/engine/src/columns.rs
//! PURPOSE: Turns the user's kept-column list into a restricted schema.
//! CONTEXT: Users pick columns by their 1-based canonical position (settings
//! default: 1..=7). The selection keeps those positions in request order and
//! narrows the header alias table to them, so columns the user did not ask for
//! never match during sheet scanning.

use crate::schema::{self, CanonicalColumn, ColumnPosition, HeaderLookup};

/// The retained positions plus the alias lookup restricted to them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnSelection {
    kept: Vec<ColumnPosition>,
    lookup: HeaderLookup,
}

impl ColumnSelection {
    /// Positions in the order they were requested.
    pub fn kept(&self) -> &[ColumnPosition] {
        &self.kept
    }

    /// Canonical header labels of the kept positions, in request order.
    pub fn kept_columns(&self) -> impl Iterator<Item = CanonicalColumn> + '_ {
        self.kept.iter().map(|&position| schema::column(position))
    }

    pub fn lookup(&self) -> &HeaderLookup {
        &self.lookup
    }

    pub fn contains(&self, position: ColumnPosition) -> bool {
        self.kept.contains(&position)
    }

    pub fn is_empty(&self) -> bool {
        self.kept.is_empty()
    }
}

/// Build a selection from 1-based indices. Out-of-range indices are dropped;
/// a repeated index is kept once, at its first occurrence.
pub fn select_columns(requested: &[i64]) -> ColumnSelection {
    let reference = schema::reference_lookup();
    let mut selection = ColumnSelection::default();

    for &index in requested {
        let Some(position) = ColumnPosition::new(index) else {
            log::debug!("ignoring column index {} outside 1..={}", index, schema::SCHEMA_WIDTH);
            continue;
        };
        if selection.contains(position) {
            continue;
        }
        selection.kept.push(position);
        for key in reference.keys_for(position) {
            selection.lookup.insert(key.clone(), position);
        }
    }

    selection
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::HeaderKey;

    #[test]
    fn test_single_position_keeps_all_of_its_aliases() {
        let reference = schema::reference_lookup();
        for k in 1..=25 {
            let selection = select_columns(&[k]);
            let position = ColumnPosition::new(k).unwrap();
            assert_eq!(selection.kept(), &[position]);

            let expected = reference.keys_for(position).count();
            assert_eq!(selection.lookup().len(), expected, "position {}", k);
            for key in reference.keys_for(position) {
                assert_eq!(selection.lookup().get(key), Some(position));
            }
        }
    }

    #[test]
    fn test_out_of_range_indices_are_dropped() {
        let selection = select_columns(&[0, 26, -1]);
        assert!(selection.is_empty());
        assert!(selection.lookup().is_empty());
    }

    #[test]
    fn test_request_order_is_preserved() {
        let selection = select_columns(&[9, 1, 30, 4]);
        let kept: Vec<u8> = selection.kept().iter().map(|p| p.get()).collect();
        assert_eq!(kept, vec![9, 1, 4]);
        assert_eq!(selection.kept_columns().next().unwrap().top, Some("Price"));
    }

    #[test]
    fn test_lookup_excludes_unselected_positions() {
        let selection = select_columns(&[1, 5]);
        assert!(selection.lookup().get(&HeaderKey::new(Some("ISIN"), None)).is_some());
        assert!(selection.lookup().get(&HeaderKey::new(Some("Ccy"), None)).is_none());
    }

    #[test]
    fn test_duplicates_are_kept_once() {
        let selection = select_columns(&[3, 3, 2, 3]);
        assert_eq!(selection.kept().len(), 2);
    }
}
