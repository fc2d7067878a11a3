//! Grid slots for one page.
//! Stratagems fill columns 0-2 of rows 0-4 in reading order. Row 5 belongs to the
//! page navigation buttons and is never handed out here.

use crate::config::PAGE_SIZE;

pub const POSITIONS: [&str; PAGE_SIZE] = [
    "0,0", "1,0", "2,0", // row 1
    "0,1", "1,1", "2,1", // row 2
    "0,2", "1,2", "2,2", // row 3
    "0,3", "1,3", "2,3", // row 4
    "0,4", "1,4", "2,4", // row 5
];

pub const PAGE_INDICATOR_POSITION: &str = "0,5";
pub const PAGE_CHANGE_POSITION: &str = "2,5";
pub const RESERVED_POSITIONS: [&str; 2] = [PAGE_INDICATOR_POSITION, PAGE_CHANGE_POSITION];

/// Pairs each item with its slot in slice order. Items past the last slot are dropped.
pub fn assign_slots<T>(items: &[T]) -> impl Iterator<Item = (&'static str, &T)> {
    POSITIONS.iter().copied().zip(items.iter())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_positions_are_unique_and_avoid_reserved_row() {
        let unique: HashSet<&str> = POSITIONS.iter().copied().collect();
        assert_eq!(unique.len(), PAGE_SIZE);
        for reserved in RESERVED_POSITIONS {
            assert!(!unique.contains(reserved));
        }
    }

    #[test]
    fn test_assign_partial_page() {
        let items = ["a", "b", "c", "d"];
        let slots: Vec<(&str, &&str)> = assign_slots(&items).collect();
        assert_eq!(
            slots,
            vec![("0,0", &"a"), ("1,0", &"b"), ("2,0", &"c"), ("0,1", &"d")]
        );
    }

    #[test]
    fn test_assign_never_exceeds_grid() {
        let items: Vec<usize> = (0..20).collect();
        let slots: Vec<_> = assign_slots(&items).collect();
        assert_eq!(slots.len(), PAGE_SIZE);
        assert_eq!(slots.last(), Some(&("2,4", &14)));
    }
}
