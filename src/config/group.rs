//! Call group specifications (`group = 1,3-5`).

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Highest group number representable in a [`GroupMask`].
pub const MAX_GROUP: u32 = 63;

/// Bitmask of the call groups an agent belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupMask(pub u64);

impl GroupMask {
    pub const EMPTY: GroupMask = GroupMask(0);

    /// Parse a comma separated list of group numbers and inclusive ranges.
    ///
    /// Pieces that are not a number or range within `0..=63` are skipped with
    /// a warning, the rest of the list still applies.
    pub fn parse(spec: &str) -> GroupMask {
        let mut mask = 0u64;
        for piece in spec.split(',') {
            let piece = piece.trim();
            if piece.is_empty() {
                continue;
            }
            match parse_piece(piece) {
                Some((start, finish)) => {
                    for group in start..=finish {
                        mask |= 1u64 << group;
                    }
                }
                None => {
                    warn!(group = piece, "Ignoring invalid group (must be between 0 and 63)");
                }
            }
        }
        GroupMask(mask)
    }

    pub fn contains(&self, group: u32) -> bool {
        group <= MAX_GROUP && self.0 & (1u64 << group) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Iterate the member group numbers in ascending order.
    pub fn groups(&self) -> impl Iterator<Item = u32> + '_ {
        (0..=MAX_GROUP).filter(move |g| self.contains(*g))
    }
}

fn parse_piece(piece: &str) -> Option<(u32, u32)> {
    let (start, finish) = match piece.split_once('-') {
        Some((a, b)) => (a.trim().parse::<u32>().ok()?, b.trim().parse::<u32>().ok()?),
        None => {
            let n = piece.parse::<u32>().ok()?;
            (n, n)
        }
    };
    if start > finish || finish > MAX_GROUP {
        return None;
    }
    Some((start, finish))
}

impl fmt::Display for GroupMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let groups: Vec<String> = self.groups().map(|g| g.to_string()).collect();
        write!(f, "{}", groups.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_and_ranges() {
        let mask = GroupMask::parse("1,3-5");
        assert_eq!(mask.groups().collect::<Vec<_>>(), vec![1, 3, 4, 5]);
        assert_eq!(mask.to_string(), "1,3,4,5");
    }

    #[test]
    fn test_parse_empty() {
        assert!(GroupMask::parse("").is_empty());
        assert!(GroupMask::parse(" , ").is_empty());
    }

    #[test]
    fn test_parse_skips_invalid_pieces() {
        let mask = GroupMask::parse("2, 64, x, 7-3, 63");
        assert_eq!(mask.groups().collect::<Vec<_>>(), vec![2, 63]);
    }

    #[test]
    fn test_contains_out_of_range() {
        assert!(!GroupMask(u64::MAX).contains(64));
    }
}
