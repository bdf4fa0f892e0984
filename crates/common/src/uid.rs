use serde::{Deserialize, Serialize};
use std::fmt;

/// Generational handle to an entity: slot index plus salt.
///
/// Holding a handle never keeps an entity alive. The store bumps a slot's salt
/// whenever the slot is re-occupied, so handles captured before a delete stop
/// resolving once something else moves in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityUid {
    index: u16,
    salt: u16,
}

impl EntityUid {
    /// Sentinel for "no entity". Never resolves.
    pub const INVALID: Self = Self {
        index: 0xFFFF,
        salt: 0xFFFF,
    };

    /// Fixed handle of the player-start singleton, which lives outside the slot
    /// vector. Slot index `0xFFFF` is never issued by the store.
    pub const PLAYER_START: Self = Self {
        index: 0xFFFF,
        salt: 0,
    };

    /// Build a handle from a slot index and salt.
    pub const fn new(index: u16, salt: u16) -> Self {
        Self { index, salt }
    }

    /// Slot index in the store.
    pub const fn index(self) -> u16 {
        self.index
    }

    /// Reuse counter of the slot when this handle was issued.
    pub const fn salt(self) -> u16 {
        self.salt
    }

    /// False only for the invalid sentinel.
    pub const fn is_valid(self) -> bool {
        !(self.index == Self::INVALID.index && self.salt == Self::INVALID.salt)
    }

    /// Packed form, `index << 16 | salt`.
    pub const fn to_bits(self) -> u32 {
        ((self.index as u32) << 16) | self.salt as u32
    }

    /// Inverse of `to_bits`.
    pub const fn from_bits(bits: u32) -> Self {
        Self {
            index: (bits >> 16) as u16,
            salt: bits as u16,
        }
    }
}

impl Default for EntityUid {
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for EntityUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid() {
            f.write_str("#invalid")
        } else if *self == Self::PLAYER_START {
            f.write_str("#player-start")
        } else {
            write!(f, "#{}:{}", self.index, self.salt)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_needs_both_fields() {
        assert_eq!(EntityUid::new(3, 1), EntityUid::new(3, 1));
        assert_ne!(EntityUid::new(3, 1), EntityUid::new(3, 2));
        assert_ne!(EntityUid::new(3, 1), EntityUid::new(4, 1));
    }

    #[test]
    fn packing_matches_index_and_salt() {
        let uid = EntityUid::new(0x0012, 0x0304);
        assert_eq!(uid.to_bits(), 0x0012_0304);
        assert_eq!(EntityUid::from_bits(0x0012_0304), uid);
        assert_eq!(EntityUid::INVALID.to_bits(), u32::MAX);
    }

    #[test]
    fn sentinel_and_player_start_are_distinct() {
        assert!(!EntityUid::INVALID.is_valid());
        assert!(EntityUid::PLAYER_START.is_valid());
        assert_ne!(EntityUid::INVALID, EntityUid::PLAYER_START);
        assert_eq!(EntityUid::default(), EntityUid::INVALID);
    }

    #[test]
    fn display_is_readable() {
        assert_eq!(EntityUid::new(7, 2).to_string(), "#7:2");
        assert_eq!(EntityUid::INVALID.to_string(), "#invalid");
        assert_eq!(EntityUid::PLAYER_START.to_string(), "#player-start");
    }

    #[test]
    fn serde_keeps_fields() {
        let uid = EntityUid::new(9, 4);
        let json = serde_json::to_string(&uid).unwrap();
        let back: EntityUid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, uid);
    }
}
