use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which side of an activator/activatable pairing a kind can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkRole {
    /// Drives a partner: buttons, levers.
    Activator,
    /// Driven by a partner: doors, moving platforms.
    Activatable,
    Neither,
}

impl LinkRole {
    /// The role a partner must have. `Neither` pairs with nothing.
    pub fn opposite(self) -> Self {
        match self {
            Self::Activator => Self::Activatable,
            Self::Activatable => Self::Activator,
            Self::Neither => Self::Neither,
        }
    }

    /// Whether this role takes part in links.
    pub fn is_linkable(self) -> bool {
        self != Self::Neither
    }
}

/// Kinds of placeable objects, plus the player-start singleton.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    PlayerStart,
    TileGrass,
    TileDirt,
    Lever,
    Button,
    Door,
    MovingPlatform,
    Coin,
    Crate,
    EnemyOrc,
    Flag,
}

impl EntityKind {
    /// Kinds that can be placed from create mode, in cycling order.
    pub const PLACEABLE: [EntityKind; 10] = [
        Self::TileGrass,
        Self::TileDirt,
        Self::Lever,
        Self::Button,
        Self::Door,
        Self::MovingPlatform,
        Self::Coin,
        Self::Crate,
        Self::EnemyOrc,
        Self::Flag,
    ];

    /// Link role of this kind.
    pub fn role(self) -> LinkRole {
        match self {
            Self::Lever | Self::Button => LinkRole::Activator,
            Self::Door | Self::MovingPlatform => LinkRole::Activatable,
            _ => LinkRole::Neither,
        }
    }

    /// Name shown in editor UI.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::PlayerStart => "Player Start",
            Self::TileGrass => "Tile (Grass)",
            Self::TileDirt => "Tile (Dirt)",
            Self::Lever => "Lever",
            Self::Button => "Button",
            Self::Door => "Door",
            Self::MovingPlatform => "Moving Platform",
            Self::Coin => "Coin",
            Self::Crate => "Crate",
            Self::EnemyOrc => "Orc",
            Self::Flag => "Flag",
        }
    }

    /// Step through `None` and the placeable kinds, wrapping at both ends.
    pub fn cycle(current: Option<Self>, step: i32) -> Option<Self> {
        let len = Self::PLACEABLE.len() as i32 + 1;
        let position = match current {
            None => 0,
            Some(kind) => Self::PLACEABLE
                .iter()
                .position(|k| *k == kind)
                .map_or(0, |i| i as i32 + 1),
        };
        let next = (position + step).rem_euclid(len);
        if next == 0 {
            None
        } else {
            Some(Self::PLACEABLE[next as usize - 1])
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown entity kind `{0}`")]
pub struct ParseKindError(pub String);

impl FromStr for EntityKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        let kind = match key.as_str() {
            "playerstart" => Self::PlayerStart,
            "grass" | "tilegrass" => Self::TileGrass,
            "dirt" | "tiledirt" => Self::TileDirt,
            "lever" => Self::Lever,
            "button" => Self::Button,
            "door" => Self::Door,
            "platform" | "movingplatform" => Self::MovingPlatform,
            "coin" => Self::Coin,
            "crate" => Self::Crate,
            "orc" | "enemyorc" => Self::EnemyOrc,
            "flag" => Self::Flag,
            _ => return Err(ParseKindError(s.to_string())),
        };
        Ok(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_follow_kind() {
        assert_eq!(EntityKind::Lever.role(), LinkRole::Activator);
        assert_eq!(EntityKind::Button.role(), LinkRole::Activator);
        assert_eq!(EntityKind::Door.role(), LinkRole::Activatable);
        assert_eq!(EntityKind::MovingPlatform.role(), LinkRole::Activatable);
        assert_eq!(EntityKind::Crate.role(), LinkRole::Neither);
        assert_eq!(EntityKind::PlayerStart.role(), LinkRole::Neither);
    }

    #[test]
    fn opposite_roles() {
        assert_eq!(LinkRole::Activator.opposite(), LinkRole::Activatable);
        assert_eq!(LinkRole::Activatable.opposite(), LinkRole::Activator);
        assert_eq!(LinkRole::Neither.opposite(), LinkRole::Neither);
        assert!(!LinkRole::Neither.is_linkable());
    }

    #[test]
    fn cycle_wraps_through_none() {
        assert_eq!(EntityKind::cycle(None, 1), Some(EntityKind::TileGrass));
        assert_eq!(EntityKind::cycle(None, -1), Some(EntityKind::Flag));
        assert_eq!(EntityKind::cycle(Some(EntityKind::Flag), 1), None);
        assert_eq!(
            EntityKind::cycle(Some(EntityKind::TileGrass), 1),
            Some(EntityKind::TileDirt)
        );
        assert_eq!(EntityKind::cycle(Some(EntityKind::TileGrass), -1), None);
    }

    #[test]
    fn parse_accepts_loose_names() {
        assert_eq!("door".parse::<EntityKind>(), Ok(EntityKind::Door));
        assert_eq!(
            "Moving Platform".parse::<EntityKind>(),
            Ok(EntityKind::MovingPlatform)
        );
        assert_eq!("tile-grass".parse::<EntityKind>(), Ok(EntityKind::TileGrass));
        assert!("dragon".parse::<EntityKind>().is_err());
    }
}
