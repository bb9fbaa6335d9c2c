//! Item shapes the weather model needs to look at: containers under funnels
//! and the gear the player carries.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::liquid::{Liquid, LiquidKind};
use crate::numbers::u32_to_f64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemFlag {
    Watertight,
    Seals,
    RainProtect,
}

/// What an item is, as far as weather is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    #[default]
    Generic,
    Container {
        capacity: u32,
    },
}

/// Whatever currently sits inside a container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Contents {
    Liquid(Liquid),
    /// Anything that is not rain: soda, nails, a stray sock.
    Other { id: String, charges: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub kind: ItemKind,
    #[serde(default)]
    pub flags: SmallVec<[ItemFlag; 2]>,
    #[serde(default)]
    pub contents: Option<Contents>,
}

impl Item {
    #[must_use]
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            kind: ItemKind::Generic,
            flags: SmallVec::new(),
            contents: None,
        }
    }

    /// A sealable, watertight container with `capacity` charges of room.
    #[must_use]
    pub fn sealed_container(id: &str, name: &str, capacity: u32) -> Self {
        Self {
            kind: ItemKind::Container { capacity },
            ..Self::new(id, name)
        }
        .with_flag(ItemFlag::Watertight)
        .with_flag(ItemFlag::Seals)
    }

    #[must_use]
    pub fn with_flag(mut self, flag: ItemFlag) -> Self {
        if !self.flags.contains(&flag) {
            self.flags.push(flag);
        }
        self
    }

    #[must_use]
    pub fn with_contents(mut self, contents: Contents) -> Self {
        self.contents = Some(contents);
        self
    }

    #[must_use]
    pub fn has_flag(&self, flag: ItemFlag) -> bool {
        self.flags.contains(&flag)
    }

    #[must_use]
    pub const fn capacity(&self) -> Option<u32> {
        match self.kind {
            ItemKind::Container { capacity } => Some(capacity),
            ItemKind::Generic => None,
        }
    }

    #[must_use]
    pub fn liquid(&self) -> Option<&Liquid> {
        match &self.contents {
            Some(Contents::Liquid(liquid)) => Some(liquid),
            _ => None,
        }
    }

    /// Capacity of this item as a rain target, if it can take rain at all.
    ///
    /// A target is a watertight, sealable container that is empty or already
    /// holds water, acid, or weak acid.
    #[must_use]
    pub fn rain_capacity(&self) -> Option<u32> {
        let capacity = self.capacity()?;
        if !self.has_flag(ItemFlag::Watertight) || !self.has_flag(ItemFlag::Seals) {
            return None;
        }
        match &self.contents {
            None | Some(Contents::Liquid(_)) => Some(capacity),
            Some(Contents::Other { .. }) => None,
        }
    }
}

/// Base stats of a liquid prototype in the item registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidPrototype {
    /// Weight in grams of one default stack.
    pub weight: u32,
    /// Charges in one default stack.
    pub charges: u32,
}

impl LiquidPrototype {
    /// Millilitres per charge, assuming a density of one gram per millilitre.
    #[must_use]
    pub fn charge_ml(self) -> Option<f64> {
        if self.charges == 0 {
            return None;
        }
        Some(u32_to_f64(self.weight) / u32_to_f64(self.charges))
    }
}

/// Lookup of item prototypes by their registry identifier.
pub trait ItemRegistry {
    fn find_liquid(&self, id: &str) -> Option<LiquidPrototype>;

    fn liquid(&self, kind: LiquidKind) -> Option<LiquidPrototype> {
        self.find_liquid(kind.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sealed_containers_take_rain_when_empty_or_liquid() {
        let jug = Item::sealed_container("jug_plastic", "plastic jug", 40);
        assert_eq!(jug.rain_capacity(), Some(40));

        let wet = jug
            .clone()
            .with_contents(Contents::Liquid(Liquid::new(LiquidKind::WeakAcid, 3)));
        assert_eq!(wet.rain_capacity(), Some(40));

        let soda = jug.with_contents(Contents::Other {
            id: "cola".to_string(),
            charges: 2,
        });
        assert_eq!(soda.rain_capacity(), None);
    }

    #[test]
    fn unsealed_or_generic_items_are_not_targets() {
        let mut bucket = Item::sealed_container("bucket", "bucket", 80);
        bucket.flags.retain(|flag| *flag != ItemFlag::Seals);
        assert_eq!(bucket.rain_capacity(), None);

        let rock = Item::new("rock", "rock").with_flag(ItemFlag::Watertight);
        assert_eq!(rock.capacity(), None);
        assert_eq!(rock.rain_capacity(), None);
    }

    #[test]
    fn flags_are_not_duplicated() {
        let umbrella = Item::new("umbrella", "umbrella")
            .with_flag(ItemFlag::RainProtect)
            .with_flag(ItemFlag::RainProtect);
        assert_eq!(umbrella.flags.len(), 1);
        assert!(umbrella.has_flag(ItemFlag::RainProtect));
    }

    #[test]
    fn charge_volume_guards_empty_prototypes() {
        let water = LiquidPrototype {
            weight: 250,
            charges: 1,
        };
        assert_eq!(water.charge_ml(), Some(250.0));
        let broken = LiquidPrototype {
            weight: 250,
            charges: 0,
        };
        assert_eq!(broken.charge_ml(), None);
    }
}
