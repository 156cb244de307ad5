//! Items
//!
//! One record type with optional capabilities instead of a class tree:
//! a pickaxe is an item with a `tool` capability (and a `weapon` one, since
//! it can also be swung at things), a dirt block is an item that `places`
//! dirt. Consumers check for the capability they need.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::sim::BlockKind;

/// Default stack limit for stackable items
pub const DEFAULT_MAX_AMOUNT: u32 = 1 << 10;

/// Item catalog IDs
pub mod ids {
    pub const COPPER_PICKAXE: u32 = 0;
    pub const COPPER_AXE: u32 = 1;
    pub const DIRT_BLOCK: u32 = 2;
    pub const OAK_LOG: u32 = 3;
}

/// Kinds of block-breaking tools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolType {
    Pickaxe,
    Axe,
    Hammer,
}

impl ToolType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolType::Pickaxe => "pickaxe",
            ToolType::Axe => "axe",
            ToolType::Hammer => "hammer",
        }
    }
}

/// Tool capability: power per tool type plus swing time in ticks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCapability {
    pub powers: BTreeMap<ToolType, i32>,
    pub use_time: u32,
}

impl ToolCapability {
    pub fn new(tool_type: ToolType, power: i32, use_time: u32) -> Self {
        Self {
            powers: [(tool_type, power)].into_iter().collect(),
            use_time,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponCapability {
    pub damage: i32,
    pub knockback: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: u32,
    pub name: String,
    pub amount: u32,
    pub max_amount: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool: Option<ToolCapability>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weapon: Option<WeaponCapability>,
    /// Reforge prefix; reforgeable items never stack
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reforge: Option<String>,
    /// Block placed when the item is used on an empty cell
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub places: Option<BlockKind>,
}

impl Item {
    /// Plain stackable item
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            amount: 1,
            max_amount: DEFAULT_MAX_AMOUNT,
            tool: None,
            weapon: None,
            reforge: None,
            places: None,
        }
    }

    /// Swingable tool (single, unstackable)
    pub fn swing_tool(
        id: u32,
        name: impl Into<String>,
        tool: ToolCapability,
        weapon: WeaponCapability,
    ) -> Self {
        Self {
            max_amount: 1,
            tool: Some(tool),
            weapon: Some(weapon),
            ..Self::new(id, name)
        }
    }

    /// Placeable block item
    pub fn block(id: u32, name: impl Into<String>, places: BlockKind) -> Self {
        Self {
            places: Some(places),
            ..Self::new(id, name)
        }
    }

    pub fn is_stackable(&self) -> bool {
        self.max_amount > 1
    }

    /// Name as shown in the inventory
    pub fn display_name(&self) -> String {
        let base = title_case(&self.name);
        let name = match &self.reforge {
            Some(prefix) => format!("{} {}", title_case(prefix), base),
            None => base,
        };
        if self.places.is_some() {
            format!("{} (x{})", name, self.amount)
        } else {
            name
        }
    }
}

fn title_case(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(|c| c.to_lowercase()))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Built-in item definitions
pub fn catalog() -> BTreeMap<u32, Item> {
    [
        Item::swing_tool(
            ids::COPPER_PICKAXE,
            "Copper Pickaxe",
            ToolCapability::new(ToolType::Pickaxe, 25, 25),
            WeaponCapability {
                damage: 3,
                knockback: 2,
            },
        ),
        Item::swing_tool(
            ids::COPPER_AXE,
            "Copper Axe",
            ToolCapability::new(ToolType::Axe, 30, 40),
            WeaponCapability {
                damage: 4,
                knockback: 3,
            },
        ),
        Item::block(ids::DIRT_BLOCK, "Dirt Block", BlockKind::dirt()),
        Item::block(ids::OAK_LOG, "Oak Log", BlockKind::new("oakLog")),
    ]
    .into_iter()
    .map(|item| (item.id, item))
    .collect()
}

/// Item dropped when a block is broken (the block itself, where it has one)
pub fn loot_for(block: &BlockKind) -> Option<u32> {
    match block.as_str() {
        "dirt" => Some(ids::DIRT_BLOCK),
        "oakLog" => Some(ids::OAK_LOG),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_capabilities() {
        let items = catalog();
        let pick = &items[&ids::COPPER_PICKAXE];
        assert_eq!(pick.tool.as_ref().unwrap().powers[&ToolType::Pickaxe], 25);
        assert!(pick.weapon.is_some());
        assert!(!pick.is_stackable());

        let dirt = &items[&ids::DIRT_BLOCK];
        assert!(dirt.tool.is_none());
        assert_eq!(dirt.places, Some(BlockKind::dirt()));
        assert!(dirt.is_stackable());
    }

    #[test]
    fn test_display_names() {
        let items = catalog();
        assert_eq!(items[&ids::COPPER_AXE].display_name(), "Copper Axe");

        let mut dirt = items[&ids::DIRT_BLOCK].clone();
        dirt.amount = 12;
        assert_eq!(dirt.display_name(), "Dirt Block (x12)");

        let mut pick = items[&ids::COPPER_PICKAXE].clone();
        pick.reforge = Some("legendary".into());
        assert_eq!(pick.display_name(), "Legendary Copper Pickaxe");
    }

    #[test]
    fn test_loot_returns_same_block() {
        assert_eq!(loot_for(&BlockKind::dirt()), Some(ids::DIRT_BLOCK));
        assert_eq!(loot_for(&BlockKind::new("oakLog")), Some(ids::OAK_LOG));
        assert_eq!(loot_for(&BlockKind::stone()), None);
    }
}
