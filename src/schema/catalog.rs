use serde::{Deserialize, Serialize};

use super::effect::StatusKind;
use super::stats::{Grade, StatBlock};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Element {
    Physical,
    Fire,
    Ice,
    Lightning,
    Poison,
    Holy,
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipSlot {
    Weapon,
    Offhand,
    Head,
    Body,
    Hands,
    Feet,
    Accessory,
}

/// A status a skill may inflict on hit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatusRider {
    pub status: StatusKind,
    pub chance: f32,
    pub duration: f32,
}

/// Compact skill row, e.g. `FireBolt, Fire, 15 dmg, Burn 30%`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillDefinition {
    pub id: String,
    pub name: String,
    pub element: Element,
    pub base_damage: f32,
    #[serde(default)]
    pub mana_cost: f32,
    #[serde(default)]
    pub cooldown: f32,
    #[serde(default)]
    pub status: Option<StatusRider>,
    /// One record is produced per listed grade.
    pub grades: Vec<Grade>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillRecord {
    pub id: String,
    pub name: String,
    pub grade: Grade,
    pub element: Element,
    pub damage: f32,
    pub mana_cost: f32,
    pub cooldown: f32,
    pub status: Option<StatusRider>,
}

/// Compact equipment row expanded once per grade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDefinition {
    pub id: String,
    pub name: String,
    pub slot: EquipSlot,
    pub base_stats: StatBlock,
    #[serde(default)]
    pub base_price: u32,
    pub grades: Vec<Grade>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub id: String,
    pub name: String,
    pub grade: Grade,
    pub slot: EquipSlot,
    pub stats: StatBlock,
    pub price: u32,
}
