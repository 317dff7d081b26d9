use serde::{Deserialize, Serialize};

use super::stats::StatBlock;

/// Inclusive dungeon floor range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorRange {
    pub min: u32,
    pub max: u32,
}

impl FloorRange {
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, floor: u32) -> bool {
        floor >= self.min && floor <= self.max
    }
}

impl Default for FloorRange {
    fn default() -> Self {
        Self { min: 1, max: u32::MAX }
    }
}

/// How a monster behaves before it is provoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Disposition {
    Passive,
    Neutral,
    Aggressive,
    Territorial,
}

impl Default for Disposition {
    fn default() -> Self {
        Self::Neutral
    }
}

/// A monster race, authored once and shared by many variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceDefinition {
    pub id: String,
    pub name: String,
    /// Tag variants use to find this race.
    pub race_type: String,
    pub base_stats: StatBlock,
    /// Per-stat linear growth applied once per tier.
    #[serde(default)]
    pub growth: StatBlock,
    #[serde(default)]
    pub base_experience: u32,
    #[serde(default)]
    pub base_gold: u32,
    #[serde(default)]
    pub drop_rate: f32,
}

/// A concrete monster variant layered on top of a race.
///
/// The race is referenced by `race_type` only; the builder resolves it
/// against the race index when the variant is materialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantDefinition {
    pub id: String,
    pub name: String,
    pub race_type: String,
    /// Growth tier index (0 = base race stats).
    #[serde(default)]
    pub tier: u32,
    #[serde(default)]
    pub stat_min_variance: StatBlock,
    #[serde(default)]
    pub stat_max_variance: StatBlock,
    #[serde(default = "default_spawn_weight")]
    pub spawn_weight: f32,
    #[serde(default)]
    pub floors: FloorRange,
    #[serde(default)]
    pub disposition: Disposition,
    #[serde(default = "default_aggression")]
    pub aggression: f32,
}

fn default_spawn_weight() -> f32 {
    1.0
}

fn default_aggression() -> f32 {
    1.0
}

/// A fully materialized monster, ready to be stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonsterRecord {
    pub id: String,
    pub name: String,
    pub race_id: String,
    pub race_type: String,
    pub tier: u32,
    pub stats: StatBlock,
    pub experience: u32,
    pub gold: u32,
    pub drop_rate: f32,
    pub spawn_weight: f32,
    pub floors: FloorRange,
    pub disposition: Disposition,
    pub aggression: f32,
}
