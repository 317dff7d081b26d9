use serde::{Deserialize, Serialize};

use super::stats::Stat;

/// Status conditions an outcome can apply or cure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusKind {
    Burn,
    Poison,
    Freeze,
    Stun,
    Bleed,
    Blind,
    Silence,
    Curse,
}

/// The effect carried by an [`Outcome`](super::event::Outcome).
///
/// Magnitudes and durations live on the variant that uses them, so a
/// consumer matching on this enum sees exactly the data each kind needs.
/// Durations are in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Effect {
    Damage(f32),
    /// Damage as a fraction of max health (0.3 = 30%).
    DamagePercent(f32),
    Heal(f32),
    /// Heal as a fraction of max health (0.5 = 50%).
    HealPercent(f32),
    FullRestore,
    GainGold(u32),
    LoseGold(u32),
    ApplyStatus {
        status: StatusKind,
        chance: f32,
        duration: f32,
    },
    CureStatus(StatusKind),
    SpawnMonster {
        race_type: String,
        count: u32,
    },
    /// Move the actor by a number of floors; negative goes up.
    Teleport {
        floors: i32,
    },
    RevealMap,
    Buff {
        stat: Stat,
        amount: f32,
        duration: f32,
    },
    Debuff {
        stat: Stat,
        amount: f32,
        duration: f32,
    },
    GainItem {
        item_id: String,
        count: u32,
    },
    Nothing,
}

impl Effect {
    /// Short kind name, used in logs and lint output.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Damage(_) => "damage",
            Self::DamagePercent(_) => "damage_percent",
            Self::Heal(_) => "heal",
            Self::HealPercent(_) => "heal_percent",
            Self::FullRestore => "full_restore",
            Self::GainGold(_) => "gain_gold",
            Self::LoseGold(_) => "lose_gold",
            Self::ApplyStatus { .. } => "apply_status",
            Self::CureStatus(_) => "cure_status",
            Self::SpawnMonster { .. } => "spawn_monster",
            Self::Teleport { .. } => "teleport",
            Self::RevealMap => "reveal_map",
            Self::Buff { .. } => "buff",
            Self::Debuff { .. } => "debuff",
            Self::GainItem { .. } => "gain_item",
            Self::Nothing => "nothing",
        }
    }

    /// Whether the effect works against the actor. Authors set
    /// `is_negative` on outcomes by hand; the linter compares the two.
    pub fn is_harmful(&self) -> bool {
        matches!(
            self,
            Self::Damage(_)
                | Self::DamagePercent(_)
                | Self::LoseGold(_)
                | Self::ApplyStatus { .. }
                | Self::SpawnMonster { .. }
                | Self::Debuff { .. }
        )
    }
}

/// Side effects fired while walking a dialogue graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DialogueEffect {
    GiveGold(u32),
    TakeGold(u32),
    /// Heal as a fraction of max health.
    Heal(f32),
    GiveItem(String),
    OpenShop,
    OpenCrafting,
    AcceptQuest(String),
}
