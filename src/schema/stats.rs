use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::{Add, AddAssign};

/// Names a single field of a [`StatBlock`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stat {
    Strength,
    Agility,
    Vitality,
    Intelligence,
    Defense,
    MagicDefense,
    Luck,
    Stability,
    CritRate,
    EvasionRate,
}

impl Stat {
    pub const ALL: [Stat; 10] = [
        Stat::Strength,
        Stat::Agility,
        Stat::Vitality,
        Stat::Intelligence,
        Stat::Defense,
        Stat::MagicDefense,
        Stat::Luck,
        Stat::Stability,
        Stat::CritRate,
        Stat::EvasionRate,
    ];

    /// Rate fields keep float precision when scaled; everything else is a
    /// display stat and is rounded to whole units.
    pub fn is_rate(&self) -> bool {
        matches!(self, Stat::CritRate | Stat::EvasionRate)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Strength => "strength",
            Self::Agility => "agility",
            Self::Vitality => "vitality",
            Self::Intelligence => "intelligence",
            Self::Defense => "defense",
            Self::MagicDefense => "magic_defense",
            Self::Luck => "luck",
            Self::Stability => "stability",
            Self::CritRate => "crit_rate",
            Self::EvasionRate => "evasion_rate",
        }
    }
}

/// Named numeric attributes. Every field defaults to zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StatBlock {
    pub strength: f32,
    pub agility: f32,
    pub vitality: f32,
    pub intelligence: f32,
    pub defense: f32,
    pub magic_defense: f32,
    pub luck: f32,
    pub stability: f32,
    pub crit_rate: f32,
    pub evasion_rate: f32,
}

impl StatBlock {
    pub fn get(&self, stat: Stat) -> f32 {
        match stat {
            Stat::Strength => self.strength,
            Stat::Agility => self.agility,
            Stat::Vitality => self.vitality,
            Stat::Intelligence => self.intelligence,
            Stat::Defense => self.defense,
            Stat::MagicDefense => self.magic_defense,
            Stat::Luck => self.luck,
            Stat::Stability => self.stability,
            Stat::CritRate => self.crit_rate,
            Stat::EvasionRate => self.evasion_rate,
        }
    }

    pub fn set(&mut self, stat: Stat, value: f32) {
        let field = match stat {
            Stat::Strength => &mut self.strength,
            Stat::Agility => &mut self.agility,
            Stat::Vitality => &mut self.vitality,
            Stat::Intelligence => &mut self.intelligence,
            Stat::Defense => &mut self.defense,
            Stat::MagicDefense => &mut self.magic_defense,
            Stat::Luck => &mut self.luck,
            Stat::Stability => &mut self.stability,
            Stat::CritRate => &mut self.crit_rate,
            Stat::EvasionRate => &mut self.evasion_rate,
        };
        *field = value;
    }

    /// Build a new block by applying `f` to every field.
    pub fn map<F>(&self, mut f: F) -> StatBlock
    where
        F: FnMut(Stat, f32) -> f32,
    {
        let mut out = StatBlock::default();
        for stat in Stat::ALL {
            out.set(stat, f(stat, self.get(stat)));
        }
        out
    }

    /// Combine two blocks field by field.
    pub fn zip_with<F>(&self, other: &StatBlock, mut f: F) -> StatBlock
    where
        F: FnMut(Stat, f32, f32) -> f32,
    {
        let mut out = StatBlock::default();
        for stat in Stat::ALL {
            out.set(stat, f(stat, self.get(stat), other.get(stat)));
        }
        out
    }

    /// Round display stats to whole units, leaving rate fields untouched.
    pub fn rounded(&self) -> StatBlock {
        self.map(|stat, v| if stat.is_rate() { v } else { v.round() })
    }

    pub fn is_zero(&self) -> bool {
        Stat::ALL.iter().all(|s| self.get(*s) == 0.0)
    }
}

impl Add for StatBlock {
    type Output = StatBlock;

    fn add(self, rhs: StatBlock) -> StatBlock {
        self.zip_with(&rhs, |_, a, b| a + b)
    }
}

impl AddAssign for StatBlock {
    fn add_assign(&mut self, rhs: StatBlock) {
        *self = *self + rhs;
    }
}

/// Ordinal rarity tier used to scale numeric power.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Grade {
    pub const ALL: [Grade; 5] = [
        Grade::Common,
        Grade::Uncommon,
        Grade::Rare,
        Grade::Epic,
        Grade::Legendary,
    ];

    pub fn index(&self) -> u32 {
        match self {
            Self::Common => 0,
            Self::Uncommon => 1,
            Self::Rare => 2,
            Self::Epic => 3,
            Self::Legendary => 4,
        }
    }

    /// Lowercase suffix used in record identities (e.g., "rare").
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Common => "common",
            Self::Uncommon => "uncommon",
            Self::Rare => "rare",
            Self::Epic => "epic",
            Self::Legendary => "legendary",
        }
    }
}

/// Per-grade multiplier table. Grades without an entry scale by `1.0`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GradeTable {
    pub multipliers: BTreeMap<Grade, f32>,
}

impl GradeTable {
    pub fn new<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Grade, f32)>,
    {
        Self {
            multipliers: entries.into_iter().collect(),
        }
    }

    pub fn multiplier(&self, grade: Grade) -> f32 {
        self.multipliers.get(&grade).copied().unwrap_or(1.0)
    }

    /// Returns the first grade whose multiplier is lower than the grade
    /// below it, along with both multipliers.
    pub fn check_monotonic(&self) -> Result<(), (Grade, f32, f32)> {
        for pair in Grade::ALL.windows(2) {
            let lower = self.multiplier(pair[0]);
            let upper = self.multiplier(pair[1]);
            if upper < lower {
                return Err((pair[1], lower, upper));
            }
        }
        Ok(())
    }
}

/// Closed interval a concrete value is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VarianceRange {
    pub min: f32,
    pub max: f32,
}

impl VarianceRange {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// `(0, 0)`: no variance, the base value is used as-is.
    pub fn is_empty(&self) -> bool {
        self.min == 0.0 && self.max == 0.0
    }

    /// Both bounds finite and their span representable. Anything else
    /// cannot be drawn from.
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && (self.max - self.min).is_finite()
    }

    fn ordered(&self) -> (f32, f32) {
        if self.min <= self.max {
            (self.min, self.max)
        } else {
            (self.max, self.min)
        }
    }

    /// Draw uniformly from `[min, max]`. Reversed bounds are reordered.
    /// A range that is not `is_valid` is never drawn from; its lower
    /// bound comes back as-is.
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        let (lo, hi) = self.ordered();
        if lo == hi || !self.is_valid() {
            return lo;
        }
        rng.gen_range(lo..=hi)
    }

    /// Draw a whole number uniformly from the integers inside
    /// `[min, max]`, so every value a display stat can land on is equally
    /// likely. Falls back to `roll` when the band holds no integer or is
    /// too wide for exact `f32` integers.
    pub fn roll_whole<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        const EXACT: f32 = 16_777_216.0; // 2^24

        let (lo, hi) = self.ordered();
        let (first, last) = (lo.ceil(), hi.floor());
        if !self.is_valid() || first > last || first < -EXACT || last > EXACT {
            return self.roll(rng);
        }
        if first == last {
            return first;
        }
        rng.gen_range(first as i32..=last as i32) as f32
    }
}
