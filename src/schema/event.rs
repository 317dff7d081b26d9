use rand::Rng;
use serde::{Deserialize, Serialize};

use super::effect::Effect;
use super::monster::FloorRange;
use super::stats::Grade;

/// Weight totals within this distance of 1.0 count as normalized.
pub const WEIGHT_TOLERANCE: f32 = 1e-3;

/// One alternative result of an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub description: String,
    pub weight: f32,
    pub effect: Effect,
    /// UX hint only; never consulted when resolving.
    #[serde(default)]
    pub is_negative: bool,
}

/// Ordered, probability-weighted alternatives.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutcomeTable {
    pub outcomes: Vec<Outcome>,
}

impl OutcomeTable {
    pub fn new(outcomes: Vec<Outcome>) -> Self {
        Self { outcomes }
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn total_weight(&self) -> f32 {
        self.outcomes.iter().map(|o| o.weight).sum()
    }

    pub fn is_normalized(&self) -> bool {
        (self.total_weight() - 1.0).abs() <= WEIGHT_TOLERANCE
    }

    /// A copy whose weights are divided by their sum. Tables with a
    /// non-positive total are returned unchanged.
    pub fn normalized(&self) -> OutcomeTable {
        let total = self.total_weight();
        if total <= 0.0 {
            return self.clone();
        }
        OutcomeTable {
            outcomes: self
                .outcomes
                .iter()
                .map(|o| Outcome {
                    weight: o.weight / total,
                    ..o.clone()
                })
                .collect(),
        }
    }
}

/// Replaces the weighted draw with a guaranteed result when the actor
/// holds `required_item`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemInteraction {
    pub required_item: String,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatWave {
    pub wave_number: u32,
    pub race_type: String,
    #[serde(default)]
    pub variant_tag: String,
    pub count: u32,
    /// Seconds after event start.
    #[serde(default)]
    pub delay_before_wave: f32,
    #[serde(default)]
    pub is_elite: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WaveSchedule {
    pub waves: Vec<CombatWave>,
}

impl WaveSchedule {
    pub fn new(waves: Vec<CombatWave>) -> Self {
        Self { waves }
    }

    /// Waves sorted by wave number. Equal numbers keep authored order.
    pub fn in_firing_order(&self) -> Vec<&CombatWave> {
        let mut ordered: Vec<&CombatWave> = self.waves.iter().collect();
        ordered.sort_by_key(|w| w.wave_number);
        ordered
    }

    /// Waves whose delay falls in `(after, until]`, in firing order.
    pub fn due_between(&self, after: f32, until: f32) -> Vec<&CombatWave> {
        self.in_firing_order()
            .into_iter()
            .filter(|w| w.delay_before_wave > after && w.delay_before_wave <= until)
            .collect()
    }

    pub fn total_monsters(&self) -> u32 {
        self.waves.iter().map(|w| w.count).sum()
    }

    /// Time from event start until the last wave spawns.
    pub fn last_spawn_time(&self) -> f32 {
        self.waves
            .iter()
            .map(|w| w.delay_before_wave)
            .fold(0.0, f32::max)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopListing {
    pub item_id: String,
    pub price: u32,
    pub stock: u32,
    #[serde(default)]
    pub discount_chance: f32,
    /// Fraction taken off the price when the discount hits (0.25 = 25%).
    #[serde(default)]
    pub discount_percent: f32,
}

impl ShopListing {
    pub fn roll_price<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        if self.discount_chance > 0.0 && rng.gen::<f32>() < self.discount_chance {
            let discounted = self.price as f32 * (1.0 - self.discount_percent.clamp(0.0, 1.0));
            discounted.round() as u32
        } else {
            self.price
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    Treasure,
    Trap,
    Shrine,
    Merchant,
    Ambush,
    Mystery,
    Rest,
    World,
}

/// How an event decides whether it appears on a floor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerKind {
    Chance,
    FloorGuaranteed,
    /// Named condition checked by the game (e.g., "boss_defeated").
    Condition(String),
}

/// A dungeon or world event: bare-hand outcomes, item overrides, optional
/// combat waves and shop stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDefinition {
    pub id: String,
    pub name: String,
    pub category: EventCategory,
    pub rarity: Grade,
    pub trigger: TriggerKind,
    #[serde(default)]
    pub spawn_chance: f32,
    #[serde(default)]
    pub floors: FloorRange,
    pub outcomes: OutcomeTable,
    #[serde(default)]
    pub interactions: Vec<ItemInteraction>,
    #[serde(default)]
    pub waves: Option<WaveSchedule>,
    #[serde(default)]
    pub shop: Vec<ShopListing>,
    /// Seconds allowed to clear the waves.
    #[serde(default)]
    pub time_limit: Option<f32>,
}

impl EventDefinition {
    /// Decide whether this event appears on `floor`. `conditions` answers
    /// named-condition triggers.
    pub fn triggers<R, F>(&self, floor: u32, conditions: F, rng: &mut R) -> bool
    where
        R: Rng + ?Sized,
        F: Fn(&str) -> bool,
    {
        if !self.floors.contains(floor) {
            return false;
        }
        match &self.trigger {
            TriggerKind::Chance => rng.gen::<f32>() < self.spawn_chance,
            TriggerKind::FloorGuaranteed => true,
            TriggerKind::Condition(name) => conditions(name),
        }
    }

    pub fn has_combat(&self) -> bool {
        self.waves.as_ref().is_some_and(|w| !w.waves.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn outcome(description: &str, weight: f32, effect: Effect) -> Outcome {
        Outcome {
            description: description.to_string(),
            weight,
            effect,
            is_negative: false,
        }
    }

    fn wave(number: u32, delay: f32, count: u32) -> CombatWave {
        CombatWave {
            wave_number: number,
            race_type: "goblin".to_string(),
            variant_tag: String::new(),
            count,
            delay_before_wave: delay,
            is_elite: false,
        }
    }

    #[test]
    fn normalized_divides_by_sum() {
        let table = OutcomeTable::new(vec![
            outcome("a", 2.0, Effect::Nothing),
            outcome("b", 6.0, Effect::Nothing),
        ]);
        assert!(!table.is_normalized());
        let n = table.normalized();
        assert!(n.is_normalized());
        assert!((n.outcomes[0].weight - 0.25).abs() < 1e-6);
        assert!((n.outcomes[1].weight - 0.75).abs() < 1e-6);
        assert_eq!(n.outcomes[1].description, "b");
    }

    #[test]
    fn normalized_leaves_zero_total_alone() {
        let table = OutcomeTable::new(vec![outcome("a", 0.0, Effect::Nothing)]);
        assert_eq!(table.normalized(), table);
    }

    #[test]
    fn waves_fire_in_number_order() {
        let schedule = WaveSchedule::new(vec![wave(2, 10.0, 3), wave(1, 0.0, 2), wave(3, 25.0, 1)]);
        let order: Vec<u32> = schedule.in_firing_order().iter().map(|w| w.wave_number).collect();
        assert_eq!(order, vec![1, 2, 3]);
        assert_eq!(schedule.total_monsters(), 6);
        assert_eq!(schedule.last_spawn_time(), 25.0);
    }

    #[test]
    fn due_between_measures_from_event_start() {
        let schedule = WaveSchedule::new(vec![wave(1, 0.0, 2), wave(2, 10.0, 3), wave(3, 25.0, 1)]);
        let numbers = |waves: Vec<&CombatWave>| -> Vec<u32> {
            waves.iter().map(|w| w.wave_number).collect()
        };
        let first = numbers(schedule.due_between(-1.0, 0.0));
        assert_eq!(first, vec![1]);
        let later = numbers(schedule.due_between(0.0, 30.0));
        assert_eq!(later, vec![2, 3]);
    }

    #[test]
    fn shop_price_without_discount() {
        let listing = ShopListing {
            item_id: "potion".to_string(),
            price: 100,
            stock: 5,
            discount_chance: 0.0,
            discount_percent: 0.5,
        };
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(listing.roll_price(&mut rng), 100);
    }

    #[test]
    fn shop_price_always_discounted() {
        let listing = ShopListing {
            item_id: "potion".to_string(),
            price: 100,
            stock: 5,
            discount_chance: 1.0,
            discount_percent: 0.25,
        };
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(listing.roll_price(&mut rng), 75);
    }

    #[test]
    fn triggers_respect_floor_and_kind() {
        let mut event = EventDefinition {
            id: "shrine".to_string(),
            name: "Shrine".to_string(),
            category: EventCategory::Shrine,
            rarity: Grade::Rare,
            trigger: TriggerKind::FloorGuaranteed,
            spawn_chance: 0.0,
            floors: FloorRange::new(5, 5),
            outcomes: OutcomeTable::default(),
            interactions: Vec::new(),
            waves: None,
            shop: Vec::new(),
            time_limit: None,
        };
        let mut rng = StdRng::seed_from_u64(1);
        assert!(event.triggers(5, |_| false, &mut rng));
        assert!(!event.triggers(4, |_| false, &mut rng));

        event.trigger = TriggerKind::Condition("boss_defeated".to_string());
        assert!(event.triggers(5, |c| c == "boss_defeated", &mut rng));
        assert!(!event.triggers(5, |_| false, &mut rng));

        event.trigger = TriggerKind::Chance;
        assert!(!event.triggers(5, |_| true, &mut rng));
        event.spawn_chance = 1.0;
        assert!(event.triggers(5, |_| true, &mut rng));
    }
}
