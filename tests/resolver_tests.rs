/// Outcome resolution against shipped events and hand-built tables.

use balance_forge::core::content::ContentSet;
use balance_forge::core::outcome::{resolve, resolve_event, select_weighted, OutcomeError};
use balance_forge::schema::effect::Effect;
use balance_forge::schema::event::{EventDefinition, ItemInteraction, Outcome, OutcomeTable};
use rand::rngs::StdRng;
use rand::{Error, RngCore, SeedableRng};
use rustc_hash::FxHashSet;
use std::path::Path;

/// Generator pinned to a single word. `gen::<f32>()` keeps the top 24
/// bits, so `0x8000_0000` always draws exactly 0.5.
struct Fixed(u32);

impl RngCore for Fixed {
    fn next_u32(&mut self) -> u32 {
        self.0
    }

    fn next_u64(&mut self) -> u64 {
        u64::from(self.0) << 32 | u64::from(self.0)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        dest.fill(0);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

fn spring_table() -> OutcomeTable {
    OutcomeTable::new(vec![
        Outcome {
            description: "heal 50%".to_string(),
            weight: 0.8,
            effect: Effect::HealPercent(0.5),
            is_negative: false,
        },
        Outcome {
            description: "damage 30".to_string(),
            weight: 0.2,
            effect: Effect::Damage(30.0),
            is_negative: true,
        },
    ])
}

fn antidote() -> Vec<ItemInteraction> {
    vec![ItemInteraction {
        required_item: "PoisonAntidote".to_string(),
        outcome: Outcome {
            description: "full restore".to_string(),
            weight: 1.0,
            effect: Effect::FullRestore,
            is_negative: false,
        },
    }]
}

fn shipped_event(id: &str) -> EventDefinition {
    let content = ContentSet::load_from_dir(Path::new("content")).unwrap();
    content
        .events
        .into_iter()
        .find(|e| e.id == id)
        .unwrap_or_else(|| panic!("no shipped event '{}'", id))
}

#[test]
fn half_draw_lands_on_heal() {
    let table = spring_table();
    let empty: Vec<String> = Vec::new();
    let mut rng = Fixed(0x8000_0000);
    let picked = resolve(&table, &[], &empty, &mut rng).unwrap();
    assert_eq!(picked.description, "heal 50%");

    assert_eq!(
        select_weighted(&table.outcomes, 0.5).map(|o| o.description.as_str()),
        Some("heal 50%")
    );
    assert_eq!(
        select_weighted(&table.outcomes, 0.81).map(|o| o.description.as_str()),
        Some("damage 30")
    );
}

#[test]
fn antidote_always_wins() {
    let table = spring_table();
    let interactions = antidote();
    let inventory = ["PoisonAntidote"];

    for seed in 0..1000 {
        let mut rng = StdRng::seed_from_u64(seed);
        let picked = resolve(&table, &interactions, &inventory, &mut rng).unwrap();
        assert_eq!(picked.description, "full restore");
        assert_eq!(picked.effect, Effect::FullRestore);
    }
}

#[test]
fn same_seed_same_outcome() {
    let table = spring_table();
    let empty: Vec<String> = Vec::new();
    for seed in 0..200 {
        let a = resolve(&table, &[], &empty, &mut StdRng::seed_from_u64(seed)).unwrap();
        let b = resolve(&table, &[], &empty, &mut StdRng::seed_from_u64(seed)).unwrap();
        assert_eq!(a, b);
    }
}

#[test]
fn draws_roughly_follow_weights() {
    let table = spring_table();
    let empty: Vec<String> = Vec::new();
    let mut rng = StdRng::seed_from_u64(99);
    let heals = (0..10_000)
        .filter(|_| {
            resolve(&table, &[], &empty, &mut rng).unwrap().description == "heal 50%"
        })
        .count();
    assert!((7_600..=8_400).contains(&heals), "heals = {}", heals);
}

#[test]
fn unnormalized_weights_still_resolve() {
    let table = OutcomeTable::new(vec![
        Outcome {
            description: "a".to_string(),
            weight: 0.1,
            effect: Effect::Nothing,
            is_negative: false,
        },
        Outcome {
            description: "b".to_string(),
            weight: 0.1,
            effect: Effect::Nothing,
            is_negative: false,
        },
    ]);
    // 0.5 is past the 0.2 total: the residual goes to the last outcome.
    let empty: Vec<String> = Vec::new();
    let picked = resolve(&table, &[], &empty, &mut Fixed(0x8000_0000)).unwrap();
    assert_eq!(picked.description, "b");
}

#[test]
fn empty_table_without_a_matching_item_is_an_error() {
    let table = OutcomeTable::default();
    let interactions = antidote();
    let mut rng = StdRng::seed_from_u64(1);

    let nothing: FxHashSet<String> = FxHashSet::default();
    assert_eq!(
        resolve(&table, &interactions, &nothing, &mut rng),
        Err(OutcomeError::EmptyTable)
    );

    let held = ["PoisonAntidote"];
    assert!(resolve(&table, &interactions, &held, &mut rng).is_ok());
}

#[test]
fn shipped_spring_matches_hand_built_table() {
    let spring = shipped_event("healing_spring");
    let mut rng = StdRng::seed_from_u64(5);

    let held = vec!["PoisonAntidote".to_string()];
    let picked = resolve_event(&spring, &held, &mut rng).unwrap();
    assert_eq!(picked.effect, Effect::FullRestore);

    let empty: Vec<String> = Vec::new();
    let picked = resolve_event(&spring, &empty, &mut Fixed(0x8000_0000)).unwrap();
    assert_eq!(picked.effect, Effect::HealPercent(0.5));
}

#[test]
fn first_listed_interaction_wins() {
    let chest = shipped_event("old_chest");
    let both = ["Crowbar", "Lockpick"];
    let mut rng = StdRng::seed_from_u64(3);
    let picked = resolve_event(&chest, &both, &mut rng).unwrap();
    assert_eq!(picked.description, chest.interactions[0].outcome.description);
}
