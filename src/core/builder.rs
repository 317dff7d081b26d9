/// The idempotent expansion pass: definitions in, stored records out.
///
/// Every definition gets a stable identity derived from its authored id.
/// A definition whose identity is already in the catalog is skipped
/// untouched, so re-running a full pass only fills in what is missing.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rustc_hash::{FxHashMap, FxHasher};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::core::content::{BuildConfig, ContentSet};
use crate::core::dialogue::{self, DialogueError};
use crate::core::outcome::{self, OutcomeError};
use crate::core::scaler;
use crate::core::store::{CatalogStore, StoreError};
use crate::schema::catalog::{
    ItemDefinition, ItemRecord, SkillDefinition, SkillRecord, StatusRider,
};
use crate::schema::dialogue::DialogueGraph;
use crate::schema::event::{EventDefinition, WaveSchedule};
use crate::schema::monster::{MonsterRecord, RaceDefinition, VariantDefinition};
use crate::schema::stats::{Grade, GradeTable, Stat};

/// Malformed authoring data, reported per record.
#[derive(Debug, Error, PartialEq)]
pub enum DefinitionError {
    #[error("variant '{variant}' references unknown race type '{race_type}'")]
    UnknownRace { variant: String, race_type: String },
    #[error("variance band for {} cannot be drawn from: [{min}, {max}]", .stat.name())]
    InvalidVariance { stat: Stat, min: f32, max: f32 },
    #[error("wave {wave} spawns no monsters")]
    EmptyWave { wave: u32 },
    #[error("grade table drops at {grade:?}: {lower} -> {upper}")]
    NonMonotonicGrades { grade: Grade, lower: f32, upper: f32 },
    #[error("outcome table: {0}")]
    Outcome(#[from] OutcomeError),
    #[error("dialogue: {0}")]
    Dialogue(#[from] DialogueError),
}

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("{identity}: {source}")]
    Definition {
        identity: String,
        #[source]
        source: DefinitionError,
    },
    #[error("{identity}: failed to store record: {source}")]
    Persistence {
        identity: String,
        #[source]
        source: StoreError,
    },
}

impl BuildError {
    pub fn identity(&self) -> &str {
        match self {
            Self::Definition { identity, .. } | Self::Persistence { identity, .. } => identity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    Race,
    Monster,
    Item,
    Skill,
    Event,
    Dialogue,
}

impl RecordKind {
    /// Catalog folder records of this kind live under.
    pub fn folder(&self) -> &'static str {
        match self {
            Self::Race => "races",
            Self::Monster => "monsters",
            Self::Item => "items",
            Self::Skill => "skills",
            Self::Event => "events",
            Self::Dialogue => "dialogues",
        }
    }
}

/// A finished record, as handed to the catalog store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Record {
    Race(RaceDefinition),
    Monster(MonsterRecord),
    Item(ItemRecord),
    Skill(SkillRecord),
    Event(EventDefinition),
    Dialogue(DialogueGraph),
}

impl Record {
    pub fn kind(&self) -> RecordKind {
        match self {
            Self::Race(_) => RecordKind::Race,
            Self::Monster(_) => RecordKind::Monster,
            Self::Item(_) => RecordKind::Item,
            Self::Skill(_) => RecordKind::Skill,
            Self::Event(_) => RecordKind::Event,
            Self::Dialogue(_) => RecordKind::Dialogue,
        }
    }
}

/// Lowercase the authored id and replace anything outside `[a-z0-9_]`.
fn slug(id: &str) -> String {
    id.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// Stable identity for a definition: `<folder>/<id>`.
pub fn identity(kind: RecordKind, id: &str) -> String {
    format!("{}/{}", kind.folder(), slug(id))
}

/// Identity for one grade of a per-grade row: `<folder>/<id>_<grade>`.
pub fn graded_identity(kind: RecordKind, id: &str, grade: Grade) -> String {
    format!("{}/{}_{}", kind.folder(), slug(id), grade.suffix())
}

/// Races keyed by race-type tag. Built before any variant and passed in
/// explicitly when variants are materialized.
#[derive(Debug, Clone, Default)]
pub struct RaceIndex {
    by_type: FxHashMap<String, RaceDefinition>,
}

impl RaceIndex {
    /// Index races by tag. The first race declared for a tag wins.
    pub fn from_races(races: &[RaceDefinition]) -> Self {
        let mut by_type = FxHashMap::default();
        for race in races {
            if by_type.contains_key(&race.race_type) {
                warn!(race = %race.id, race_type = %race.race_type, "duplicate race type ignored");
                continue;
            }
            by_type.insert(race.race_type.clone(), race.clone());
        }
        Self { by_type }
    }

    pub fn get(&self, race_type: &str) -> Option<&RaceDefinition> {
        self.by_type.get(race_type)
    }

    pub fn len(&self) -> usize {
        self.by_type.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }
}

/// One authored definition, ready to be materialized.
#[derive(Debug, Clone, Copy)]
pub enum Definition<'a> {
    Race(&'a RaceDefinition),
    Variant {
        variant: &'a VariantDefinition,
        races: &'a RaceIndex,
    },
    Item {
        item: &'a ItemDefinition,
        grade: Grade,
    },
    Skill {
        skill: &'a SkillDefinition,
        grade: Grade,
    },
    Event(&'a EventDefinition),
    Dialogue(&'a DialogueGraph),
}

impl Definition<'_> {
    /// The identity this definition is stored under.
    pub fn identity(&self) -> String {
        match self {
            Self::Race(race) => identity(RecordKind::Race, &race.id),
            Self::Variant { variant, .. } => identity(RecordKind::Monster, &variant.id),
            Self::Item { item, grade } => graded_identity(RecordKind::Item, &item.id, *grade),
            Self::Skill { skill, grade } => graded_identity(RecordKind::Skill, &skill.id, *grade),
            Self::Event(event) => identity(RecordKind::Event, &event.id),
            Self::Dialogue(graph) => identity(RecordKind::Dialogue, &graph.id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildFailure {
    pub identity: String,
    pub message: String,
}

/// Summary of a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub created: usize,
    pub skipped: usize,
    pub failures: Vec<BuildFailure>,
}

impl BuildReport {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn tally(&mut self, result: Result<Option<Record>, BuildError>) {
        match result {
            Ok(Some(_)) => self.created += 1,
            Ok(None) => self.skipped += 1,
            Err(err) => {
                warn!(identity = err.identity(), error = %err, "record failed");
                self.failures.push(BuildFailure {
                    identity: err.identity().to_string(),
                    message: err.to_string(),
                });
            }
        }
    }
}

impl fmt::Display for BuildReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} created, {} skipped, {} failed",
            self.created,
            self.skipped,
            self.failed()
        )
    }
}

/// Materializes definitions and hands them to a catalog store.
pub struct ContentBuilder<S: CatalogStore> {
    store: S,
    seed: u64,
    grades: GradeTable,
}

impl<S: CatalogStore> ContentBuilder<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            seed: 0,
            grades: GradeTable::default(),
        }
    }

    pub fn from_config(config: &BuildConfig, store: S) -> Self {
        Self::new(store)
            .seed(config.seed)
            .grades(config.grades.clone())
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn grades(mut self, grades: GradeTable) -> Self {
        self.grades = grades;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Materialize and store one definition under `identity`.
    ///
    /// Returns `Ok(None)` without touching the store when the identity
    /// already exists.
    pub fn build(
        &mut self,
        definition: Definition<'_>,
        identity: &str,
    ) -> Result<Option<Record>, BuildError> {
        if self.store.exists(identity) {
            debug!(identity, "already in catalog, skipping");
            return Ok(None);
        }

        let record = self
            .materialize(definition, identity)
            .map_err(|source| BuildError::Definition {
                identity: identity.to_string(),
                source,
            })?;

        self.store
            .write(identity, &record)
            .map_err(|source| BuildError::Persistence {
                identity: identity.to_string(),
                source,
            })?;
        debug!(identity, kind = ?record.kind(), "record created");
        Ok(Some(record))
    }

    /// Build every definition in `content`. Races go first so the race
    /// index is complete before any variant resolves against it.
    pub fn run(&mut self, content: &ContentSet) -> BuildReport {
        let mut report = BuildReport::default();
        let races = RaceIndex::from_races(&content.races);

        for race in &content.races {
            self.build_one(Definition::Race(race), &mut report);
        }
        for variant in &content.variants {
            self.build_one(
                Definition::Variant {
                    variant,
                    races: &races,
                },
                &mut report,
            );
        }
        for item in &content.items {
            for grade in &item.grades {
                self.build_one(Definition::Item { item, grade: *grade }, &mut report);
            }
        }
        for skill in &content.skills {
            for grade in &skill.grades {
                self.build_one(Definition::Skill { skill, grade: *grade }, &mut report);
            }
        }
        for event in &content.events {
            self.build_one(Definition::Event(event), &mut report);
        }
        for graph in &content.dialogues {
            self.build_one(Definition::Dialogue(graph), &mut report);
        }

        info!(
            created = report.created,
            skipped = report.skipped,
            failed = report.failed(),
            "content build finished"
        );
        report
    }

    fn build_one(&mut self, definition: Definition<'_>, report: &mut BuildReport) {
        let identity = definition.identity();
        report.tally(self.build(definition, &identity));
    }

    /// Each record draws from its own generator, seeded from the batch
    /// seed and the identity, so results do not depend on build order.
    fn rng_for(&self, identity: &str) -> StdRng {
        let mut hasher = FxHasher::default();
        identity.hash(&mut hasher);
        StdRng::seed_from_u64(self.seed ^ hasher.finish())
    }

    fn materialize(
        &self,
        definition: Definition<'_>,
        identity: &str,
    ) -> Result<Record, DefinitionError> {
        match definition {
            Definition::Race(race) => Ok(Record::Race(race.clone())),
            Definition::Variant { variant, races } => {
                let mut rng = self.rng_for(identity);
                build_monster(variant, races, &mut rng).map(Record::Monster)
            }
            Definition::Item { item, grade } => {
                self.check_grades()?;
                Ok(Record::Item(build_item(item, grade, &self.grades)))
            }
            Definition::Skill { skill, grade } => {
                self.check_grades()?;
                Ok(Record::Skill(build_skill(skill, grade, &self.grades)))
            }
            Definition::Event(event) => build_event(event).map(Record::Event),
            Definition::Dialogue(graph) => {
                dialogue::validate(graph)?;
                Ok(Record::Dialogue(graph.clone()))
            }
        }
    }

    fn check_grades(&self) -> Result<(), DefinitionError> {
        self.grades
            .check_monotonic()
            .map_err(|(grade, lower, upper)| DefinitionError::NonMonotonicGrades {
                grade,
                lower,
                upper,
            })
    }
}

/// Race stats grown to the variant's tier, plus an independent variance
/// roll per stat.
pub fn build_monster(
    variant: &VariantDefinition,
    races: &RaceIndex,
    rng: &mut StdRng,
) -> Result<MonsterRecord, DefinitionError> {
    let race = races
        .get(&variant.race_type)
        .ok_or_else(|| DefinitionError::UnknownRace {
            variant: variant.id.clone(),
            race_type: variant.race_type.clone(),
        })?;

    scaler::check_variance(&variant.stat_min_variance, &variant.stat_max_variance)
        .map_err(|(stat, min, max)| DefinitionError::InvalidVariance { stat, min, max })?;

    let grown = scaler::growth_scale(&race.base_stats, &race.growth, variant.tier);
    let rolled = scaler::roll(&variant.stat_min_variance, &variant.stat_max_variance, rng);

    Ok(MonsterRecord {
        id: variant.id.clone(),
        name: variant.name.clone(),
        race_id: race.id.clone(),
        race_type: race.race_type.clone(),
        tier: variant.tier,
        stats: (grown + rolled).rounded(),
        experience: race.base_experience,
        gold: race.base_gold,
        drop_rate: race.drop_rate,
        spawn_weight: variant.spawn_weight,
        floors: variant.floors,
        disposition: variant.disposition,
        aggression: variant.aggression,
    })
}

pub fn build_item(item: &ItemDefinition, grade: Grade, grades: &GradeTable) -> ItemRecord {
    let multiplier = grades.multiplier(grade);
    ItemRecord {
        id: format!("{}_{}", slug(&item.id), grade.suffix()),
        name: item.name.clone(),
        grade,
        slot: item.slot,
        stats: scaler::scale(&item.base_stats, multiplier),
        price: (item.base_price as f32 * multiplier).round().max(0.0) as u32,
    }
}

pub fn build_skill(skill: &SkillDefinition, grade: Grade, grades: &GradeTable) -> SkillRecord {
    let multiplier = grades.multiplier(grade);
    SkillRecord {
        id: format!("{}_{}", slug(&skill.id), grade.suffix()),
        name: skill.name.clone(),
        grade,
        element: skill.element,
        damage: (skill.base_damage * multiplier).round(),
        mana_cost: (skill.mana_cost * multiplier).round(),
        cooldown: skill.cooldown,
        status: skill.status.map(|rider| StatusRider {
            chance: (rider.chance * multiplier).clamp(0.0, 1.0),
            ..rider
        }),
    }
}

/// Validate an event and return the stored form: weights normalized and
/// waves in firing order.
pub fn build_event(event: &EventDefinition) -> Result<EventDefinition, DefinitionError> {
    outcome::check_table(&event.outcomes)?;

    let mut record = event.clone();
    if !event.outcomes.is_normalized() {
        warn!(
            event = %event.id,
            total = event.outcomes.total_weight(),
            "outcome weights do not sum to 1.0; normalizing"
        );
        record.outcomes = event.outcomes.normalized();
    }

    if let Some(schedule) = &event.waves {
        if let Some(empty) = schedule.waves.iter().find(|w| w.count == 0) {
            return Err(DefinitionError::EmptyWave {
                wave: empty.wave_number,
            });
        }
        record.waves = Some(WaveSchedule::new(
            schedule.in_firing_order().into_iter().cloned().collect(),
        ));
    }
    Ok(record)
}
