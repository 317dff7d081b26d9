/// Authoring data loading and build configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::schema::catalog::{ItemDefinition, SkillDefinition};
use crate::schema::dialogue::DialogueGraph;
use crate::schema::event::EventDefinition;
use crate::schema::monster::{RaceDefinition, VariantDefinition};
use crate::schema::stats::{Grade, GradeTable};

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error in {path}: {source}")]
    Ron {
        path: String,
        #[source]
        source: ron::error::SpannedError,
    },
}

/// Every definition a build pass works from. Each RON file in a content
/// directory holds a partial set; loading merges them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentSet {
    pub races: Vec<RaceDefinition>,
    pub variants: Vec<VariantDefinition>,
    pub items: Vec<ItemDefinition>,
    pub skills: Vec<SkillDefinition>,
    pub events: Vec<EventDefinition>,
    pub dialogues: Vec<DialogueGraph>,
}

impl ContentSet {
    pub fn parse_ron(input: &str) -> Result<ContentSet, ron::error::SpannedError> {
        ron::from_str(input)
    }

    pub fn load_from_ron(path: &Path) -> Result<ContentSet, ContentError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents).map_err(|source| ContentError::Ron {
            path: path.display().to_string(),
            source,
        })
    }

    /// Load and merge every `.ron` file directly inside `dir`, in file
    /// name order.
    pub fn load_from_dir(dir: &Path) -> Result<ContentSet, ContentError> {
        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|s| s.to_str()) == Some("ron") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut set = ContentSet::default();
        for path in paths {
            set.merge(Self::load_from_ron(&path)?);
        }
        Ok(set)
    }

    /// Append another set. Declaration order is preserved: everything in
    /// `self` comes before everything in `other`.
    pub fn merge(&mut self, other: ContentSet) {
        self.races.extend(other.races);
        self.variants.extend(other.variants);
        self.items.extend(other.items);
        self.skills.extend(other.skills);
        self.events.extend(other.events);
        self.dialogues.extend(other.dialogues);
    }

    pub fn len(&self) -> usize {
        self.races.len()
            + self.variants.len()
            + self.items.len()
            + self.skills.len()
            + self.events.len()
            + self.dialogues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Settings for a build pass, usually read from `forge.ron`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    pub seed: u64,
    pub content_dir: PathBuf,
    pub catalog_dir: PathBuf,
    pub grades: GradeTable,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            content_dir: PathBuf::from("content"),
            catalog_dir: PathBuf::from("catalog"),
            grades: GradeTable::new([
                (Grade::Common, 1.0),
                (Grade::Uncommon, 1.25),
                (Grade::Rare, 1.5),
                (Grade::Epic, 2.0),
                (Grade::Legendary, 3.0),
            ]),
        }
    }
}

impl BuildConfig {
    pub fn load_from_ron(path: &Path) -> Result<BuildConfig, ContentError> {
        let contents = std::fs::read_to_string(path)?;
        ron::from_str(&contents).map_err(|source| ContentError::Ron {
            path: path.display().to_string(),
            source,
        })
    }
}
