use serde::{Deserialize, Serialize};

use super::effect::DialogueEffect;

/// The slice of actor state dialogue conditions look at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorProfile {
    pub race: String,
    pub level: u32,
}

/// Gate on whether a graph is offered to an actor at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Condition {
    RaceEquals(String),
    MinLevel(u32),
}

impl Condition {
    pub fn is_met(&self, actor: &ActorProfile) -> bool {
        match self {
            Self::RaceEquals(race) => actor.race == *race,
            Self::MinLevel(level) => actor.level >= *level,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueChoice {
    pub text: String,
    /// `None` ends the conversation.
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub effect: Option<DialogueEffect>,
}

/// One line of a conversation. A node continues linearly through `next`,
/// branches through `choices`, or ends the conversation when it has
/// neither.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueNode {
    pub id: String,
    pub speaker: String,
    pub text: String,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub choices: Vec<DialogueChoice>,
    /// Fired when the conversation enters this node.
    #[serde(default)]
    pub effect: Option<DialogueEffect>,
}

impl DialogueNode {
    pub fn is_terminal(&self) -> bool {
        self.next.is_none() && self.choices.is_empty()
    }

    /// Every node id this node can lead to.
    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.next
            .as_deref()
            .into_iter()
            .chain(self.choices.iter().filter_map(|c| c.next.as_deref()))
    }
}

/// A branching conversation owned by value. Nodes refer to each other by
/// id only; the first authored node is the entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueGraph {
    pub id: String,
    pub npc: String,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub condition: Option<Condition>,
    pub nodes: Vec<DialogueNode>,
}

impl DialogueGraph {
    pub fn entry(&self) -> Option<&DialogueNode> {
        self.nodes.first()
    }

    pub fn node(&self, id: &str) -> Option<&DialogueNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// True when the graph has no condition or the actor meets it.
    pub fn is_available_to(&self, actor: &ActorProfile) -> bool {
        self.condition.as_ref().map_or(true, |c| c.is_met(actor))
    }
}
