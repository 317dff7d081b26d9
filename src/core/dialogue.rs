/// Dialogue graphs: validation, candidate selection, traversal.
///
/// Traversal never touches player state. Effects attached to choices and
/// nodes are handed back to the caller in the order they fire.

use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::schema::dialogue::{ActorProfile, DialogueGraph, DialogueNode};
use crate::schema::effect::DialogueEffect;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DialogueError {
    #[error("graph '{graph}' has no nodes")]
    EmptyGraph { graph: String },
    #[error("graph '{graph}' defines node '{node}' more than once")]
    DuplicateNode { graph: String, node: String },
    #[error("node '{node}' in graph '{graph}' has both a next node and choices")]
    AmbiguousNode { graph: String, node: String },
    #[error("node '{node}' in graph '{graph}' points at missing node '{target}'")]
    DanglingNext {
        graph: String,
        node: String,
        target: String,
    },
    #[error("graph '{graph}' has no node '{node}'")]
    NodeNotFound { graph: String, node: String },
    #[error("node '{node}' offers choices but none was picked")]
    ChoiceRequired { node: String },
    #[error("choice {index} is out of range for node '{node}' ({len} choices)")]
    ChoiceOutOfRange {
        node: String,
        index: usize,
        len: usize,
    },
}

/// Every structural problem in a graph, in node order.
pub fn problems(graph: &DialogueGraph) -> Vec<DialogueError> {
    let mut found = Vec::new();
    if graph.nodes.is_empty() {
        found.push(DialogueError::EmptyGraph {
            graph: graph.id.clone(),
        });
        return found;
    }

    let mut ids: FxHashSet<&str> = FxHashSet::default();
    for node in &graph.nodes {
        if !ids.insert(node.id.as_str()) {
            found.push(DialogueError::DuplicateNode {
                graph: graph.id.clone(),
                node: node.id.clone(),
            });
        }
    }

    for node in &graph.nodes {
        if node.next.is_some() && !node.choices.is_empty() {
            found.push(DialogueError::AmbiguousNode {
                graph: graph.id.clone(),
                node: node.id.clone(),
            });
        }
        for target in node.targets() {
            if !ids.contains(target) {
                found.push(DialogueError::DanglingNext {
                    graph: graph.id.clone(),
                    node: node.id.clone(),
                    target: target.to_string(),
                });
            }
        }
    }
    found
}

/// A graph is well-formed when it has nodes, unique ids, and every
/// reference resolves inside the graph.
pub fn validate(graph: &DialogueGraph) -> Result<(), DialogueError> {
    match problems(graph).into_iter().next() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Ids of nodes that cannot be reached from the entry node.
pub fn unreachable_nodes(graph: &DialogueGraph) -> Vec<&str> {
    let Some(entry) = graph.entry() else {
        return Vec::new();
    };
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    let mut stack = vec![entry.id.as_str()];
    while let Some(id) = stack.pop() {
        if !seen.insert(id) {
            continue;
        }
        if let Some(node) = graph.node(id) {
            stack.extend(node.targets());
        }
    }
    graph
        .nodes
        .iter()
        .map(|n| n.id.as_str())
        .filter(|id| !seen.contains(id))
        .collect()
}

/// Pick the graph to present for `npc`: graphs whose condition the actor
/// fails are skipped, then the highest priority wins and ties go to the
/// earliest declared.
pub fn select_graph<'a>(
    graphs: &'a [DialogueGraph],
    npc: &str,
    actor: &ActorProfile,
) -> Option<&'a DialogueGraph> {
    let mut best: Option<&DialogueGraph> = None;
    for graph in graphs {
        if graph.npc != npc || !graph.is_available_to(actor) {
            continue;
        }
        match best {
            Some(current) if current.priority >= graph.priority => {}
            _ => best = Some(graph),
        }
    }
    best
}

/// The node a conversation is sitting on, plus the effects that fired on
/// the way in.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeView<'a> {
    pub node: &'a DialogueNode,
    pub effects: Vec<DialogueEffect>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Step<'a> {
    Node(NodeView<'a>),
    Terminal { effects: Vec<DialogueEffect> },
}

/// Enter a graph at its entry node, if the actor may see it.
pub fn start<'a>(graph: &'a DialogueGraph, actor: &ActorProfile) -> Option<NodeView<'a>> {
    if !graph.is_available_to(actor) {
        return None;
    }
    let entry = graph.entry()?;
    Some(NodeView {
        node: entry,
        effects: entry.effect.iter().cloned().collect(),
    })
}

/// Advance one step from `current`.
///
/// Nodes with choices need `choice` to be set and in range; the chosen
/// choice's effect fires first. Linear nodes ignore `choice` and move on
/// to `next`. Entering a node fires its own effect. Leaving a terminal
/// node, or picking a choice without a target, ends the conversation.
pub fn step<'a>(
    graph: &'a DialogueGraph,
    current: &str,
    choice: Option<usize>,
) -> Result<Step<'a>, DialogueError> {
    let node = graph
        .node(current)
        .ok_or_else(|| DialogueError::NodeNotFound {
            graph: graph.id.clone(),
            node: current.to_string(),
        })?;

    if !node.choices.is_empty() {
        let index = choice.ok_or_else(|| DialogueError::ChoiceRequired {
            node: node.id.clone(),
        })?;
        let picked = node
            .choices
            .get(index)
            .ok_or_else(|| DialogueError::ChoiceOutOfRange {
                node: node.id.clone(),
                index,
                len: node.choices.len(),
            })?;
        let effects: Vec<DialogueEffect> = picked.effect.iter().cloned().collect();
        return match picked.next.as_deref() {
            Some(target) => enter(graph, node, target, effects),
            None => Ok(Step::Terminal { effects }),
        };
    }

    match node.next.as_deref() {
        Some(target) => enter(graph, node, target, Vec::new()),
        None => Ok(Step::Terminal {
            effects: Vec::new(),
        }),
    }
}

fn enter<'a>(
    graph: &'a DialogueGraph,
    from: &DialogueNode,
    target: &str,
    mut effects: Vec<DialogueEffect>,
) -> Result<Step<'a>, DialogueError> {
    let node = graph
        .node(target)
        .ok_or_else(|| DialogueError::DanglingNext {
            graph: graph.id.clone(),
            node: from.id.clone(),
            target: target.to_string(),
        })?;
    effects.extend(node.effect.iter().cloned());
    Ok(Step::Node(NodeView { node, effects }))
}

/// A conversation in progress: a graph, the current node, and the effects
/// fired so far that the caller has not collected yet.
#[derive(Debug, Clone)]
pub struct Conversation<'a> {
    graph: &'a DialogueGraph,
    current: Option<&'a DialogueNode>,
    pending: Vec<DialogueEffect>,
}

impl<'a> Conversation<'a> {
    pub fn begin(graph: &'a DialogueGraph, actor: &ActorProfile) -> Option<Self> {
        let view = start(graph, actor)?;
        Some(Self {
            graph,
            current: Some(view.node),
            pending: view.effects,
        })
    }

    pub fn graph(&self) -> &'a DialogueGraph {
        self.graph
    }

    pub fn current(&self) -> Option<&'a DialogueNode> {
        self.current
    }

    pub fn is_finished(&self) -> bool {
        self.current.is_none()
    }

    /// Step forward. Returns the new current node, or `None` once the
    /// conversation has ended.
    pub fn advance(
        &mut self,
        choice: Option<usize>,
    ) -> Result<Option<&'a DialogueNode>, DialogueError> {
        let Some(node) = self.current else {
            return Ok(None);
        };
        match step(self.graph, &node.id, choice)? {
            Step::Node(view) => {
                self.pending.extend(view.effects);
                self.current = Some(view.node);
            }
            Step::Terminal { effects } => {
                self.pending.extend(effects);
                self.current = None;
            }
        }
        Ok(self.current)
    }

    /// Hand over every effect fired since the last call.
    pub fn take_effects(&mut self) -> Vec<DialogueEffect> {
        std::mem::take(&mut self.pending)
    }
}
