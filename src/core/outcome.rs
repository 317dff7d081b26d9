/// Weighted outcome resolution with item-gated overrides.

use rand::Rng;
use rustc_hash::FxHashSet;
use std::collections::HashSet;
use thiserror::Error;
use tracing::warn;

use crate::schema::event::{EventDefinition, ItemInteraction, Outcome, OutcomeTable};

#[derive(Debug, Error, PartialEq)]
pub enum OutcomeError {
    #[error("outcome table is empty")]
    EmptyTable,
    #[error("outcome '{description}' has invalid weight {weight}")]
    InvalidWeight { description: String, weight: f32 },
    #[error("outcome weights sum to zero")]
    ZeroTotal,
}

/// Answers whether the acting entity holds an item.
pub trait ItemQuery {
    fn has(&self, item_id: &str) -> bool;
}

impl ItemQuery for HashSet<String> {
    fn has(&self, item_id: &str) -> bool {
        self.contains(item_id)
    }
}

impl ItemQuery for FxHashSet<String> {
    fn has(&self, item_id: &str) -> bool {
        self.contains(item_id)
    }
}

impl ItemQuery for Vec<String> {
    fn has(&self, item_id: &str) -> bool {
        self.iter().any(|i| i == item_id)
    }
}

impl<const N: usize> ItemQuery for [&str; N] {
    fn has(&self, item_id: &str) -> bool {
        self.contains(&item_id)
    }
}

/// Reject tables the resolver cannot draw from: empty, carrying a
/// negative or non-finite weight, or with nothing but zero weights.
pub fn check_table(table: &OutcomeTable) -> Result<(), OutcomeError> {
    if table.is_empty() {
        return Err(OutcomeError::EmptyTable);
    }
    for outcome in &table.outcomes {
        if !outcome.weight.is_finite() || outcome.weight < 0.0 {
            return Err(OutcomeError::InvalidWeight {
                description: outcome.description.clone(),
                weight: outcome.weight,
            });
        }
    }
    if table.total_weight() <= 0.0 {
        return Err(OutcomeError::ZeroTotal);
    }
    Ok(())
}

/// Resolve one outcome.
///
/// Interactions are checked first, in authored order, and the first one
/// whose item the actor holds wins outright. Otherwise a uniform draw
/// walks the table's cumulative weights.
pub fn resolve<'a, R>(
    table: &'a OutcomeTable,
    interactions: &'a [ItemInteraction],
    inventory: &dyn ItemQuery,
    rng: &mut R,
) -> Result<&'a Outcome, OutcomeError>
where
    R: Rng + ?Sized,
{
    if let Some(hit) = interactions
        .iter()
        .find(|i| inventory.has(&i.required_item))
    {
        return Ok(&hit.outcome);
    }

    if table.is_empty() {
        return Err(OutcomeError::EmptyTable);
    }
    if table.total_weight() <= 0.0 {
        return Err(OutcomeError::ZeroTotal);
    }
    if !table.is_normalized() {
        warn!(
            total = table.total_weight(),
            outcomes = table.outcomes.len(),
            "outcome weights do not sum to 1.0; residual mass goes to the last outcome"
        );
    }

    let r: f32 = rng.gen();
    select_weighted(&table.outcomes, r).ok_or(OutcomeError::ZeroTotal)
}

/// Resolve an event's bare-hand outcomes and item interactions.
pub fn resolve_event<'a, R>(
    event: &'a EventDefinition,
    inventory: &dyn ItemQuery,
    rng: &mut R,
) -> Result<&'a Outcome, OutcomeError>
where
    R: Rng + ?Sized,
{
    resolve(&event.outcomes, &event.interactions, inventory, rng)
}

/// Walk `outcomes` in order accumulating weights and return the first
/// positive-weight outcome whose cumulative weight reaches `r`. Any mass
/// left over when the weights sum below `r` goes to the last
/// positive-weight outcome. `None` when no outcome has positive weight.
pub fn select_weighted(outcomes: &[Outcome], r: f32) -> Option<&Outcome> {
    let mut cumulative = 0.0;
    for outcome in outcomes {
        if outcome.weight <= 0.0 {
            continue;
        }
        cumulative += outcome.weight;
        if cumulative >= r {
            return Some(outcome);
        }
    }
    outcomes.iter().rev().find(|o| o.weight > 0.0)
}
