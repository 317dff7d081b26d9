/// Authoring checks run ahead of a build pass.
///
/// Errors are problems the builder would reject or silently skip.
/// Warnings are legal but probably unintended.

use rustc_hash::FxHashSet;

use crate::core::builder::{graded_identity, identity, RecordKind};
use crate::core::content::ContentSet;
use crate::core::dialogue;
use crate::core::outcome;
use crate::core::scaler;
use crate::schema::event::{EventDefinition, TriggerKind};
use crate::schema::stats::GradeTable;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LintReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl LintReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

pub fn lint_content(content: &ContentSet, grades: &GradeTable) -> LintReport {
    let mut report = LintReport::default();

    if let Err((grade, lower, upper)) = grades.check_monotonic() {
        report.errors.push(format!(
            "Grade table drops at {:?} ({} -> {})",
            grade, lower, upper
        ));
    }

    check_identities(content, &mut report);

    let race_types: FxHashSet<&str> = content.races.iter().map(|r| r.race_type.as_str()).collect();
    let variant_ids: FxHashSet<&str> = content.variants.iter().map(|v| v.id.as_str()).collect();

    for variant in &content.variants {
        if !race_types.contains(variant.race_type.as_str()) {
            report.errors.push(format!(
                "Variant '{}' references unknown race type '{}'",
                variant.id, variant.race_type
            ));
        }
        if let Err((stat, min, max)) =
            scaler::check_variance(&variant.stat_min_variance, &variant.stat_max_variance)
        {
            report.errors.push(format!(
                "Variant '{}' has an undrawable {} variance band [{}, {}]",
                variant.id,
                stat.name(),
                min,
                max
            ));
        }
    }

    for event in &content.events {
        lint_event(event, &race_types, &variant_ids, &mut report);
    }

    for graph in &content.dialogues {
        for problem in dialogue::problems(graph) {
            report.errors.push(problem.to_string());
        }
        for orphan in dialogue::unreachable_nodes(graph) {
            report.warnings.push(format!(
                "Node '{}' in graph '{}' is unreachable from the entry node",
                orphan, graph.id
            ));
        }
    }

    report
}

/// Two definitions that map to the same identity would leave the second
/// one silently skipped.
fn check_identities(content: &ContentSet, report: &mut LintReport) {
    let mut seen: FxHashSet<String> = FxHashSet::default();
    let mut claim = |id: String, report: &mut LintReport| {
        if !seen.insert(id.clone()) {
            report
                .errors
                .push(format!("Identity '{}' is defined more than once", id));
        }
    };

    for race in &content.races {
        claim(identity(RecordKind::Race, &race.id), report);
    }
    for variant in &content.variants {
        claim(identity(RecordKind::Monster, &variant.id), report);
    }
    for item in &content.items {
        for grade in &item.grades {
            claim(graded_identity(RecordKind::Item, &item.id, *grade), report);
        }
    }
    for skill in &content.skills {
        for grade in &skill.grades {
            claim(graded_identity(RecordKind::Skill, &skill.id, *grade), report);
        }
    }
    for event in &content.events {
        claim(identity(RecordKind::Event, &event.id), report);
    }
    for graph in &content.dialogues {
        claim(identity(RecordKind::Dialogue, &graph.id), report);
    }
}

fn lint_event(
    event: &EventDefinition,
    race_types: &FxHashSet<&str>,
    variant_ids: &FxHashSet<&str>,
    report: &mut LintReport,
) {
    if let Err(err) = outcome::check_table(&event.outcomes) {
        report
            .errors
            .push(format!("Event '{}' outcome table: {}", event.id, err));
    } else if !event.outcomes.is_normalized() {
        report.warnings.push(format!(
            "Event '{}' outcome weights sum to {} (will be normalized)",
            event.id,
            event.outcomes.total_weight()
        ));
    }

    let guaranteed = event.interactions.iter().map(|i| &i.outcome);
    for o in event.outcomes.outcomes.iter().chain(guaranteed) {
        if o.is_negative != o.effect.is_harmful() {
            report.warnings.push(format!(
                "Event '{}' outcome '{}' is marked is_negative={} but its {} effect disagrees",
                event.id,
                o.description,
                o.is_negative,
                o.effect.kind()
            ));
        }
    }

    if event.trigger == TriggerKind::Chance && event.spawn_chance <= 0.0 {
        report.warnings.push(format!(
            "Event '{}' is chance-triggered with spawn_chance {}",
            event.id, event.spawn_chance
        ));
    }

    if let Some(schedule) = &event.waves {
        let mut numbers = FxHashSet::default();
        for wave in &schedule.waves {
            if wave.count == 0 {
                report.errors.push(format!(
                    "Event '{}' wave {} spawns no monsters",
                    event.id, wave.wave_number
                ));
            }
            if !numbers.insert(wave.wave_number) {
                report.warnings.push(format!(
                    "Event '{}' has more than one wave numbered {}",
                    event.id, wave.wave_number
                ));
            }
            if !race_types.contains(wave.race_type.as_str()) {
                report.warnings.push(format!(
                    "Event '{}' wave {} uses unknown race type '{}'",
                    event.id, wave.wave_number, wave.race_type
                ));
            }
            if !wave.variant_tag.is_empty() && !variant_ids.contains(wave.variant_tag.as_str()) {
                report.warnings.push(format!(
                    "Event '{}' wave {} uses unknown variant '{}'",
                    event.id, wave.wave_number, wave.variant_tag
                ));
            }
        }
    }
}
