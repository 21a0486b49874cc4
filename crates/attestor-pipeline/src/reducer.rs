//! Fold per-excerpt outcomes into the aggregate record
//!
//! Merge rules, applied by iterating outcomes in excerpt-index order:
//!
//! - Scalars (auditor, time period, scope): first non-empty value wins.
//!   A fact discovered twice must not flip-flop by processing order, so
//!   later excerpts cannot override a field once set.
//! - Exceptions: concatenated in excerpt order, never de-duplicated.
//!   Distinct excerpts rarely describe the same exception; dropping one
//!   because it resembles another is worse than a duplicate.
//! - Tags and system description: de-duplicating union, first appearance
//!   kept, so the output is deterministic.
//! - Status counts: elementwise sum over successful outcomes.
//!
//! The reducer is single-threaded and consumes an already-ordered sequence;
//! it holds no shared state and needs no locking.

use attestor_domain::{AggregateRecord, ExtractionOutcome};
use std::collections::HashSet;

/// Reduce the ordered outcome sequence into one aggregate record.
///
/// `total_excerpts` is the sequence length regardless of how many failed;
/// `error` lists every failure as `Excerpt <index+1>: <reason>` and is
/// absent when nothing failed.
pub fn reduce(outcomes: Vec<ExtractionOutcome>) -> AggregateRecord {
    let mut aggregate = AggregateRecord {
        total_excerpts: outcomes.len(),
        ..Default::default()
    };

    let mut seen_tags: HashSet<String> = HashSet::new();
    let mut seen_bullets: HashSet<String> = HashSet::new();
    let mut failures: Vec<String> = Vec::new();

    for outcome in outcomes {
        match outcome {
            ExtractionOutcome::Success(record) => {
                first_wins(&mut aggregate.auditor, record.auditor);
                first_wins(&mut aggregate.time_period, record.time_period);
                first_wins(&mut aggregate.scope, record.scope);

                aggregate.exceptions.extend(record.exceptions);

                for tag in record.tags {
                    if seen_tags.insert(tag.clone()) {
                        aggregate.tags.push(tag);
                    }
                }
                for bullet in record.system_description {
                    if seen_bullets.insert(bullet.clone()) {
                        aggregate.system_description.push(bullet);
                    }
                }

                aggregate.status_counts.merge(&record.status_counts);
            }
            ExtractionOutcome::Failure { index, reason } => {
                failures.push(format!("Excerpt {}: {}", index + 1, reason));
            }
        }
    }

    aggregate.failed_excerpts = failures.len();
    if !failures.is_empty() {
        aggregate.error = Some(failures.join("\n"));
    }

    aggregate
}

fn first_wins(slot: &mut String, candidate: String) {
    if slot.is_empty() && !candidate.is_empty() {
        *slot = candidate;
    }
}
