//! Batch coordinator
//!
//! Orchestrates one receive batch end to end:
//! dedupe -> resolve -> classify -> stage -> commit -> notify -> acknowledge.
//!
//! Acknowledgement comes last. A crash anywhere earlier leaves the carriers
//! on the queue; on redelivery the digest-based classifier turns already
//! committed work into unchanged candidates and the batch converges to a
//! no-op.

use crate::adapters::events::EventPublisher;
use crate::adapters::ocfl::OcflRepository;
use crate::adapters::preservica::EntityClient;
use crate::adapters::queue::QueueClient;
use crate::core::pipeline::summary::BatchSummary;
use crate::core::resolve::EntityResolver;
use crate::core::stage::StagingArea;
use crate::domain::dr_object::{DrObject, StagedWrite};
use crate::domain::errors::InvariantError;
use crate::domain::event::{ChangeEvent, EventStatus};
use crate::domain::ids::EntityRef;
use crate::domain::message::{ChangeMessage, MessageCarrier};
use crate::domain::Result;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

/// Orchestrates batches through the replication pipeline
pub struct BatchCoordinator {
    queue: Arc<dyn QueueClient>,
    publisher: Arc<dyn EventPublisher>,
    entity_client: Arc<dyn EntityClient>,
    resolver: EntityResolver,
    store: Arc<OcflRepository>,
    dry_run: bool,
}

impl BatchCoordinator {
    pub fn new(
        queue: Arc<dyn QueueClient>,
        publisher: Arc<dyn EventPublisher>,
        entity_client: Arc<dyn EntityClient>,
        resolver: EntityResolver,
        store: Arc<OcflRepository>,
        dry_run: bool,
    ) -> Self {
        Self {
            queue,
            publisher,
            entity_client,
            resolver,
            store,
            dry_run,
        }
    }

    /// Process one batch of message carriers
    ///
    /// Any failure after decoding aborts the whole batch before
    /// acknowledgement; resilience comes from queue redelivery plus the
    /// idempotent classifier, not from per-object retries.
    pub async fn process(&self, carriers: Vec<MessageCarrier>) -> Result<BatchSummary> {
        let start = Instant::now();
        let mut summary = BatchSummary::new();
        summary.received = carriers.len();
        summary.dry_run = self.dry_run;

        // Undecodable carriers stay on the queue for redelivery
        let decoded: Vec<&MessageCarrier> =
            carriers.iter().filter(|c| c.message.is_some()).collect();
        summary.undecodable = carriers.len() - decoded.len();
        for carrier in carriers.iter().filter(|c| c.message.is_none()) {
            tracing::warn!(
                message_id = %carrier.message_id,
                "Skipping undecodable message, leaving for redelivery"
            );
        }

        let unique = dedupe_messages(&decoded);
        summary.duplicates = decoded.len() - unique.len();

        if unique.is_empty() {
            return Ok(summary.with_duration(start.elapsed()));
        }

        tracing::info!(
            received = summary.received,
            unique = unique.len(),
            "Processing batch"
        );

        // Resolve each unique message; the first failure aborts the batch
        let mut candidates = Vec::new();
        for message in &unique {
            let objects = self.resolver.resolve(message).await?;
            candidates.extend(objects);
        }
        let candidates = collapse_duplicate_destinations(candidates)?;
        summary.resolved_objects = candidates.len();

        let classification = self.store.classify(candidates)?;
        summary.missing = classification.missing.len();
        summary.changed = classification.changed.len();
        summary.unchanged = classification.unchanged;

        if self.dry_run {
            tracing::info!(
                missing = summary.missing,
                changed = summary.changed,
                unchanged = summary.unchanged,
                "Dry run: skipping stage, commit, publish and acknowledge"
            );
            return Ok(summary.with_duration(start.elapsed()));
        }

        // Stage everything before touching the repository
        let staging = StagingArea::new()?;
        let staged_missing = staging
            .stage_all(classification.missing, self.entity_client.clone())
            .await?;
        let staged_changed = staging
            .stage_all(classification.changed, self.entity_client.clone())
            .await?;

        // Missing objects commit before changed objects
        self.commit_group(&staged_missing).await?;
        self.commit_group(&staged_changed).await?;
        summary.committed = staged_missing.len() + staged_changed.len();

        let mut events = Vec::new();
        for (object, _) in &staged_missing {
            events.push(change_event(object, EventStatus::Created));
        }
        for (object, _) in &staged_changed {
            events.push(change_event(object, EventStatus::Updated));
        }
        self.publisher.publish(&events).await?;
        summary.events_published = events.len();

        // Acknowledgement is the single success signal
        for carrier in &decoded {
            self.queue.delete(&carrier.receipt_handle).await?;
            summary.acknowledged += 1;
        }

        Ok(summary.with_duration(start.elapsed()))
    }

    /// Commit staged writes, one new version per affected OCFL object
    async fn commit_group(&self, staged: &[(DrObject, StagedWrite)]) -> Result<()> {
        let mut per_object: BTreeMap<EntityRef, Vec<StagedWrite>> = BTreeMap::new();
        for (object, write) in staged {
            per_object
                .entry(object.io_ref())
                .or_default()
                .push(write.clone());
        }

        for (io_ref, writes) in per_object {
            self.store.commit(&io_ref, &writes).await?;
        }
        Ok(())
    }
}

/// Collapse duplicate messages by canonical text, preserving first-seen order
fn dedupe_messages(carriers: &[&MessageCarrier]) -> Vec<ChangeMessage> {
    let mut seen = HashSet::new();
    let mut unique = Vec::new();
    for carrier in carriers {
        let message = carrier.message.as_ref().expect("decoded carriers only");
        if seen.insert(message.canonical_text()) {
            unique.push(message.clone());
        }
    }
    unique
}

/// Enforce destination uniqueness inside one batch
///
/// Identical payloads at the same destination collapse to one candidate;
/// differing payloads are a fatal invariant violation.
fn collapse_duplicate_destinations(candidates: Vec<DrObject>) -> Result<Vec<DrObject>> {
    let mut by_destination: HashMap<String, String> = HashMap::new();
    let mut unique = Vec::new();

    for candidate in candidates {
        let destination = candidate.destination_path().to_string();
        match by_destination.get(&destination) {
            None => {
                by_destination.insert(destination, candidate.expected_digest().to_string());
                unique.push(candidate);
            }
            Some(digest) if digest == candidate.expected_digest() => {}
            Some(_) => {
                return Err(InvariantError::ConflictingDestination { path: destination }.into())
            }
        }
    }

    Ok(unique)
}

fn change_event(object: &DrObject, status: EventStatus) -> ChangeEvent {
    ChangeEvent::new(
        object.io_ref(),
        object.event_object_type(),
        status,
        object.identifier_string(),
    )
}
