//! Batch summary reporting

use std::time::Duration;

/// Counters describing one processed batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Carriers received from the queue
    pub received: usize,

    /// Carriers whose body failed to decode (left for redelivery)
    pub undecodable: usize,

    /// Duplicate messages collapsed by canonical text
    pub duplicates: usize,

    /// DR objects produced by resolution
    pub resolved_objects: usize,

    /// Candidates with no stored counterpart
    pub missing: usize,

    /// Candidates whose stored digest differed
    pub changed: usize,

    /// Candidates already stored with a matching digest
    pub unchanged: usize,

    /// Files committed into new OCFL versions
    pub committed: usize,

    /// Change events published
    pub events_published: usize,

    /// Carriers acknowledged (deleted from the queue)
    pub acknowledged: usize,

    /// Batch ran in dry-run mode
    pub dry_run: bool,

    /// Wall-clock duration of the batch
    pub duration: Duration,
}

impl BatchSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the batch duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Whether the batch changed anything locally
    pub fn is_noop(&self) -> bool {
        self.committed == 0 && self.events_published == 0
    }

    /// Log the summary at info level
    pub fn log_summary(&self) {
        tracing::info!(
            received = self.received,
            undecodable = self.undecodable,
            duplicates = self.duplicates,
            resolved_objects = self.resolved_objects,
            missing = self.missing,
            changed = self.changed,
            unchanged = self.unchanged,
            committed = self.committed,
            events_published = self.events_published,
            acknowledged = self.acknowledged,
            dry_run = self.dry_run,
            duration_ms = self.duration.as_millis() as u64,
            "Batch completed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_summary_is_noop() {
        let summary = BatchSummary::new();
        assert!(summary.is_noop());
        assert_eq!(summary.received, 0);
    }

    #[test]
    fn test_committed_batch_is_not_noop() {
        let mut summary = BatchSummary::new();
        summary.committed = 2;
        summary.events_published = 2;
        assert!(!summary.is_noop());
    }

    #[test]
    fn test_with_duration() {
        let summary = BatchSummary::new().with_duration(Duration::from_millis(250));
        assert_eq!(summary.duration, Duration::from_millis(250));
    }
}
