//! Throughput accounting across rounds

use std::time::Duration;

use super::coordinator::RoundOutcome;

/// Cumulative statistics for a search
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchStats {
    /// Candidates verified, across every worker and round
    pub examined: u64,
    pub false_positives: u64,
    pub rounds_completed: u64,
    /// Wall-clock time since the search started
    pub elapsed: Duration,
}

impl SearchStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one round in; `elapsed` is the total time since the search began
    pub fn record_round(&mut self, outcome: &RoundOutcome, elapsed: Duration) {
        self.examined += outcome.examined;
        self.false_positives += outcome.false_positives;
        self.rounds_completed += 1;
        self.elapsed = elapsed;
    }

    /// Candidates per second
    pub fn throughput(&self) -> f64 {
        let seconds = self.elapsed.as_secs_f64();
        if seconds == 0.0 {
            return 0.0;
        }
        self.examined as f64 / seconds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_round_accumulates() {
        let mut stats = SearchStats::new();
        let round = RoundOutcome {
            examined: 1_000,
            false_positives: 2,
            ..RoundOutcome::default()
        };

        stats.record_round(&round, Duration::from_secs(1));
        stats.record_round(&round, Duration::from_secs(4));

        assert_eq!(stats.examined, 2_000);
        assert_eq!(stats.false_positives, 4);
        assert_eq!(stats.rounds_completed, 2);
        assert_eq!(stats.elapsed, Duration::from_secs(4));
        assert_eq!(stats.throughput(), 500.0);
    }

    #[test]
    fn test_throughput_without_elapsed_time() {
        assert_eq!(SearchStats::new().throughput(), 0.0);
    }
}
