//! Rolling weighted risk score over every alert fired in a session (§4.5)

use crate::config::RiskWeights;

use super::types::AlertLevel;

pub struct RiskAccumulator {
    weighted_sum: f32,
    weights: RiskWeights,
    normaliser: f32,
}

impl RiskAccumulator {
    pub fn new(weights: RiskWeights, normaliser: f32) -> Self {
        Self {
            weighted_sum: 0.0,
            weights,
            normaliser,
        }
    }

    /// Records a fired alert. Never decreases the running sum, so `score()`
    /// is monotonic non-decreasing for the lifetime of a session.
    pub fn record(&mut self, alert_level: AlertLevel, confidence: f32) {
        let weight = match alert_level {
            AlertLevel::Low => self.weights.low,
            AlertLevel::Medium => self.weights.medium,
            AlertLevel::High => self.weights.high,
            AlertLevel::Critical => self.weights.critical,
        };
        self.weighted_sum += weight * confidence;
    }

    pub fn score(&self) -> f32 {
        self.weighted_sum / self.normaliser
    }

    pub fn level(&self) -> &'static str {
        level_for_score(self.score())
    }
}

pub fn level_for_score(score: f32) -> &'static str {
    if score < 0.2 {
        "low"
    } else if score < 0.4 {
        "medium"
    } else if score < 0.7 {
        "high"
    } else {
        "critical"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_is_monotonic_non_decreasing() {
        let mut acc = RiskAccumulator::new(RiskWeights::default(), 20.0);
        let mut last = acc.score();
        for _ in 0..5 {
            acc.record(AlertLevel::Low, 1.0);
            let next = acc.score();
            assert!(next >= last);
            last = next;
        }
    }

    #[test]
    fn a_handful_of_critical_alerts_reaches_the_critical_band() {
        let mut acc = RiskAccumulator::new(RiskWeights::default(), 20.0);
        for _ in 0..2 {
            acc.record(AlertLevel::Critical, 1.0);
        }
        assert_eq!(acc.level(), "critical");
    }

    #[test]
    fn level_buckets_match_the_spec_boundaries() {
        assert_eq!(level_for_score(0.0), "low");
        assert_eq!(level_for_score(0.19), "low");
        assert_eq!(level_for_score(0.2), "medium");
        assert_eq!(level_for_score(0.39), "medium");
        assert_eq!(level_for_score(0.4), "high");
        assert_eq!(level_for_score(0.69), "high");
        assert_eq!(level_for_score(0.7), "critical");
    }
}
