//! Decision Policy
//!
//! Fixed threshold on the classifier score.

use serde::Serialize;

use crate::constants::DEFAULT_THRESHOLD;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DecisionPolicy {
    /// Scores strictly above this are flagged (0.0 - 1.0)
    pub threshold: f32,
}

impl Default for DecisionPolicy {
    fn default() -> Self {
        Self { threshold: DEFAULT_THRESHOLD }
    }
}

impl DecisionPolicy {
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    /// `true` iff the score is strictly above the threshold
    pub fn decide(&self, score: f32) -> bool {
        score > self.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_threshold() {
        assert_eq!(DecisionPolicy::default().threshold, 0.5);
    }

    #[test]
    fn test_boundary_is_not_cheating() {
        let policy = DecisionPolicy::default();
        assert!(!policy.decide(0.5));
        assert!(policy.decide(0.500_001));
        assert!(!policy.decide(0.499_999));
    }

    #[test]
    fn test_extremes() {
        let policy = DecisionPolicy::default();
        assert!(!policy.decide(0.0));
        assert!(policy.decide(1.0));
        assert!(policy.decide(0.73));
        assert!(!policy.decide(0.12));
    }

    #[test]
    fn test_custom_threshold() {
        let policy = DecisionPolicy::new(0.8);
        assert!(!policy.decide(0.73));
        assert!(policy.decide(0.81));
    }
}
