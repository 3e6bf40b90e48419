use serde::{Deserialize, Serialize};

/// Self-reported learner scores driving the adaptive sequencing engine.
///
/// Each dimension is conceptually in `[1, 10]`. The bounds are not enforced:
/// the sequencing arithmetic is signed, so out-of-range values produce
/// extreme need-scores instead of errors. A profile is an immutable value —
/// every learner adjustment replaces the whole thing.
///
/// Field names serialize in camelCase because the profile crosses the
/// coaching wire boundary as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearnerProfile {
    pub confidence: u8,
    pub valuation_skill: u8,
    pub behavior_discipline: u8,
}

impl LearnerProfile {
    #[must_use]
    pub fn new(confidence: u8, valuation_skill: u8, behavior_discipline: u8) -> Self {
        Self {
            confidence,
            valuation_skill,
            behavior_discipline,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_is_a_plain_value() {
        let a = LearnerProfile::new(4, 3, 6);
        let b = a;
        assert_eq!(a, b);
    }

    #[test]
    fn profile_serializes_camel_case() {
        let json = serde_json::to_value(LearnerProfile::new(4, 3, 6)).unwrap();
        assert_eq!(json["confidence"], 4);
        assert_eq!(json["valuationSkill"], 3);
        assert_eq!(json["behaviorDiscipline"], 6);
    }
}
