use crate::model::{LearnerProfile, LessonId};

/// A lesson id with its computed need-score. Higher need sorts earlier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedLesson {
    pub id: LessonId,
    pub need: i32,
}

// Criterion declaration order doubles as the tie-break: the sort below is
// stable, so equal need-scores keep this ordering.
const BUSINESS_MODELS: &str = "business-models";
const FAIR_VALUE: &str = "fair-value";
const INVESTOR_PSYCHOLOGY: &str = "investor-psychology";
const PORTFOLIO_MANAGEMENT: &str = "portfolio-management";

/// Ranks the four profile-linked lessons by need-score, descending.
///
/// The scores are signed so out-of-range profile values degrade into
/// extreme ranks rather than errors. The result is always a permutation of
/// exactly the four profile-linked ids; catalog lessons without a criterion
/// (`management-quality`, `idea-discovery`) are intentionally not ranked.
#[must_use]
pub fn ranked(profile: &LearnerProfile) -> Vec<RankedLesson> {
    let confidence = i32::from(profile.confidence);
    let valuation = i32::from(profile.valuation_skill);
    let discipline = i32::from(profile.behavior_discipline);

    let mut ranking = vec![
        RankedLesson {
            id: LessonId::new(BUSINESS_MODELS),
            need: 10 - confidence,
        },
        RankedLesson {
            id: LessonId::new(FAIR_VALUE),
            need: 10 - valuation,
        },
        RankedLesson {
            id: LessonId::new(INVESTOR_PSYCHOLOGY),
            need: 10 - discipline,
        },
        RankedLesson {
            id: LessonId::new(PORTFOLIO_MANAGEMENT),
            need: 7 - confidence.min(discipline),
        },
    ];

    ranking.sort_by_key(|entry| std::cmp::Reverse(entry.need));
    ranking
}

/// The recommended lesson ordering for a profile.
///
/// Pure and deterministic: safe to recompute on every profile change.
#[must_use]
pub fn recommend(profile: &LearnerProfile) -> Vec<LessonId> {
    ranked(profile).into_iter().map(|entry| entry.id).collect()
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
