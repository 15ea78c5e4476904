//! Property-based checks for grading, forms scoring and aggregation.

use hubspot_audit::audit::metrics::{round1, CategoryMetrics};
use hubspot_audit::audit::scoring::{forms_adjusted_score, MAX_SCORE, MIN_SCORE};
use hubspot_audit::audit::{aggregate, score_to_grade};
use hubspot_audit::{Category, CategoryResult, CategoryStatus, Grade};
use proptest::prelude::*;

fn rank(grade: Grade) -> u8 {
    match grade {
        Grade::A => 4,
        Grade::B => 3,
        Grade::C => 2,
        Grade::D => 1,
        Grade::F => 0,
        Grade::NotApplicable => panic!("scores always map to a letter"),
    }
}

fn result(score: Option<f64>) -> CategoryResult {
    match score {
        Some(score) => CategoryResult {
            score: Some(score),
            grade: score_to_grade(score),
            metrics: CategoryMetrics::default(),
            recommendations: Vec::new(),
            critical_issues: Vec::new(),
            status: CategoryStatus::Ok,
        },
        None => CategoryResult::unavailable(CategoryStatus::InsufficientPermissions),
    }
}

fn tier_score() -> impl Strategy<Value = f64> {
    prop_oneof![Just(2.0), Just(3.5), Just(5.0)]
}

proptest! {
    #[test]
    fn grade_is_total_and_monotonic(a in 0.0f64..=5.0, b in 0.0f64..=5.0) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(rank(score_to_grade(low)) <= rank(score_to_grade(high)));
    }

    #[test]
    fn forms_score_stays_in_range(
        base in tier_score(),
        sampled in 0u64..=10,
        unused in 0.0f64..=100.0,
        common in 0u64..=20,
    ) {
        let score = forms_adjusted_score(base, sampled, unused, common);
        prop_assert!((MIN_SCORE..=MAX_SCORE).contains(&score));
        prop_assert_eq!(score, forms_adjusted_score(base, sampled, unused, common));
    }

    #[test]
    fn overall_is_rounded_mean_of_scored_categories(
        scores in proptest::collection::vec(proptest::option::of(tier_score()), 6),
    ) {
        let results: Vec<CategoryResult> = scores.iter().copied().map(result).collect();
        let overall = aggregate(Category::ALL.into_iter().zip(results.iter())).unwrap();

        let scored: Vec<f64> = scores.iter().flatten().copied().collect();
        if scored.is_empty() {
            prop_assert_eq!(overall.score, 0.0);
            prop_assert_eq!(overall.grade, Grade::F);
        } else {
            let mean = scored.iter().sum::<f64>() / scored.len() as f64;
            prop_assert_eq!(overall.score, round1(mean));
            prop_assert_eq!(overall.grade, score_to_grade(round1(mean)));
        }
    }
}
