use thiserror::Error;

use super::metrics::round1;
use super::scoring::score_to_grade;
use super::types::{Category, CategoryResult, Grade};

#[derive(Debug, Error, PartialEq)]
pub enum AuditError {
    #[error("category {category} produced a non-finite score ({score})")]
    NonFiniteScore { category: Category, score: f64 },
}

/// Overall score and grade across the six categories.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overall {
    pub score: f64,
    pub grade: Grade,
}

/// Mean of the scored categories, rounded to one decimal.
///
/// Categories whose status is not ok are left out. With nothing scored the
/// result is 0 / F.
pub fn aggregate<'a, I>(results: I) -> Result<Overall, AuditError>
where
    I: IntoIterator<Item = (Category, &'a CategoryResult)>,
{
    let mut scores = Vec::new();
    for (category, result) in results {
        if !result.is_scored() {
            continue;
        }
        let score = result.score.unwrap_or_default();
        if !score.is_finite() {
            return Err(AuditError::NonFiniteScore { category, score });
        }
        scores.push(score);
    }

    if scores.is_empty() {
        return Ok(Overall {
            score: 0.0,
            grade: Grade::F,
        });
    }

    let score = round1(scores.iter().sum::<f64>() / scores.len() as f64);
    Ok(Overall {
        score,
        grade: score_to_grade(score),
    })
}
