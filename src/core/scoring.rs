use crate::domain::model::{ScoreBreakdown, ScoreCard, ScoreCase, ScoreInput, ScoredCase};
use crate::utils::error::{FiestaError, Result};
use crate::utils::validation::validate_non_negative_finite;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreRules {
    /// Builds strictly faster than this many seconds earn the bonus.
    pub speed_threshold_secs: f64,
    pub speed_bonus: i64,
    /// Commits up to this count are free.
    pub commit_allowance: u32,
    pub penalty_per_commit: i64,
}

impl Default for ScoreRules {
    fn default() -> Self {
        Self {
            speed_threshold_secs: 5.0,
            speed_bonus: 10,
            commit_allowance: 20,
            penalty_per_commit: 2,
        }
    }
}

/// The three literal cases the score card ships with.
pub fn builtin_cases() -> Vec<ScoreCase> {
    [(100, 27, 3.5), (100, 18, 6.5), (100, 28, 4.2)]
        .into_iter()
        .enumerate()
        .map(|(i, (base_score, commits, build_time))| ScoreCase {
            name: format!("TEST CASE {}", i + 1),
            input: ScoreInput {
                base_score,
                commits,
                build_time,
            },
        })
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct Scorer {
    rules: ScoreRules,
}

impl Scorer {
    pub fn new(rules: ScoreRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &ScoreRules {
        &self.rules
    }

    pub fn score(&self, input: &ScoreInput) -> Result<ScoreBreakdown> {
        validate_non_negative_finite("build_time", input.build_time)?;

        let speed_bonus = if input.build_time < self.rules.speed_threshold_secs {
            self.rules.speed_bonus
        } else {
            0
        };

        let excess_commits = i64::from(input.commits.saturating_sub(self.rules.commit_allowance));
        let efficiency_penalty = excess_commits
            .checked_mul(self.rules.penalty_per_commit)
            .and_then(i64::checked_neg)
            .ok_or_else(|| overflow("efficiency penalty"))?;

        let final_score = input
            .base_score
            .checked_add(speed_bonus)
            .and_then(|s| s.checked_add(efficiency_penalty))
            .ok_or_else(|| overflow("final score"))?;

        tracing::debug!(
            "Scored base={} commits={} build_time={} -> {}",
            input.base_score,
            input.commits,
            input.build_time,
            final_score
        );

        Ok(ScoreBreakdown {
            base_score: input.base_score,
            commits: input.commits,
            speed_bonus,
            efficiency_penalty,
            final_score,
        })
    }

    pub fn score_cases(&self, cases: &[ScoreCase]) -> Result<ScoreCard> {
        let results = cases
            .iter()
            .map(|case| -> Result<ScoredCase> {
                Ok(ScoredCase {
                    name: case.name.clone(),
                    breakdown: self.score(&case.input)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::info!("Scored {} cases", results.len());
        Ok(ScoreCard {
            generated_at: chrono::Utc::now(),
            results,
        })
    }
}

fn overflow(what: &str) -> FiestaError {
    FiestaError::ScoringError {
        message: format!("{} overflowed", what),
    }
}
