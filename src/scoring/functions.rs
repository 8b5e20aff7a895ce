//! # Score Functions
//!
//! One pure function per sub-metric, each mapping a raw value (or its
//! absence) to a sub-score in `0..=100` plus any warnings.
//!
//! Absence is not scored uniformly. A missing success rate scores 0 because
//! it means nothing can be said about reliability. A missing MTTR or duration
//! scores 100: no MTTR means no failure ever needed recovering, and no
//! duration means no run has finished yet. Neither is evidence of a problem.

use thiserror::Error;

use crate::config::ScoringConfig;
use crate::constants::warnings;

/// Arithmetic faults inside a single sub-metric computation.
///
/// Never escapes the calculator; each one becomes an `errors` entry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoreError {
    #[error("{metric} input is not a finite number: {value}")]
    NonFinite { metric: &'static str, value: f64 },

    #[error("throughput window is zero days")]
    ZeroWindow,
}

/// A sub-score and the warnings produced while computing it
#[derive(Debug, Clone, PartialEq)]
pub struct SubScore {
    pub score: f64,
    pub warnings: Vec<String>,
}

impl SubScore {
    fn clean(score: f64) -> Self {
        Self {
            score,
            warnings: Vec::new(),
        }
    }

    fn warned(score: f64, warning: impl Into<String>) -> Self {
        Self {
            score,
            warnings: vec![warning.into()],
        }
    }
}

pub type ScoreResult = std::result::Result<SubScore, ScoreError>;

fn ensure_finite(metric: &'static str, value: f64) -> std::result::Result<f64, ScoreError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ScoreError::NonFinite { metric, value })
    }
}

/// Success rate is already a percentage; out-of-range values are clamped.
pub fn success_rate_score(success_rate: Option<f64>) -> ScoreResult {
    let Some(rate) = success_rate else {
        return Ok(SubScore::warned(0.0, warnings::SUCCESS_RATE_MISSING));
    };
    let rate = ensure_finite("success_rate", rate)?;

    if !(0.0..=100.0).contains(&rate) {
        return Ok(SubScore::warned(
            rate.clamp(0.0, 100.0),
            format!("success rate out of valid range (0-100): {rate}"),
        ));
    }

    Ok(SubScore::clean(rate))
}

/// Linear decay from 100 at zero to 0 at `mttr_max_seconds`.
pub fn mttr_score(mttr_seconds: Option<f64>, config: &ScoringConfig) -> ScoreResult {
    let Some(mttr) = mttr_seconds else {
        return Ok(SubScore::warned(100.0, warnings::MTTR_MISSING));
    };
    decay_score("mttr", "MTTR", mttr, config.mttr_max_seconds)
}

/// Same shape as MTTR against `duration_max_seconds`.
pub fn duration_score(avg_duration_seconds: Option<f64>, config: &ScoringConfig) -> ScoreResult {
    let Some(duration) = avg_duration_seconds else {
        return Ok(SubScore::warned(100.0, warnings::DURATION_MISSING));
    };
    decay_score("duration", "duration", duration, config.duration_max_seconds)
}

fn decay_score(metric: &'static str, label: &str, value: f64, max: f64) -> ScoreResult {
    let value = ensure_finite(metric, value)?;

    if value < 0.0 {
        return Ok(SubScore::warned(0.0, format!("negative {label} value: {value}")));
    }

    if value > max {
        return Ok(SubScore::warned(
            0.0,
            format!("{label} exceeds maximum threshold ({max}s): {value}s"),
        ));
    }

    Ok(SubScore::clean((100.0 * (1.0 - value / max)).max(0.0)))
}

/// Floor check on runs per day: partial credit below the minimum, never more
/// than 100 above it.
pub fn throughput_score(total_runs: u64, window_days: u32, config: &ScoringConfig) -> ScoreResult {
    if window_days == 0 {
        return Err(ScoreError::ZeroWindow);
    }

    let runs_per_day = total_runs as f64 / f64::from(window_days);
    let minimum = config.throughput_min_runs_per_day;

    if runs_per_day < minimum {
        return Ok(SubScore::warned(
            (100.0 * runs_per_day / minimum).clamp(0.0, 100.0),
            format!("low throughput: {runs_per_day:.2} runs/day (minimum: {minimum})"),
        ));
    }

    Ok(SubScore::clean(100.0))
}
