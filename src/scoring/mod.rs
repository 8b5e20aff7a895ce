//! # Health Scoring
//!
//! Deterministic scoring engine: the quality classifier, the four score
//! functions and the calculator that combines them.
//!
//! ```rust
//! use workflow_health::config::ScoringConfig;
//! use workflow_health::scoring::HealthScoreCalculator;
//!
//! let calculator = HealthScoreCalculator::new(ScoringConfig::default()).unwrap();
//! let result = calculator.calculate_health_score(Some(98.0), Some(600.0), Some(300.0), 60, 30);
//! assert!(result.overall_score > 85.0);
//! ```

pub mod calculator;
pub mod functions;
pub mod quality;
pub mod result;

pub use calculator::HealthScoreCalculator;
pub use functions::{ScoreError, SubScore};
pub use quality::{classify, InputState, QualityAssessment};
pub use result::{CalculationMetadata, HealthScoreResult};
