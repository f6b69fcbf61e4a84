pub mod bands;
pub mod calculator;
pub mod config;
pub mod validation;

pub use bands::{points_for_mark, ScoreBand, MAX_POINTS_PER_SUBJECT, SCORE_BANDS};
pub use calculator::{aps_for_record, total_score, ApsResult, SubjectContribution};
pub use config::{ScoringConfig, DEFAULT_SUBJECT_LIMIT, MAX_SUBJECT_LIMIT};
pub use validation::{validate_record, validate_scoring};
