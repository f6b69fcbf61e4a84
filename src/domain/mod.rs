pub mod types;

pub use types::{Degree, SubjectMark, SubjectRequirement, UserAcademicRecord};
