pub mod storage;
pub mod types;

pub use storage::{get_tracker_path, load_tracker, save_tracker};
pub use types::{MarksTracker, Term, DEFAULT_GRADE};
