pub mod normalize;
pub mod storage;

pub use normalize::{normalize_catalogue, normalize_profile};
pub use storage::{load_catalogue, load_profile};
