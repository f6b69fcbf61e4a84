pub mod formatter;

pub use formatter::{
    format_aps, format_assessment, format_degree_table, format_tracker, format_tsv,
    should_use_colors,
};
