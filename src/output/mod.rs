pub mod formatter;

pub use formatter::{
    format_assessment, format_batch_table, format_score, format_tier, format_tsv,
    should_use_colors,
};
