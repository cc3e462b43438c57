pub mod formatter;

pub use formatter::{
    format_breakdown, format_breakdown_tsv, format_json, format_stream_summary,
    format_stream_table, format_streams_tsv, should_use_colors, Report,
};
