pub mod comparator;
pub mod history;

pub use comparator::{rank_streams, rank_streams_in, RecentDraw, StreamResult, RECENT_DRAW_LIMIT};
pub use history::{grouped_history, DrawRecord, StreamCategory, StreamHistory, DRAW_HISTORY};
