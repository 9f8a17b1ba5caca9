pub mod format;
pub mod quality;
pub mod queue;
pub mod sm2;

pub use format::{format_interval, next_review_display, srs_badge, SrsBadge};
pub use quality::{classify, suggested_rating};
pub use queue::{
  build_session, classify_maturity, due_entries, get_stats, is_due, shuffled_order,
  MaturityBuckets, ReviewSession, SessionItem, SessionMode, SessionStep, SrsStats,
};
pub use sm2::{preview_interval, rating_previews, update, RatingPreview, MIN_EASE_FACTOR};
