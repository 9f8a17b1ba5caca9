pub mod history;
pub mod session;
pub mod streak;
pub mod summary;

pub use history::{DailyHistory, DailyRecord};
pub use session::{PracticeSessions, SessionKind, SessionStats};
pub use streak::Streak;
pub use summary::{
  folder_summary, format_study_time, heat_level, heatmap, overall_accuracy, total_practiced,
  weak_spots, FolderSummary, HeatmapDay, WeakSpot,
};
