pub mod entry;
pub mod filter;
pub mod quality;
pub mod schedule;

pub use entry::{Direction, Entry, EntryStats};
pub use filter::EntryFilter;
pub use quality::{Quality, ReviewRating};
pub use schedule::{Maturity, SchedulingState, DEFAULT_EASE_FACTOR};
