pub mod analytics;
pub mod clock;
pub mod cloze;
pub mod config;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod notebook;
pub mod paths;
pub mod profiling;
pub mod scoring;
pub mod smart;
pub mod srs;
pub mod state;
pub mod store;
