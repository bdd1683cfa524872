pub mod dispatch;
pub mod entry;
pub mod leaderboard;
pub mod project;
pub mod shared;
pub mod submit;
pub mod sweep;
pub mod timeline;
