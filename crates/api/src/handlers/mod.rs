pub mod admin;
pub mod leaderboard;
pub mod lessons;
pub mod progress;
pub mod tasks;
pub mod users;
