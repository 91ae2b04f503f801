pub mod attempt;
pub mod leaderboard;
pub mod player;
pub mod question;
pub mod session;
