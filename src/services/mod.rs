pub mod answer_service;
pub mod leaderboard_service;
pub mod player_service;
pub mod scoring_service;
pub mod session_service;

#[cfg(test)]
pub(crate) mod fixtures;
