pub mod auth_dto;
pub mod game_dto;
