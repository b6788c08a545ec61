pub mod achievements;
pub mod game_detail;
pub mod games;
pub mod landing;
pub mod players;
pub mod profile;
pub mod reviews;
pub mod search;
pub mod teams;
