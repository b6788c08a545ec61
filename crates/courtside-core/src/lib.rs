pub mod achievements;
pub mod config;
pub mod models;
pub mod scope;
pub mod storage;
pub mod theme;
