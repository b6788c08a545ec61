pub mod box_score;
pub mod plays;
pub mod scoreboard;
pub mod status_bar;
