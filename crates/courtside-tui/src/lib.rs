pub mod commands;
pub mod live_view;
pub mod output;
pub mod palette;
