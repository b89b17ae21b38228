pub mod blog;
pub mod config;
pub mod content;
pub mod history;
pub mod library;
pub mod model;
pub mod player;
