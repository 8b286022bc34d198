pub mod category;
pub mod client;
pub mod config;
pub mod feed;
pub mod model;
pub mod platform;
pub mod prefs;
pub mod status;
