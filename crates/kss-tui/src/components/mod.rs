pub mod events;
pub mod home;
pub mod settings;
