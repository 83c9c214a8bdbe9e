pub mod catalog;
pub mod chat;
pub mod director;
pub mod events;
pub mod models;
pub mod payload;
pub mod scene;
