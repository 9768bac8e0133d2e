pub mod analytics;
pub mod auth;
pub mod awards;
pub mod users;
pub mod videos;
