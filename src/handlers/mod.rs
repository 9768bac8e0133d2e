// src/handlers/mod.rs

pub mod analytics;
pub mod auth;
pub mod awards;
pub mod health;
pub mod users;
pub mod videos;
