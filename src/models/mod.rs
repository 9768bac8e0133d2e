// src/models/mod.rs

pub mod analytics;
pub mod awards;
pub mod user;
pub mod video;
