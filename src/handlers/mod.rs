// src/handlers/mod.rs

pub mod certinfo;
pub mod score;
