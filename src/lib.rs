// src/lib.rs

pub mod certificate;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod quiz;
pub mod routes;
pub mod state;
pub mod sync;

// Re-export specific items for convenience if needed
pub use routes::create_router;
