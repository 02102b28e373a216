// src/models/mod.rs

pub mod identity;
pub mod participant;
pub mod question;
