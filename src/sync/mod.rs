// src/sync/mod.rs

pub mod client;

pub use client::{CertificateNotifier, HttpScoreClient, ScoreSync};
