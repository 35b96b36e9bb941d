//! Wellbeing Store - Local Persistence for a Mental-Wellbeing App
//!
//! A Rust library that keeps a user's mood log, journal, activities,
//! activity sessions, therapist chats and community feed in an on-device
//! key-value store.
//!
//! # Features
//!
//! - Per-user JSON collections with read-modify-write semantics
//! - Mood statistics and activity progress with day streaks
//! - Journal search by tags, dates, mood and free text
//! - Chat summaries derived from transcripts
//! - Shared community channel with welcome messages
//! - Pluggable storage (sled on disk, in-memory for tests)

/// Activity catalogue: built-ins plus per-user custom activities
pub mod activities;
/// Derived statistics: mood summary and activity progress
pub mod analytics;
/// Therapist chat transcripts and summaries
pub mod chat;
/// Injectable time source
pub mod clock;
/// Shared community channel
pub mod community;
/// Configuration management
pub mod config;
/// Error types
pub mod error;
/// Journal entries
pub mod journal;
/// Storage key layout
pub mod keys;
/// Logging setup and utilities
pub mod logging;
/// Metrics collection
pub mod metrics;
/// Data models and structures
pub mod models;
/// Mood log
pub mod mood;
/// Generic JSON collection over a key-value store
pub mod repository;
/// Journal filtering
pub mod search;
/// Facade wiring every repository together
pub mod service;
/// Activity sessions
pub mod sessions;
/// App-level settings and data wipe
pub mod settings;
/// Key-value storage backends
pub mod store;
/// Id generation and small helpers
pub mod utils;
/// Input validation
pub mod validation;

// Re-export key components for easier access
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::AppConfig;
pub use error::{Result, WellbeingError};
pub use service::WellbeingService;
pub use store::{KeyValueStore, MemoryStore, SledStore};
