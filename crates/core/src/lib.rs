//! Core types and shared functionality for city-compare.
//!
//! This crate provides:
//! - Canonical request keys and the file-backed response cache
//! - SQLite storage for locations, events and restaurants
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod records;
pub mod storage;

pub use cache::{CacheMap, CacheStore, RequestSignature, build_key};
pub use config::{AppConfig, ConfigError};
pub use error::Error;
pub use records::{BusinessRecord, CityRecord, EventRecord};
pub use storage::{Aggregate, CompareDb, Metric, normalize_city_name};
