//! `fleetroster` - A local fleet roster manager
//!
//! This library provides the roster model behind `fleetctl`: an ordered list
//! of vehicles that can be added, filtered, reassigned, toggled between
//! available and unavailable, and deleted, persisted after every change in a
//! key-value store.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod fleet;
pub mod logging;
pub mod storage;
pub mod vehicle;

pub use config::Config;
pub use error::{Error, Result};
pub use filter::{Filter, VehicleFilter};
pub use fleet::{FleetEvent, FleetStats, FleetStore, DEFAULT_STORAGE_KEY};
pub use logging::init_logging;
pub use storage::{KeyValueStore, MemoryStore, SqliteStore};
pub use vehicle::{Availability, Vehicle, DEFAULT_IMAGE};
