//! A minimal networked key-value store
//!
//! This library provides:
//! - A mutex-guarded in-memory store with linearizable set/get/delete
//! - A transport-independent request handler with tagged outcomes
//! - An actix-web server exposing `/store/{key}`
//! - A reqwest-based client for single requests

pub mod client;
pub mod error;
pub mod handler;
pub mod server;
pub mod store;

pub use client::{Client, Reply};
pub use error::{KvError, Result};
pub use handler::{Outcome, Rejection};
pub use server::{KvServer, RunningServer, ServerConfig};
pub use store::{MemoryStore, SetOutcome, Store};
