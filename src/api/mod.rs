pub mod handlers;
pub mod models;
pub mod openapi;
pub mod ws;

use crate::core::services::SessionService;
use crate::infrastructure::{cache::in_memory::InMemoryCache, logging::in_memory::InMemoryLogging, storage::Storage};
use std::sync::Arc;

/// The service as the binary wires it: storage backend chosen at startup.
pub type AppService = SessionService<InMemoryLogging, Arc<dyn Storage>, InMemoryCache>;
