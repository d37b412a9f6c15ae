pub mod api;
pub mod config;
pub mod constants;
pub mod core;
pub mod infrastructure;

pub use crate::core::errors::BillSplitError;
pub use crate::core::services::SessionService;

#[cfg(test)]
mod tests;
