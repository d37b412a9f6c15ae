pub mod cache;
pub mod hub;
pub mod logging;
pub mod storage;
