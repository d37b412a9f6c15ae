pub mod calculations;
pub mod colors;
pub mod errors;
pub mod export;
pub mod messages;
pub mod models;
pub mod services;
