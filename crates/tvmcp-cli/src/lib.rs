pub mod bridge;
pub mod cli;
pub mod commands;
pub mod error;
pub mod utils;
