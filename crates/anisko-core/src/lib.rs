pub mod config;
pub mod error;
pub mod filter;
pub mod launcher;
pub mod models;
pub mod storage;
