pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod logger;
pub mod models;
pub mod service;
pub mod session;

pub use engine::{MineOptions, mine, mine_with};
pub use engine::store::TransactionStore;
