pub mod bootstrap;
pub mod config;
pub mod constants;
pub mod logger;
pub mod range;
pub mod scanner;
pub mod server;
pub mod state;
pub mod title_db;
pub mod types;
pub mod util;
