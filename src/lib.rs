pub mod api;
pub mod bot;
pub mod chain;
pub mod config;
pub mod error;
pub mod keys;
pub mod notify;
pub mod rpc;
pub mod watcher;
