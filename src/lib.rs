pub mod app;
pub mod config;
pub mod content;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod paths;
pub mod session;
pub mod srs;
pub mod state;
pub mod store;

#[cfg(test)]
pub mod testing;
