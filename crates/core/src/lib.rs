// reqbook-core library entry point (embedded by hosts and the CLI).

pub mod commands;
pub mod config;
pub mod host;
pub mod projector;
pub mod session;
pub mod store;
