// ABOUTME: Library root for slick - exposes public types for testing.
// ABOUTME: The main binary is in main.rs.

pub mod caddy;
pub mod config;
pub mod deploy;
pub mod diagnostics;
pub mod error;
pub mod health;
pub mod http;
pub mod output;
pub mod port;
pub mod runtime;
pub mod types;
