// ABOUTME: Caddy reverse proxy integration.
// ABOUTME: Caddyfile rendering and the admin API client.

mod caddyfile;
mod client;

pub use caddyfile::{PORT_PLACEHOLDER, render};
pub use client::{CaddyClient, ProxyAdmin, ProxyError};
