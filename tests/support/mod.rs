// ABOUTME: Test support utilities.
// ABOUTME: In-memory runtime and proxy fakes, a stub HTTP server, and test clocks.

use std::sync::Once;
use std::sync::atomic::{AtomicU16, Ordering};

use slick::config::Config;

// Each test binary only uses some of these modules, so allow dead_code.
#[allow(dead_code)]
pub mod clock;
#[allow(dead_code)]
pub mod fake_proxy;
#[allow(dead_code)]
pub mod fake_runtime;
#[allow(dead_code)]
pub mod stub_server;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env().add_directive("slick=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Width of the port range handed to each test config.
const PORT_BLOCK: u16 = 20;
static NEXT_PORT_BLOCK: AtomicU16 = AtomicU16::new(0);

/// Config for `image` with a health check on `/health` and one routing rule.
///
/// Every call gets its own port range so parallel tests don't race for ports.
#[allow(dead_code)]
pub fn test_config(image: &str) -> Config {
    let block = NEXT_PORT_BLOCK.fetch_add(1, Ordering::SeqCst);
    let start = 41000 + block * PORT_BLOCK;
    let end = start + PORT_BLOCK - 1;
    let yaml = format!(
        r#"
app:
  name: testapp
  image: {image}
  container_port: 8080
  port_range:
    start: {start}
    end: {end}
caddy:
  admin_api: http://localhost:2019
  rules:
    - match: example.com
      reverse_proxy:
        - path: /
          to: localhost:{{port}}
health_check:
  endpoint: /health
  timeout_seconds: 2
  interval_seconds: 1
  max_retries: 3
"#
    );
    Config::from_yaml(&yaml).unwrap()
}
