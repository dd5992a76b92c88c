// ABOUTME: caddy-inspect command implementation.
// ABOUTME: Prints the rendered Caddyfile without touching the proxy.

use slick::caddy;
use slick::config::Config;

pub fn caddy_inspect(config: &Config) {
    let document = caddy::render(&config.caddy.rules, &config.caddy.global, 0);
    println!("{document}");
}
