// ABOUTME: Routing configuration for the Caddy reverse proxy.
// ABOUTME: Global options, per-site rules, static handlers, and reverse-proxy entries.

use serde::Deserialize;

pub const DEFAULT_ADMIN_API: &str = "http://localhost:2019";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CaddyConfig {
    #[serde(default = "default_admin_api")]
    pub admin_api: String,

    #[serde(default)]
    pub global: GlobalOptions,

    #[serde(default)]
    pub rules: Vec<Rule>,
}

fn default_admin_api() -> String {
    DEFAULT_ADMIN_API.to_string()
}

impl Default for CaddyConfig {
    fn default() -> Self {
        Self {
            admin_api: default_admin_api(),
            global: GlobalOptions::default(),
            rules: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GlobalOptions {
    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub on_demand_tls: Option<OnDemandTls>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OnDemandTls {
    /// Permission endpoint; may contain `{port}`.
    #[serde(default)]
    pub ask: String,

    #[serde(default)]
    pub interval: Option<String>,

    #[serde(default)]
    pub burst: Option<String>,
}

/// One site block. Rules are emitted in the order they are declared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Rule {
    #[serde(rename = "match")]
    pub matcher: String,

    #[serde(default)]
    pub tls: Option<String>,

    #[serde(default)]
    pub handle: Vec<Handle>,

    #[serde(default)]
    pub reverse_proxy: Vec<ReverseProxy>,
}

/// Static handler block, rendered verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Handle {
    #[serde(default)]
    pub path: String,

    #[serde(default)]
    pub directives: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ReverseProxy {
    #[serde(default)]
    pub path: String,

    /// Upstream template, e.g. `http://localhost:{port}`.
    pub to: String,

    #[serde(default)]
    pub header_up: Vec<HeaderUp>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HeaderUp {
    pub name: String,
    pub value: String,
}
