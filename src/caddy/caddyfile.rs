// ABOUTME: Renders routing rules into Caddyfile text.
// ABOUTME: Pure function; `{port}` is replaced in upstreams and the on-demand ask URL.

use crate::config::{GlobalOptions, OnDemandTls, ReverseProxy, Rule};

/// Placeholder replaced with the instance's host port.
pub const PORT_PLACEHOLDER: &str = "{port}";

const INDENT: &str = "  ";

/// Render a Caddyfile for `rules`, pointing upstreams at `port`.
///
/// No rules means no document at all, global options included.
pub fn render(rules: &[Rule], global: &GlobalOptions, port: u16) -> String {
    if rules.is_empty() {
        return String::new();
    }

    let port = port.to_string();
    let mut out = String::new();

    render_global(&mut out, global, &port);

    for rule in rules {
        render_rule(&mut out, rule, &port);
    }

    out
}

fn line(out: &mut String, depth: usize, text: &str) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
    out.push_str(text);
    out.push('\n');
}

fn render_global(out: &mut String, global: &GlobalOptions, port: &str) {
    let email = global.email.as_deref().filter(|e| !e.is_empty());
    let on_demand = global.on_demand_tls.as_ref().filter(|o| has_on_demand(o));

    if email.is_none() && on_demand.is_none() {
        return;
    }

    line(out, 0, "{");
    if let Some(email) = email {
        line(out, 1, &format!("email {email}"));
    }
    if let Some(on_demand) = on_demand {
        line(out, 1, "on_demand_tls {");
        if !on_demand.ask.is_empty() {
            line(
                out,
                2,
                &format!("ask {}", on_demand.ask.replace(PORT_PLACEHOLDER, port)),
            );
        }
        if let Some(interval) = on_demand.interval.as_deref().filter(|v| !v.is_empty()) {
            line(out, 2, &format!("interval {interval}"));
        }
        if let Some(burst) = on_demand.burst.as_deref().filter(|v| !v.is_empty()) {
            line(out, 2, &format!("burst {burst}"));
        }
        line(out, 1, "}");
    }
    line(out, 0, "}");
    out.push('\n');
}

fn has_on_demand(on_demand: &OnDemandTls) -> bool {
    !on_demand.ask.is_empty()
        || on_demand.interval.as_deref().is_some_and(|v| !v.is_empty())
        || on_demand.burst.as_deref().is_some_and(|v| !v.is_empty())
}

fn render_rule(out: &mut String, rule: &Rule, port: &str) {
    line(out, 0, &format!("{} {{", rule.matcher));

    if let Some(tls) = rule.tls.as_deref().filter(|t| !t.is_empty()) {
        line(out, 1, "tls {");
        line(out, 2, tls);
        line(out, 1, "}");
    }

    for handle in &rule.handle {
        line(out, 1, &with_path("handle", &handle.path, "{"));
        for directive in &handle.directives {
            line(out, 2, directive);
        }
        line(out, 1, "}");
    }

    for proxy in &rule.reverse_proxy {
        render_reverse_proxy(out, proxy, port);
    }

    line(out, 0, "}");
    out.push('\n');
}

fn render_reverse_proxy(out: &mut String, proxy: &ReverseProxy, port: &str) {
    let upstream = proxy.to.replace(PORT_PLACEHOLDER, port);
    let head = with_path("reverse_proxy", &proxy.path, &upstream);

    if proxy.header_up.is_empty() {
        line(out, 1, &head);
        return;
    }

    line(out, 1, &format!("{head} {{"));
    for header in &proxy.header_up {
        line(out, 2, &format!("header_up {} {}", header.name, header.value));
    }
    line(out, 1, "}");
}

/// `<directive> [path] <tail>`, omitting an empty path.
fn with_path(directive: &str, path: &str, tail: &str) -> String {
    if path.is_empty() {
        format!("{directive} {tail}")
    } else {
        format!("{directive} {path} {tail}")
    }
}
