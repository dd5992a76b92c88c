// ABOUTME: Status command implementation.
// ABOUTME: Prints a table of running containers.

use chrono::{DateTime, Utc};
use slick::error::Result;
use slick::runtime::{BollardRuntime, ContainerOps, ContainerSummary};

const HEADERS: [&str; 6] = ["CONTAINER ID", "IMAGE", "CREATED", "STATUS", "PORTS", "NAMES"];

pub async fn status() -> Result<()> {
    let runtime = BollardRuntime::connect_local().await?;
    let containers = runtime.list_containers(false).await?;
    print!("{}", render_table(&containers, Utc::now()));
    Ok(())
}

fn render_table(containers: &[ContainerSummary], now: DateTime<Utc>) -> String {
    let rows: Vec<[String; 6]> = containers
        .iter()
        .map(|c| {
            [
                c.id.short().to_string(),
                c.image.clone(),
                format_age(c.created, now),
                c.state.clone(),
                c.ports
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", "),
                c.names.join(", "),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let mut out = String::new();
    let header = HEADERS.map(str::to_string);
    for row in std::iter::once(&header).chain(&rows) {
        let line: Vec<String> = row
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect();
        out.push_str(line.join("   ").trim_end());
        out.push('\n');
    }
    out
}

/// Human-friendly age of a unix timestamp, e.g. `5 minutes ago`.
fn format_age(created: i64, now: DateTime<Utc>) -> String {
    let Some(created) = DateTime::from_timestamp(created, 0) else {
        return "unknown".to_string();
    };

    let elapsed = now.signed_duration_since(created);
    let (value, unit) = if elapsed.num_days() > 0 {
        (elapsed.num_days(), "day")
    } else if elapsed.num_hours() > 0 {
        (elapsed.num_hours(), "hour")
    } else if elapsed.num_minutes() > 0 {
        (elapsed.num_minutes(), "minute")
    } else {
        return "just now".to_string();
    };

    let plural = if value == 1 { "" } else { "s" };
    format!("{value} {unit}{plural} ago")
}
