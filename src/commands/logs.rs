// ABOUTME: Logs command implementation.
// ABOUTME: Finds the running instance of the configured image and streams its logs.

use futures::StreamExt;
use slick::config::Config;
use slick::deploy::find_running_instance;
use slick::diagnostics::Diagnostics;
use slick::error::{Error, Result};
use slick::runtime::{BollardRuntime, LogOps, LogOptions, LogStream};
use std::io::Write;

pub async fn logs(config: &Config, tail: Option<u64>, follow: bool) -> Result<()> {
    let runtime = BollardRuntime::connect_local().await?;

    let mut diagnostics = Diagnostics::default();
    let id = find_running_instance(&runtime, &config.app.image, &mut diagnostics)
        .await?
        .ok_or_else(|| Error::NoContainer(config.app.image.to_string()))?;

    let opts = LogOptions {
        follow,
        tail,
        timestamps: false,
    };
    let mut stream = runtime.container_logs(&id, &opts).await?;

    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    while let Some(line) = stream.next().await {
        let line = line?;
        match line.stream {
            LogStream::Stdout => stdout.write_all(line.content.as_bytes())?,
            LogStream::Stderr => stderr.write_all(line.content.as_bytes())?,
        }
    }
    stdout.flush()?;

    Ok(())
}
