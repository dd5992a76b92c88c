// ABOUTME: Command module aggregator for the slick CLI.
// ABOUTME: Holds one handler per subcommand plus shared config loading.

pub mod caddy_inspect;
pub mod deploy;
pub mod logs;
pub mod status;

use slick::config::{self, Config};
use slick::error::Result;
use std::path::Path;

/// Load the env file, then the configuration (explicit path or discovered in
/// the working directory).
pub fn load_config(path: Option<&Path>, env_file: Option<&Path>) -> Result<Config> {
    config::load_env_file(env_file)?;

    match path {
        Some(path) => Config::load(path),
        None => Config::discover(&std::env::current_dir()?),
    }
}
