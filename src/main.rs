// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Keylime Authors

use api_server_config::{load, ConfigError};
use log::*;
use std::{env, process};

fn main() {
    pretty_env_logger::init();

    let settings = match load(env::args().skip(1)) {
        Ok(settings) => settings,
        // clap prints its own diagnostic, and exits 0 for help and version
        Err(ConfigError::Cli(e)) => e.exit(),
        Err(e) => {
            debug!("Failed to load configuration: {e:?}");
            eprintln!("error: {e}");
            process::exit(1);
        }
    };

    match settings.loaded_from() {
        Some(path) => info!("Configuration: {}", path.display()),
        None => info!("Configuration: (defaults)"),
    }

    match serde_json::to_string_pretty(&settings) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("error: failed to serialize configuration: {e}");
            process::exit(1);
        }
    }
}
