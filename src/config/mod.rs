// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Keylime Authors

//! Layered configuration for the API server
//!
//! Settings are resolved from three sources, in increasing order of
//! precedence:
//!
//! 1. Compiled-in defaults, declared in the option [`schema`]
//! 2. An INI configuration file, `/etc/contrail/api_server.conf` unless
//!    `-c/--conf_file` says otherwise (optional)
//! 3. Command-line section runs
//!
//! ## Example Configuration File
//!
//! ```ini
//! [DEFAULT]
//! listen_port = 8082
//! cassandra_server_list = 10.0.0.1:9160 10.0.0.2:9160
//! reset_config = False
//!
//! [DISCOVERY]
//! server = 10.0.0.10
//! port = 5998
//! ```
//!
//! ## Command Line
//!
//! Every run starts with a section keyword and lists options of that
//! section only:
//!
//! ```text
//! api-server-config DISCOVERY --port 8000 DEFAULT --collectors a:8086 b:8086
//! ```

pub mod cli;
mod error;
mod file_config;
mod loader;
pub mod schema;
mod section;
mod settings;
mod value;

pub use error::*;
pub use loader::*;
pub use section::*;
pub use settings::*;
pub use value::*;
