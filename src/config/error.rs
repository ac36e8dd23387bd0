// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Keylime Authors

use crate::config::Section;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading the configuration.
///
/// All of them are fatal: configuration is loaded once, before the service
/// starts, and there is no partial-success mode. A missing configuration
/// file is not an error.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file exists but could not be read
    #[error("Failed to read configuration file {}", .path.display())]
    Io {
        /// Path of the configuration file
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Configuration file is not valid UTF-8
    #[error("Configuration file {} is not valid UTF-8", .path.display())]
    Encoding {
        /// Path of the configuration file
        path: PathBuf,
        /// Underlying decoding error
        source: std::string::FromUtf8Error,
    },

    /// Configuration file is not valid INI
    #[error("Failed to parse configuration file {}: {source}", .path.display())]
    Parse {
        /// Path of the configuration file
        path: PathBuf,
        /// Underlying INI parser error
        source: ini::ParseError,
    },

    /// Configuration file sets an option before any section header
    #[error("Option '{option}' in {} is not inside a section", .path.display())]
    OptionOutsideSection {
        /// Path of the configuration file
        path: PathBuf,
        /// Option name
        option: String,
    },

    /// Section keyword or header not in the schema
    #[error("Unrecognized section '{0}'")]
    UnrecognizedSection(String),

    /// Option not declared for the section
    #[error("Unrecognized option '{option}' in section {section}")]
    UnrecognizedOption {
        /// Section the option was given for
        section: Section,
        /// Option as written by the user
        option: String,
    },

    /// Value could not be coerced to the declared type
    #[error("Invalid value '{value}' for option '{option}' in section {section}: {reason}")]
    InvalidValue {
        /// Section the option belongs to
        section: Section,
        /// Option name
        option: String,
        /// Value as written by the user
        value: String,
        /// Why the value was rejected
        reason: String,
    },

    /// Global option given without its value
    #[error("Option {0} requires a value")]
    MissingValue(String),

    /// Command-line parsing error, including help and version requests
    #[error(transparent)]
    Cli(#[from] clap::Error),
}

/// Result type used across the configuration loader
pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::UnrecognizedOption {
            section: Section::Cache,
            option: "--portt".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unrecognized option '--portt' in section REDIS"
        );

        let err = ConfigError::UnrecognizedSection("MEMCACHE".to_string());
        assert_eq!(err.to_string(), "Unrecognized section 'MEMCACHE'");
    }

    #[test]
    fn test_config_error_source() {
        use std::error::Error as _;

        let err = ConfigError::Io {
            path: PathBuf::from("/etc/contrail/api_server.conf"),
            source: std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "denied",
            ),
        };
        assert!(err.to_string().contains("/etc/contrail/api_server.conf"));
        assert!(err.source().is_some());
    }
}
