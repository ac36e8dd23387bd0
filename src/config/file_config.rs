// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Keylime Authors

use crate::config::{schema, ConfigError, Result, Section, Value};
use ini::{Ini, ParseOption};
use log::*;
use std::{fs, path::Path};

/// Option set by the configuration file
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct FileOverride {
    pub(crate) section: Section,
    pub(crate) key: &'static str,
    pub(crate) value: Value,
}

/// Read and parse the INI file at `path`.
///
/// Returns `None` when `path` is not an existing regular file: running
/// without a configuration file is allowed.
pub(crate) fn read(path: &Path) -> Result<Option<Ini>> {
    if !path.is_file() {
        info!(
            "Configuration file {} not found, using defaults",
            path.display()
        );
        return Ok(None);
    }

    debug!("Loading configuration from FILE: {}", path.display());
    let bytes = fs::read(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let text =
        String::from_utf8(bytes).map_err(|source| ConfigError::Encoding {
            path: path.to_path_buf(),
            source,
        })?;

    parse(&text, path).map(Some)
}

/// Parse INI `text`; `path` is only used in error messages.
pub(crate) fn parse(text: &str, path: &Path) -> Result<Ini> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let text = strip_inline_comments(text);

    // Backslashes are kept as written, Windows-style paths included.
    // Indented lines continue the value above them.
    let opt = ParseOption {
        enabled_quote: true,
        enabled_escape: false,
        enabled_indented_mutiline_value: true,
        ..ParseOption::default()
    };

    Ini::load_from_str_opt(&text, opt).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Drop `;` comments following whitespace on section and option lines.
/// Indented continuation lines are kept whole.
fn strip_inline_comments(text: &str) -> String {
    text.lines()
        .map(|line| {
            if line.starts_with([' ', '\t']) {
                return line;
            }
            line.char_indices()
                .find(|&(i, c)| c == ';' && line[..i].ends_with([' ', '\t']))
                .map_or(line, |(i, _)| &line[..i])
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Check every section and key in `ini` against the schema and coerce the
/// values, in file order.
pub(crate) fn overrides(ini: &Ini, path: &Path) -> Result<Vec<FileOverride>> {
    let mut found = Vec::new();

    for (name, properties) in ini.iter() {
        let name = match name {
            Some(name) => name,
            None => match properties.iter().next() {
                Some((key, _)) => {
                    return Err(ConfigError::OptionOutsideSection {
                        path: path.to_path_buf(),
                        option: key.to_string(),
                    })
                }
                None => continue,
            },
        };

        let section = Section::from_keyword(name)
            .ok_or_else(|| ConfigError::UnrecognizedSection(name.to_string()))?;

        for (key, raw) in properties.iter() {
            // INI option names are case-insensitive
            let key = key.to_ascii_lowercase();
            let spec = schema::lookup(section, &key).ok_or_else(|| {
                ConfigError::UnrecognizedOption {
                    section,
                    option: key.clone(),
                }
            })?;

            found.push(FileOverride {
                section,
                key: spec.name,
                value: spec.parse_raw(section, raw)?,
            });
        }
    }

    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse_str(text: &str) -> Result<Vec<FileOverride>> {
        let path = Path::new("test.conf");
        overrides(&parse(text, path)?, path)
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let r = read(&dir.path().join("missing.conf"));
        assert!(matches!(r, Ok(None)));

        // A directory is not a configuration file either
        let r = read(dir.path());
        assert!(matches!(r, Ok(None)));
    }

    #[test]
    fn test_read_file() {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let file_path = dir.path().join("api_server.conf");
        let mut file = fs::File::create(&file_path)
            .expect("failed to create config file");
        writeln!(file, "[DISCOVERY]\nport = 6000")
            .expect("failed to write on config file");

        let ini = read(&file_path)
            .expect("failed to read config file")
            .expect("config file not loaded");
        assert_eq!(
            overrides(&ini, &file_path).expect("failed to check overrides"),
            vec![FileOverride {
                section: Section::Discovery,
                key: "port",
                value: Value::Integer(6000),
            }]
        );
    }

    #[test]
    fn test_read_invalid_utf8() {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let file_path = dir.path().join("api_server.conf");
        fs::write(&file_path, b"[DEFAULT]\nlog_file = \xff\xfe\n")
            .expect("failed to write config file");

        let r = read(&file_path);
        assert!(matches!(r, Err(ConfigError::Encoding { .. })));
    }

    #[test]
    fn test_overrides_types() {
        let found = parse_str(
            "; comment\n\
             [DEFAULT]\n\
             reset_config = True\n\
             Listen_Port = 9100\n\
             cassandra_server_list = \"a:1 b:2\"\n\
             log_file = C:\\logs\\api.log\n\
             [KEYSTONE]\n\
             [RABBIT]\n\
             vhost = /contrail\n",
        )
        .expect("failed to parse configuration");

        assert_eq!(
            found,
            vec![
                FileOverride {
                    section: Section::General,
                    key: "reset_config",
                    value: Value::Boolean(true),
                },
                FileOverride {
                    section: Section::General,
                    key: "listen_port",
                    value: Value::Integer(9100),
                },
                FileOverride {
                    section: Section::General,
                    key: "cassandra_server_list",
                    value: Value::from("a:1 b:2"),
                },
                FileOverride {
                    section: Section::General,
                    key: "log_file",
                    value: Value::from("C:\\logs\\api.log"),
                },
                FileOverride {
                    section: Section::MessageBus,
                    key: "vhost",
                    value: Value::from("/contrail"),
                },
            ]
        );
    }

    #[test]
    fn test_overrides_inline_comments() {
        let found = parse_str(
            "[DISCOVERY] ; discovery server\n\
             port = 6000 ; the port\n\
             server = 10.0.0.1\t;lab host\n\
             [IFMAP]\n\
             server_url = https://10.0.0.2:8443/a;b#c\n",
        )
        .expect("failed to parse configuration");

        assert_eq!(
            found,
            vec![
                FileOverride {
                    section: Section::Discovery,
                    key: "port",
                    value: Value::Integer(6000),
                },
                FileOverride {
                    section: Section::Discovery,
                    key: "server",
                    value: Value::from("10.0.0.1"),
                },
                FileOverride {
                    section: Section::MappingServer,
                    key: "server_url",
                    value: Value::from("https://10.0.0.2:8443/a;b#c"),
                },
            ]
        );
    }

    #[test]
    fn test_overrides_continuation_lines() {
        let found = parse_str(
            "[DEFAULT]\n\
             cassandra_server_list = a:1 ; first node\n    b:2\n\tc:3\n\
             listen_port = 9100\n",
        )
        .expect("failed to parse configuration");

        assert_eq!(
            found,
            vec![
                FileOverride {
                    section: Section::General,
                    key: "cassandra_server_list",
                    value: Value::from("a:1\nb:2\nc:3"),
                },
                FileOverride {
                    section: Section::General,
                    key: "listen_port",
                    value: Value::Integer(9100),
                },
            ]
        );
    }

    #[test]
    fn test_overrides_rejects_unknown() {
        let r = parse_str("[MEMCACHE]\nport = 1\n");
        assert!(
            matches!(r, Err(ConfigError::UnrecognizedSection(ref s)) if s == "MEMCACHE"),
            "unexpected result {r:?}"
        );

        // Section headers are case-sensitive
        let r = parse_str("[discovery]\nport = 1\n");
        assert!(matches!(r, Err(ConfigError::UnrecognizedSection(_))));

        let r = parse_str("[DISCOVERY]\nlisten_port = 1\n");
        assert!(
            matches!(
                r,
                Err(ConfigError::UnrecognizedOption { section: Section::Discovery, ref option })
                    if option == "listen_port"
            ),
            "unexpected result {r:?}"
        );

        let r = parse_str("port = 1\n[DISCOVERY]\n");
        assert!(
            matches!(r, Err(ConfigError::OptionOutsideSection { .. })),
            "unexpected result {r:?}"
        );
    }

    #[test]
    fn test_overrides_rejects_bad_values() {
        let r = parse_str("[REDIS]\nport = six\n");
        assert!(
            matches!(r, Err(ConfigError::InvalidValue { section: Section::Cache, .. })),
            "unexpected result {r:?}"
        );
    }

    #[test]
    fn test_parse_malformed() {
        let r = parse(
            "[DEFAULT\nlisten_port = 1\n",
            Path::new("/tmp/broken.conf"),
        );
        match r {
            Err(e @ ConfigError::Parse { .. }) => {
                assert!(e.to_string().contains("/tmp/broken.conf"))
            }
            Err(e) => panic!("unexpected error {e}"),
            Ok(_) => panic!("malformed configuration accepted"),
        }
    }
}
