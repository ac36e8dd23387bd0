// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Keylime Authors

//! Static option schema
//!
//! The schema is the single source of truth for which options exist in each
//! section, what type they hold, and their compiled-in defaults. It is never
//! mutated: live settings are seeded by copying from it.

use crate::config::{
    value::parse_bool, ConfigError, OptionKind, Section, Value,
};

/// Default configuration file location
pub static DEFAULT_CONF_FILE: &str = "/etc/contrail/api_server.conf";

/// Address the API server listens on by default
pub static DEFAULT_LISTEN_IP_ADDR: &str = "0.0.0.0";
/// Port the API server listens on by default
pub const DEFAULT_LISTEN_PORT: i64 = 8082;

/// Compiled-in default of an option
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DefaultValue {
    /// Text default
    Str(&'static str),
    /// Integer default
    Int(i64),
    /// Boolean default
    Bool(bool),
    /// List default
    List(&'static [&'static str]),
    /// No default value
    Unset,
}

impl DefaultValue {
    /// Build an owned value from this default
    pub fn to_value(self) -> Value {
        match self {
            DefaultValue::Str(s) => Value::String(s.to_string()),
            DefaultValue::Int(i) => Value::Integer(i),
            DefaultValue::Bool(b) => Value::Boolean(b),
            DefaultValue::List(l) => {
                Value::List(l.iter().map(|s| s.to_string()).collect())
            }
            DefaultValue::Unset => Value::Unset,
        }
    }
}

/// Declaration of a single option
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OptionSpec {
    /// Key used in the file and as the `--long` flag name
    pub name: &'static str,
    /// Declared type
    pub kind: OptionKind,
    /// Compiled-in default
    pub default: DefaultValue,
    /// Accepted values, empty when any value is accepted
    pub choices: &'static [&'static str],
    /// Help text shown by `--help`
    pub help: &'static str,
}

impl OptionSpec {
    const fn new(
        name: &'static str,
        kind: OptionKind,
        default: DefaultValue,
        help: &'static str,
    ) -> Self {
        OptionSpec {
            name,
            kind,
            default,
            choices: &[],
            help,
        }
    }

    const fn text(
        name: &'static str,
        default: &'static str,
        help: &'static str,
    ) -> Self {
        Self::new(name, OptionKind::String, DefaultValue::Str(default), help)
    }

    const fn int(name: &'static str, default: i64, help: &'static str) -> Self {
        Self::new(name, OptionKind::Integer, DefaultValue::Int(default), help)
    }

    const fn flag(name: &'static str, help: &'static str) -> Self {
        Self::new(name, OptionKind::Boolean, DefaultValue::Bool(false), help)
    }

    const fn list(
        name: &'static str,
        default: &'static [&'static str],
        help: &'static str,
    ) -> Self {
        Self::new(
            name,
            OptionKind::StringList,
            DefaultValue::List(default),
            help,
        )
    }

    /// Coerce a raw value read from the configuration file.
    ///
    /// List options keep the raw text as a `String`; it is split into items
    /// when the settings are normalized.
    pub fn parse_raw(
        &self,
        section: Section,
        raw: &str,
    ) -> Result<Value, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidValue {
            section,
            option: self.name.to_string(),
            value: raw.to_string(),
            reason,
        };

        let trimmed = raw.trim();
        match self.kind {
            OptionKind::String => {
                self.check_choice(trimmed).map_err(invalid)?;
                Ok(Value::String(trimmed.to_string()))
            }
            OptionKind::StringList => Ok(Value::String(trimmed.to_string())),
            OptionKind::Integer | OptionKind::Boolean if trimmed.is_empty() => {
                Ok(Value::Unset)
            }
            OptionKind::Integer => trimmed
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|e| invalid(e.to_string())),
            OptionKind::Boolean => parse_bool(trimmed)
                .map(Value::Boolean)
                .ok_or_else(|| invalid("expected a boolean".to_string())),
        }
    }

    fn check_choice(&self, value: &str) -> Result<(), String> {
        if self.choices.is_empty() || self.choices.contains(&value) {
            Ok(())
        } else {
            Err(format!("possible values: {}", self.choices.join(", ")))
        }
    }
}

static GENERAL: &[OptionSpec] = &[
    OptionSpec {
        choices: &["keystone"],
        ..OptionSpec::text(
            "auth",
            "keystone",
            "Type of authentication for user-requests",
        )
    },
    OptionSpec::list(
        "cassandra_server_list",
        &["127.0.0.1:9160"],
        "List of cassandra servers in IP Address:Port format",
    ),
    OptionSpec::list(
        "collectors",
        &["127.0.0.1:8086"],
        "List of VNC collectors in ip:port format",
    ),
    OptionSpec::int("http_server_port", 8084, "Port of local HTTP server"),
    OptionSpec::text(
        "listen_ip_addr",
        DEFAULT_LISTEN_IP_ADDR,
        "IP address to provide service on, default 0.0.0.0",
    ),
    OptionSpec::int(
        "listen_port",
        DEFAULT_LISTEN_PORT,
        "Port to provide service on, default 8082",
    ),
    OptionSpec::text(
        "log_category",
        "",
        "Category filter for local logging of sandesh messages",
    ),
    OptionSpec::int(
        "log_level",
        7,
        "Severity level for local logging of sandesh messages",
    ),
    OptionSpec::flag("log_local", "Enable local logging of sandesh messages"),
    OptionSpec::text(
        "log_file",
        "<stdout>",
        "Filename for the logs to be written to",
    ),
    OptionSpec::text(
        "logging_level",
        "WARN",
        "Log level for service logging: DEBUG, INFO, WARN, ERROR default: WARN",
    ),
    OptionSpec::flag(
        "multi_tenancy",
        "Validate resource permissions (implies token validation)",
    ),
    OptionSpec::flag(
        "reset_config",
        "Warning! Destroy previous configuration and start clean",
    ),
    OptionSpec::flag("wipe_config", "Warning! Destroy previous configuration"),
    OptionSpec::int("worker_id", 0, "Worker Id"),
    OptionSpec::text(
        "zk_server_ip",
        "127.0.0.1:2181",
        "Ip address:port of zookeeper server",
    ),
];

static DISCOVERY: &[OptionSpec] = &[
    OptionSpec::int("port", 5998, "Port of discovery server"),
    OptionSpec::text("server", "127.0.0.1", "IP address of discovery server"),
];

static MESSAGE_BUS: &[OptionSpec] = &[
    OptionSpec::text("password", "guest", "Password for rabbit"),
    OptionSpec::text("server", "localhost", "Rabbitmq server address"),
    OptionSpec::text("user", "guest", "Username for rabbit"),
    OptionSpec::new(
        "vhost",
        OptionKind::String,
        DefaultValue::Unset,
        "vhost for rabbit",
    ),
];

static MAPPING_SERVER: &[OptionSpec] = &[
    OptionSpec::int("port", 8443, "Port of ifmap server"),
    OptionSpec::text("server", "127.0.0.1", "IP address of ifmap server"),
    OptionSpec::text("user", "api-server", "Username known to ifmap server"),
    OptionSpec::text(
        "password",
        "api-server",
        "Password known to ifmap server",
    ),
    OptionSpec::text("server_url", "", "Location of IFMAP server"),
];

static CACHE: &[OptionSpec] = &[
    OptionSpec::text("password", "ap-server", "Password for redis server"),
    OptionSpec::int("port", 8443, "Port of redis server"),
    OptionSpec::text("server", "127.0.0.1", "IP address of redis server"),
    OptionSpec::text(
        "server_url",
        "https://127.0.0.1:8443",
        "Location of redis server",
    ),
    OptionSpec::text("user", "ap-server", "Username for redis server"),
];

static SECURITY: &[OptionSpec] = &[
    OptionSpec::flag("use_certs", "Use certificates"),
    OptionSpec::text(
        "keyfile",
        "/etc/contrail/ssl/private_keys/apiserver_key.pem",
        "Key file",
    ),
    OptionSpec::text(
        "certfile",
        "/etc/contrail/ssl/certs/apiserver.pem",
        "Certificates file",
    ),
    OptionSpec::text(
        "ca_certs",
        "/etc/contrail/ssl/certs/ca.pem",
        "Certificates authority",
    ),
    OptionSpec::int("ifmap_certauth_port", 8444, "IFMAP ca port"),
];

static IDENTITY_SERVICE: &[OptionSpec] = &[
    OptionSpec::text("auth_host", "127.0.0.1", "Identity service host"),
    OptionSpec::int("auth_port", 35357, "Identity service port"),
    OptionSpec::text("auth_protocol", "http", "Identity service protocol"),
    OptionSpec::text("admin_user", "admin", "Administrator user name"),
    OptionSpec::text("admin_password", "admin", "Administrator password"),
    OptionSpec::text(
        "admin_tenant_name",
        "admin",
        "Administrator tenant name",
    ),
    OptionSpec::new(
        "admin_token",
        OptionKind::String,
        DefaultValue::Unset,
        "Administrator token",
    ),
    OptionSpec::text(
        "memcache_servers",
        "",
        "Memcache servers used to cache tokens",
    ),
    OptionSpec::new(
        "token_cache_time",
        OptionKind::Integer,
        DefaultValue::Unset,
        "Seconds a validated token is cached",
    ),
];

/// Options declared for a section
pub fn options(section: Section) -> &'static [OptionSpec] {
    match section {
        Section::General => GENERAL,
        Section::Discovery => DISCOVERY,
        Section::MessageBus => MESSAGE_BUS,
        Section::MappingServer => MAPPING_SERVER,
        Section::Cache => CACHE,
        Section::Security => SECURITY,
        Section::IdentityService => IDENTITY_SERVICE,
    }
}

/// Find the declaration of `name` in `section`
pub fn lookup(section: Section, name: &str) -> Option<&'static OptionSpec> {
    options(section).iter().find(|spec| spec.name == name)
}
