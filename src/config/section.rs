// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Keylime Authors

use serde::Serialize;
use std::fmt;

/// Named group of configuration options.
///
/// Each section is addressed by a keyword, used both as the section header
/// in the configuration file and as the token that starts a section run on
/// the command line.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
)]
pub enum Section {
    /// Listener, logging and storage cluster settings
    #[serde(rename = "DEFAULT")]
    General,
    /// Discovery server endpoint
    #[serde(rename = "DISCOVERY")]
    Discovery,
    /// Message bus credentials
    #[serde(rename = "RABBIT")]
    MessageBus,
    /// Mapping (IF-MAP) server
    #[serde(rename = "IFMAP")]
    MappingServer,
    /// Cache server
    #[serde(rename = "REDIS")]
    Cache,
    /// TLS material
    #[serde(rename = "SECURITY")]
    Security,
    /// Identity service used for request authentication
    #[serde(rename = "KEYSTONE")]
    IdentityService,
}

impl Section {
    /// All sections, in the order they are listed in help output.
    pub const ALL: [Section; 7] = [
        Section::General,
        Section::Discovery,
        Section::MessageBus,
        Section::MappingServer,
        Section::Cache,
        Section::Security,
        Section::IdentityService,
    ];

    /// Keyword naming this section in files and on the command line
    pub fn keyword(self) -> &'static str {
        match self {
            Section::General => "DEFAULT",
            Section::Discovery => "DISCOVERY",
            Section::MessageBus => "RABBIT",
            Section::MappingServer => "IFMAP",
            Section::Cache => "REDIS",
            Section::Security => "SECURITY",
            Section::IdentityService => "KEYSTONE",
        }
    }

    /// Look up a section by its exact keyword.
    ///
    /// Matching is case-sensitive: `redis` is not the cache section.
    pub fn from_keyword(keyword: &str) -> Option<Section> {
        Section::ALL
            .iter()
            .copied()
            .find(|section| section.keyword() == keyword)
    }

    pub(crate) fn about(self) -> &'static str {
        match self {
            Section::General => "General service options",
            Section::Discovery => "Discovery server options",
            Section::MessageBus => "Message bus options",
            Section::MappingServer => "IF-MAP server options",
            Section::Cache => "Cache server options",
            Section::Security => "Certificate and key options",
            Section::IdentityService => "Identity service options",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}
