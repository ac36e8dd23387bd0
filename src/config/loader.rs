// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Keylime Authors

use crate::config::{
    cli::{self, GlobalArgs, SectionRun},
    file_config, Origin, Result, Settings,
};
use log::*;
use std::path::Path;

/// Builds the resolved [`Settings`] from defaults, an optional
/// configuration file and command-line section runs.
///
/// Precedence is tracked per option: a command-line value is never
/// replaced by a file value, and neither is replaced by a default, whatever
/// order the sources are merged in.
///
/// ```
/// use api_server_config::config::{ConfigLoader, Section, Value};
///
/// let mut loader = ConfigLoader::new();
/// loader
///     .apply_command_line(["DEFAULT", "--listen_port", "200"])
///     .expect("failed to apply command line");
/// let settings = loader.finish();
/// assert_eq!(
///     settings.get(Section::General, "listen_port"),
///     Some(&Value::Integer(200))
/// );
/// ```
#[derive(Debug, Default)]
pub struct ConfigLoader {
    settings: Settings,
}

impl ConfigLoader {
    /// Create a loader holding the compiled-in defaults for every section
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge the configuration file at `path`.
    ///
    /// A path that does not name an existing file is skipped. Sections and
    /// keys absent from the file keep their current values.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<&mut Self> {
        let path = path.as_ref();
        let ini = match file_config::read(path)? {
            Some(ini) => ini,
            None => return Ok(self),
        };

        let overrides = file_config::overrides(&ini, path)?;
        let count = overrides.len();
        for o in overrides {
            let _ = self
                .settings
                .merge(o.section, o.key, o.value, Origin::File);
        }

        self.settings.set_loaded_from(path);
        info!(
            "Loaded {count} option(s) from configuration file {}",
            path.display()
        );
        Ok(self)
    }

    /// Merge command-line section runs from `args`.
    ///
    /// `args` must not contain the global configuration file option; see
    /// [`GlobalArgs`] for the pre-pass removing it.
    pub fn apply_command_line<I, T>(&mut self, args: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let tokens: Vec<T> = args.into_iter().collect();
        let runs = cli::segment(&tokens)?;
        self.apply_runs(&runs)
    }

    /// Merge already segmented runs, left to right.
    ///
    /// Every run is parsed before any value is merged, so an invalid run
    /// leaves the settings untouched.
    pub fn apply_runs(&mut self, runs: &[SectionRun]) -> Result<&mut Self> {
        let parsed = runs
            .iter()
            .map(|run| cli::parse_run(run).map(|opts| (run.section, opts)))
            .collect::<Result<Vec<_>>>()?;

        for (section, options) in parsed {
            for (key, value) in options {
                let _ = self
                    .settings
                    .merge(section, key, value, Origin::CommandLine);
            }
        }
        Ok(self)
    }

    /// Split list options still holding a delimited string into items
    pub fn normalize(&mut self) -> &mut Self {
        self.settings.normalize();
        self
    }

    /// Current, not yet resolved, settings
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Normalize and return the resolved settings
    pub fn finish(mut self) -> Settings {
        self.settings.normalize();
        self.settings
    }
}

/// Resolve the settings from the process arguments, without the program
/// name.
///
/// The configuration file option is extracted first and the section runs
/// are validated before the file is read, so a help request or a
/// malformed command line is reported without touching the filesystem.
pub fn load<I, T>(args: I) -> Result<Settings>
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    let global = GlobalArgs::parse(args)?;
    let runs = cli::segment(&global.remaining)?;

    if global.conf_file_explicit && !global.conf_file.is_file() {
        warn!(
            "Configuration file {} not found",
            global.conf_file.display()
        );
    }

    let mut loader = ConfigLoader::new();
    let _ = loader.load_file(&global.conf_file)?.apply_runs(&runs)?;
    Ok(loader.finish())
}
