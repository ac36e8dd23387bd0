// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Keylime Authors

//! Command-line handling
//!
//! The command line is processed in two passes. The global pre-pass pulls
//! out the configuration file option (`-c/--conf_file`) wherever it
//! appears. The remaining tokens are then split into section runs, each
//! starting with a section keyword, and every run is parsed on its own
//! against the options declared for that section:
//!
//! ```text
//! api-server-config -c /tmp/api.conf REDIS --port 800 DEFAULT --reset_config
//! ```

use crate::config::{
    schema::{self, OptionSpec, DEFAULT_CONF_FILE},
    ConfigError, OptionKind, Result, Section, Value,
};
use clap::{
    error::{ContextKind, ContextValue, ErrorKind},
    parser::ValueSource,
    value_parser, Arg, ArgAction, ArgMatches, Command,
};
use log::*;
use std::path::PathBuf;

const CONF_FILE_SHORT: &str = "-c";
const CONF_FILE_LONG: &str = "--conf_file";

/// Name of the binary, shown in usage and help output
pub static BIN_NAME: &str = "api-server-config";

/// Result of the global pre-pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalArgs {
    /// Configuration file to load
    pub conf_file: PathBuf,
    /// Whether the configuration file was given explicitly
    pub conf_file_explicit: bool,
    /// Tokens left for section segmentation, in their original order
    pub remaining: Vec<String>,
}

impl GlobalArgs {
    /// Extract the configuration file option from `args`.
    ///
    /// `-c FILE`, `-cFILE`, `--conf_file FILE` and `--conf_file=FILE` are
    /// accepted anywhere; the last occurrence wins.
    pub fn parse<I, T>(args: I) -> Result<GlobalArgs>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut conf_file = None;
        let mut remaining = Vec::new();
        let mut tokens = args.into_iter().map(Into::into);

        while let Some(token) = tokens.next() {
            if token == CONF_FILE_SHORT || token == CONF_FILE_LONG {
                match tokens.next() {
                    Some(path) => conf_file = Some(path),
                    None => return Err(ConfigError::MissingValue(token)),
                }
            } else if let Some(path) = token
                .strip_prefix(CONF_FILE_LONG)
                .and_then(|rest| rest.strip_prefix('='))
            {
                conf_file = Some(path.to_string());
            } else if let Some(path) = token
                .strip_prefix(CONF_FILE_SHORT)
                .filter(|rest| !rest.is_empty() && !rest.starts_with('-'))
            {
                conf_file = Some(path.to_string());
            } else {
                remaining.push(token);
            }
        }

        let conf_file_explicit = conf_file.is_some();
        Ok(GlobalArgs {
            conf_file: conf_file
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONF_FILE)),
            conf_file_explicit,
            remaining,
        })
    }
}

/// Contiguous slice of the command line belonging to one section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionRun {
    /// Section named by the leading keyword
    pub section: Section,
    /// Tokens following the keyword, up to the next keyword
    pub args: Vec<String>,
}

/// Split `tokens` into section runs at section keyword boundaries.
///
/// Tokens before the first keyword are not part of any section: anything
/// other than a global help or version request there is reported as an
/// unrecognized section.
pub fn segment<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<SectionRun>> {
    let mut runs: Vec<SectionRun> = Vec::new();

    for token in tokens.iter().map(AsRef::as_ref) {
        if let Some(section) = Section::from_keyword(token) {
            runs.push(SectionRun {
                section,
                args: Vec::new(),
            });
            continue;
        }

        match runs.last_mut() {
            Some(run) => run.args.push(token.to_string()),
            None => return Err(leading_token_error(token)),
        }
    }

    Ok(runs)
}

fn leading_token_error(token: &str) -> ConfigError {
    match token {
        "-h" | "--help" | "-V" | "--version" => {
            match command().try_get_matches_from([BIN_NAME, token]) {
                Err(e) => ConfigError::Cli(e),
                // Help and version always end parsing with an error
                Ok(_) => ConfigError::UnrecognizedSection(token.to_string()),
            }
        }
        _ => ConfigError::UnrecognizedSection(token.to_string()),
    }
}

impl OptionSpec {
    fn to_arg(&self) -> Arg {
        let arg = Arg::new(self.name).long(self.name).help(self.help);
        match self.kind {
            OptionKind::Boolean => arg.action(ArgAction::SetTrue),
            OptionKind::Integer => arg
                .action(ArgAction::Set)
                .value_name("N")
                .value_parser(value_parser!(i64)),
            OptionKind::StringList => arg
                .action(ArgAction::Set)
                .value_name("VALUE")
                .num_args(1..),
            OptionKind::String if !self.choices.is_empty() => arg
                .action(ArgAction::Set)
                .value_parser(self.choices.to_vec()),
            OptionKind::String => {
                arg.action(ArgAction::Set).value_name("VALUE")
            }
        }
    }

    /// Value of this option if it was given explicitly in `matches`
    fn explicit_value(&self, matches: &ArgMatches) -> Option<Value> {
        let source = matches.value_source(self.name);
        if source != Some(ValueSource::CommandLine) {
            return None;
        }

        let name = self.name;
        match self.kind {
            OptionKind::Boolean => Some(Value::Boolean(matches.get_flag(name))),
            OptionKind::Integer => {
                matches.get_one::<i64>(name).copied().map(Value::Integer)
            }
            OptionKind::String => {
                matches.get_one::<String>(name).cloned().map(Value::String)
            }
            OptionKind::StringList => matches
                .get_many::<String>(self.name)
                .map(|values| Value::List(values.cloned().collect())),
        }
    }
}

/// Command parsing a single run of `section`, generated from the schema
pub fn section_command(section: Section) -> Command {
    Command::new(section.keyword())
        .bin_name(format!("{BIN_NAME} {}", section.keyword()))
        .about(section.about())
        .allow_negative_numbers(true)
        .args_override_self(true)
        .args(schema::options(section).iter().map(OptionSpec::to_arg))
}

/// Top-level command, used for help and version output
pub fn command() -> Command {
    Command::new(BIN_NAME)
        .version(env!("CARGO_PKG_VERSION"))
        .about(
            "Resolve the API server configuration from defaults, \
             configuration file and command line",
        )
        .disable_help_subcommand(true)
        .arg(
            Arg::new("conf_file")
                .short('c')
                .long("conf_file")
                .value_name("FILE")
                .default_value(DEFAULT_CONF_FILE)
                .help("Specify config file"),
        )
        .subcommands(Section::ALL.iter().map(|s| section_command(*s)))
        .after_help(
            "Sections may be given in any order and repeated; options in a \
             later section run override earlier ones.",
        )
}

/// Parse one run, returning the options it sets explicitly.
pub fn parse_run(run: &SectionRun) -> Result<Vec<(&'static str, Value)>> {
    let section = run.section;
    let argv = std::iter::once(section.keyword().to_string())
        .chain(run.args.iter().cloned());

    let matches = section_command(section)
        .try_get_matches_from(argv)
        .map_err(|e| match e.kind() {
            ErrorKind::UnknownArgument => ConfigError::UnrecognizedOption {
                section,
                option: match e.get(ContextKind::InvalidArg) {
                    Some(ContextValue::String(arg)) => arg.clone(),
                    _ => run.args.join(" "),
                },
            },
            _ => ConfigError::Cli(e),
        })?;

    let explicit: Vec<(&'static str, Value)> = schema::options(section)
        .iter()
        .filter_map(|spec| {
            spec.explicit_value(&matches).map(|v| (spec.name, v))
        })
        .collect();
    debug!(
        "Section run {section} sets {} option(s) explicitly",
        explicit.len()
    );
    Ok(explicit)
}
