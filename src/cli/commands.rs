use anyhow::{anyhow, Result};
use clap::{ArgMatches, Args, CommandFactory, FromArgMatches, Parser, Subcommand};
use clap_complete::{generate, Shell};
use serde::Serialize;

use std::ffi::OsString;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use crate::config;
use crate::dom::memory::{MemoryDocument, MemoryElement};
use crate::dom::{Element, ElementKind};
use crate::error::Error;
use crate::setup::setup_conditional_fields;

use super::exit_codes;
use super::output::{self, FailureData, OutputMode, RunData, VerifyData};
use super::suggest;

#[derive(Parser)]
#[command(name = "dcf")]
#[command(about = "Show, hide, require and clear form fields from declarative rules")]
#[command(version)]
pub struct Cli {
    /// Path to rules file (overrides DCF_RULES env var and ./conditional-fields.json5)
    #[arg(long, global = true)]
    pub rules: Option<PathBuf>,

    /// Output in JSON format (auto-enabled when stdout is piped)
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Force text output even when stdout is piped
    #[arg(long, global = true, conflicts_with = "json")]
    pub no_json: bool,

    /// Suppress all output on success (errors still go to stderr)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log rule installation and evaluation (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Verify a rules file for errors
    Verify,

    /// Install rules on a form and replay interactions against it
    Run(RunArgs),

    /// Print the JSON schema for rules files
    Schema {
        /// Write the schema to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Form description: a JSON/JSON5 element tree or list of trees
    #[arg(short, long)]
    pub form: PathBuf,

    /// Set a control's value like a user would (repeatable)
    #[arg(long, value_name = "SELECTOR=VALUE", value_parser = parse_assignment, action = clap::ArgAction::Append)]
    pub set: Vec<(String, String)>,

    /// Check a checkbox or radio (repeatable)
    #[arg(long, value_name = "SELECTOR", action = clap::ArgAction::Append)]
    pub check: Vec<String>,

    /// Uncheck a checkbox or radio (repeatable)
    #[arg(long, value_name = "SELECTOR", action = clap::ArgAction::Append)]
    pub uncheck: Vec<String>,

    /// interactions in command-line order, filled by [`Cli::parse_ordered`]
    #[arg(skip)]
    ordered: Vec<Interaction>,
}

/// one replayed user action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    Set { selector: String, value: String },
    Check(String),
    Uncheck(String),
}

impl fmt::Display for Interaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Interaction::Set { selector, value } => write!(f, "set {} = {:?}", selector, value),
            Interaction::Check(selector) => write!(f, "check {}", selector),
            Interaction::Uncheck(selector) => write!(f, "uncheck {}", selector),
        }
    }
}

impl RunArgs {
    /// interactions to replay
    ///
    /// command-line order when parsed through [`Cli::parse_ordered`],
    /// otherwise sets, then checks, then unchecks.
    pub fn interactions(&self) -> Vec<Interaction> {
        if !self.ordered.is_empty() {
            return self.ordered.clone();
        }
        self.grouped().into_iter().map(|(_, i)| i).collect()
    }

    fn grouped(&self) -> Vec<(usize, Interaction)> {
        let sets = self.set.iter().map(|(selector, value)| Interaction::Set {
            selector: selector.clone(),
            value: value.clone(),
        });
        let checks = self.check.iter().cloned().map(Interaction::Check);
        let unchecks = self.uncheck.iter().cloned().map(Interaction::Uncheck);
        sets.chain(checks).chain(unchecks).enumerate().collect()
    }

    fn order_by(&mut self, matches: &ArgMatches) {
        let indices = |id: &str| -> Vec<usize> {
            matches
                .indices_of(id)
                .map(|i| i.collect())
                .unwrap_or_default()
        };
        let positions: Vec<usize> = [indices("set"), indices("check"), indices("uncheck")]
            .into_iter()
            .flatten()
            .collect();

        let mut indexed: Vec<(usize, Interaction)> = self
            .grouped()
            .into_iter()
            .map(|(n, interaction)| (positions.get(n).copied().unwrap_or(usize::MAX), interaction))
            .collect();
        indexed.sort_by_key(|(position, _)| *position);
        self.ordered = indexed.into_iter().map(|(_, i)| i).collect();
    }
}

impl Cli {
    /// parse `std::env::args`, keeping `run` interactions in command-line order
    pub fn parse_ordered() -> Self {
        Self::from_matches(&Self::command().get_matches()).unwrap_or_else(|e| e.exit())
    }

    pub fn try_parse_ordered_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::from_matches(&Self::command().try_get_matches_from(args)?)
    }

    fn from_matches(matches: &ArgMatches) -> Result<Self, clap::Error> {
        let mut cli = Self::from_arg_matches(matches)?;
        if let (Commands::Run(args), Some(("run", sub))) = (&mut cli.command, matches.subcommand())
        {
            args.order_by(sub);
        }
        Ok(cli)
    }
}

/// split `SELECTOR=VALUE` at the first `=` outside brackets and quotes
fn parse_assignment(s: &str) -> Result<(String, String), String> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;

    for (i, c) in s.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '[') => depth += 1,
            (None, ']') => depth = depth.saturating_sub(1),
            (None, '=') if depth == 0 => {
                let selector = s[..i].trim();
                if selector.is_empty() {
                    return Err("selector is empty".to_string());
                }
                return Ok((selector.to_string(), s[i + 1..].to_string()));
            }
            _ => {}
        }
    }

    Err(format!("expected SELECTOR=VALUE, got '{}'", s))
}

/// expand `~` in user-supplied paths
fn expand_path(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).to_string())
}

pub fn execute(cli: Cli) -> Result<()> {
    let rules_path = cli.rules.as_deref().map(expand_path);
    let output_mode = OutputMode::from_flags(cli.json, cli.no_json, cli.quiet);

    match cli.command {
        Commands::Verify => {
            let path = config::get_rules_path(rules_path.as_deref());
            let errors = match config::verify(&path) {
                Ok(errors) => errors,
                Err(e) => return fail(output_mode, exit_codes::CONFIG_ERROR, e),
            };

            if output_mode.is_json() {
                let valid = errors.is_empty();
                output::print_json(&VerifyData {
                    path: path.display().to_string(),
                    valid,
                    errors,
                });
                if !valid {
                    std::process::exit(exit_codes::CONFIG_ERROR);
                }
                return Ok(());
            }

            if errors.is_empty() {
                if !output_mode.is_quiet() {
                    println!("✓ Rules are valid: {}", path.display());
                }
                Ok(())
            } else {
                if !output_mode.is_quiet() {
                    println!("✗ Rules have {} error(s): {}", errors.len(), path.display());
                    println!();
                    for error in &errors {
                        println!("  - {}", error);
                    }
                }
                Err(anyhow!("rules validation failed"))
            }
        }

        Commands::Run(args) => run(rules_path.as_deref(), &args, output_mode),

        Commands::Schema { output: path } => match path {
            Some(path) => {
                let path = expand_path(&path);
                if let Err(e) = config::write_schema_file(&path) {
                    return fail(output_mode, exit_codes::ERROR, e);
                }
                if output_mode.is_json() {
                    output::print_json(&SchemaData {
                        path: path.display().to_string(),
                    });
                } else if !output_mode.is_quiet() {
                    println!("✓ Schema written to {}", path.display());
                }
                Ok(())
            }
            None => {
                println!("{}", config::JSON_SCHEMA);
                Ok(())
            }
        },

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
    }
}

#[derive(Serialize)]
struct SchemaData {
    path: String,
}

fn run(rules_path: Option<&Path>, args: &RunArgs, output_mode: OutputMode) -> Result<()> {
    let path = config::get_rules_path(rules_path);
    let rules = match config::load(&path) {
        Ok(rules) => rules,
        Err(e) => return fail(output_mode, exit_codes::CONFIG_ERROR, e),
    };

    let form_path = expand_path(&args.form);
    let nodes = match config::load_form(&form_path) {
        Ok(nodes) => nodes,
        Err(e) => return fail(output_mode, exit_codes::FORM_ERROR, e),
    };
    let document = MemoryDocument::from_specs(&nodes);

    let setup = match setup_conditional_fields(&document, &rules) {
        Ok(setup) => setup,
        Err(e) => {
            let e = anyhow!("{}: {}", path.display(), e);
            return fail(output_mode, exit_codes::CONFIG_ERROR, e);
        }
    };

    let interactions = args.interactions();
    for interaction in &interactions {
        log::debug!("{}", interaction);
        if let Err((code, e)) = apply(&document, interaction) {
            let suggestions = match &e {
                Error::SelectorNotFound(selector) => suggest::selectors(&document, selector),
                _ => Vec::new(),
            };
            if output_mode.is_json() {
                output::print_json_error_with_suggestions(code, &e.to_string(), suggestions);
                std::process::exit(code);
            }
            if let Some(best) = suggestions.first() {
                return Err(anyhow!("{} (did you mean {}?)", e, best));
            }
            return Err(e.into());
        }
    }

    match output_mode {
        OutputMode::Json => {
            let failures = setup
                .failures()
                .iter()
                .map(|failure| FailureData {
                    index: failure_index(failure),
                    message: failure.to_string(),
                    selector: failure.selector().map(str::to_string),
                })
                .collect();
            output::print_json(&RunData {
                rules: setup.installed(),
                failures,
                interactions: interactions.len(),
                elements: document.snapshot(),
            });
        }
        OutputMode::Text => {
            println!("Installed {} of {} rule(s)", setup.installed(), rules.len());
            for failure in setup.failures() {
                println!("  ✗ {}", failure);
            }
            println!();
            for element in document.snapshot() {
                println!("{}", output::format_element(&element));
            }
        }
        OutputMode::Quiet => {}
    }

    Ok(())
}

fn apply(document: &MemoryDocument, interaction: &Interaction) -> Result<(), (i32, Error)> {
    let code = |e: Error| {
        let code = match e {
            Error::SelectorNotFound(_) => exit_codes::SELECTOR_NOT_FOUND,
            _ => exit_codes::INVALID_ARGS,
        };
        (code, e)
    };

    match interaction {
        Interaction::Set { selector, value } => document.interact(selector, value).map_err(code),
        Interaction::Check(selector) | Interaction::Uncheck(selector) => {
            let element = document.element(selector).map_err(code)?;
            if !is_toggle(&element) {
                let e = Error::invalid_selector(selector, "not a checkbox or radio");
                return Err((exit_codes::INVALID_ARGS, e));
            }
            let checked = matches!(interaction, Interaction::Check(_));
            document.set_checked(selector, checked).map_err(code)
        }
    }
}

fn is_toggle(element: &MemoryElement) -> bool {
    element.kind() == ElementKind::Input
        && matches!(element.input_type().as_str(), "checkbox" | "radio")
}

fn failure_index(failure: &Error) -> usize {
    match failure {
        Error::RuleFailed { index, .. } => *index,
        _ => 0,
    }
}

/// report `e` in the selected output mode
///
/// JSON mode prints a JSON-RPC error and exits with `code`.
fn fail(output_mode: OutputMode, code: i32, e: anyhow::Error) -> Result<()> {
    if output_mode.is_json() {
        output::print_json_error(code, &format!("{:#}", e));
        std::process::exit(code);
    }
    Err(e)
}
