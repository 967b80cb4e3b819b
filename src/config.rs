// ⚙️ Configuration - environment first, command line on top

use crate::equivalence::{DEFAULT_NO_MERGE_LABEL, DEFAULT_THRESHOLD};
use anyhow::{anyhow, bail, Context, Result};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateBackend {
    Json,
    Sqlite,
}

impl FromStr for StateBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(StateBackend::Json),
            "sqlite" => Ok(StateBackend::Sqlite),
            other => Err(anyhow!("Unknown state backend: {} (expected json or sqlite)", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Purchase-line CSV to read
    pub input: Option<PathBuf>,

    /// Two-column registry: display name, code
    pub sections_path: PathBuf,

    /// Durable merge/classification state
    pub state_path: PathBuf,
    pub backend: StateBackend,

    pub threshold: f64,
    pub decimal_separator: char,
    pub list_token: String,
    pub no_merge_label: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            input: None,
            sections_path: PathBuf::from("sections.csv"),
            state_path: PathBuf::from("einkauf.db"),
            backend: StateBackend::Json,
            threshold: DEFAULT_THRESHOLD,
            decimal_separator: ',',
            list_token: "?".to_string(),
            no_merge_label: DEFAULT_NO_MERGE_LABEL.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup (the process environment in production)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(path) = lookup("SHOPPING_SECTIONS") {
            config.sections_path = PathBuf::from(path);
        }
        if let Some(path) = lookup("SHOPPING_STATE") {
            config.state_path = PathBuf::from(path);
        }
        if let Some(backend) = lookup("SHOPPING_BACKEND") {
            config.backend = backend.parse()?;
        }
        if let Some(threshold) = lookup("SHOPPING_THRESHOLD") {
            config.threshold = parse_threshold(&threshold)?;
        }
        if let Some(separator) = lookup("SHOPPING_DECIMAL_SEPARATOR") {
            config.decimal_separator = parse_separator(&separator)?;
        }

        Ok(config)
    }

    /// Apply command-line arguments (without the program name)
    ///
    /// Usage: <input.csv> [--sections PATH] [--state PATH] [--backend json|sqlite]
    pub fn apply_args<I>(mut self, args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--sections" => self.sections_path = PathBuf::from(value_for(&mut args, &arg)?),
                "--state" => self.state_path = PathBuf::from(value_for(&mut args, &arg)?),
                "--backend" => self.backend = value_for(&mut args, &arg)?.parse()?,
                "--threshold" => self.threshold = parse_threshold(&value_for(&mut args, &arg)?)?,
                flag if flag.starts_with("--") => bail!("Unknown option: {}", flag),
                _ if self.input.is_none() => self.input = Some(PathBuf::from(&arg)),
                _ => bail!("Unexpected argument: {}", arg),
            }
        }

        Ok(self)
    }

    pub fn input(&self) -> Result<&PathBuf> {
        self.input
            .as_ref()
            .ok_or_else(|| anyhow!("Usage: shopping-list <input.csv> [--sections PATH] [--state PATH] [--backend json|sqlite]"))
    }
}

fn value_for<I: Iterator<Item = String>>(args: &mut I, flag: &str) -> Result<String> {
    args.next()
        .ok_or_else(|| anyhow!("Missing value for {}", flag))
}

fn parse_threshold(raw: &str) -> Result<f64> {
    let value: f64 = raw
        .trim()
        .parse()
        .with_context(|| format!("Invalid similarity threshold: {}", raw))?;
    if !(0.0..=100.0).contains(&value) {
        bail!("Similarity threshold must be between 0 and 100, got {}", value);
    }
    Ok(value)
}

fn parse_separator(raw: &str) -> Result<char> {
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => bail!("Decimal separator must be a single character, got {:?}", raw),
    }
}
