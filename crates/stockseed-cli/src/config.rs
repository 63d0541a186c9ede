use std::path::{Path, PathBuf};

use stockseed_generate::GenerateOptions;

use crate::CliError;

/// Flag values that take precedence over the config file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub seed: Option<u64>,
    pub out: Option<PathBuf>,
    pub report: Option<PathBuf>,
    pub strict: bool,
}

/// Load options from an optional TOML file, then apply flag overrides.
pub fn resolve_options(
    config_path: Option<&Path>,
    overrides: Overrides,
) -> Result<GenerateOptions, CliError> {
    let mut options = match config_path {
        Some(path) => load_config(path)?,
        None => GenerateOptions::default(),
    };

    if let Some(seed) = overrides.seed {
        options.seed = seed;
    }
    if let Some(out) = overrides.out {
        options.out_path = out;
    }
    if let Some(report) = overrides.report {
        options.report_path = Some(report);
    }
    options.strict |= overrides.strict;

    Ok(options)
}

fn load_config(path: &Path) -> Result<GenerateOptions, CliError> {
    let content = std::fs::read_to_string(path).map_err(|source| CliError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content)
}

fn parse_config(content: &str) -> Result<GenerateOptions, CliError> {
    Ok(toml::from_str(content)?)
}
