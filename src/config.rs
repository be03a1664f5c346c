use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use eyre::{WrapErr, eyre};
use serde::Deserialize;
use tokio::fs;

/// Section whose keys act as defaults for every record section.
const DEFAULTS_SECTION: &str = "general";

/// Consulted when a section (and the defaults section) provides no `api_key`.
const API_KEY_VAR: &str = "LIVEDNS_API_KEY";

// Command-line flags: the actual record list comes from the TOML file named here.
#[derive(Debug, clap::Parser)]
#[command(version, about, max_term_width = 100)]
pub struct Args {
    /// Path to the TOML file describing the DNS records to keep updated.
    #[arg(short, long, value_name = "FILE")]
    pub config_file: PathBuf,

    /// Enable debug-level log output.
    #[arg(short, long)]
    pub verbose: bool,
}

/// One DNS record to keep synchronized, as declared by one config file section.
///
/// Immutable once loaded; the reconciler only reads these.
#[derive(Debug, Clone)]
pub struct RecordDefinition {
    /// Section name, used to label log lines.
    pub section: String,
    pub api_base_url: String,
    pub api_key: String,
    pub domain: String,
    pub record_name: String,
    pub record_type: String,
    pub ttl: u32,
}

/// Raw shape of one section before defaults and the api-key fallback are applied.
#[derive(Debug, Default, Deserialize)]
struct RawSection {
    api: Option<String>,
    domain: Option<String>,
    name: Option<String>,
    #[serde(rename = "type")]
    record_type: Option<String>,
    ttl: Option<u32>,
    api_key: Option<String>,
}

impl RawSection {
    /// Fills in any key this section left unset from the `[general]` section.
    fn apply_defaults(&mut self, defaults: &RawSection) {
        self.api = self.api.take().or_else(|| defaults.api.clone());
        self.domain = self.domain.take().or_else(|| defaults.domain.clone());
        self.name = self.name.take().or_else(|| defaults.name.clone());
        self.record_type = self.record_type.take().or_else(|| defaults.record_type.clone());
        self.ttl = self.ttl.take().or(defaults.ttl);
        self.api_key = self.api_key.take().or_else(|| defaults.api_key.clone());
    }

    fn into_definition(self, section: String) -> eyre::Result<RecordDefinition> {
        let api_key = match self.api_key {
            Some(key) => key,
            None => crate::get_var(API_KEY_VAR).map_err(|_| {
                eyre!("section '{section}' has no api_key and {API_KEY_VAR} is not set")
            })?,
        };

        Ok(RecordDefinition {
            api_base_url: require(self.api, "api", &section)?,
            domain: require(self.domain, "domain", &section)?,
            record_name: require(self.name, "name", &section)?,
            record_type: require(self.record_type, "type", &section)?,
            ttl: require(self.ttl, "ttl", &section)?,
            api_key,
            section,
        })
    }
}

fn require<T>(field: Option<T>, key: &str, section: &str) -> eyre::Result<T> {
    field.ok_or_else(|| eyre!("section '{section}' is missing required key '{key}'"))
}

/// Loads all record definitions from the TOML file at `path`.
pub async fn load_records(path: &Path) -> eyre::Result<Vec<RecordDefinition>> {
    let text = fs::read_to_string(path)
        .await
        .wrap_err_with(|| format!("failed to read config file {}", path.display()))?;
    parse_records(&text).wrap_err_with(|| format!("invalid config file {}", path.display()))
}

/// Parses record sections out of `text`.
///
/// Every top-level section is one record, except `[general]`, whose keys are inherited by any
/// section that does not set them itself.
fn parse_records(text: &str) -> eyre::Result<Vec<RecordDefinition>> {
    let mut sections: BTreeMap<String, RawSection> =
        toml::from_str(text).wrap_err("config file is not valid TOML")?;

    let defaults = sections.remove(DEFAULTS_SECTION).unwrap_or_default();

    let mut records = Vec::with_capacity(sections.len());
    for (section, mut raw) in sections {
        raw.apply_defaults(&defaults);
        records.push(raw.into_definition(section)?);
    }

    Ok(records)
}
