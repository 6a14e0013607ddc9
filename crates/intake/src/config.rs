use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use intake_partkeepr::{PartKeeprConfig, PartTemplate};
use intake_tme::TmeConfig;
use serde::Deserialize;

use crate::cue::{CommandCue, Cue, Silent};

pub const DEFAULT_CONFIG_FILE: &str = "intake.toml";

/// Settings loaded once at startup from a TOML file.
///
/// ```toml
/// [tme]
/// token = "..."
/// secret = "..."
/// country = "ES"
/// language = "EN"
///
/// [partkeepr]
/// url = "https://partkeepr.example.com"
/// user = "admin"
/// password = "..."
/// template = "request.json"
///
/// [cue]
/// command = ["/usr/bin/play", "-q", "beep.wav"]
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub tme: TmeConfig,
    pub partkeepr: PartKeeprConfig,
    #[serde(default)]
    pub cue: CueConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CueConfig {
    /// Program and arguments run for every recognized scan.
    #[serde(default)]
    pub command: Vec<String>,
}

impl Config {
    /// Read `path`; relative template paths are resolved against its directory.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config = Self::from_toml(&contents)
            .with_context(|| format!("Invalid config file {}", path.display()))?;

        if let Some(template) = &config.partkeepr.template {
            if template.is_relative() {
                let base = path.parent().unwrap_or(Path::new(""));
                config.partkeepr.template = Some(base.join(template));
            }
        }
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// The configured part template, or the built-in one.
    pub fn part_template(&self) -> Result<PartTemplate> {
        let template = match &self.partkeepr.template {
            Some(path) => PartTemplate::load(path)?,
            None => PartTemplate::builtin()?,
        };
        Ok(template)
    }

    pub fn template_path(&self) -> Option<&Path> {
        self.partkeepr.template.as_deref()
    }
}

impl CueConfig {
    pub fn build(&self) -> Box<dyn Cue> {
        match CommandCue::new(self.command.clone()) {
            Some(cue) => Box::new(cue),
            None => Box::new(Silent),
        }
    }
}
