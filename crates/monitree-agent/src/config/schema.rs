use serde::Deserialize;
use monitree_core::error::{MonitreeError, Result};
use monitree_core::Mode;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    pub version: u32,

    #[serde(default)]
    pub registry: RegistrySection,

    #[serde(default)]
    pub logging: LoggingSection,

    #[serde(default)]
    pub report: ReportSection,
}

impl AgentConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(MonitreeError::UnsupportedVersion(self.version));
        }

        self.registry.validate()?;
        self.logging.validate()?;
        self.report.validate()?;

        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistrySection {
    /// Root name; empty keeps metric names unprefixed.
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub default_mode: Mode,
}

impl RegistrySection {
    pub fn validate(&self) -> Result<()> {
        if !self.name.is_empty() && self.name.split('.').any(str::is_empty) {
            return Err(MonitreeError::BadConfig(format!(
                "registry.name has an empty segment: {:?}",
                self.name
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingSection {
    #[serde(default = "default_level")]
    pub level: String,

    /// Extra `EnvFilter` directives, e.g. `monitree_core=debug`.
    #[serde(default)]
    pub selectors: Vec<String>,

    #[serde(default = "default_to_stderr")]
    pub to_stderr: bool,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_level(),
            selectors: Vec::new(),
            to_stderr: default_to_stderr(),
        }
    }
}

const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl LoggingSection {
    pub fn validate(&self) -> Result<()> {
        if !LEVELS.contains(&self.level.as_str()) {
            return Err(MonitreeError::BadConfig(format!(
                "logging.level must be one of {LEVELS:?}, got {:?}",
                self.level
            )));
        }
        if let Some(bad) = self.selectors.iter().find(|s| s.trim().is_empty() || s.contains(',')) {
            return Err(MonitreeError::BadConfig(format!(
                "logging.selectors entries must be single non-empty directives: {bad:?}"
            )));
        }
        Ok(())
    }

    /// Base level actually applied. Selectors only name debug output, so any
    /// selector raises a coarser level to `debug`.
    pub fn effective_level(&self) -> &str {
        let coarser_than_debug = LEVELS
            .iter()
            .position(|l| *l == self.level)
            .is_some_and(|i| i > 1);
        if !self.selectors.is_empty() && coarser_than_debug {
            "debug"
        } else {
            &self.level
        }
    }

    /// Filter directives: the effective level followed by each selector.
    pub fn directives(&self) -> String {
        std::iter::once(self.effective_level())
            .chain(self.selectors.iter().map(|s| s.trim()))
            .collect::<Vec<_>>()
            .join(",")
    }
}

fn default_level() -> String {
    "info".into()
}
fn default_to_stderr() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportSection {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default = "default_period_ms")]
    pub period_ms: u64,

    #[serde(default = "default_report_mode")]
    pub mode: Mode,
}

impl Default for ReportSection {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            period_ms: default_period_ms(),
            mode: default_report_mode(),
        }
    }
}

impl ReportSection {
    pub fn validate(&self) -> Result<()> {
        if !(1000..=3_600_000).contains(&self.period_ms) {
            return Err(MonitreeError::BadConfig(
                "report.period_ms must be between 1000 and 3600000".into(),
            ));
        }
        Ok(())
    }
}

fn default_enabled() -> bool {
    true
}
fn default_period_ms() -> u64 {
    30000
}
fn default_report_mode() -> Mode {
    Mode::Reported
}
