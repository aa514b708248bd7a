//! Configuration files for the `gradedoc` command.
//!
//! Configuration files can be placed in:
//! - User home directory: `~/.gradedoc.toml` (user defaults)
//! - Project directory: `./.gradedoc.toml` (project defaults)
//! - Custom location via `--config` (overrides both)
//!
//! Precedence order (highest to lowest):
//! 1. Command-line arguments (`--lang`, `--page-size`, etc.)
//! 2. `--config` file
//! 3. Project config (`./.gradedoc.toml`)
//! 4. User config (`~/.gradedoc.toml`)
//! 5. Built-in defaults

use anyhow::{Context, Result};
use colored::Colorize;
use gradedoc_core::Language;
use gradedoc_render::PageSize;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up in the home and the current directory.
pub const CONFIG_FILE_NAME: &str = ".gradedoc.toml";

/// Directory reports are written to when no output path is given.
pub const DEFAULT_OUTPUT_DIR: &str = "reports";

/// File name of reports written into the output directory.
pub const DEFAULT_REPORT_NAME: &str = "report.pdf";

/// Template written by `gradedoc config init`.
pub const DEFAULT_CONFIG: &str = r#"# gradedoc configuration file

# Report settings
[report]
# Report wording: fr or en
# language = "fr"

# Paper size: letter or a4
# page_size = "letter"

# Directory for reports when no output path is given
# output_dir = "reports"

# Write a plain dump when the structured report fails
# fallback = true

# Structured-output generator used by `gradedoc correct`.
# The prompt is written to its stdin; it must print JSON on stdout.
[generator]
# command = "my-llm-wrapper"
# args = ["--json"]
"#;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Report rendering defaults
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ReportConfig>,

    /// Generator used by the correct command
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generator: Option<GeneratorConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<PageSize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<String>>,
}

impl Config {
    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// `~/.gradedoc.toml`, if the home directory is known.
    #[must_use]
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(CONFIG_FILE_NAME))
    }

    /// `./.gradedoc.toml`
    #[must_use]
    pub fn project_config_path() -> PathBuf {
        PathBuf::from(CONFIG_FILE_NAME)
    }

    /// Load a config file that may be absent; a broken file is reported and
    /// skipped.
    fn load_optional(path: &Path, kind: &str) -> Option<Self> {
        if !path.exists() {
            return None;
        }
        match Self::load_from_file(path) {
            Ok(config) => Some(config),
            Err(e) => {
                eprintln!(
                    "{} Failed to load {kind} config from {}: {e:#}",
                    "Warning:".yellow().bold(),
                    path.display()
                );
                None
            }
        }
    }

    /// Find and load configuration files
    /// Returns (`user_config`, `project_config`)
    #[must_use]
    pub fn discover_configs() -> (Option<Self>, Option<Self>) {
        let user = Self::user_config_path().and_then(|path| Self::load_optional(&path, "user"));
        let project = Self::load_optional(&Self::project_config_path(), "project");
        (user, project)
    }

    /// Effective configuration: user, then project, then `explicit`.
    ///
    /// # Errors
    ///
    /// Returns an error if `explicit` is given and cannot be loaded.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let (user, project) = Self::discover_configs();
        let merged = Self::merge(user, project);
        match explicit {
            Some(path) => Ok(Self::merge(Some(merged), Some(Self::load_from_file(path)?))),
            None => Ok(merged),
        }
    }

    /// Merge two configs field by field; `overlay` wins.
    #[must_use]
    pub fn merge(base: Option<Self>, overlay: Option<Self>) -> Self {
        let mut merged = base.unwrap_or_default();
        let Some(overlay) = overlay else {
            return merged;
        };

        if let Some(report) = overlay.report {
            let mut merged_report = merged.report.unwrap_or_default();
            if let Some(language) = report.language {
                merged_report.language = Some(language);
            }
            if let Some(page_size) = report.page_size {
                merged_report.page_size = Some(page_size);
            }
            if let Some(output_dir) = report.output_dir {
                merged_report.output_dir = Some(output_dir);
            }
            if let Some(fallback) = report.fallback {
                merged_report.fallback = Some(fallback);
            }
            merged.report = Some(merged_report);
        }

        if let Some(generator) = overlay.generator {
            let mut merged_generator = merged.generator.unwrap_or_default();
            if let Some(command) = generator.command {
                merged_generator.command = Some(command);
            }
            if let Some(args) = generator.args {
                merged_generator.args = Some(args);
            }
            merged.generator = Some(merged_generator);
        }

        merged
    }

    fn report(&self) -> ReportConfig {
        self.report.clone().unwrap_or_default()
    }

    /// Resolve language from CLI, config, or default
    #[must_use]
    pub fn resolve_language(&self, cli_value: Option<Language>) -> Language {
        cli_value.or(self.report().language).unwrap_or_default()
    }

    /// Resolve page size from CLI, config, or default
    #[must_use]
    pub fn resolve_page_size(&self, cli_value: Option<PageSize>) -> PageSize {
        cli_value.or(self.report().page_size).unwrap_or_default()
    }

    /// Output path from CLI, or `<output_dir>/report.pdf`.
    #[must_use]
    pub fn resolve_output(&self, cli_value: Option<PathBuf>) -> PathBuf {
        cli_value.unwrap_or_else(|| {
            self.report()
                .output_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR))
                .join(DEFAULT_REPORT_NAME)
        })
    }

    /// Whether the plain fallback is enabled (default: yes).
    #[must_use]
    pub fn fallback_enabled(&self, disabled_by_cli: bool) -> bool {
        !disabled_by_cli && self.report().fallback.unwrap_or(true)
    }

    /// Generator program and arguments; CLI values replace config values.
    #[must_use]
    pub fn resolve_generator(
        &self,
        cli_command: Option<String>,
        cli_args: Vec<String>,
    ) -> Option<(String, Vec<String>)> {
        let generator = self.generator.clone().unwrap_or_default();
        match cli_command {
            Some(command) => Some((command, cli_args)),
            None => generator
                .command
                .map(|command| (command, generator.args.unwrap_or_default())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn report(language: Option<Language>, page_size: Option<PageSize>) -> Config {
        Config {
            report: Some(ReportConfig {
                language,
                page_size,
                ..ReportConfig::default()
            }),
            generator: None,
        }
    }

    #[test]
    fn test_template_parses_to_empty_sections() {
        let config: Config = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.report, Some(ReportConfig::default()));
        assert_eq!(config.generator, Some(GeneratorConfig::default()));
    }

    #[test]
    fn test_parse_values() {
        let config: Config = toml::from_str(
            r#"
            [report]
            language = "en"
            page_size = "a4"
            output_dir = "out"
            fallback = false

            [generator]
            command = "llm"
            args = ["--json"]
            "#,
        )
        .unwrap();
        assert_eq!(config.resolve_language(None), Language::En);
        assert_eq!(config.resolve_page_size(None), PageSize::A4);
        assert_eq!(config.resolve_output(None), PathBuf::from("out/report.pdf"));
        assert!(!config.fallback_enabled(false));
        assert_eq!(
            config.resolve_generator(None, Vec::new()),
            Some(("llm".to_string(), vec!["--json".to_string()]))
        );
    }

    #[test]
    fn test_project_overrides_user_per_field() {
        let user = report(Some(Language::En), Some(PageSize::A4));
        let project = report(Some(Language::Fr), None);
        let merged = Config::merge(Some(user), Some(project));
        assert_eq!(merged.resolve_language(None), Language::Fr);
        assert_eq!(merged.resolve_page_size(None), PageSize::A4);
    }

    #[test]
    fn test_cli_overrides_config() {
        let config = report(Some(Language::Fr), Some(PageSize::A4));
        assert_eq!(config.resolve_language(Some(Language::En)), Language::En);
        assert_eq!(config.resolve_page_size(Some(PageSize::Letter)), PageSize::Letter);
        assert!(!config.fallback_enabled(true));
        assert_eq!(
            config.resolve_output(Some(PathBuf::from("x.pdf"))),
            PathBuf::from("x.pdf")
        );
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.resolve_language(None), Language::Fr);
        assert_eq!(config.resolve_page_size(None), PageSize::Letter);
        assert_eq!(config.resolve_output(None), PathBuf::from("reports/report.pdf"));
        assert!(config.fallback_enabled(false));
        assert_eq!(config.resolve_generator(None, Vec::new()), None);
    }

    #[test]
    fn test_load_from_file_reports_syntax_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[report\nlanguage = ").unwrap();
        let err = Config::load_from_file(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse config file"));
    }
}
