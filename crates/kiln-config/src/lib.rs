//! Configuration management for kiln.
//!
//! Parses `kiln.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `site.site_name`
//! - `breadcrumbs.base_url`
//! - `title_list.prefix`
//! - `title_list.suffix`
//! - `title_list.fallback`

mod expand;

use glob::Pattern;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override page source directory.
    pub input_dir: Option<PathBuf>,
    /// Override built output directory.
    pub output_dir: Option<PathBuf>,
    /// Override breadcrumb base URL.
    pub base_url: Option<String>,
    /// Override navigation base depth.
    pub base_depth: Option<usize>,
    /// Replace navigation ignore globs.
    pub ignore_globs: Option<Vec<String>>,
    /// Override site name.
    pub site_name: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "kiln.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site layout configuration (paths are relative strings from TOML).
    site: SiteConfigRaw,
    /// Breadcrumb defaults.
    pub breadcrumbs: BreadcrumbsConfig,
    /// Navigation tree defaults.
    pub nav: NavConfig,
    /// Title list formatting defaults.
    pub title_list: TitleListConfig,

    /// Resolved site configuration (set after loading).
    #[serde(skip)]
    pub site_resolved: SiteConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw site configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct SiteConfigRaw {
    input_dir: Option<String>,
    output_dir: Option<String>,
    output_extension: Option<String>,
    page_extensions: Option<Vec<String>>,
    site_name: Option<String>,
}

/// Resolved site configuration with absolute paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    /// Directory holding page sources.
    pub input_dir: PathBuf,
    /// Directory holding built output, consulted for static page titles.
    pub output_dir: PathBuf,
    /// Extension given to built pages (e.g. ".html").
    pub output_extension: String,
    /// Source extensions recognized as pages.
    pub page_extensions: Vec<String>,
    /// Site name used by title lists.
    pub site_name: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("src"),
            output_dir: PathBuf::from("htdocs"),
            output_extension: DEFAULT_OUTPUT_EXTENSION.to_owned(),
            page_extensions: default_page_extensions(),
            site_name: None,
        }
    }
}

const DEFAULT_OUTPUT_EXTENSION: &str = ".html";

fn default_page_extensions() -> Vec<String> {
    [".html", ".pug", ".md"].map(str::to_owned).to_vec()
}

/// Breadcrumb configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct BreadcrumbsConfig {
    /// Items shallower than this URL are dropped.
    pub base_url: String,
}

impl Default for BreadcrumbsConfig {
    fn default() -> Self {
        Self {
            base_url: "/".to_owned(),
        }
    }
}

/// Navigation tree configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    /// Depth at which navigation subtrees are rooted (default: current depth - 1).
    pub base_depth: Option<usize>,
    /// Glob patterns for pages left out of navigation trees.
    pub ignore_globs: Vec<String>,
}

impl NavConfig {
    /// Compile `ignore_globs` into patterns.
    ///
    /// A leading `./` is stripped since patterns match site-relative paths.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Glob` for the first invalid pattern.
    pub fn ignore_patterns(&self) -> Result<Vec<Pattern>, ConfigError> {
        self.ignore_globs
            .iter()
            .map(|glob| {
                let trimmed = glob.strip_prefix("./").unwrap_or(glob);
                Pattern::new(trimmed).map_err(|e| ConfigError::Glob {
                    pattern: glob.clone(),
                    message: e.to_string(),
                })
            })
            .collect()
    }
}

/// Title list formatting configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TitleListConfig {
    /// Separator between titles.
    pub separator: String,
    /// Text prepended to the title.
    pub prefix: String,
    /// Text appended to the title (default: site name).
    pub suffix: Option<String>,
    /// Title used when no breadcrumb contributes one (default: site name).
    pub fallback: Option<String>,
}

impl Default for TitleListConfig {
    fn default() -> Self {
        Self {
            separator: " | ".to_owned(),
            prefix: String::new(),
            suffix: None,
            fallback: None,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Invalid glob pattern.
    #[error("Invalid glob pattern {pattern:?}: {message}")]
    Glob {
        /// Pattern as written in the config.
        pattern: String,
        /// Parser message.
        message: String,
    },
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`site.site_name`").
        field: String,
        /// Error message (e.g., "${`SITE_NAME`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL path field to start with `/`.
fn require_root_relative(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with('/') {
        return Err(ConfigError::Validation(format!("{field} must start with /")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `kiln.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(input_dir) = &settings.input_dir {
            self.site_resolved.input_dir.clone_from(input_dir);
        }
        if let Some(output_dir) = &settings.output_dir {
            self.site_resolved.output_dir.clone_from(output_dir);
        }
        if let Some(base_url) = &settings.base_url {
            self.breadcrumbs.base_url.clone_from(base_url);
        }
        if let Some(base_depth) = settings.base_depth {
            self.nav.base_depth = Some(base_depth);
        }
        if let Some(ignore_globs) = &settings.ignore_globs {
            self.nav.ignore_globs.clone_from(ignore_globs);
        }
        if let Some(site_name) = &settings.site_name {
            self.site_resolved.site_name = Some(site_name.clone());
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        let defaults = SiteConfig::default();
        Self {
            site: SiteConfigRaw::default(),
            breadcrumbs: BreadcrumbsConfig::default(),
            nav: NavConfig::default(),
            title_list: TitleListConfig::default(),
            site_resolved: SiteConfig {
                input_dir: base.join(defaults.input_dir),
                output_dir: base.join(defaults.output_dir),
                ..defaults
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        // Validate configuration after loading and resolution
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Checks that all required fields are properly set and contain valid values.
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` or `ConfigError::Glob` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_site()?;
        require_root_relative(&self.breadcrumbs.base_url, "breadcrumbs.base_url")?;
        self.nav.ignore_patterns()?;
        Ok(())
    }

    /// Validate site configuration.
    fn validate_site(&self) -> Result<(), ConfigError> {
        let site = &self.site_resolved;

        if !site.output_extension.is_empty() && !site.output_extension.starts_with('.') {
            return Err(ConfigError::Validation(
                "site.output_extension must be empty or start with .".to_owned(),
            ));
        }

        if site.page_extensions.is_empty() {
            return Err(ConfigError::Validation(
                "site.page_extensions cannot be empty".to_owned(),
            ));
        }
        for ext in &site.page_extensions {
            require_non_empty(ext, "site.page_extensions")?;
        }

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref name) = self.site.site_name {
            self.site.site_name = Some(expand::expand_env(name, "site.site_name")?);
        }

        self.breadcrumbs.base_url =
            expand::expand_env(&self.breadcrumbs.base_url, "breadcrumbs.base_url")?;

        self.title_list.prefix = expand::expand_env(&self.title_list.prefix, "title_list.prefix")?;
        if let Some(ref suffix) = self.title_list.suffix {
            self.title_list.suffix = Some(expand::expand_env(suffix, "title_list.suffix")?);
        }
        if let Some(ref fallback) = self.title_list.fallback {
            self.title_list.fallback = Some(expand::expand_env(fallback, "title_list.fallback")?);
        }

        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.site_resolved = SiteConfig {
            input_dir: resolve(self.site.input_dir.as_deref(), "src"),
            output_dir: resolve(self.site.output_dir.as_deref(), "htdocs"),
            output_extension: self
                .site
                .output_extension
                .clone()
                .unwrap_or_else(|| DEFAULT_OUTPUT_EXTENSION.to_owned()),
            page_extensions: self
                .site
                .page_extensions
                .clone()
                .unwrap_or_else(default_page_extensions),
            site_name: self.site.site_name.clone(),
        };
    }
}
