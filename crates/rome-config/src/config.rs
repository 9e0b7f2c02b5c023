use std::{
  path::{Path, PathBuf},
  sync::OnceLock,
};

use rome_fs::{WriteOptions, read_json, read_toml, write};
use serde::{Deserialize, Serialize};

use crate::{error::ConfigError, postprocess::PostprocessConfig};

/// Attribute that marks an `<img>` for embedding as a `data:` URI.
pub const DEFAULT_EMBED_ATTRIBUTE: &str = "rome-embed";

const CONFIG_FILENAMES: [&str; 6] = [
  "rome.toml",
  "rome.json",
  ".rome.toml",
  ".rome.json",
  ".config/rome.toml",
  ".config/rome.json",
];

/// Configuration for the Rome inliner.
///
/// [`Config`] holds every option that influences a pipeline run. Fields are
/// typically loaded from a TOML or JSON config file, but can also be set via
/// CLI arguments and `--config KEY=VALUE` overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Marker attribute on `<img>` elements whose source should be embedded.
  pub embed_attribute: String,

  /// Default destination for the bundled document, resolved against the
  /// source document's directory.
  pub output: Option<PathBuf>,

  /// Postprocessing configuration for HTML/CSS/JS minification
  pub postprocess: PostprocessConfig,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      embed_attribute: DEFAULT_EMBED_ATTRIBUTE.to_string(),
      output:          None,
      postprocess:     PostprocessConfig::default(),
    }
  }
}

impl Config {
  /// Load configuration from a file (TOML or JSON).
  ///
  /// # Arguments
  ///
  /// * `path` - Path to the configuration file.
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read or parsed, or if the format is
  /// unsupported.
  pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
    let path = path.as_ref();

    match path
      .extension()
      .and_then(|ext| ext.to_str())
      .map(str::to_lowercase)
      .as_deref()
    {
      Some("json") => Ok(read_json(path)?),
      Some("toml") => Ok(read_toml(path)?),
      Some(_) => {
        Err(ConfigError::Config(format!(
          "Unsupported config file format: {}",
          path.display()
        )))
      },
      None => {
        Err(ConfigError::Config(format!(
          "Config file has no extension: {}",
          path.display()
        )))
      },
    }
  }

  /// Load configuration from files and overrides.
  ///
  /// Explicit config files are loaded and merged in order. Without any, a
  /// discovered config file is used, falling back to the defaults. Overrides
  /// are applied last.
  ///
  /// # Errors
  ///
  /// Returns an error if a config file cannot be loaded or an override is
  /// invalid.
  pub fn load(
    config_files: &[PathBuf],
    config_overrides: &[String],
  ) -> Result<Self, ConfigError> {
    let mut config = if let Some((first, rest)) = config_files.split_first() {
      let mut merged_config = Self::from_file(first).map_err(|e| {
        ConfigError::Config(format!(
          "Failed to load config from {}: {}",
          first.display(),
          e
        ))
      })?;

      for config_path in rest {
        let additional_config = Self::from_file(config_path).map_err(|e| {
          ConfigError::Config(format!(
            "Failed to load config from {}: {}",
            config_path.display(),
            e
          ))
        })?;
        merged_config.merge(additional_config);
      }

      if config_files.len() > 1 {
        log::info!("Loaded and merged {} config files", config_files.len());
      }

      merged_config
    } else if let Some(discovered_config) = Self::find_config_file() {
      log::info!(
        "Using discovered config file: {}",
        discovered_config.display()
      );
      Self::from_file(&discovered_config).map_err(|e| {
        ConfigError::Config(format!(
          "Failed to load discovered config from {}: {}",
          discovered_config.display(),
          e
        ))
      })?
    } else {
      Self::default()
    };

    if !config_overrides.is_empty() {
      config.apply_overrides(config_overrides)?;
    }

    config.validate()?;
    Ok(config)
  }

  /// Apply configuration overrides from KEY=VALUE strings.
  ///
  /// # Errors
  ///
  /// Returns an error if:
  ///
  /// - An override string is not in KEY=VALUE format
  /// - A key is not recognized
  /// - A value cannot be parsed as the expected type
  ///
  /// # Example
  ///
  /// ```rust, ignore
  /// config.apply_overrides(&vec![
  ///     "postprocess.minify_js=false".to_string(),
  ///     "embed_attribute=data-inline".to_string(),
  /// ])?;
  /// ```
  pub fn apply_overrides(
    &mut self,
    overrides: &[String],
  ) -> Result<(), ConfigError> {
    for override_str in overrides {
      let (key, value) = override_str.split_once('=').ok_or_else(|| {
        ConfigError::Config(format!(
          "Invalid config override format: '{override_str}'. Expected \
           KEY=VALUE"
        ))
      })?;

      self.apply_override(key.trim(), value.trim())?;
    }

    Ok(())
  }

  /// Apply a single override.
  ///
  /// # Errors
  ///
  /// Returns an error if the key is unknown or the value is invalid.
  pub fn apply_override(
    &mut self,
    key: &str,
    value: &str,
  ) -> Result<(), ConfigError> {
    match key {
      "embed_attribute" => value.clone_into(&mut self.embed_attribute),
      "output" => {
        self.output = (!value.is_empty()).then(|| PathBuf::from(value));
      },
      _ => {
        let nested = key.strip_prefix("postprocess.").ok_or_else(|| {
          ConfigError::Config(format!(
            "Unknown configuration key: '{key}'. See documentation for \
             supported keys."
          ))
        })?;
        self.postprocess.apply_override(nested, value)?;
      },
    }
    Ok(())
  }

  /// Merge another config into this one, with the other config's values taking
  /// precedence.
  ///
  /// # Merge Rules
  ///
  /// - [`Option<T>`] fields: Other's [`Some`] value replaces this config's
  ///   value
  /// - Plain fields (String, bool, etc.): Other's value always replaces
  /// - Nested tables are merged field by field with the same rules
  pub fn merge(&mut self, other: Self) {
    self.embed_attribute = other.embed_attribute;
    if other.output.is_some() {
      self.output = other.output;
    }
    self.postprocess.merge_fields(other.postprocess);
  }

  /// Check values that deserialize fine but cannot work at runtime.
  ///
  /// # Errors
  ///
  /// Returns an error if the embed attribute is not a usable attribute name.
  pub fn validate(&self) -> Result<(), ConfigError> {
    let attr = &self.embed_attribute;
    if attr.is_empty()
      || attr
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '>' | '/' | '='))
    {
      return Err(ConfigError::Config(format!(
        "Invalid embed attribute name: '{attr}'"
      )));
    }
    Ok(())
  }

  /// Look for a config file inside `dir`, in priority order.
  #[must_use]
  pub fn find_config_file_in(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILENAMES
      .iter()
      .map(|filename| dir.join(filename))
      .find(|path| path.exists())
  }

  /// Search for config files in common locations
  #[must_use]
  pub fn find_config_file() -> Option<PathBuf> {
    static RESULT: OnceLock<Option<PathBuf>> = OnceLock::new();
    RESULT
      .get_or_init(|| {
        if let Some(found) = std::env::current_dir()
          .ok()
          .and_then(|dir| Self::find_config_file_in(&dir))
        {
          return Some(found);
        }

        if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
          let xdg_config_dir = PathBuf::from(xdg_config_home);
          for filename in &["rome.toml", "rome.json"] {
            let config_path = xdg_config_dir.join(filename);
            if config_path.exists() {
              return Some(config_path);
            }
          }
        }

        if let Ok(home) = std::env::var("HOME") {
          let home_config_dir = PathBuf::from(home).join(".config").join("rome");
          for filename in &["config.toml", "config.json"] {
            let config_path = home_config_dir.join(filename);
            if config_path.exists() {
              return Some(config_path);
            }
          }
        }

        None
      })
      .clone()
  }

  /// Render the default configuration in the given format.
  ///
  /// # Errors
  ///
  /// Returns an error if the format is unsupported or serialization fails.
  pub fn render_default_config(format: &str) -> Result<String, ConfigError> {
    let config = Self {
      postprocess: PostprocessConfig {
        html: Some(Default::default()),
        css: Some(Default::default()),
        js: Some(Default::default()),
        ..Default::default()
      },
      ..Self::default()
    };

    match format {
      "toml" => {
        let body = toml::to_string_pretty(&config).map_err(|e| {
          ConfigError::Config(format!("Failed to serialize TOML: {e}"))
        })?;
        Ok(format!(
          "# Rome configuration\n#\n# Paths are resolved against the source \
           document's directory.\n\n{body}"
        ))
      },
      "json" => Ok(serde_json::to_string_pretty(&config)? + "\n"),
      other => {
        Err(ConfigError::Config(format!(
          "Unsupported config format: {other}"
        )))
      },
    }
  }

  /// Generate a default configuration file
  ///
  /// # Errors
  ///
  /// Returns an error if the format is unsupported or the file cannot be
  /// written.
  pub fn generate_default_config(
    format: &str,
    path: &Path,
  ) -> Result<(), ConfigError> {
    let config_content = Self::render_default_config(format)?;
    write(path, &config_content, &WriteOptions::default())?;

    log::info!("Created default configuration file: {}", path.display());
    Ok(())
  }
}
