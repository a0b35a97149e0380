//! Top-level modscout configuration with layered resolution.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{CategorySpec, OutputConfig, RuleSpec, ScanConfig};
use crate::constants::{
    BUILTIN_MAX_DEPTH, BUILTIN_MAX_OBJECTS, BUILTIN_ROOT, CATEGORY_BUILTIN, CATEGORY_SYSTEM,
    DEFAULT_EXCLUDED_PREFIXES, DEFAULT_OUTPUT_LIMIT, DEFAULT_REPORT_PATH, SYSTEM_CALLABLES,
    SYSTEM_MODULES,
};
use crate::errors::ConfigError;

/// Everything one scan run needs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`MODSCOUT_*`)
/// 3. Config file (JSON, or TOML by extension), replacing the built-in default wholesale
/// 4. `ModscoutConfig::builtin_default()`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModscoutConfig {
    pub roots: Vec<String>,
    pub rules: Vec<RuleSpec>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub categories: BTreeMap<String, CategorySpec>,
    pub scan: ScanConfig,
    pub output: OutputConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    /// Replaces `roots`.
    pub roots: Option<Vec<String>>,
    /// Category names; each appends a `category` rule.
    pub targets: Vec<String>,
    pub max_depth: Option<u32>,
    /// Only ever switches risk mode on.
    pub risk_getattr: bool,
    pub json_out: Option<String>,
    pub limit: Option<usize>,
}

impl ModscoutConfig {
    /// The configuration used when no config file is given.
    pub fn builtin_default() -> Self {
        Self {
            roots: vec![BUILTIN_ROOT.to_string()],
            rules: vec![
                RuleSpec::category(CATEGORY_SYSTEM),
                RuleSpec::category(CATEGORY_BUILTIN),
            ],
            categories: BTreeMap::new(),
            scan: Self::builtin_scan(),
            output: OutputConfig {
                json_path: Some(DEFAULT_REPORT_PATH.to_string()),
                limit: Some(DEFAULT_OUTPUT_LIMIT),
            },
        }
    }

    /// The content written by `--write-example`: the built-in default plus a
    /// path-regex rule and the `system` category tables spelled out.
    pub fn example() -> Self {
        let mut modules: Vec<&str> = SYSTEM_MODULES.to_vec();
        let mut callables: Vec<&str> = SYSTEM_CALLABLES.to_vec();
        modules.sort_unstable();
        callables.sort_unstable();

        let mut config = Self::builtin_default();
        config.rules.push(RuleSpec::QualnameRegex {
            pattern: r"random\._os\.(system|popen|Popen|fork)".to_string(),
        });
        config.categories.insert(
            CATEGORY_SYSTEM.to_string(),
            CategorySpec::new(modules, callables),
        );
        config
    }

    fn builtin_scan() -> ScanConfig {
        ScanConfig {
            max_depth: Some(BUILTIN_MAX_DEPTH),
            max_objects: Some(BUILTIN_MAX_OBJECTS),
            prune_dunders: Some(true),
            risk_getattr: Some(false),
            follow_classes: Some(true),
            follow_instances: Some(false),
            include_enumerated: None,
            exclude_module_prefixes: DEFAULT_EXCLUDED_PREFIXES
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }

    /// Resolve the effective configuration.
    ///
    /// A config file, when given, replaces the built-in default entirely;
    /// env and CLI overrides are then layered on top and the result validated.
    pub fn load(
        config_path: Option<&Path>,
        cli_overrides: Option<&CliOverrides>,
    ) -> Result<Self, ConfigError> {
        let mut config = match config_path {
            Some(path) => {
                let config = Self::load_file(path)?;
                ::tracing::debug!(path = %path.display(), rules = config.rules.len(), "loaded config file");
                config
            }
            None => Self::builtin_default(),
        };

        config.apply_env_overrides();

        if let Some(cli) = cli_overrides {
            config.apply_cli_overrides(cli);
        }

        config.validate()?;
        Ok(config)
    }

    /// Load a config file. `.toml` files are parsed as TOML, anything else as JSON.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let is_toml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

        let parsed = if is_toml {
            toml::from_str(&content).map_err(|e| e.to_string())
        } else {
            serde_json::from_str(&content).map_err(|e| e.to_string())
        };

        parsed.map_err(|message| ConfigError::ParseError {
            path: path.display().to_string(),
            message,
        })
    }

    /// Load configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scan.max_objects == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "scan.max_objects".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if let Some(idx) = self.roots.iter().position(|r| r.trim().is_empty()) {
            return Err(ConfigError::ValidationFailed {
                field: format!("roots[{idx}]"),
                message: "root names must not be empty".to_string(),
            });
        }
        if let Some(idx) = self
            .scan
            .exclude_module_prefixes
            .iter()
            .position(|p| p.is_empty())
        {
            // An empty prefix would exclude every module.
            return Err(ConfigError::ValidationFailed {
                field: format!("scan.exclude_module_prefixes[{idx}]"),
                message: "prefixes must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Apply environment variable overrides.
    /// Pattern: `MODSCOUT_ROOTS`, `MODSCOUT_MAX_DEPTH`, etc. Unparsable values are ignored.
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("MODSCOUT_ROOTS") {
            let roots = split_csv(&val);
            if !roots.is_empty() {
                self.roots = roots;
            }
        }
        if let Ok(val) = std::env::var("MODSCOUT_MAX_DEPTH") {
            if let Ok(v) = val.parse::<u32>() {
                self.scan.max_depth = Some(v);
            }
        }
        if let Ok(val) = std::env::var("MODSCOUT_MAX_OBJECTS") {
            if let Ok(v) = val.parse::<usize>() {
                self.scan.max_objects = Some(v);
            }
        }
        if let Ok(val) = std::env::var("MODSCOUT_RISK_GETATTR") {
            if let Ok(v) = val.parse::<bool>() {
                self.scan.risk_getattr = Some(v);
            }
        }
        if let Ok(val) = std::env::var("MODSCOUT_JSON_OUT") {
            if !val.is_empty() {
                self.output.json_path = Some(val);
            }
        }
    }

    /// Apply CLI overrides (highest priority).
    pub fn apply_cli_overrides(&mut self, cli: &CliOverrides) {
        if let Some(ref roots) = cli.roots {
            self.roots = roots.clone();
        }
        for target in cli.targets.iter().filter(|t| !t.is_empty()) {
            self.rules.push(RuleSpec::category(target.clone()));
        }
        if let Some(v) = cli.max_depth {
            self.scan.max_depth = Some(v);
        }
        if cli.risk_getattr {
            self.scan.risk_getattr = Some(true);
        }
        if let Some(ref v) = cli.json_out {
            self.output.json_path = Some(v.clone());
        }
        if let Some(v) = cli.limit {
            self.output.limit = Some(v);
        }
    }

    /// Serialize the config as pretty JSON.
    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

/// Split a comma-separated list, trimming and dropping empty items.
pub fn split_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
