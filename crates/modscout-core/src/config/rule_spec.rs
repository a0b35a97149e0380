//! Declarative rule specifications.
//!
//! On the wire a rule is a flat record, `{"type": ..., "pattern": ...}` or
//! `{"type": "category", "category": ...}`. `kind` is accepted for `type`
//! and `value` for `pattern`. In memory it is a tagged union carrying only
//! the parameters its kind needs.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// One configured rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRule", into = "RawRule")]
pub enum RuleSpec {
    /// Module whose name equals `pattern`.
    ModuleName { pattern: String },
    /// Module whose name starts with `pattern`.
    ModuleStartswith { pattern: String },
    /// Discovery path equal to `pattern`.
    Qualname { pattern: String },
    /// Discovery path containing a match for the regex `pattern`.
    QualnameRegex { pattern: String },
    /// Callable reached under the name `pattern`.
    CallableName { pattern: String },
    /// Any node reached under the name `pattern`.
    AttrName { pattern: String },
    /// Module compiled into the interpreter.
    BuiltinModule,
    /// Module from the standard distribution.
    StdlibModule,
    /// Member of a named category.
    Category { category: String },
    /// Kind this version does not know. Never matches.
    Unknown {
        kind: String,
        pattern: Option<String>,
        category: Option<String>,
    },
}

impl RuleSpec {
    pub const MODULE_NAME: &'static str = "module_name";
    pub const MODULE_STARTSWITH: &'static str = "module_startswith";
    pub const QUALNAME: &'static str = "qualname";
    pub const QUALNAME_REGEX: &'static str = "qualname_regex";
    pub const CALLABLE_NAME: &'static str = "callable_name";
    pub const ATTR_NAME: &'static str = "attr_name";
    pub const BUILTIN_MODULE: &'static str = "builtin_module";
    pub const STDLIB_MODULE: &'static str = "stdlib_module";
    pub const CATEGORY: &'static str = "category";

    /// Shorthand for a category rule, as added by `--targets`.
    pub fn category(name: impl Into<String>) -> Self {
        Self::Category {
            category: name.into(),
        }
    }

    /// The wire `type` tag of this rule.
    pub fn kind(&self) -> &str {
        match self {
            Self::ModuleName { .. } => Self::MODULE_NAME,
            Self::ModuleStartswith { .. } => Self::MODULE_STARTSWITH,
            Self::Qualname { .. } => Self::QUALNAME,
            Self::QualnameRegex { .. } => Self::QUALNAME_REGEX,
            Self::CallableName { .. } => Self::CALLABLE_NAME,
            Self::AttrName { .. } => Self::ATTR_NAME,
            Self::BuiltinModule => Self::BUILTIN_MODULE,
            Self::StdlibModule => Self::STDLIB_MODULE,
            Self::Category { .. } => Self::CATEGORY,
            Self::Unknown { kind, .. } => kind,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown { .. })
    }
}

impl fmt::Display for RuleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ModuleName { pattern }
            | Self::ModuleStartswith { pattern }
            | Self::Qualname { pattern }
            | Self::QualnameRegex { pattern }
            | Self::CallableName { pattern }
            | Self::AttrName { pattern } => write!(f, "{}({})", self.kind(), pattern),
            Self::Category { category } => write!(f, "category({category})"),
            _ => f.write_str(self.kind()),
        }
    }
}

/// Flat wire form of a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRule {
    #[serde(rename = "type", alias = "kind")]
    pub kind: String,
    #[serde(default, alias = "value", skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl TryFrom<RawRule> for RuleSpec {
    type Error = ConfigError;

    fn try_from(raw: RawRule) -> Result<Self, Self::Error> {
        let RawRule {
            kind,
            pattern,
            category,
        } = raw;

        let spec = match kind.as_str() {
            Self::MODULE_NAME => Self::ModuleName {
                pattern: required(&kind, pattern, "pattern")?,
            },
            Self::MODULE_STARTSWITH => Self::ModuleStartswith {
                pattern: required(&kind, pattern, "pattern")?,
            },
            Self::QUALNAME => Self::Qualname {
                pattern: required(&kind, pattern, "pattern")?,
            },
            Self::QUALNAME_REGEX => Self::QualnameRegex {
                pattern: required(&kind, pattern, "pattern")?,
            },
            Self::CALLABLE_NAME => Self::CallableName {
                pattern: required(&kind, pattern, "pattern")?,
            },
            Self::ATTR_NAME => Self::AttrName {
                pattern: required(&kind, pattern, "pattern")?,
            },
            Self::BUILTIN_MODULE => Self::BuiltinModule,
            Self::STDLIB_MODULE => Self::StdlibModule,
            Self::CATEGORY => Self::Category {
                category: required(&kind, category, "category")?,
            },
            _ => Self::Unknown {
                kind: kind.clone(),
                pattern,
                category,
            },
        };
        Ok(spec)
    }
}

/// Unwraps a rule parameter. Empty strings are valid patterns.
fn required(kind: &str, value: Option<String>, field: &str) -> Result<String, ConfigError> {
    value.ok_or_else(|| ConfigError::InvalidRule {
        kind: kind.to_string(),
        message: format!("requires a `{field}`"),
    })
}

impl From<RuleSpec> for RawRule {
    fn from(spec: RuleSpec) -> Self {
        let kind = spec.kind().to_string();
        match spec {
            RuleSpec::ModuleName { pattern }
            | RuleSpec::ModuleStartswith { pattern }
            | RuleSpec::Qualname { pattern }
            | RuleSpec::QualnameRegex { pattern }
            | RuleSpec::CallableName { pattern }
            | RuleSpec::AttrName { pattern } => RawRule {
                kind,
                pattern: Some(pattern),
                category: None,
            },
            RuleSpec::BuiltinModule | RuleSpec::StdlibModule => RawRule {
                kind,
                pattern: None,
                category: None,
            },
            RuleSpec::Category { category } => RawRule {
                kind,
                pattern: None,
                category: Some(category),
            },
            RuleSpec::Unknown {
                pattern, category, ..
            } => RawRule {
                kind,
                pattern,
                category,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_kind_and_value_aliases() {
        let spec: RuleSpec =
            serde_json::from_str(r#"{"kind": "attr_name", "value": "system"}"#).unwrap();
        assert_eq!(
            spec,
            RuleSpec::AttrName {
                pattern: "system".into()
            }
        );
    }

    #[test]
    fn serializes_with_canonical_keys() {
        let json = serde_json::to_value(RuleSpec::category("system")).unwrap();
        assert_eq!(json, serde_json::json!({"type": "category", "category": "system"}));
    }

    #[test]
    fn unknown_kind_is_kept() {
        let spec: RuleSpec =
            serde_json::from_str(r#"{"type": "taint_sink", "pattern": "x"}"#).unwrap();
        assert!(spec.is_unknown());
        assert_eq!(spec.kind(), "taint_sink");
    }

    #[test]
    fn empty_pattern_is_accepted() {
        let spec: RuleSpec =
            serde_json::from_str(r#"{"type": "module_startswith", "pattern": ""}"#).unwrap();
        assert_eq!(
            spec,
            RuleSpec::ModuleStartswith {
                pattern: String::new()
            }
        );
    }

    #[test]
    fn missing_pattern_is_rejected() {
        let err = RuleSpec::try_from(RawRule {
            kind: "module_name".into(),
            pattern: None,
            category: None,
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRule { .. }));
    }
}
