//! Rule evaluation over (node, terminal name, discovery path) triples.

use modscout_core::config::{ModscoutConfig, RuleSpec};
use modscout_core::types::FxHashSet;
use regex::Regex;
use smallvec::SmallVec;
use tracing::{debug, warn};

use super::categories::{CategoryMatcher, CategoryRegistry};
use super::types::RuleHit;
use crate::classifier;
use crate::host::{Reflectable, Runtime};

/// A rule with its regex compiled up front.
#[derive(Debug, Clone)]
struct CompiledRule {
    spec: RuleSpec,
    /// Set only for valid `qualname_regex` rules.
    regex: Option<Regex>,
}

/// Evaluates every configured rule against a node.
#[derive(Debug, Clone)]
pub struct RuleEngine {
    rules: Vec<CompiledRule>,
    categories: CategoryRegistry,
}

impl RuleEngine {
    /// Compile `rules` against `categories`.
    ///
    /// A malformed regex or an unknown rule kind is reported once here and
    /// the rule never matches. Neither is an error.
    pub fn new(rules: Vec<RuleSpec>, categories: CategoryRegistry) -> Self {
        let rules = rules
            .into_iter()
            .map(|spec| {
                let regex = match &spec {
                    RuleSpec::QualnameRegex { pattern } => match Regex::new(pattern) {
                        Ok(re) => Some(re),
                        Err(e) => {
                            warn!(pattern = %pattern, error = %e, "invalid qualname_regex; rule disabled");
                            None
                        }
                    },
                    RuleSpec::Unknown { kind, .. } => {
                        warn!(kind = %kind, "unknown rule type; rule disabled");
                        None
                    }
                    RuleSpec::Category { category } if !categories.contains(category) => {
                        debug!(category = %category, "category has no definition; rule never matches");
                        None
                    }
                    _ => None,
                };
                CompiledRule { spec, regex }
            })
            .collect();

        Self { rules, categories }
    }

    /// Engine for a resolved configuration: its rules plus default
    /// categories overlaid with its category overrides.
    pub fn from_config(config: &ModscoutConfig) -> Self {
        Self::new(
            config.rules.clone(),
            CategoryRegistry::from_config(&config.categories),
        )
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Every rule matching `node`, in configuration order.
    pub fn evaluate<R: Runtime>(
        &self,
        runtime: &R,
        node: &R::Node,
        name: &str,
        path: &str,
    ) -> SmallVec<[RuleHit; 2]> {
        let module = classifier::module_name(node);
        let mut hits = SmallVec::new();

        for rule in &self.rules {
            if let Some(reason) = self.check(rule, runtime, node, module.as_deref(), name, path) {
                hits.push(RuleHit {
                    kind: rule.spec.kind().to_string(),
                    reason,
                    rule: rule.spec.clone(),
                });
            }
        }
        hits
    }

    /// Match reason for one rule, or `None`.
    fn check<R: Runtime>(
        &self,
        rule: &CompiledRule,
        runtime: &R,
        node: &R::Node,
        module: Option<&str>,
        name: &str,
        path: &str,
    ) -> Option<String> {
        match &rule.spec {
            RuleSpec::ModuleName { pattern } => (module? == pattern.as_str())
                .then(|| format!("module_name == {pattern}")),
            RuleSpec::ModuleStartswith { pattern } => module?
                .starts_with(pattern.as_str())
                .then(|| format!("module startswith {pattern}")),
            RuleSpec::Qualname { pattern } => {
                (path == pattern).then(|| format!("path == {pattern}"))
            }
            RuleSpec::QualnameRegex { pattern } => rule
                .regex
                .as_ref()?
                .is_match(path)
                .then(|| format!("path matches /{pattern}/")),
            RuleSpec::CallableName { pattern } => (node.is_callable() && name == pattern)
                .then(|| format!("callable name == {pattern}")),
            RuleSpec::AttrName { pattern } => {
                (name == pattern).then(|| format!("attr name == {pattern}"))
            }
            RuleSpec::BuiltinModule => classifier::is_built_in(runtime, node)
                .then(|| "builtin module".to_string()),
            RuleSpec::StdlibModule => classifier::is_standard_distribution(runtime, node)
                .then(|| "stdlib module".to_string()),
            RuleSpec::Category { category } => {
                let matched = match self.categories.get(category)? {
                    CategoryMatcher::BuiltinModules => classifier::is_built_in(runtime, node),
                    CategoryMatcher::Membership { modules, callables } => {
                        module.is_some_and(|m| modules.contains(m))
                            || (node.is_callable()
                                && (callables.contains(name) || own_name_in(node, callables)))
                    }
                };
                matched.then(|| format!("category:{category}"))
            }
            RuleSpec::Unknown { .. } => None,
        }
    }
}

/// Whether a callable's own declared name is in `names`. Catches risky
/// callables re-bound under an innocuous attribute name.
fn own_name_in<N: Reflectable>(node: &N, names: &FxHashSet<String>) -> bool {
    matches!(node.name(), Ok(Some(own)) if names.contains(own.as_str()))
}
