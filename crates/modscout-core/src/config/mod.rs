//! Configuration system for modscout.
//! JSON (or TOML) file, then `MODSCOUT_*` env, then CLI flags.

pub mod category_spec;
pub mod modscout_config;
pub mod output_config;
pub mod rule_spec;
pub mod scan_config;

pub use category_spec::CategorySpec;
pub use modscout_config::{split_csv, CliOverrides, ModscoutConfig};
pub use output_config::OutputConfig;
pub use rule_spec::{RawRule, RuleSpec};
pub use scan_config::ScanConfig;
