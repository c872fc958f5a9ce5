//! Configuration file parsing and validation

pub mod rulestack_toml;

pub use rulestack_toml::{
    CONFIG_FILE_NAME, ColorOption, Config, EcmaVersion, GlobalAccess, LanguageOptions,
    OutputConfig, OutputFormat, ResolvedConfig, RulestackMeta, SourceType,
};
