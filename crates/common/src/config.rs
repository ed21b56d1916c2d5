//! Generator configuration
//!
//! protoc hands plugins a single parameter string (`--jsonschema_opt=...`),
//! parsed here into an explicit [`GeneratorConfig`] value.

use crate::{GeneratorError, Result};
use std::fmt;
use std::str::FromStr;

/// How enum fields are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnumType {
    /// `"type": "string"` with the value names
    #[default]
    String,
    /// `"type": "integer"` with the value numbers
    Integer,
}

impl FromStr for EnumType {
    type Err = GeneratorError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "string" => Ok(EnumType::String),
            "integer" => Ok(EnumType::Integer),
            other => Err(GeneratorError::Parameter(format!(
                "enum_type must be \"string\" or \"integer\", got \"{}\"",
                other
            ))),
        }
    }
}

impl fmt::Display for EnumType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnumType::String => write!(f, "string"),
            EnumType::Integer => write!(f, "integer"),
        }
    }
}

/// Options that tune a generation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Enum rendering mode
    pub enum_type: EnumType,

    /// Inline referenced messages under `definitions` (true) or point at
    /// `<Message>.json` files generated alongside (false)
    pub repeated_defs: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            enum_type: EnumType::String,
            repeated_defs: true,
        }
    }
}

impl GeneratorConfig {
    /// Parse a protoc parameter string such as `enum_type=integer,repeated_defs=false`
    ///
    /// Keys not listed are left at their defaults.
    pub fn from_parameter(parameter: &str) -> Result<Self> {
        let mut config = Self::default();

        for entry in parameter.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (key, value) = match entry.split_once('=') {
                Some((key, value)) => (key.trim(), Some(value.trim())),
                None => (entry, None),
            };
            config.set(key, value)?;
        }

        Ok(config)
    }

    /// Apply a single `key[=value]` setting
    pub fn set(&mut self, key: &str, value: Option<&str>) -> Result<()> {
        match key {
            "enum_type" => {
                let value = value.ok_or_else(|| {
                    GeneratorError::Parameter("enum_type requires a value".to_string())
                })?;
                self.enum_type = value.parse()?;
            }
            // A bare flag switches the option on
            "repeated_defs" => {
                self.repeated_defs = match value {
                    None => true,
                    Some(value) => parse_bool(key, value)?,
                };
            }
            other => {
                return Err(GeneratorError::Parameter(format!(
                    "unknown option \"{}\"",
                    other
                )))
            }
        }
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
        other => Err(GeneratorError::Parameter(format!(
            "{} expects a boolean, got \"{}\"",
            key, other
        ))),
    }
}
