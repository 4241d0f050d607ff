//! Wrapper configuration
//!
//! `Config` can be assembled with the `with_*` setters or loaded from JSON
//! using the camelCase field names (`pluralArg`, `optionProps`, `sbo`, ...).

use crate::error::{Result, XfnError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Highest argument position a configuration may name
///
/// Positions are padded out with nulls on every call, so the bound keeps a
/// stray configuration value from turning into a huge allocation.
pub const MAX_ARG_POSITION: usize = 255;

/// Position of an argument as written in a configuration
///
/// Non-negative integers, including integral floats such as `1.0`, are
/// indices. Anything else is kept as-is so that it can be reported when the
/// wrapper is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum ArgPosition {
    /// An argument index; must not exceed [`MAX_ARG_POSITION`]
    Index(usize),
    /// Any other value; rejected at wrap time when the position is required
    Invalid(Value),
}

impl ArgPosition {
    /// Resolve to an index, naming `field` in the error otherwise
    pub fn resolve(&self, field: &'static str) -> Result<usize> {
        match self {
            ArgPosition::Index(index) => check_position(field, *index),
            ArgPosition::Invalid(found) => Err(XfnError::InvalidIndex {
                field,
                found: found.clone(),
            }),
        }
    }
}

fn check_position(field: &'static str, index: usize) -> Result<usize> {
    if index > MAX_ARG_POSITION {
        return Err(XfnError::InvalidIndex {
            field,
            found: Value::from(index),
        });
    }
    Ok(index)
}

impl From<Value> for ArgPosition {
    fn from(value: Value) -> Self {
        let index = match &value {
            Value::Number(n) => match (n.as_u64(), n.as_f64()) {
                (Some(n), _) => usize::try_from(n).ok(),
                (None, Some(f)) if f >= 0.0 && f.fract() == 0.0 && f <= MAX_ARG_POSITION as f64 => {
                    Some(f as usize)
                }
                _ => None,
            },
            _ => None,
        };
        match index {
            Some(index) => ArgPosition::Index(index),
            None => ArgPosition::Invalid(value),
        }
    }
}

impl From<ArgPosition> for Value {
    fn from(position: ArgPosition) -> Self {
        match position {
            ArgPosition::Index(index) => Value::from(index),
            ArgPosition::Invalid(value) => value,
        }
    }
}

impl From<usize> for ArgPosition {
    fn from(index: usize) -> Self {
        ArgPosition::Index(index)
    }
}

impl Default for ArgPosition {
    fn default() -> Self {
        ArgPosition::Index(0)
    }
}

/// Receiver binding behaviour for `Wrapped::call_with`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SugarRepr", into = "SugarRepr")]
pub enum Sugar {
    /// Receivers are dropped
    Disabled,
    /// Receivers are inserted as the argument at `arg`
    Receiver {
        /// Argument position the receiver is bound to
        arg: usize,
    },
}

impl Default for Sugar {
    fn default() -> Self {
        Sugar::Receiver { arg: 0 }
    }
}

/// Accepted JSON shapes for `sbo`: `false`, `true`, `n` or `{"arg": n}`
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum SugarRepr {
    Flag(bool),
    Position(usize),
    Options {
        #[serde(default)]
        arg: usize,
    },
}

impl From<SugarRepr> for Sugar {
    fn from(repr: SugarRepr) -> Self {
        match repr {
            SugarRepr::Flag(false) => Sugar::Disabled,
            SugarRepr::Flag(true) => Sugar::default(),
            SugarRepr::Position(arg) | SugarRepr::Options { arg } => Sugar::Receiver { arg },
        }
    }
}

impl From<Sugar> for SugarRepr {
    fn from(sugar: Sugar) -> Self {
        match sugar {
            Sugar::Disabled => SugarRepr::Flag(false),
            Sugar::Receiver { arg } => SugarRepr::Options { arg },
        }
    }
}

/// Wrapper configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Config {
    /// Position of the argument accepting one item or many (default: 0)
    pub plural_arg: ArgPosition,
    /// Nest presets as `<plural>.<option>` instead of `<option>.<plural>`
    pub plural_first: bool,
    /// Name of the entry point accepting the plural shape
    pub plural_prop: Option<String>,
    /// Un-collect one-element results returned through the root
    pub plural_return: bool,
    /// Position of the options argument; required with `option_props`
    pub option_arg: Option<ArgPosition>,
    /// Named presets injected at the option position
    pub option_props: Option<Map<String, Value>>,
    /// Receiver binding
    pub sbo: Sugar,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            plural_arg: ArgPosition::default(),
            plural_first: false,
            plural_prop: None,
            plural_return: false,
            option_arg: None,
            option_props: None,
            sbo: Sugar::default(),
        }
    }
}

impl Config {
    /// Create a configuration with every feature off and receiver binding at 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the plural argument position
    pub fn with_plural_arg(mut self, position: impl Into<ArgPosition>) -> Self {
        self.plural_arg = position.into();
        self
    }

    /// Nest presets under the plural entry point instead of the reverse
    pub fn with_plural_first(mut self, plural_first: bool) -> Self {
        self.plural_first = plural_first;
        self
    }

    /// Expose the plural entry point under `name`
    pub fn with_plural_prop(mut self, name: impl Into<String>) -> Self {
        self.plural_prop = Some(name.into());
        self
    }

    /// Un-collect one-element results returned through the root
    pub fn with_plural_return(mut self, plural_return: bool) -> Self {
        self.plural_return = plural_return;
        self
    }

    /// Set the option argument position
    pub fn with_option_arg(mut self, position: impl Into<ArgPosition>) -> Self {
        self.option_arg = Some(position.into());
        self
    }

    /// Add a named preset
    pub fn with_option_prop(mut self, name: impl Into<String>, preset: Value) -> Self {
        self.option_props
            .get_or_insert_with(Map::new)
            .insert(name.into(), preset);
        self
    }

    /// Set receiver binding behaviour
    pub fn with_sugar(mut self, sugar: Sugar) -> Self {
        self.sbo = sugar;
        self
    }

    /// Validate the argument positions the requested features depend on
    ///
    /// The plural position is checked before the option position.
    pub(crate) fn positions(&self) -> Result<Positions> {
        let plural = match self.plural_name() {
            Some(_) => Some(self.plural_arg.resolve("pluralArg")?),
            None => None,
        };

        let option = match self.option_props {
            Some(_) => {
                let index = self
                    .option_arg
                    .as_ref()
                    .ok_or(XfnError::InvalidIndex {
                        field: "optionArg",
                        found: Value::Null,
                    })?
                    .resolve("optionArg")?;
                if plural == Some(index) {
                    return Err(XfnError::ConflictingIndices { index });
                }
                Some(index)
            }
            None => None,
        };

        if let Sugar::Receiver { arg } = self.sbo {
            check_position("sbo.arg", arg)?;
        }

        Ok(Positions { plural, option })
    }

    /// Name of the plural entry point; an empty name turns the feature off
    pub fn plural_name(&self) -> Option<&str> {
        self.plural_prop.as_deref().filter(|name| !name.is_empty())
    }
}

/// Validated argument positions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Positions {
    pub plural: Option<usize>,
    pub option: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.plural_arg, ArgPosition::Index(0));
        assert_eq!(config.sbo, Sugar::Receiver { arg: 0 });
        assert_eq!(
            config.positions().unwrap(),
            Positions {
                plural: None,
                option: None
            }
        );
    }

    #[test]
    fn test_deserialize_camel_case() {
        let config: Config = serde_json::from_value(json!({
            "pluralProp": "all",
            "pluralReturn": true,
            "optionArg": 1,
            "optionProps": {"test": {"test": true}},
        }))
        .unwrap();

        assert_eq!(config.plural_prop.as_deref(), Some("all"));
        assert!(config.plural_return);
        assert_eq!(config.option_arg, Some(ArgPosition::Index(1)));
        assert_eq!(
            config.positions().unwrap(),
            Positions {
                plural: Some(0),
                option: Some(1)
            }
        );
    }

    #[test]
    fn test_deserialize_rejects_unknown_fields() {
        let result: std::result::Result<Config, _> =
            serde_json::from_value(json!({"pluralProps": "all"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_non_numeric_positions_survive_deserialization() {
        let config: Config =
            serde_json::from_value(json!({"pluralArg": "str", "optionArg": -1})).unwrap();
        assert_eq!(config.plural_arg, ArgPosition::Invalid(json!("str")));
        assert_eq!(config.option_arg, Some(ArgPosition::Invalid(json!(-1))));
    }

    #[test]
    fn test_integral_floats_are_indices() {
        let config: Config =
            serde_json::from_value(json!({"pluralArg": 1.0, "optionArg": 2.5})).unwrap();
        assert_eq!(config.plural_arg, ArgPosition::Index(1));
        assert_eq!(config.option_arg, Some(ArgPosition::Invalid(json!(2.5))));
        assert_eq!(serde_json::to_value(&config.plural_arg).unwrap(), json!(1));
    }

    #[test]
    fn test_oversized_positions_rejected() {
        let config = Config::new()
            .with_plural_prop("all")
            .with_plural_arg(MAX_ARG_POSITION + 1);
        assert_eq!(
            config.positions(),
            Err(XfnError::InvalidIndex {
                field: "pluralArg",
                found: json!(MAX_ARG_POSITION + 1)
            })
        );

        let config = Config::new()
            .with_option_arg(usize::MAX)
            .with_option_prop("in", json!({"in": true}));
        assert!(matches!(
            config.positions(),
            Err(XfnError::InvalidIndex {
                field: "optionArg",
                ..
            })
        ));

        let config = Config::new().with_sugar(Sugar::Receiver { arg: usize::MAX });
        assert!(matches!(
            config.positions(),
            Err(XfnError::InvalidIndex {
                field: "sbo.arg",
                ..
            })
        ));

        let config = Config::new().with_plural_prop("all").with_plural_arg(MAX_ARG_POSITION);
        assert!(config.positions().is_ok());
    }

    #[test]
    fn test_empty_plural_prop_is_absent() {
        let config = Config::new()
            .with_plural_prop("")
            .with_plural_arg(ArgPosition::Invalid(json!("str")));
        assert_eq!(config.plural_name(), None);
        assert_eq!(
            config.positions().unwrap(),
            Positions {
                plural: None,
                option: None
            }
        );
    }

    #[test]
    fn test_sugar_shapes() {
        let parse = |value: Value| -> Sugar {
            let config: Config = serde_json::from_value(json!({ "sbo": value })).unwrap();
            config.sbo
        };
        assert_eq!(parse(json!(false)), Sugar::Disabled);
        assert_eq!(parse(json!(true)), Sugar::Receiver { arg: 0 });
        assert_eq!(parse(json!(1)), Sugar::Receiver { arg: 1 });
        assert_eq!(parse(json!({"arg": 2})), Sugar::Receiver { arg: 2 });
        assert_eq!(parse(json!({})), Sugar::Receiver { arg: 0 });
    }

    #[test]
    fn test_sugar_serializes_back() {
        assert_eq!(serde_json::to_value(Sugar::Disabled).unwrap(), json!(false));
        assert_eq!(
            serde_json::to_value(Sugar::Receiver { arg: 3 }).unwrap(),
            json!({"arg": 3})
        );
    }

    #[test]
    fn test_invalid_plural_arg() {
        let config = Config::new()
            .with_plural_arg(ArgPosition::Invalid(json!("str")))
            .with_plural_prop("all");
        assert_eq!(
            config.positions(),
            Err(XfnError::InvalidIndex {
                field: "pluralArg",
                found: json!("str")
            })
        );
    }

    #[test]
    fn test_invalid_plural_arg_ignored_without_plural_prop() {
        let config = Config::new().with_plural_arg(ArgPosition::Invalid(json!("str")));
        assert!(config.positions().is_ok());
    }

    #[test]
    fn test_missing_option_arg() {
        let config = Config::new().with_option_prop("in", json!({"in": true}));
        assert_eq!(
            config.positions(),
            Err(XfnError::InvalidIndex {
                field: "optionArg",
                found: Value::Null
            })
        );
    }

    #[test]
    fn test_conflicting_positions() {
        let config = Config::new()
            .with_plural_prop("all")
            .with_plural_arg(0)
            .with_option_arg(0)
            .with_option_prop("in", json!({"in": true}));
        assert_eq!(
            config.positions(),
            Err(XfnError::ConflictingIndices { index: 0 })
        );
    }

    #[test]
    fn test_same_positions_allowed_without_plural_prop() {
        let config = Config::new()
            .with_option_arg(0)
            .with_option_prop("in", json!({"in": true}));
        assert_eq!(
            config.positions().unwrap(),
            Positions {
                plural: None,
                option: Some(0)
            }
        );
    }

    #[test]
    fn test_plural_checked_before_option() {
        let config = Config::new()
            .with_plural_arg(ArgPosition::Invalid(json!(null)))
            .with_plural_prop("all")
            .with_option_prop("in", json!({"in": true}));
        assert!(matches!(
            config.positions(),
            Err(XfnError::InvalidIndex {
                field: "pluralArg",
                ..
            })
        ));
    }
}
