use std::str::FromStr;

use crate::TableError;

/// Largest entry count accepted through the option interface.
pub const MAX_ENTRIES: i64 = 1 << 26;

#[derive(Debug, Clone)]
pub struct TableOption {
    pub name: &'static str,
    pub option_type: OptionType,
}

#[derive(Debug, Clone)]
pub enum OptionType {
    Spin { min: i64, max: i64 },
    Check,
}

impl OptionType {
    /// Checks a textual value against this option type and returns it in the
    /// form the parameter's `FromStr` accepts.
    pub fn canonicalize(&self, name: &str, value: &str) -> Result<String, TableError> {
        let invalid = |reason: String| TableError::InvalidOption {
            name: name.to_string(),
            reason,
        };

        match *self {
            OptionType::Spin { min, max } => {
                let parsed: i64 = value
                    .parse()
                    .map_err(|e| invalid(format!("Invalid integer: {}", e)))?;
                if !(min..=max).contains(&parsed) {
                    return Err(invalid(format!("{} is outside [{}, {}]", parsed, min, max)));
                }
                Ok(parsed.to_string())
            }
            // Any casing of true/false
            OptionType::Check => match value.to_ascii_lowercase().as_str() {
                flag @ ("true" | "false") => Ok(flag.to_string()),
                _ => Err(invalid(format!("'{}' is not 'true' or 'false'", value))),
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigParam<T> {
    pub value: T,
    pub option: TableOption,
}

impl<T> ConfigParam<T>
where
    T: FromStr + ToString + Clone,
    T::Err: std::fmt::Display,
{
    pub fn update(&mut self, value: &str) -> Result<(), TableError> {
        let name = self.option.name;
        let canonical = self.option.option_type.canonicalize(name, value.trim())?;

        self.value = canonical
            .parse::<T>()
            .map_err(|e| TableError::InvalidOption {
                name: name.to_string(),
                reason: format!("Parse error: {}", e),
            })?;
        Ok(())
    }

    /// Renders the parameter as a UCI `option` line.
    pub fn describe(&self) -> String {
        let kind = match self.option.option_type {
            OptionType::Spin { min, max } => format!(
                "spin default {} min {} max {}",
                self.value.to_string(),
                min,
                max
            ),
            OptionType::Check => format!("check default {}", self.value.to_string()),
        };
        format!("option name {} type {}", self.option.name, kind)
    }
}

macro_rules! define_config {
    ($(($field:ident: $type:ty, $name:literal, $option_type:expr, $default:expr)),* $(,)?) => {
        /// Settings for a transposition table and the loop that owns it.
        #[derive(Debug, Clone)]
        pub struct TableConfig {
            $(pub $field: ConfigParam<$type>,)*
        }

        impl Default for TableConfig {
            fn default() -> Self {
                Self {
                    $($field: ConfigParam {
                        value: $default,
                        option: TableOption { name: $name, option_type: $option_type },
                    },)*
                }
            }
        }

        impl TableConfig {
            /// Sets an option by name (case-insensitive) from its textual value.
            pub fn update(&mut self, name: &str, value: &str) -> Result<(), TableError> {
                $(
                    if name.trim().eq_ignore_ascii_case($name) {
                        return self.$field.update(value);
                    }
                )*
                Err(TableError::UnknownOption(name.to_string()))
            }

            /// Lists every option with its current value.
            pub fn describe(&self) -> Vec<String> {
                vec![$(self.$field.describe(),)*]
            }
        }
    };
}

define_config!(
    // Number of entries the table is sized for (one extra address slot is added)
    (entries: usize, "Hash Entries", OptionType::Spin { min: 1, max: MAX_ENTRIES }, 1 << 20),
    // Clear the table between searches instead of marking entries stale
    (clear_between_searches: bool, "Clear Hash", OptionType::Check, false),
);

impl TableConfig {
    pub fn with_entries(entries: usize) -> Self {
        let mut config = Self::default();
        config.entries.value = entries;
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TableConfig::default();
        assert_eq!(config.entries.value, 1 << 20);
        assert!(!config.clear_between_searches.value);
    }

    #[test]
    fn test_update_spin() {
        let mut config = TableConfig::default();
        config.update("Hash Entries", "1000").unwrap();
        assert_eq!(config.entries.value, 1000);

        config.update("hash entries", " 2048 ").unwrap();
        assert_eq!(config.entries.value, 2048);
    }

    #[test]
    fn test_update_spin_rejects_zero() {
        let mut config = TableConfig::default();
        let err = config.update("Hash Entries", "0").unwrap_err();
        assert!(matches!(err, TableError::InvalidOption { ref name, .. } if name == "Hash Entries"));
        assert_eq!(config.entries.value, 1 << 20);
    }

    #[test]
    fn test_update_spin_rejects_garbage() {
        let mut config = TableConfig::default();
        assert!(config.update("Hash Entries", "lots").is_err());
        assert!(config.update("Hash Entries", "-5").is_err());
    }

    #[test]
    fn test_update_check() {
        let mut config = TableConfig::default();
        config.update("Clear Hash", "TRUE").unwrap();
        assert!(config.clear_between_searches.value);

        config.update("Clear Hash", "false").unwrap();
        assert!(!config.clear_between_searches.value);

        assert!(config.update("Clear Hash", "yes").is_err());
    }

    #[test]
    fn test_canonicalize() {
        let spin = OptionType::Spin { min: 1, max: 10 };
        assert_eq!(spin.canonicalize("Size", "+7"), Ok("7".to_string()));
        assert_eq!(
            spin.canonicalize("Size", "11"),
            Err(TableError::InvalidOption {
                name: "Size".to_string(),
                reason: "11 is outside [1, 10]".to_string(),
            })
        );

        assert_eq!(OptionType::Check.canonicalize("Flag", "False"), Ok("false".to_string()));
        assert!(matches!(
            OptionType::Check.canonicalize("Flag", "1"),
            Err(TableError::InvalidOption { ref name, .. }) if name == "Flag"
        ));
    }

    #[test]
    fn test_update_unknown() {
        let mut config = TableConfig::default();
        assert_eq!(
            config.update("Threads", "4"),
            Err(TableError::UnknownOption("Threads".to_string()))
        );
    }

    #[test]
    fn test_describe() {
        let config = TableConfig::with_entries(100);
        assert_eq!(
            config.describe(),
            vec![
                "option name Hash Entries type spin default 100 min 1 max 67108864".to_string(),
                "option name Clear Hash type check default false".to_string(),
            ]
        );
    }
}
