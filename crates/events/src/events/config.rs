use serde::{Deserialize, Serialize};

/// Notices raised while normalizing user configuration into fetch options.
///
/// These never stop processing; the normalized value is always used.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum ConfigEvent {
    /// A deprecated option was present and will be read in place of (or
    /// alongside) its replacement.
    DeprecatedOption { option: String, replacement: String },

    /// A key inside an option block is ignored in favour of the value
    /// inferred for this run.
    OptionOverridden {
        option: String,
        key: String,
        value: String,
    },
}

impl ConfigEvent {
    /// Human readable message for terminal output.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::DeprecatedOption {
                option,
                replacement,
            } => format!("\"{option}\" is deprecated, please use \"{replacement}\" instead"),
            Self::OptionOverridden { option, key, .. } => {
                format!("{option}.{key} will be inferred from the main options")
            }
        }
    }
}
