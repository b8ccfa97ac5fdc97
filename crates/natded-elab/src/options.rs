//! Elaborator options, loadable from TOML.

use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElabOptions {
    /// Resolve an `as` reference missing from the pool with the kernel
    /// `assumption` rule.
    pub hypothesis_fallback: bool,
    /// Maximum nesting of `any`, `any_func`, `any_pred` and `assume` scopes.
    pub max_scope_depth: usize,
}

impl Default for ElabOptions {
    fn default() -> Self {
        Self {
            hypothesis_fallback: true,
            max_scope_depth: 256,
        }
    }
}

impl ElabOptions {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ElabError;

    #[test]
    fn missing_keys_take_defaults() {
        let options = ElabOptions::from_toml_str("max_scope_depth = 4").unwrap();
        assert_eq!(
            options,
            ElabOptions {
                hypothesis_fallback: true,
                max_scope_depth: 4,
            }
        );
        assert_eq!(ElabOptions::from_toml_str("").unwrap(), ElabOptions::default());
    }

    #[test]
    fn bad_toml_is_an_options_error() {
        let err = ElabOptions::from_toml_str("hypothesis_fallback = \"yes\"").unwrap_err();
        assert!(matches!(err, ElabError::Options(_)));
    }
}
