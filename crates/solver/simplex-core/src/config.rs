//! Solver configuration.

use serde::{Deserialize, Serialize};

/// Toggles read during every solve.
/// Keep this minimal; expand as needed without breaking API.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolverConfig {
    /// Strict combo matching: a combo fires (at 1.0) only when all of its
    /// sliders reach their targets and no larger combo containing it is active.
    #[serde(default)]
    pub exact_solve: bool,
}

impl SolverConfig {
    pub fn exact() -> Self {
        Self { exact_solve: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_non_exact() {
        assert!(!SolverConfig::default().exact_solve);
    }

    #[test]
    fn deserializes_camel_case() {
        let cfg: SolverConfig = serde_json::from_str(r#"{"exactSolve": true}"#).unwrap();
        assert_eq!(cfg, SolverConfig::exact());
        let cfg: SolverConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, SolverConfig::default());
    }
}
