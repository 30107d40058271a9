//! Completion configuration.
//!
//! Every field has a default, so a partial JSON document configures only
//! what it names:
//!
//! ```json
//! { "limits": { "max_solutions": 8 }, "async_members": "hide" }
//! ```

use serde::{Deserialize, Serialize};
use tycomp_solver::SolverLimits;

/// What to do with async members offered in a synchronous context.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AsyncMemberPolicy {
    /// Offer them, marked as requiring an async context.
    #[default]
    Flag,
    /// Leave them out.
    Hide,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionOptions {
    pub limits: SolverLimits,
    /// Run the fallback type check when the primary solve finds nothing.
    pub enable_fallback: bool,
    pub async_members: AsyncMemberPolicy,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        CompletionOptions {
            limits: SolverLimits::default(),
            enable_fallback: true,
            async_members: AsyncMemberPolicy::default(),
        }
    }
}

impl CompletionOptions {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
#[path = "../tests/options_tests.rs"]
mod options_tests;
