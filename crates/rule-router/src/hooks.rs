//! Caller-supplied hooks stored on a rule
//!
//! The matcher never calls these itself. `RuleSet::match_url` invokes them after
//! a rule resolves: the condition may veto the match, and the after-match hook may
//! rewrite the extracted parameters.
//!
//! Both traits are implemented for plain closures:
//!
//! ```
//! use rule_router::{Parameters, Rule};
//!
//! let rule = Rule::new("post", "/blog/:slug")
//!     .unwrap()
//!     .with_condition(|params: &Parameters, _url: &str| params.get("slug") != Some("draft"))
//!     .with_after_match(|params: Parameters, _url: &str| params.with("section", "blog"));
//!
//! assert!(rule.condition().is_some());
//! assert!(rule.after_match().is_some());
//! ```

use crate::Parameters;

/// Decides whether a structurally matched rule is accepted
pub trait Condition: Send + Sync {
    fn check(&self, params: &Parameters, url: &str) -> bool;
}

impl<F> Condition for F
where
    F: Fn(&Parameters, &str) -> bool + Send + Sync,
{
    fn check(&self, params: &Parameters, url: &str) -> bool {
        self(params, url)
    }
}

/// Rewrites the parameters of an accepted match
pub trait AfterMatch: Send + Sync {
    fn apply(&self, params: Parameters, url: &str) -> Parameters;
}

impl<F> AfterMatch for F
where
    F: Fn(Parameters, &str) -> Parameters + Send + Sync,
{
    fn apply(&self, params: Parameters, url: &str) -> Parameters {
        self(params, url)
    }
}
