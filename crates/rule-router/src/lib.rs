//! # Rule Router
//!
//! URL pattern rules with support for:
//! - Static segments (`/blog`), matched case-insensitively
//! - Named parameters (`/blog/:slug`)
//! - Optional parameters with defaults (`/blog/:page?1`)
//! - Regex-constrained parameters (`/user/:id|^[0-9]+$`)
//! - A wildcard parameter absorbing the trailing segments (`/docs/:path*`)
//!
//! A [`Rule`] is built once per pattern and answers whether a URL matches,
//! returning the extracted [`Parameters`]. A [`RuleSet`] holds many rules,
//! tries them in order and runs their [`Condition`] / [`AfterMatch`] hooks.
//!
//! ## Multiple wildcards
//!
//! A pattern may contain at most one wildcard segment. Patterns with more are
//! rejected when the rule is built with [`RouterError::MultipleWildcards`].
//!
//! ## Example
//!
//! ```
//! use rule_router::RuleSet;
//!
//! let mut rules = RuleSet::new();
//! rules.route("category", "/category/:id|^[0-9]+$").unwrap();
//! rules.route("files", "/files/:path*").unwrap();
//!
//! let matched = rules.match_url("/files/a/b/c").unwrap();
//! assert_eq!(matched.name, "files");
//! assert_eq!(matched.parameters.get("path"), Some("a/b/c"));
//!
//! assert!(rules.match_url("/category/abc").is_none());
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

mod config;
mod error;
mod hooks;
mod params;
pub mod path;
pub mod route;
mod router;
mod rule;

pub use config::{RouterConfig, RouterSettings, RuleConfig};
pub use error::RouterError;
pub use hooks::{AfterMatch, Condition};
pub use params::Parameters;
pub use path::{normalize_url, rebuild_url, replace_parameters, segmentize_url};
pub use route::{classify_segment, Segment};
pub use router::{RuleMatch, RuleSet};
pub use rule::{Rule, PLACEHOLDER_VALUE};
