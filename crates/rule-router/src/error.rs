/// Errors raised while registering rules
///
/// Matching never fails with an error: an unmatched URL is simply `None`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouterError {
    #[error("rule name must not be empty")]
    EmptyName,

    #[error("pattern {pattern:?} declares {count} wildcard segments, at most one is allowed")]
    MultipleWildcards { pattern: String, count: usize },

    #[error("a rule named {0:?} is already registered")]
    DuplicateRule(String),

    #[error("no rule named {0:?} is registered")]
    UnknownRule(String),
}
