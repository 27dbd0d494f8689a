/// Segment grammar for rule patterns
///
/// A pattern token is either static text or a dynamic parameter introduced by `:`.
/// Dynamic tokens carry inline markers:
///
/// - `:name`            required parameter
/// - `:name?`           optional parameter
/// - `:name?value`      optional parameter with a default value
/// - `:name*`           wildcard, absorbs the trailing URL segments
/// - `:name|regex`      parameter constrained by a regular expression
///
/// Markers combine, e.g. `:page?1|^[0-9]+$` or `:path?index*`.
///
/// The predicates below are pure functions over the raw token text.

use regex::Regex;

/// Leading marker of a dynamic segment
pub const PARAMETER_MARKER: char = ':';
/// Marks a dynamic segment as optional; a default value may follow it
pub const OPTIONAL_MARKER: char = '?';
/// Trailing marker of a wildcard segment
pub const WILDCARD_MARKER: char = '*';
/// Separates the parameter from its regex constraint
pub const REGEX_MARKER: char = '|';

/// A pattern token classified into its structural meaning
///
/// # Examples
///
/// ```
/// use rule_router::route::{classify_segment, Segment};
///
/// assert!(matches!(classify_segment("blog"), Segment::Static(_)));
///
/// let Segment::Dynamic(param) = classify_segment(":page?1|^[0-9]+$") else {
///     panic!("expected a dynamic segment");
/// };
/// assert_eq!(param.name, "page");
/// assert!(param.optional);
/// assert_eq!(param.default.as_deref(), Some("1"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Literal text, compared case-insensitively
    Static(String),
    /// Named parameter
    Dynamic(Parameter),
}

/// A dynamic segment's parsed markers
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    /// Declared optional. Whether it can actually be skipped also depends on the
    /// segments that follow it in the pattern.
    pub optional: bool,
    pub wildcard: bool,
    pub default: Option<String>,
    pub constraint: Option<Constraint>,
}

/// A regex constraint attached to a parameter
///
/// The expression is unanchored: it only has to match somewhere in the value
/// unless it carries its own `^`/`$`. An expression that fails to compile
/// rejects every value.
#[derive(Debug, Clone)]
pub struct Constraint {
    source: String,
    compiled: Option<Regex>,
}

impl Constraint {
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let compiled = match Regex::new(&source) {
            Ok(regex) => Some(regex),
            Err(err) => {
                tracing::warn!(
                    "invalid segment constraint {:?}, values will never match: {}",
                    source,
                    err
                );
                None
            }
        };

        Self { source, compiled }
    }

    /// The expression as written in the pattern
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether the expression compiled
    pub fn is_valid(&self) -> bool {
        self.compiled.is_some()
    }

    pub fn is_satisfied_by(&self, value: &str) -> bool {
        self.compiled
            .as_ref()
            .map(|regex| regex.is_match(value))
            .unwrap_or(false)
    }
}

impl PartialEq for Constraint {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

/// Token text after the leading `:`
fn marker_body(token: &str) -> &str {
    token.strip_prefix(PARAMETER_MARKER).unwrap_or(token)
}

/// True when the token starts with the parameter marker
pub fn is_dynamic(token: &str) -> bool {
    token.starts_with(PARAMETER_MARKER)
}

/// True when the token is dynamic and ends with the wildcard marker
pub fn is_wildcard(token: &str) -> bool {
    is_dynamic(token) && token.ends_with(WILDCARD_MARKER)
}

/// True when the token is dynamic and its optional marker precedes any regex marker
///
/// A `?` that only appears after `|` belongs to the expression, so `:id|^a?$`
/// stays required.
///
/// ```
/// use rule_router::route::is_optional;
///
/// assert!(is_optional(":id?"));
/// assert!(is_optional(":id?5|^[0-9]+$"));
/// assert!(!is_optional(":id|^a?$"));
/// assert!(!is_optional("id?"));
/// ```
pub fn is_optional(token: &str) -> bool {
    if !is_dynamic(token) {
        return false;
    }

    let body = marker_body(token);
    match (body.find(OPTIONAL_MARKER), body.find(REGEX_MARKER)) {
        (None, _) => false,
        (Some(_), None) => true,
        (Some(optional_pos), Some(regex_pos)) => optional_pos < regex_pos,
    }
}

/// Extracts the parameter name: the text between `:` and the first marker
///
/// ```
/// use rule_router::route::parameter_name;
///
/// assert_eq!(parameter_name(":slug"), "slug");
/// assert_eq!(parameter_name(":page?1"), "page");
/// assert_eq!(parameter_name(":path*"), "path");
/// assert_eq!(parameter_name(":id|^[0-9]+$"), "id");
/// ```
pub fn parameter_name(token: &str) -> &str {
    let body = marker_body(token);
    body.find(|c: char| matches!(c, OPTIONAL_MARKER | WILDCARD_MARKER | REGEX_MARKER))
        .map(|end| &body[..end])
        .unwrap_or(body)
}

/// Extracts the regex constraint text after `|`, if any
///
/// An empty expression counts as no constraint.
pub fn regex_constraint(token: &str) -> Option<&str> {
    token
        .find(REGEX_MARKER)
        .map(|pos| &token[pos + REGEX_MARKER.len_utf8()..])
        .filter(|expr| !expr.is_empty())
}

/// Extracts the default value between `?` and the next `|` or `*`
///
/// Only optional tokens have a default, and an empty default counts as none.
///
/// ```
/// use rule_router::route::default_value;
///
/// assert_eq!(default_value(":page?1"), Some("1"));
/// assert_eq!(default_value(":page?1|^[0-9]+$"), Some("1"));
/// assert_eq!(default_value(":path?index*"), Some("index"));
/// assert_eq!(default_value(":page?"), None);
/// assert_eq!(default_value(":page"), None);
/// ```
pub fn default_value(token: &str) -> Option<&str> {
    if !is_optional(token) {
        return None;
    }

    let start = token.find(OPTIONAL_MARKER)? + OPTIONAL_MARKER.len_utf8();
    let rest = &token[start..];
    let end = rest
        .find(|c: char| matches!(c, REGEX_MARKER | WILDCARD_MARKER))
        .unwrap_or(rest.len());

    Some(&rest[..end]).filter(|value| !value.is_empty())
}

/// Classifies a raw pattern token
pub fn classify_segment(token: &str) -> Segment {
    if !is_dynamic(token) {
        return Segment::Static(token.to_string());
    }

    Segment::Dynamic(Parameter {
        name: parameter_name(token).to_string(),
        optional: is_optional(token),
        wildcard: is_wildcard(token),
        default: default_value(token).map(str::to_string),
        constraint: regex_constraint(token).map(Constraint::new),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_classify_static() {
        assert_eq!(classify_segment("about"), Segment::Static("about".to_string()));
    }

    #[test]
    fn test_classify_required() {
        assert_eq!(
            classify_segment(":id"),
            Segment::Dynamic(Parameter {
                name: "id".to_string(),
                optional: false,
                wildcard: false,
                default: None,
                constraint: None,
            })
        );
    }

    #[test]
    fn test_classify_everything_at_once() {
        let Segment::Dynamic(param) = classify_segment(":path?index*") else {
            panic!("expected dynamic segment");
        };
        assert_eq!(param.name, "path");
        assert!(param.optional);
        assert!(param.wildcard);
        assert_eq!(param.default.as_deref(), Some("index"));
        assert_eq!(param.constraint, None);
    }

    #[test]
    fn test_classify_constraint() {
        let Segment::Dynamic(param) = classify_segment(r":id|^\d+$") else {
            panic!("expected dynamic segment");
        };
        let constraint = param.constraint.expect("constraint parsed");
        assert_eq!(constraint.as_str(), r"^\d+$");
        assert!(constraint.is_satisfied_by("42"));
        assert!(!constraint.is_satisfied_by("abc"));
    }

    #[test]
    fn test_invalid_constraint_rejects_everything() {
        let constraint = Constraint::new("([a-z");
        assert!(!constraint.is_valid());
        assert!(!constraint.is_satisfied_by("abc"));
        assert!(!constraint.is_satisfied_by(""));
    }

    #[test]
    fn test_unanchored_constraint() {
        let constraint = Constraint::new("[0-9]");
        assert!(constraint.is_satisfied_by("abc1"));
        assert!(!constraint.is_satisfied_by("abc"));
    }

    #[rstest]
    #[case(":id", true)]
    #[case("id", false)]
    #[case("", false)]
    #[case("a:b", false)]
    fn test_is_dynamic(#[case] token: &str, #[case] expected: bool) {
        assert_eq!(is_dynamic(token), expected);
    }

    #[rstest]
    #[case(":path*", true)]
    #[case(":path?*", true)]
    #[case(":path", false)]
    #[case("path*", false)]
    fn test_is_wildcard(#[case] token: &str, #[case] expected: bool) {
        assert_eq!(is_wildcard(token), expected);
    }

    #[rstest]
    #[case(":id?", true)]
    #[case(":id?default", true)]
    #[case(":id?1|^[0-9]$", true)]
    #[case(":id|^[0-9]?$", false)]
    #[case(":id", false)]
    #[case("id?", false)]
    fn test_is_optional(#[case] token: &str, #[case] expected: bool) {
        assert_eq!(is_optional(token), expected);
    }

    #[rstest]
    #[case(":id", "id")]
    #[case(":id?", "id")]
    #[case(":id?5", "id")]
    #[case(":id*", "id")]
    #[case(":id?*", "id")]
    #[case(":id|^a$", "id")]
    #[case(":id?5|^a$", "id")]
    #[case(":id|^a?$", "id")]
    fn test_parameter_name(#[case] token: &str, #[case] expected: &str) {
        assert_eq!(parameter_name(token), expected);
    }

    #[rstest]
    #[case(":id|^a$", Some("^a$"))]
    #[case(":id?x|[0-9]", Some("[0-9]"))]
    #[case(":id|", None)]
    #[case(":id", None)]
    fn test_regex_constraint(#[case] token: &str, #[case] expected: Option<&str>) {
        assert_eq!(regex_constraint(token), expected);
    }

    #[rstest]
    #[case(":id?5", Some("5"))]
    #[case(":id?5|^[0-9]$", Some("5"))]
    #[case(":id?all*", Some("all"))]
    #[case(":id?", None)]
    #[case(":id?|^[0-9]$", None)]
    #[case(":id?*", None)]
    #[case(":id|^a?b$", None)]
    #[case(":id", None)]
    fn test_default_value(#[case] token: &str, #[case] expected: Option<&str>) {
        assert_eq!(default_value(token), expected);
    }
}
