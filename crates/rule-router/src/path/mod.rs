/// URL helpers shared by rule construction and matching
///
/// All functions are **pure**: given same input, always produce same output with no side effects.

use std::borrow::Cow;
use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static PARAMETER_REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r":(\w+)").expect("parameter reference regex is valid"));

/// Checks if a URL is already in normalized form
///
/// Normalized means: starts with `/`, and does not end with `/` unless it is the root.
fn is_normalized(url: &str) -> bool {
    url == "/" || (url.starts_with('/') && !url.starts_with("//") && !url.ends_with('/'))
}

/// Collapses leading slashes to exactly one and strips trailing slashes
///
/// Returns `Cow::Borrowed` when the input is already normalized.
/// An empty result collapses to the root `/`.
///
/// Inner empty segments (`/a//b`) are left alone; `segmentize_url` drops them.
///
/// # Examples
///
/// ```
/// use rule_router::path::normalize_url;
/// use std::borrow::Cow;
///
/// assert!(matches!(normalize_url("/blog"), Cow::Borrowed("/blog")));
/// assert_eq!(normalize_url("blog/"), "/blog");
/// assert_eq!(normalize_url(""), "/");
/// ```
pub fn normalize_url(url: &str) -> Cow<'_, str> {
    if is_normalized(url) {
        return Cow::Borrowed(url);
    }

    let trimmed = url.trim_end_matches('/').trim_start_matches('/');

    Cow::Owned(format!("/{}", trimmed))
}

/// Splits a URL into its non-empty `/`-separated segments
///
/// Equivalent to normalizing first and splitting, but borrows from the input.
///
/// # Examples
///
/// ```
/// use rule_router::path::segmentize_url;
///
/// assert_eq!(segmentize_url("/blog/:slug/"), vec!["blog", ":slug"]);
/// assert!(segmentize_url("/").is_empty());
/// ```
pub fn segmentize_url(url: &str) -> Vec<&str> {
    url.split('/').filter(|s| !s.is_empty()).collect()
}

/// Joins segments back into a normalized URL, skipping empty ones
///
/// # Examples
///
/// ```
/// use rule_router::path::rebuild_url;
///
/// assert_eq!(rebuild_url(&["blog", "", "post"]), "/blog/post");
/// assert_eq!(rebuild_url::<&str>(&[]), "/");
/// ```
pub fn rebuild_url<S: AsRef<str>>(segments: &[S]) -> String {
    let joined = segments
        .iter()
        .map(AsRef::as_ref)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/");

    normalize_url(&joined).into_owned()
}

/// Replaces `:name` references in a URL template with URL-encoded values
///
/// References without a value are left as they are.
///
/// # Examples
///
/// ```
/// use rule_router::path::replace_parameters;
/// use std::collections::HashMap;
///
/// let mut values = HashMap::new();
/// values.insert("id".to_string(), "1".to_string());
/// values.insert("name".to_string(), "Joe Bloggs".to_string());
///
/// assert_eq!(
///     replace_parameters("/some/link/:id/:name", &values),
///     "/some/link/1/Joe%20Bloggs"
/// );
/// ```
pub fn replace_parameters(template: &str, values: &HashMap<String, String>) -> String {
    PARAMETER_REFERENCE
        .replace_all(template, |caps: &Captures<'_>| match values.get(&caps[1]) {
            Some(value) => urlencoding::encode(value).into_owned(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("/", "/")]
    #[case("", "/")]
    #[case("blog", "/blog")]
    #[case("/blog/", "/blog")]
    #[case("blog/post//", "/blog/post")]
    #[case("///", "/")]
    #[case("/a//b", "/a//b")]
    #[case("//a", "/a")]
    #[case("//a/", "/a")]
    fn test_normalize_url(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize_url(input), expected);
    }

    #[test]
    fn test_normalize_url_borrows_when_valid() {
        assert!(matches!(normalize_url("/about"), Cow::Borrowed("/about")));
        assert!(matches!(normalize_url("/"), Cow::Borrowed("/")));
        assert!(matches!(normalize_url("about/"), Cow::Owned(_)));
        assert!(matches!(normalize_url("//about"), Cow::Owned(_)));
    }

    #[rstest]
    #[case("")]
    #[case("x/")]
    #[case("/a/b//")]
    #[case("///")]
    #[case("blog/:slug?")]
    #[case("//blog")]
    fn test_normalize_url_is_idempotent(#[case] input: &str) {
        let once = normalize_url(input).into_owned();
        assert_eq!(normalize_url(&once), once);
    }

    #[test]
    fn test_segmentize_url() {
        assert_eq!(segmentize_url("/a/b/c"), vec!["a", "b", "c"]);
        assert_eq!(segmentize_url("a//b/"), vec!["a", "b"]);
        assert!(segmentize_url("").is_empty());
        assert!(segmentize_url("/").is_empty());
    }

    #[rstest]
    #[case("/blog/:slug")]
    #[case("blog/post/")]
    #[case("")]
    #[case("/files/:path*")]
    #[case("//files/")]
    fn test_rebuild_round_trips(#[case] input: &str) {
        assert_eq!(rebuild_url(&segmentize_url(input)), normalize_url(input));
    }

    #[test]
    fn test_replace_parameters_leaves_unknown_names() {
        let mut values = HashMap::new();
        values.insert("id".to_string(), "7".to_string());

        assert_eq!(replace_parameters("/post/:id/:slug", &values), "/post/7/:slug");
        assert_eq!(replace_parameters("/static", &values), "/static");
    }

    #[test]
    fn test_replace_parameters_matches_whole_names() {
        let mut values = HashMap::new();
        values.insert("id".to_string(), "1".to_string());
        values.insert("idx".to_string(), "2".to_string());

        assert_eq!(replace_parameters("/:idx/:id", &values), "/2/1");
    }
}
