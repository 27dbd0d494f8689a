use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::hooks::{AfterMatch, Condition};
use crate::path::{rebuild_url, segmentize_url};
use crate::route::{classify_segment, Segment};
use crate::{Parameters, RouterError};

/// Stand-in emitted by [`Rule::build_url`] for a parameter with no value
pub const PLACEHOLDER_VALUE: &str = "default";

/// Everything derived from a pattern, rebuilt as a whole whenever the pattern changes
#[derive(Debug, Clone)]
struct CompiledPattern {
    segments: Vec<String>,
    classified: Vec<Segment>,
    /// `skippable[i]`: segment `i` is optional and so is every segment after it
    skippable: Vec<bool>,
    static_url: String,
    static_segment_count: usize,
    dynamic_segment_count: usize,
    wild_segment_count: usize,
    wildcard_index: Option<usize>,
}

impl CompiledPattern {
    fn compile(pattern: &str) -> Result<Self, RouterError> {
        let segments: Vec<String> = segmentize_url(pattern)
            .into_iter()
            .map(str::to_string)
            .collect();
        let classified: Vec<Segment> = segments.iter().map(|s| classify_segment(s)).collect();

        let mut static_segments = Vec::new();
        let mut dynamic_segment_count = 0;
        let mut wild_segment_count = 0;
        let mut wildcard_index = None;

        for (index, segment) in classified.iter().enumerate() {
            match segment {
                Segment::Static(text) => static_segments.push(text.as_str()),
                Segment::Dynamic(param) => {
                    dynamic_segment_count += 1;
                    if param.wildcard {
                        wild_segment_count += 1;
                        wildcard_index.get_or_insert(index);
                    }
                }
            }
        }

        if wild_segment_count > 1 {
            return Err(RouterError::MultipleWildcards {
                pattern: pattern.to_string(),
                count: wild_segment_count,
            });
        }

        let mut skippable = vec![false; classified.len()];
        let mut rest_optional = true;
        for (index, segment) in classified.iter().enumerate().rev() {
            let optional = matches!(segment, Segment::Dynamic(param) if param.optional);
            skippable[index] = optional && rest_optional;
            rest_optional &= optional;
        }

        Ok(Self {
            static_url: rebuild_url(&static_segments),
            static_segment_count: static_segments.len(),
            dynamic_segment_count,
            wild_segment_count,
            wildcard_index,
            skippable,
            segments,
            classified,
        })
    }
}

/// One registered URL pattern
///
/// The pattern is split into segments once, at construction. Matching is a pure
/// function of the rule and the URL, so a rule can be shared across threads.
///
/// # Pattern syntax
///
/// - `blog`              static text, compared case-insensitively
/// - `:slug`             required parameter
/// - `:page?`            optional parameter, unset when missing
/// - `:page?1`           optional parameter defaulting to `1`
/// - `:id|^[0-9]+$`      parameter constrained by a regex
/// - `:path*`            wildcard, absorbs the extra trailing URL segments
///
/// An optional segment can only be skipped when every segment after it is optional too.
///
/// A pattern may hold at most one wildcard; [`Rule::new`] rejects more.
///
/// # Examples
///
/// ```
/// use rule_router::Rule;
///
/// let rule = Rule::new("blog.post", "/blog/:category/:slug?").unwrap();
///
/// let params = rule.resolve_url("/Blog/news/hello-world").unwrap();
/// assert_eq!(params.get("category"), Some("news"));
/// assert_eq!(params.get("slug"), Some("hello-world"));
///
/// let params = rule.resolve_url("/blog/news").unwrap();
/// assert!(!params.is_set("slug"));
///
/// assert!(rule.resolve_url("/news").is_none());
/// ```
#[derive(Clone)]
pub struct Rule {
    name: String,
    pattern: String,
    compiled: CompiledPattern,
    condition: Option<Arc<dyn Condition>>,
    after_match: Option<Arc<dyn AfterMatch>>,
}

impl Rule {
    /// Creates a rule, splitting and classifying the pattern
    ///
    /// An empty pattern stands for the site root.
    pub fn new(name: impl Into<String>, pattern: impl Into<String>) -> Result<Self, RouterError> {
        let name = name.into();
        if name.is_empty() {
            return Err(RouterError::EmptyName);
        }

        let pattern = pattern.into();
        let compiled = CompiledPattern::compile(&pattern)?;

        Ok(Self {
            name,
            pattern,
            compiled,
            condition: None,
            after_match: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Raw pattern tokens, in order
    pub fn segments(&self) -> &[String] {
        &self.compiled.segments
    }

    /// Classified pattern tokens, in order
    pub fn classified_segments(&self) -> &[Segment] {
        &self.compiled.classified
    }

    /// The pattern with every dynamic segment removed
    ///
    /// ```
    /// use rule_router::Rule;
    ///
    /// let rule = Rule::new("edit", "/blog/:slug/edit").unwrap();
    /// assert_eq!(rule.static_url(), "/blog/edit");
    /// ```
    pub fn static_url(&self) -> &str {
        &self.compiled.static_url
    }

    pub fn static_segment_count(&self) -> usize {
        self.compiled.static_segment_count
    }

    pub fn dynamic_segment_count(&self) -> usize {
        self.compiled.dynamic_segment_count
    }

    pub fn wild_segment_count(&self) -> usize {
        self.compiled.wild_segment_count
    }

    /// Parameter names in pattern order
    pub fn parameter_names(&self) -> impl Iterator<Item = &str> {
        self.compiled.classified.iter().filter_map(|segment| match segment {
            Segment::Dynamic(param) => Some(param.name.as_str()),
            Segment::Static(_) => None,
        })
    }

    /// Renames the rule; the pattern and its segments are untouched
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), RouterError> {
        let name = name.into();
        if name.is_empty() {
            return Err(RouterError::EmptyName);
        }
        self.name = name;
        Ok(())
    }

    /// Replaces the pattern and rebuilds every derived value
    ///
    /// On error the rule keeps its previous pattern.
    ///
    /// ```
    /// use rule_router::Rule;
    ///
    /// let mut rule = Rule::new("post", "/blog/:slug").unwrap();
    /// rule.set_pattern("/articles/:year/:slug").unwrap();
    ///
    /// assert_eq!(rule.static_url(), "/articles");
    /// assert_eq!(rule.dynamic_segment_count(), 2);
    /// assert!(rule.resolve_url("/blog/hello").is_none());
    /// ```
    pub fn set_pattern(&mut self, pattern: impl Into<String>) -> Result<(), RouterError> {
        let pattern = pattern.into();
        self.compiled = CompiledPattern::compile(&pattern)?;
        self.pattern = pattern;
        Ok(())
    }

    pub fn with_condition(mut self, condition: impl Condition + 'static) -> Self {
        self.set_condition(condition);
        self
    }

    pub fn with_after_match(mut self, after_match: impl AfterMatch + 'static) -> Self {
        self.set_after_match(after_match);
        self
    }

    pub fn set_condition(&mut self, condition: impl Condition + 'static) {
        self.condition = Some(Arc::new(condition));
    }

    pub fn set_after_match(&mut self, after_match: impl AfterMatch + 'static) {
        self.after_match = Some(Arc::new(after_match));
    }

    pub fn condition(&self) -> Option<&dyn Condition> {
        self.condition.as_deref()
    }

    pub fn after_match(&self) -> Option<&dyn AfterMatch> {
        self.after_match.as_deref()
    }

    /// Whether the URL matches this rule's pattern
    pub fn matches(&self, url: &str) -> bool {
        self.resolve_url(url).is_some()
    }

    /// Matches a URL against the pattern and extracts its parameters
    ///
    /// Returns `None` when the URL does not match. On success every parameter of
    /// the pattern is present, in pattern order. Hooks are not consulted here.
    pub fn resolve_url(&self, url: &str) -> Option<Parameters> {
        let pattern = &self.compiled;
        let mut url_segments = segmentize_url(url);

        let wild_segments = self.capture_wildcard_segments(&mut url_segments);

        if url_segments.len() > pattern.segments.len() {
            tracing::trace!(
                "rule {}: {} has more segments than {}",
                self.name,
                url,
                self.pattern
            );
            return None;
        }

        let mut params = Parameters::new();

        for (index, segment) in pattern.classified.iter().enumerate() {
            let url_segment = url_segments.get(index).copied();

            let param = match segment {
                Segment::Static(text) => {
                    match url_segment {
                        Some(value) if eq_ignore_case(text, value) => continue,
                        _ => {
                            tracing::trace!(
                                "rule {}: static segment {:?} not matched",
                                self.name,
                                text
                            );
                            return None;
                        }
                    }
                }
                Segment::Dynamic(param) => param,
            };

            let Some(value) = url_segment else {
                if pattern.skippable[index] {
                    params.insert(param.name.as_str(), param.default.clone());
                    continue;
                }
                tracing::trace!("rule {}: missing required parameter {}", self.name, param.name);
                return None;
            };

            if let Some(constraint) = &param.constraint {
                if !constraint.is_satisfied_by(value) {
                    tracing::trace!(
                        "rule {}: {:?} rejected by constraint {:?}",
                        self.name,
                        value,
                        constraint.as_str()
                    );
                    return None;
                }
            }

            let mut value = value.to_string();
            if param.wildcard && !wild_segments.is_empty() {
                value.push_str(&rebuild_url(&wild_segments));
            }

            params.insert(param.name.as_str(), Some(value));
        }

        Some(params)
    }

    /// Pulls the URL segments beyond the pattern's length out from behind the wildcard
    ///
    /// Afterwards the URL has as many segments as the pattern. The wildcard keeps
    /// its own segment; the returned run is appended to its value.
    fn capture_wildcard_segments<'a>(&self, url_segments: &mut Vec<&'a str>) -> Vec<&'a str> {
        let Some(wildcard) = self.compiled.wildcard_index else {
            return Vec::new();
        };

        let excess = url_segments.len().saturating_sub(self.compiled.segments.len());
        if excess == 0 {
            return Vec::new();
        }

        url_segments
            .drain(wildcard + 1..wildcard + 1 + excess)
            .collect()
    }

    /// Builds a URL from the pattern and a set of parameter values
    ///
    /// Keys may be written with or without the leading `:`. A missing required
    /// parameter is filled with [`PLACEHOLDER_VALUE`]. Trailing optional parameters
    /// without a value are dropped from the URL.
    ///
    /// ```
    /// use rule_router::Rule;
    /// use std::collections::HashMap;
    ///
    /// let rule = Rule::new("post", "/blog/:slug/:page?1").unwrap();
    ///
    /// let mut params = HashMap::new();
    /// params.insert("slug".to_string(), "hello".to_string());
    /// assert_eq!(rule.build_url(&params), "/blog/hello");
    ///
    /// params.insert(":page".to_string(), "2".to_string());
    /// assert_eq!(rule.build_url(&params), "/blog/hello/2");
    /// ```
    pub fn build_url(&self, params: &HashMap<String, String>) -> String {
        let mut url: Vec<&str> = Vec::with_capacity(self.compiled.classified.len());
        let mut populated = None;

        for (index, segment) in self.compiled.classified.iter().enumerate() {
            match segment {
                Segment::Static(text) => url.push(text),
                Segment::Dynamic(param) => {
                    let supplied = params
                        .get(&param.name)
                        .or_else(|| params.get(&format!(":{}", param.name)))
                        .map(String::as_str)
                        .filter(|value| {
                            !value.is_empty() && Some(*value) != param.default.as_deref()
                        });

                    match supplied {
                        Some(value) => url.push(value),
                        None if param.optional => {
                            url.push(param.default.as_deref().unwrap_or(PLACEHOLDER_VALUE));
                            continue;
                        }
                        None => url.push(PLACEHOLDER_VALUE),
                    }
                }
            }
            populated = Some(index);
        }

        url.truncate(populated.map_or(0, |index| index + 1));
        rebuild_url(&url)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("pattern", &self.pattern)
            .field("segments", &self.compiled.segments)
            .field("static_url", &self.compiled.static_url)
            .field("has_condition", &self.condition.is_some())
            .field("has_after_match", &self.after_match.is_some())
            .finish()
    }
}

/// Unicode-aware case-insensitive comparison of static segments
fn eq_ignore_case(pattern: &str, value: &str) -> bool {
    pattern == value || pattern.to_lowercase() == value.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn compile(pattern: &str) -> Rule {
        Rule::new("test", pattern).unwrap()
    }

    #[test]
    fn test_counts() {
        let rule = compile("/blog/:category/:slug?/edit/:rest*");
        assert_eq!(rule.segments(), &["blog", ":category", ":slug?", "edit", ":rest*"]);
        assert_eq!(rule.static_segment_count(), 2);
        assert_eq!(rule.dynamic_segment_count(), 3);
        assert_eq!(rule.wild_segment_count(), 1);
        assert_eq!(rule.static_url(), "/blog/edit");
    }

    #[test]
    fn test_classified_segments() {
        let rule = compile("/blog/:page?1");
        let classified = rule.classified_segments();

        assert_eq!(classified.len(), 2);
        assert_eq!(classified[0], Segment::Static("blog".to_string()));
        match &classified[1] {
            Segment::Dynamic(param) => {
                assert_eq!(param.name, "page");
                assert!(param.optional);
                assert_eq!(param.default.as_deref(), Some("1"));
            }
            other => panic!("expected a dynamic segment, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_pattern_is_root() {
        let rule = compile("");
        assert!(rule.segments().is_empty());
        assert_eq!(rule.static_url(), "/");
        assert_eq!(rule.resolve_url("/"), Some(Parameters::new()));
        assert_eq!(rule.resolve_url(""), Some(Parameters::new()));
        assert!(rule.resolve_url("/a").is_none());
    }

    #[test]
    fn test_empty_name_rejected() {
        assert_eq!(Rule::new("", "/a").unwrap_err(), RouterError::EmptyName);
    }

    #[test]
    fn test_multiple_wildcards_rejected() {
        let err = Rule::new("files", "/:a*/x/:b*").unwrap_err();
        assert_eq!(
            err,
            RouterError::MultipleWildcards {
                pattern: "/:a*/x/:b*".to_string(),
                count: 2,
            }
        );
    }

    #[test]
    fn test_skippable_requires_optional_tail() {
        let rule = compile("/a/:b?/:c?/d/:e?");
        assert_eq!(rule.compiled.skippable, vec![false, false, false, false, true]);

        let rule = compile("/a/:b?/:c?");
        assert_eq!(rule.compiled.skippable, vec![false, true, true]);
    }

    #[test]
    fn test_capture_wildcard_segments() {
        let rule = compile("/docs/:path*/edit");
        let mut url = vec!["docs", "a", "b", "c", "edit"];

        let captured = rule.capture_wildcard_segments(&mut url);

        assert_eq!(captured, vec!["b", "c"]);
        assert_eq!(url, vec!["docs", "a", "edit"]);
    }

    #[test]
    fn test_capture_nothing_when_url_is_short() {
        let rule = compile("/docs/:path*");
        let mut url = vec!["docs"];

        assert!(rule.capture_wildcard_segments(&mut url).is_empty());
        assert_eq!(url, vec!["docs"]);
    }

    #[test]
    fn test_set_pattern_failure_keeps_previous_state() {
        let mut rule = compile("/blog/:slug");
        assert!(rule.set_pattern("/:a*/:b*").is_err());

        assert_eq!(rule.pattern(), "/blog/:slug");
        assert!(rule.matches("/blog/hello"));
    }

    #[test]
    fn test_set_name_keeps_pattern() {
        let mut rule = compile("/blog/:slug");
        rule.set_name("renamed").unwrap();

        assert_eq!(rule.name(), "renamed");
        assert_eq!(rule.segments(), &["blog", ":slug"]);
        assert_eq!(rule.set_name(""), Err(RouterError::EmptyName));
    }

    #[test]
    fn test_rule_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Rule>();
    }

    #[test]
    fn test_eq_ignore_case_unicode() {
        assert!(eq_ignore_case("Über", "über"));
        assert!(!eq_ignore_case("uber", "über"));
    }
}
