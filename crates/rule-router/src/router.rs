use std::cmp::Reverse;
use std::collections::HashMap;

use crate::hooks::{AfterMatch, Condition};
use crate::{Parameters, Rule, RouterError};

/// Result of matching a URL against a rule set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatch {
    /// Name of the matched rule
    pub name: String,
    /// Parameters after the rule's after-match hook ran
    pub parameters: Parameters,
}

/// An ordered table of uniquely named rules
///
/// Rules are tried in table order and the first one that resolves (and whose
/// condition accepts the match) wins. Registration order is the priority unless
/// [`sort_by_specificity`](Self::sort_by_specificity) is called.
///
/// # Examples
///
/// ```
/// use rule_router::{Rule, RuleSet};
///
/// let rules = RuleSet::new()
///     .with_rule(Rule::new("post", "/blog/:slug").unwrap())
///     .unwrap()
///     .with_rule(Rule::new("archive", "/blog/archive").unwrap())
///     .unwrap()
///     .with_sorted_rules();
///
/// assert_eq!(rules.match_url("/blog/archive").unwrap().name, "archive");
/// assert_eq!(rules.match_url("/blog/hello").unwrap().name, "post");
/// ```
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Functional Builder Methods
    // ========================================================================

    /// Adds a rule (functional builder)
    pub fn with_rule(mut self, rule: Rule) -> Result<Self, RouterError> {
        self.add(rule)?;
        Ok(self)
    }

    /// Sorts the rules most-specific-first (functional builder)
    pub fn with_sorted_rules(mut self) -> Self {
        self.sort_by_specificity();
        self
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Appends a rule; names must be unique
    pub fn add(&mut self, rule: Rule) -> Result<(), RouterError> {
        if self.get(rule.name()).is_some() {
            return Err(RouterError::DuplicateRule(rule.name().to_string()));
        }

        tracing::debug!(
            "router: registered rule, name={}, pattern={}, static_url={}",
            rule.name(),
            rule.pattern(),
            rule.static_url()
        );
        self.rules.push(rule);
        Ok(())
    }

    /// Builds a rule from a name and pattern and appends it
    pub fn route(
        &mut self,
        name: impl Into<String>,
        pattern: impl Into<String>,
    ) -> Result<&mut Rule, RouterError> {
        self.add(Rule::new(name, pattern)?)?;
        let last = self.rules.len() - 1;
        Ok(&mut self.rules[last])
    }

    pub fn remove(&mut self, name: &str) -> Option<Rule> {
        let pos = self.position(name)?;
        Some(self.rules.remove(pos))
    }

    /// Renames a held rule, keeping names unique
    pub fn rename(&mut self, name: &str, new_name: impl Into<String>) -> Result<(), RouterError> {
        let new_name = new_name.into();
        if new_name != name && self.get(&new_name).is_some() {
            return Err(RouterError::DuplicateRule(new_name));
        }
        self.rule_mut(name)?.set_name(new_name)
    }

    /// Replaces the pattern of a held rule
    pub fn set_pattern(
        &mut self,
        name: &str,
        pattern: impl Into<String>,
    ) -> Result<(), RouterError> {
        self.rule_mut(name)?.set_pattern(pattern)
    }

    pub fn set_condition(
        &mut self,
        name: &str,
        condition: impl Condition + 'static,
    ) -> Result<(), RouterError> {
        self.rule_mut(name)?.set_condition(condition);
        Ok(())
    }

    pub fn set_after_match(
        &mut self,
        name: &str,
        after_match: impl AfterMatch + 'static,
    ) -> Result<(), RouterError> {
        self.rule_mut(name)?.set_after_match(after_match);
        Ok(())
    }

    /// Orders rules by descending static segment count
    ///
    /// The sort is stable: rules with equal counts keep their registration order.
    pub fn sort_by_specificity(&mut self) {
        self.rules
            .sort_by_key(|rule| Reverse(rule.static_segment_count()));
    }

    // ========================================================================
    // Lookup and Matching
    // ========================================================================

    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.name() == name)
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Finds the first rule matching the URL
    ///
    /// A rule's condition, when present, can reject a structural match so the
    /// search continues with the next rule. The after-match hook then rewrites
    /// the parameters of the winning rule.
    pub fn match_url(&self, url: &str) -> Option<RuleMatch> {
        let found = self.rules.iter().find_map(|rule| {
            let params = rule.resolve_url(url)?;

            if let Some(condition) = rule.condition() {
                if !condition.check(&params, url) {
                    tracing::debug!("router: rule {} rejected {} by condition", rule.name(), url);
                    return None;
                }
            }

            let parameters = match rule.after_match() {
                Some(hook) => hook.apply(params, url),
                None => params,
            };

            Some(RuleMatch {
                name: rule.name().to_string(),
                parameters,
            })
        });

        match &found {
            Some(matched) => tracing::debug!("router: {} matched rule {}", url, matched.name),
            None => tracing::debug!("router: no rule matched {}", url),
        }

        found
    }

    /// Builds a URL for a named rule
    ///
    /// ```
    /// use rule_router::RuleSet;
    ///
    /// let mut rules = RuleSet::new();
    /// rules.route("post", "/blog/:year/:slug").unwrap();
    ///
    /// let url = rules.url_for_params("post", &[("year", "2024"), ("slug", "hello")]);
    /// assert_eq!(url.as_deref(), Some("/blog/2024/hello"));
    /// assert_eq!(rules.url_for_params("missing", &[]), None);
    /// ```
    pub fn url(&self, name: &str, params: &HashMap<String, String>) -> Option<String> {
        self.get(name).map(|rule| rule.build_url(params))
    }

    /// Convenience form of [`url`](Self::url) taking parameter tuples
    pub fn url_for_params(&self, name: &str, params: &[(&str, &str)]) -> Option<String> {
        let param_map: HashMap<String, String> = params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        self.url(name, &param_map)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.rules.iter().position(|rule| rule.name() == name)
    }

    fn rule_mut(&mut self, name: &str) -> Result<&mut Rule, RouterError> {
        let pos = self
            .position(name)
            .ok_or_else(|| RouterError::UnknownRule(name.to_string()))?;
        Ok(&mut self.rules[pos])
    }
}
