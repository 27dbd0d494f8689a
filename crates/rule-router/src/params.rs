use std::collections::HashMap;

/// Parameters extracted from a matched URL
///
/// Keys follow the order of the dynamic segments in the pattern. An optional
/// parameter that received no URL segment and declares no default is present
/// but unset (`None`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameters {
    entries: Vec<(String, Option<String>)>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a parameter, keeping its original position if it already exists
    pub fn insert(&mut self, name: impl Into<String>, value: Option<String>) {
        let name = name.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Builder form of [`insert`](Self::insert) for a set value
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, Some(value.into()));
        self
    }

    /// Builder form of [`insert`](Self::insert) for an unset value
    pub fn with_unset(mut self, name: impl Into<String>) -> Self {
        self.insert(name, None);
        self
    }

    /// Value of a parameter; `None` when absent or unset
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entry(name).and_then(|value| value.as_deref())
    }

    /// Raw slot of a parameter, distinguishing absent (`None`) from unset (`Some(None)`)
    pub fn entry(&self, name: &str) -> Option<&Option<String>> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entry(name).is_some()
    }

    /// Whether the parameter exists and holds a value
    pub fn is_set(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn remove(&mut self, name: &str) -> Option<Option<String>> {
        let pos = self.entries.iter().position(|(key, _)| key == name)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Set values only, suitable for `path::replace_parameters` or `Rule::build_url`
    pub fn to_map(&self) -> HashMap<String, String> {
        self.entries
            .iter()
            .filter_map(|(key, value)| value.clone().map(|v| (key.clone(), v)))
            .collect()
    }
}

impl<K, V> FromIterator<(K, V)> for Parameters
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Parameters::new(), |params, (key, value)| params.with(key, value))
    }
}

impl IntoIterator for Parameters {
    type Item = (String, Option<String>);
    type IntoIter = std::vec::IntoIter<(String, Option<String>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
