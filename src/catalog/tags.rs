//! Tag-set editor independent of any rendering target.

use std::fmt;

type Listener = Box<dyn FnMut(&[String]) + Send>;

/// Normalize a free-form tag: trimmed, first letter upper case, the rest lower case.
pub fn normalize_tag(raw: &str) -> String {
    let mut chars = raw.trim().chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let mut tag: String = first.to_uppercase().collect();
    tag.push_str(&chars.as_str().to_lowercase());
    tag
}

/// Normalize every tag, dropping blanks and duplicates while keeping first-seen order.
pub fn normalize_tags<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut tags = Vec::new();
    for value in values {
        let tag = normalize_tag(value.as_ref());
        if !tag.is_empty() && !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags
}

/// Ordered set of normalized tags with change notification and known-tag suggestions.
#[derive(Default)]
pub struct TagSet {
    values: Vec<String>,
    known: Vec<String>,
    listeners: Vec<Listener>,
}

impl fmt::Debug for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagSet")
            .field("values", &self.values)
            .field("known", &self.known)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl TagSet {
    /// Empty selection; `known` feeds [`TagSet::suggestions`].
    pub fn new(known: Vec<String>) -> Self {
        Self {
            known,
            ..Self::default()
        }
    }

    /// Selected tags in insertion order.
    pub fn get_values(&self) -> &[String] {
        &self.values
    }

    /// Replace the whole set; values are normalized and duplicates dropped.
    pub fn set_values<I, S>(&mut self, values: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.values = normalize_tags(values);
        self.notify();
    }

    /// Add one tag. Returns `false` when it was blank or already present.
    pub fn add(&mut self, value: &str) -> bool {
        let tag = normalize_tag(value);
        if tag.is_empty() || self.values.contains(&tag) {
            return false;
        }
        self.values.push(tag);
        self.notify();
        true
    }

    /// Remove one tag, compared after normalization. Returns `false` when absent.
    pub fn remove(&mut self, value: &str) -> bool {
        let tag = normalize_tag(value);
        let before = self.values.len();
        self.values.retain(|existing| *existing != tag);
        let removed = self.values.len() != before;
        if removed {
            self.notify();
        }
        removed
    }

    /// Register a listener called with the new values after every change.
    pub fn on_change(&mut self, listener: impl FnMut(&[String]) + Send + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Known tags starting with `prefix` (case-insensitive) that are not selected yet.
    pub fn suggestions(&self, prefix: &str) -> Vec<&str> {
        let prefix = prefix.trim().to_lowercase();
        self.known
            .iter()
            .filter(|tag| tag.to_lowercase().starts_with(&prefix))
            .filter(|tag| !self.values.contains(&normalize_tag(tag)))
            .map(String::as_str)
            .collect()
    }

    fn notify(&mut self) {
        for listener in &mut self.listeners {
            listener(&self.values);
        }
    }
}
