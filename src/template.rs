use lazy_regex::regex_replace_all;
use std::collections::BTreeMap;

/// Placeholder values for one render. A `None` value deletes the whole
/// `<placeholder>` token instead of leaving empty brackets behind.
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    values: BTreeMap<String, Option<String>>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: Option<impl Into<String>>) {
        self.values.insert(key.into(), value.map(Into::into));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(|v| v.as_deref())
    }

    fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }
}

/// Render a naming template into a single path segment.
///
/// Substitutes `<placeholder>` tokens, removes bracket groups emptied by
/// null bindings, strips characters invalid in cross-platform path
/// segments, normalizes whitespace, and finally swaps remaining spaces for
/// the configured separator. Stateless: the output depends only on the
/// three inputs.
pub fn render(template: &str, bindings: &Bindings, separator: Option<&str>) -> String {
    let mut out = template.to_string();

    for (key, value) in bindings.iter() {
        let token = format!("<{key}>");
        out = out.replace(&token, value.unwrap_or(""));
    }

    // Bracket pairs left holding nothing but whitespace after a null
    // binding deleted their content.
    let out = regex_replace_all!(r"\(\s*\)|\[\s*\]|\{\s*\}", &out, "");

    // Characters invalid in a path segment on at least one platform.
    let out = regex_replace_all!(r#"[\x00-\x1f:*?"<>|]"#, &out, "");

    let out = regex_replace_all!(r" {2,}", &out, " ");
    let out = out.replace(" .", ".");
    let out = out.trim();

    match separator {
        Some(sep) if !sep.is_empty() => out.replace(' ', sep),
        _ => out.to_string(),
    }
}
