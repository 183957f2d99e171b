// Legend labels for query result series
use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([^{}\s]+)\s*\}\}").expect("valid legend placeholder pattern")
});

/// Build the legend label for one series.
///
/// Without a template the label set is dumped as `{'k': 'v', ...}`.
pub fn legend_label(template: Option<&str>, labels: &BTreeMap<String, String>) -> String {
    match template {
        Some(template) => render_template(template, labels),
        None => format_label_set(labels),
    }
}

/// Replace `{{key}}` placeholders with label values; unknown keys render empty.
pub fn render_template(template: &str, labels: &BTreeMap<String, String>) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            labels.get(&caps[1]).cloned().unwrap_or_default()
        })
        .into_owned()
}

pub fn format_label_set(labels: &BTreeMap<String, String>) -> String {
    let pairs: Vec<String> = labels
        .iter()
        .map(|(key, value)| format!("'{}': '{}'", key, value))
        .collect();
    format!("{{{}}}", pairs.join(", "))
}
