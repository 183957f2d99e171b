// Dashboard templating variables
use super::error::{DashboardError, Result};
use super::schema::{SelectionValue, VariableDocument};
use serde_json::{Map, Value};

/// Grafana's "select all" sentinel, both as a selection and as an option
pub const ALL_SENTINEL: &str = "$__all";
/// Value substituted for a "select all" selection
pub const WILDCARD: &str = ".*";

const LIST_KEY: &str = "list";

#[derive(Debug, Clone, PartialEq)]
pub struct VariableOption {
    pub value: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TemplatingVariable {
    pub name: String,
    pub label: String,
    pub value: String,
    pub options: Vec<VariableOption>,
}

impl TemplatingVariable {
    pub fn is_wildcard(&self) -> bool {
        self.value == WILDCARD
    }
}

/// Extract the variable list from a dashboard's `templating` object.
///
/// The object must be empty or hold exactly the `list` key.
pub fn extract_variables(templating: &Map<String, Value>) -> Result<Vec<TemplatingVariable>> {
    if templating.is_empty() {
        return Ok(Vec::new());
    }

    if templating.len() != 1 || !templating.contains_key(LIST_KEY) {
        let keys: Vec<&str> = templating.keys().map(String::as_str).collect();
        return Err(DashboardError::UnsupportedTemplatingSchema(format!(
            "don't know how to parse variable keys {:?}",
            keys
        )));
    }

    let raw: Vec<VariableDocument> = serde_json::from_value(templating[LIST_KEY].clone())
        .map_err(|e| DashboardError::UnsupportedTemplatingSchema(e.to_string()))?;

    raw.into_iter().map(to_variable).collect()
}

fn to_variable(raw: VariableDocument) -> Result<TemplatingVariable> {
    let value = match raw.current.value {
        SelectionValue::Single(value) => value,
        SelectionValue::Multi(mut values) if values.len() == 1 => values.remove(0),
        SelectionValue::Multi(values) => {
            return Err(DashboardError::UnsupportedTemplatingSchema(format!(
                "variable `{}` has {} selected values, only single or all selections are supported",
                raw.name,
                values.len()
            )));
        }
    };

    let value = if value == ALL_SENTINEL {
        WILDCARD.to_string()
    } else {
        value
    };

    let options = raw
        .options
        .into_iter()
        .filter(|option| option.value != ALL_SENTINEL)
        .map(|option| VariableOption {
            value: option.value,
            text: option.text,
        })
        .collect();

    Ok(TemplatingVariable {
        name: raw.name,
        label: raw.label.unwrap_or_default(),
        value,
        options,
    })
}

/// Replace `$<name>` tokens in a query expression.
///
/// Plain substring replacement in list order: no word boundaries, so a
/// variable whose name prefixes another token will also replace inside it.
pub fn substitute(expression: &str, variables: &[TemplatingVariable]) -> String {
    let mut result = expression.to_string();
    for variable in variables {
        let placeholder = format!("${}", variable.name);
        result = result.replace(&placeholder, &variable.value);
    }
    result
}
