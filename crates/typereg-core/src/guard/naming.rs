//! Id and name rules for types and properties.

use crate::types::PropertyDefinition;

/// Check that `value` is a legal type or property id.
///
/// Ids start with a letter or `_` and continue with letters, digits, `_`,
/// `-`, `.` or `:`.
pub fn check_id(value: &str, max_length: usize) -> Result<(), String> {
    let mut chars = value.chars();
    let first = match chars.next() {
        Some(c) => c,
        None => return Err("id must not be empty".to_string()),
    };
    if value.chars().count() > max_length {
        return Err(format!("id {value:?} is longer than {max_length} characters"));
    }
    if !(first.is_alphabetic() || first == '_') {
        return Err(format!("id {value:?} must start with a letter or '_'"));
    }
    if let Some(bad) = chars.find(|c| !is_id_char(*c)) {
        return Err(format!("id {value:?} contains illegal character {bad:?}"));
    }
    Ok(())
}

fn is_id_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':')
}

/// Derive a legal id from a free-form name.
///
/// Illegal characters become `_`, and `_` is prepended when the name does not
/// start with a letter or `_`.
pub fn id_from_name(name: &str) -> String {
    let mut id: String = name
        .trim()
        .chars()
        .map(|c| if is_id_char(c) { c } else { '_' })
        .collect();
    if !id.starts_with(|c: char| c.is_alphabetic() || c == '_') {
        id.insert(0, '_');
    }
    id
}

/// The value trimmed, if it is not blank.
pub fn present(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// First non-blank value, trimmed.
pub fn first_present<'a>(values: impl IntoIterator<Item = Option<&'a str>>) -> Option<String> {
    values
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|v| !v.is_empty())
        .map(str::to_string)
}

/// Fill in missing property names from the property id.
pub fn normalize_property(mut property: PropertyDefinition) -> PropertyDefinition {
    property.id = property.id.trim().to_string();
    let id = property.id.clone();
    property.local_name = present(property.local_name.as_deref()).or_else(|| Some(id.clone()));
    property.query_name = present(property.query_name.as_deref()).or_else(|| Some(id.clone()));
    property.display_name = present(property.display_name.as_deref()).or(Some(id));
    property
}
