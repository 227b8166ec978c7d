//! Category defaults and validation.

use crate::error::CoreError;

pub const DEFAULT_ICON: &str = "📚";
pub const DEFAULT_COLOR: &str = "#3b82f6";
pub const MAX_NAME_LEN: usize = 100;

/// Validate an English or Arabic category name.
pub fn validate_name(name: &str, field: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} مطلوب")));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "يجب ألا يتجاوز {field} {MAX_NAME_LEN} حرفاً"
        )));
    }
    Ok(())
}

/// Validate a `#rrggbb` hex colour.
pub fn validate_color(color: &str) -> Result<(), CoreError> {
    let valid = color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit());
    if !valid {
        return Err(CoreError::Validation(
            "يجب أن يكون اللون بصيغة #rrggbb".into(),
        ));
    }
    Ok(())
}
