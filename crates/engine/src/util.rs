//! Internal helpers for input normalization.
//!
//! These utilities are **not** part of the public API.

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use crate::{EngineError, ResultEngine};

pub(crate) const MAX_NAME_LEN: usize = 64;
pub(crate) const MAX_TEXT_LEN: usize = 1_000;

/// Trim and collapse inner whitespace of a user supplied name.
pub(crate) fn normalize_display_name(value: &str, label: &str) -> ResultEngine<String> {
    let collapsed = value.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return Err(EngineError::InvalidName(format!(
            "{label} name must not be empty"
        )));
    }
    if collapsed.chars().count() > MAX_NAME_LEN {
        return Err(EngineError::InvalidName(format!(
            "{label} name must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(collapsed)
}

/// Comparison key for names: accents stripped, lowercased, punctuation
/// folded into single spaces. "Café & Bar" and "cafe bar" share a key.
pub(crate) fn normalize_name_key(display: &str) -> ResultEngine<String> {
    let mut out = String::new();
    let mut prev_space = false;
    for ch in display.nfkd() {
        if is_combining_mark(ch) {
            continue;
        }
        if ch.is_alphanumeric() {
            out.extend(ch.to_lowercase());
            prev_space = false;
        } else if !out.is_empty() && !prev_space {
            out.push(' ');
            prev_space = true;
        }
    }
    let key = out.trim();
    if key.is_empty() {
        return Err(EngineError::InvalidName(format!(
            "'{display}' has no letters or digits"
        )));
    }
    Ok(key.to_string())
}

/// Blank text becomes `None`; long text is rejected.
pub(crate) fn normalize_optional_text(value: Option<&str>) -> ResultEngine<Option<String>> {
    let Some(text) = value.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    if text.chars().count() > MAX_TEXT_LEN {
        return Err(EngineError::InvalidName(format!(
            "text must be at most {MAX_TEXT_LEN} characters"
        )));
    }
    Ok(Some(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_collapses_whitespace() {
        assert_eq!(
            normalize_display_name("  Eating   out ", "category").unwrap(),
            "Eating out"
        );
        assert!(normalize_display_name("   ", "category").is_err());
    }

    #[test]
    fn key_folds_case_accents_and_punctuation() {
        assert_eq!(normalize_name_key("Café & Bar").unwrap(), "cafe bar");
        assert_eq!(normalize_name_key("CAFE   bar").unwrap(), "cafe bar");
        assert!(normalize_name_key("---").is_err());
    }

    #[test]
    fn optional_text_drops_blank_values() {
        assert_eq!(normalize_optional_text(Some("  ")).unwrap(), None);
        assert_eq!(
            normalize_optional_text(Some(" rent ")).unwrap(),
            Some("rent".to_string())
        );
        assert!(normalize_optional_text(Some(&"x".repeat(MAX_TEXT_LEN + 1))).is_err());
    }
}
