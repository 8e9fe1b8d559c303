//! Field label normalization.
//!
//! A label is normalized in two passes: characters from a fixed special set
//! are deleted outright, then the remainder is kebab-cased (ASCII letters and
//! digits kept, every other run collapsed into a single hyphen, edges trimmed).

/// Characters deleted before kebab-casing.
const SPECIAL_CHARACTERS: &[char] = &[
    '!', '"', '\'', '#', '%', '&', ',', ':', ';', '<', '>', '=', '@', '{', '}', '~', '$', '(',
    ')', '*', '+', '/', '\\', '?', '[', ']', '^', '|',
];

/// Remove every character in the special set.
pub fn strip_special_characters(text: &str) -> String {
    text.chars()
        .filter(|c| !SPECIAL_CHARACTERS.contains(c))
        .collect()
}

/// Convert text to lower kebab case.
pub fn to_kebab_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut prev_was_hyphen = true; // treat start as hyphen to trim leading
    for c in text.trim().chars() {
        if c.is_ascii_alphanumeric() {
            result.push(c.to_ascii_lowercase());
            prev_was_hyphen = false;
        } else if !prev_was_hyphen {
            result.push('-');
            prev_was_hyphen = true;
        }
    }

    if result.ends_with('-') {
        result.pop();
    }

    result
}

/// Normalize a user-supplied label. `None` when nothing usable remains.
pub fn normalize_label(raw: &str) -> Option<String> {
    let label = to_kebab_case(&strip_special_characters(raw));
    (!label.is_empty()).then_some(label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_basic() {
        assert_eq!(
            normalize_label("Deployment Environment!").as_deref(),
            Some("deployment-environment")
        );
    }

    #[test]
    fn test_special_characters_are_deleted_not_separated() {
        assert_eq!(normalize_label("na\\me").as_deref(), Some("name"));
        assert_eq!(normalize_label("it's(ready)").as_deref(), Some("itsready"));
    }

    #[test]
    fn test_other_punctuation_becomes_separator() {
        assert_eq!(normalize_label("v1.2_release").as_deref(), Some("v1-2-release"));
        assert_eq!(normalize_label("  Multi   Space  ").as_deref(), Some("multi-space"));
        assert_eq!(normalize_label("already-kebab").as_deref(), Some("already-kebab"));
    }

    #[test]
    fn test_edges_trimmed() {
        assert_eq!(normalize_label("-- name --").as_deref(), Some("name"));
        assert_eq!(normalize_label("trailing.").as_deref(), Some("trailing"));
    }

    #[test]
    fn test_empty_results() {
        assert_eq!(normalize_label(""), None);
        assert_eq!(normalize_label("!!!"), None);
        assert_eq!(normalize_label(" - _ . "), None);
        assert_eq!(normalize_label("$(@)"), None);
    }

    #[test]
    fn test_strip_keeps_unlisted_characters() {
        assert_eq!(strip_special_characters("a.b-c_d!"), "a.b-c_d");
    }
}
