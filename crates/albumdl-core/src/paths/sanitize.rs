//! Filename sanitizing.

/// Characters that are illegal in Windows file names.
const ILLEGAL_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

const RESERVED_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Map an arbitrary string to a name that is safe on every common filesystem.
///
/// Illegal characters become `_`, whitespace runs collapse to one space,
/// leading/trailing spaces and dots are stripped and reserved device names
/// get a `_` prefix. Never returns an empty string.
pub fn sanitize_filename(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| if ILLEGAL_CHARS.contains(&c) { '_' } else { c })
        .collect();

    let collapsed = replaced.split_whitespace().collect::<Vec<_>>().join(" ");
    let trimmed = collapsed.trim_matches(|c| c == ' ' || c == '.');

    if trimmed.is_empty() {
        return "_".to_string();
    }

    let upper = trimmed.to_ascii_uppercase();
    if RESERVED_NAMES.contains(&upper.as_str()) {
        format!("_{trimmed}")
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_illegal_characters() {
        assert_eq!(sanitize_filename("AC/DC"), "AC_DC");
        assert_eq!(sanitize_filename("What? <Live>"), "What_ _Live_");
        assert_eq!(sanitize_filename(r#"a:b"c\d|e*f"#), "a_b_c_d_e_f");
    }

    #[test]
    fn collapses_whitespace_and_trims_dots() {
        assert_eq!(sanitize_filename("  Hello \t  World  "), "Hello World");
        assert_eq!(sanitize_filename("...Album..."), "Album");
    }

    #[test]
    fn prefixes_reserved_names() {
        assert_eq!(sanitize_filename("con"), "_con");
        assert_eq!(sanitize_filename("LPT9"), "_LPT9");
        assert_eq!(sanitize_filename("CONSOLE"), "CONSOLE");
    }

    #[test]
    fn never_returns_empty() {
        assert_eq!(sanitize_filename(" . "), "_");
        assert_eq!(sanitize_filename(""), "_");
    }
}
