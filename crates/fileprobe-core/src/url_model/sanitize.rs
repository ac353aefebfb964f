//! Filesystem-safe path segment sanitization.

/// Placeholder written in place of a run of illegal characters.
pub const PLACEHOLDER: char = '_';

/// Sanitizes one path segment for use as a file or directory name.
///
/// - Replaces each run of `\ / : * ? " < > |`, NUL and control characters with `_`
/// - Maps the reserved names `.` and `..` (and the empty string) to `_`
/// - Limits length to 255 bytes (NAME_MAX on common filesystems)
///
/// Leading dots are kept: `.env` stays `.env`.
pub fn sanitize_segment(segment: &str) -> String {
    const NAME_MAX: usize = 255;

    let mut out = String::with_capacity(segment.len());
    let mut in_run = false;

    for c in segment.chars() {
        if is_illegal(c) {
            if !in_run {
                out.push(PLACEHOLDER);
            }
            in_run = true;
        } else {
            out.push(c);
            in_run = false;
        }
    }

    if out.is_empty() || out == "." || out == ".." {
        return PLACEHOLDER.to_string();
    }

    if out.len() > NAME_MAX {
        let mut take = NAME_MAX;
        while take > 0 && !out.is_char_boundary(take) {
            take -= 1;
        }
        out.truncate(take);
    }
    out
}

fn is_illegal(c: char) -> bool {
    matches!(c, '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|') || c.is_control()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_dotfiles() {
        assert_eq!(sanitize_segment(".env"), ".env");
        assert_eq!(sanitize_segment("config.php~"), "config.php~");
    }

    #[test]
    fn replaces_runs_of_illegal_chars() {
        assert_eq!(sanitize_segment("a:b"), "a_b");
        assert_eq!(sanitize_segment("a<>|b"), "a_b");
        assert_eq!(sanitize_segment("x/y\\z"), "x_y_z");
        assert_eq!(sanitize_segment("file\x00name.txt"), "file_name.txt");
    }

    #[test]
    fn existing_underscores_are_untouched() {
        assert_eq!(sanitize_segment("db__dump.sql"), "db__dump.sql");
    }

    #[test]
    fn reserved_names() {
        assert_eq!(sanitize_segment(""), "_");
        assert_eq!(sanitize_segment("."), "_");
        assert_eq!(sanitize_segment(".."), "_");
    }

    #[test]
    fn truncates_on_char_boundary() {
        let long = "é".repeat(200);
        let out = sanitize_segment(&long);
        assert!(out.len() <= 255);
        assert!(out.chars().all(|c| c == 'é'));
    }
}
