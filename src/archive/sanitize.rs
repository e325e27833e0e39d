// Entry name validation for untrusted archives

use crate::error::{Error, Result};

/// Longest accepted file name
pub const MAX_NAME_LENGTH: usize = 255;

/// Device names Windows refuses as file names, regardless of extension
const RESERVED_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Reduce a raw entry name to a safe file name.
///
/// Only the final path segment is kept. Names containing `..` or separators,
/// reserved device names and names longer than [`MAX_NAME_LENGTH`] are rejected;
/// remaining characters outside `[A-Za-z0-9._-]` become `_`.
pub fn sanitize_file_name(raw: &str) -> Result<String> {
    let name = raw
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or(raw);

    if name.is_empty() {
        return Err(Error::unsafe_name(raw, "empty file name"));
    }

    if name.contains("..") || name.contains('/') || name.contains('\\') {
        return Err(Error::unsafe_name(raw, "contains a path traversal sequence"));
    }

    if is_reserved(name) {
        return Err(Error::unsafe_name(raw, "reserved device name"));
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(Error::unsafe_name(
            raw,
            format!("longer than {} characters", MAX_NAME_LENGTH),
        ));
    }

    let sanitized: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized != name {
        tracing::info!("Sanitized entry name {:?} -> {:?}", name, sanitized);
    }

    Ok(sanitized)
}

/// Whether the part before the first dot is a reserved device name
fn is_reserved(name: &str) -> bool {
    let base = name.split('.').next().unwrap_or(name).to_ascii_uppercase();
    RESERVED_NAMES.contains(&base.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_name_unchanged() {
        assert_eq!(sanitize_file_name("Service.java").unwrap(), "Service.java");
        assert_eq!(sanitize_file_name("my-file_1.txt").unwrap(), "my-file_1.txt");
    }

    #[test]
    fn test_keeps_final_segment() {
        assert_eq!(sanitize_file_name("src/main/App.java").unwrap(), "App.java");
        assert_eq!(sanitize_file_name("src\\main\\App.java").unwrap(), "App.java");
    }

    #[test]
    fn test_replaces_unsafe_characters() {
        assert_eq!(sanitize_file_name("my file (1).java").unwrap(), "my_file__1_.java");
        assert_eq!(sanitize_file_name("café.java").unwrap(), "caf_.java");
    }

    #[test]
    fn test_rejects_dot_dot() {
        assert!(matches!(
            sanitize_file_name("evil..txt"),
            Err(Error::UnsafeName { .. })
        ));
        assert!(sanitize_file_name("..").is_err());
    }

    #[test]
    fn test_rejects_reserved_names() {
        assert!(sanitize_file_name("CON").is_err());
        assert!(sanitize_file_name("con.txt").is_err());
        assert!(sanitize_file_name("Lpt9.java").is_err());
        assert!(sanitize_file_name("dir/aux").is_err());
        assert!(sanitize_file_name("CONSOLE.java").is_ok());
        assert!(sanitize_file_name("COM10").is_ok());
    }

    #[test]
    fn test_rejects_long_names() {
        let long = format!("{}.java", "a".repeat(251));
        assert_eq!(long.len(), 256);
        assert!(sanitize_file_name(&long).is_err());

        let max = format!("{}.java", "a".repeat(250));
        assert!(sanitize_file_name(&max).is_ok());
    }

    #[test]
    fn test_rejects_empty_segment() {
        assert!(sanitize_file_name("").is_err());
        assert!(sanitize_file_name("dir/").is_err());
    }
}
