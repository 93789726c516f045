//! File name helpers shared by readers, writers and the registry.

/// Lowercase extension of a file name: the text after the last `.`.
///
/// Returns an empty string when the name has no `.`.
pub fn extension_of(file_name: &str) -> String {
    match file_name.rfind('.') {
        Some(pos) => file_name[pos + 1..].to_ascii_lowercase(),
        None => String::new(),
    }
}

/// Remove a trailing `.<extension>` (case-insensitive) when the name is
/// longer than the suffix itself.
pub fn strip_extension<'a>(file_name: &'a str, extension: &str) -> &'a str {
    let suffix_len = extension.len() + 1;
    if file_name.len() <= suffix_len {
        return file_name;
    }
    let split = file_name.len() - suffix_len;
    match (file_name.get(..split), file_name.get(split..)) {
        (Some(stem), Some(suffix))
            if suffix.starts_with('.') && suffix[1..].eq_ignore_ascii_case(extension) =>
        {
            stem
        }
        _ => file_name,
    }
}

/// File name without whatever extension it carries.
pub fn file_stem(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(pos) if pos > 0 => &file_name[..pos],
        _ => file_name,
    }
}

/// Suggested output file name for a checklist file.
pub fn output_file_name(name: &str, extension: &str) -> String {
    format!("{name}.{extension}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("checklist.ACE", "ace")]
    #[case("my.file.txt", "txt")]
    #[case("noextension", "")]
    #[case("trailing.", "")]
    fn test_extension_of(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(extension_of(name), expected);
    }

    #[rstest]
    #[case("N12345.ace", "ace", "N12345")]
    #[case("N12345.ACE", "ace", "N12345")]
    #[case(".ace", "ace", ".ace")]
    #[case("x.ace", "ace", "x")]
    #[case("N12345.txt", "ace", "N12345.txt")]
    fn test_strip_extension(#[case] name: &str, #[case] ext: &str, #[case] expected: &str) {
        assert_eq!(strip_extension(name, ext), expected);
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("checklist.txt"), "checklist");
        assert_eq!(file_stem(".hidden"), ".hidden");
        assert_eq!(file_stem("plain"), "plain");
    }
}
