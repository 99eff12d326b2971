//! In-archive path normalization.
//!
//! Archive paths use `\` as separator, carry no leading or trailing
//! separators or whitespace, and are lower-cased.

/// Separator used inside archives.
pub const SEPARATOR: char = '\\';

/// Convert `path` to its standard in-archive form.
pub fn to_standard_form(path: &str) -> String {
    path.replace('/', "\\")
        .trim()
        .trim_matches(SEPARATOR)
        .to_lowercase()
}

/// Join path components and normalize the result. Empty components are dropped.
pub fn combine<I, S>(components: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let parts: Vec<String> = components
        .into_iter()
        .map(|component| to_standard_form(component.as_ref()))
        .filter(|component| !component.is_empty())
        .collect();
    to_standard_form(&parts.join("\\"))
}

/// Split a path into its standard-form directory and its file name.
///
/// The file name keeps its case; only the directory is normalized.
pub fn split(path: &str) -> (String, &str) {
    let trimmed = path.trim();
    match trimmed.rfind(['/', '\\']) {
        Some(index) => (to_standard_form(&trimmed[..index]), &trimmed[index + 1..]),
        None => (String::new(), trimmed),
    }
}
