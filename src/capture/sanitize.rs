//! File names derived from page titles

/// Characters that are not allowed in file names on common filesystems
const ILLEGAL_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Makes a page title safe to use as a file name
///
/// Illegal characters and control characters become `-`, whitespace runs
/// collapse to a single space, and the result is trimmed. Case and
/// punctuation otherwise survive.
pub fn sanitize_title(title: &str) -> String {
    let replaced: String = title
        .chars()
        .map(|c| {
            if ILLEGAL_CHARS.contains(&c) || (c.is_control() && !c.is_whitespace()) {
                '-'
            } else {
                c
            }
        })
        .collect();

    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// PDF file name for a chapter; falls back to `<unit>-<item>` when the title
/// sanitizes to nothing
pub fn pdf_file_name(title: &str, unit: &str, item: u32) -> String {
    let base = sanitize_title(title);
    if base.is_empty() {
        format!("{}-{}.pdf", unit, item)
    } else {
        format!("{}.pdf", base)
    }
}
