/// Turns an article title into a filesystem- and Dropbox-safe `.pdf` name.
/// Characters that break common filesystems are dropped, whitespace runs
/// collapse to single spaces, the stem is capped at 100 characters, and an
/// unusable title falls back to `article`.
pub fn pdf_filename(title: &str) -> String {
    // Whitespace-class controls such as tabs survive the strip so the
    // collapse below turns them into word separators.
    let cleaned: String = title
        .chars()
        .filter(|c| {
            !matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*')
                && (c.is_whitespace() || !c.is_control())
        })
        .collect();
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    let capped: String = collapsed.chars().take(100).collect();
    let stem = capped.trim_matches(|c: char| c == '.' || c == ' ');
    if stem.is_empty() {
        "article.pdf".to_string()
    } else {
        format!("{}.pdf", stem)
    }
}

/// Joins the configured remote folder and a filename into an absolute
/// remote path, collapsing duplicate slashes.
pub fn remote_path(folder: &str, filename: &str) -> String {
    let mut path = format!("{}/{}", folder, filename);
    while path.contains("//") {
        path = path.replace("//", "/");
    }
    if !path.starts_with('/') {
        path.insert(0, '/');
    }
    path
}
