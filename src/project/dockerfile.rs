//! Minimal Dockerfile inspection

/// Count the build stages of a Dockerfile.
///
/// Every `FROM` instruction starts a new stage. Comment lines, blank lines and
/// continuation lines are skipped; the instruction keyword is case-insensitive.
pub fn count_stages(dockerfile: &str) -> usize {
    let mut stages = 0;
    let mut continued = false;

    for line in dockerfile.lines() {
        let trimmed = line.trim();
        // comments are dropped before continuation lines are joined
        if trimmed.starts_with('#') {
            continue;
        }

        let was_continued = continued;
        continued = trimmed.ends_with('\\');

        if was_continued || trimmed.is_empty() {
            continue;
        }

        let keyword = trimmed.split_whitespace().next().unwrap_or_default();
        if keyword.eq_ignore_ascii_case("FROM") {
            stages += 1;
        }
    }

    stages
}
