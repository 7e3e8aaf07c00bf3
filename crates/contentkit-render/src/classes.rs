//! Class-list composition.

/// Join class fragments into one `class` value.
///
/// Fragments may hold several space-separated classes. Empty fragments are
/// skipped and a class repeated later in the list keeps its first position.
pub fn class_names<'a>(parts: impl IntoIterator<Item = &'a str>) -> String {
    let mut seen: Vec<&str> = Vec::new();
    for class in parts.into_iter().flat_map(str::split_whitespace) {
        if !seen.contains(&class) {
            seen.push(class);
        }
    }
    seen.join(" ")
}
