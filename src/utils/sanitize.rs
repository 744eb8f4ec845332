// Display helpers for terminal output

/// Truncate text to a maximum number of characters
pub fn truncate(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

/// Render an optional image reference for a table cell
pub fn image_label(image: Option<&str>) -> &str {
    image.unwrap_or("No Image")
}
