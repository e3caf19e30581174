/// Resolves a MIME type from a bare extension (`"png"`, `".png"`).
pub fn content_type_for_extension(extension: &str) -> Option<String> {
    let extension = extension.trim_start_matches('.');
    if extension.is_empty() {
        return None;
    }

    mime_guess::from_ext(extension)
        .first()
        .map(|mime| mime.essence_str().to_string())
}
