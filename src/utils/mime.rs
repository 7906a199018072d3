//! MIME type detection for downloaded assets

/// Guess MIME by inspecting bytes (magic numbers).
pub fn guess_mime_from_bytes(bytes: &[u8]) -> Option<String> {
    infer::get(bytes).map(|k| k.mime_type().to_string())
}

/// Guess MIME by file path or URL (extension-based). Query strings are
/// stripped before matching.
pub fn guess_mime_from_path_or_url(path_or_url: &str) -> Option<String> {
    let without_query = path_or_url.split('?').next()?;
    let extension = without_query.rsplit('.').next()?;
    mime_guess::from_ext(extension).first().map(|m| m.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guesses_png_from_magic_bytes() {
        let png_header = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];
        assert_eq!(
            guess_mime_from_bytes(&png_header),
            Some("image/png".to_string())
        );
    }

    #[test]
    fn guesses_mp4_from_url_with_query() {
        assert_eq!(
            guess_mime_from_path_or_url("https://cdn.example.com/clip.mp4?sig=abc"),
            Some("video/mp4".to_string())
        );
    }
}
