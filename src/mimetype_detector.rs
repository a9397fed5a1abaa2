use std::path::Path;

pub const OCTET_STREAM: &str = "application/octet-stream";

/// Content type for a stored upload, based on its extension.
pub fn content_type_for(file_name: &str) -> &'static str {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(from_extension)
        .unwrap_or(OCTET_STREAM)
}

fn from_extension(ext: &str) -> Option<&'static str> {
    let ext_lower = ext.to_lowercase();
    match ext_lower.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "avif" => Some("image/avif"),
        "bmp" => Some("image/bmp"),
        "tiff" | "tif" => Some("image/tiff"),
        "heic" => Some("image/heic"),
        "heif" => Some("image/heif"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_types() {
        assert_eq!(content_type_for("2025-01-01-1.jpg"), "image/jpeg");
        assert_eq!(content_type_for("2025-01-01-1.JPEG"), "image/jpeg");
        assert_eq!(content_type_for("2025-01-01-1.png"), "image/png");
        assert_eq!(content_type_for("2025-01-01-1.heic"), "image/heic");
    }

    #[test]
    fn test_unknown_type() {
        assert_eq!(content_type_for("2025-01-01-1.bin"), OCTET_STREAM);
        assert_eq!(content_type_for("no-extension"), OCTET_STREAM);
    }
}
