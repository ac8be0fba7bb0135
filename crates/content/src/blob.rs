use base64::Engine as _;

use crate::store::ContentError;

pub fn ensure_image(mime: &str) -> Result<(), ContentError> {
    let essence = mime.split(';').next().unwrap_or("").trim();
    match essence.split_once('/') {
        Some(("image", subtype)) if !subtype.is_empty() => Ok(()),
        _ => Err(ContentError::InvalidUpload(mime.to_string())),
    }
}

pub fn extension_for_mime(mime: &str) -> &str {
    let essence = mime.split(';').next().unwrap_or("").trim();
    match essence.split_once('/').map(|(_, sub)| sub) {
        Some("jpeg") | Some("pjpeg") => "jpg",
        Some("svg+xml") => "svg",
        Some("x-icon") | Some("vnd.microsoft.icon") => "ico",
        Some(sub) if !sub.is_empty() => sub,
        _ => "bin",
    }
}

/// Content-addressed storage path: `{prefix}/{hash16}.{ext}`.
pub fn object_path(prefix: &str, bytes: &[u8], mime: &str) -> String {
    let hex = blake3::hash(bytes).to_hex();
    let prefix = prefix.trim_matches('/');
    let name = format!("{}.{}", &hex[..16], extension_for_mime(mime));
    if prefix.is_empty() {
        name
    } else {
        format!("{prefix}/{name}")
    }
}

pub fn is_data_url(s: &str) -> bool {
    s.starts_with("data:")
}

/// Split `data:<mime>;base64,<payload>` into its mime type and decoded bytes.
pub fn decode_data_url(url: &str) -> Result<(String, Vec<u8>), ContentError> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| ContentError::InvalidUpload("not a data url".to_string()))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| ContentError::InvalidUpload("data url without payload".to_string()))?;
    let mime = meta
        .strip_suffix(";base64")
        .ok_or_else(|| ContentError::InvalidUpload("data url is not base64".to_string()))?;
    ensure_image(mime)?;
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| ContentError::InvalidUpload(format!("bad base64 payload: {e}")))?;
    Ok((mime.to_string(), bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_images_pass() {
        assert!(ensure_image("image/png").is_ok());
        assert!(ensure_image("image/svg+xml; charset=utf-8").is_ok());
        assert!(matches!(
            ensure_image("application/pdf"),
            Err(ContentError::InvalidUpload(m)) if m == "application/pdf"
        ));
        assert!(ensure_image("image/").is_err());
        assert!(ensure_image("").is_err());
    }

    #[test]
    fn extensions_follow_subtype() {
        assert_eq!(extension_for_mime("image/jpeg"), "jpg");
        assert_eq!(extension_for_mime("image/svg+xml"), "svg");
        assert_eq!(extension_for_mime("image/webp"), "webp");
        assert_eq!(extension_for_mime("nonsense"), "bin");
    }

    #[test]
    fn object_path_is_content_addressed() {
        let a = object_path("projects/", b"pixels", "image/jpeg");
        let b = object_path("/projects", b"pixels", "image/jpeg");
        let c = object_path("projects", b"other", "image/jpeg");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.starts_with("projects/"));
        assert!(a.ends_with(".jpg"));
        assert_eq!(a.len(), "projects/".len() + 16 + ".jpg".len());
        assert!(!object_path("", b"x", "image/png").contains('/'));
    }

    #[test]
    fn data_urls_decode_to_bytes() {
        let (mime, bytes) = decode_data_url("data:image/png;base64,aGVsbG8=").unwrap();
        assert_eq!(mime, "image/png");
        assert_eq!(bytes, b"hello");
        assert!(is_data_url("data:image/png;base64,aGVsbG8="));
        assert!(!is_data_url("https://cdn/x.png"));
    }

    #[test]
    fn malformed_data_urls_are_rejected() {
        for bad in [
            "https://cdn/x.png",
            "data:image/png;base64",
            "data:image/png,raw",
            "data:text/plain;base64,aGVsbG8=",
            "data:image/png;base64,@@@",
        ] {
            assert!(
                matches!(decode_data_url(bad), Err(ContentError::InvalidUpload(_))),
                "{bad}"
            );
        }
    }
}
