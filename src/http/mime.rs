//! Content-Type lookup for served files

use std::path::Path;

const FALLBACK: &str = "application/octet-stream";

/// Content-Type for a file, by extension (case-insensitive)
///
/// # Examples
/// ```
/// use freshd::http::mime::content_type;
/// use std::path::Path;
/// assert_eq!(content_type(Path::new("site/INDEX.HTML")), "text/html; charset=utf-8");
/// assert_eq!(content_type(Path::new("blob")), "application/octet-stream");
/// ```
pub fn content_type(path: &Path) -> &'static str {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return FALLBACK;
    };
    match ext.to_ascii_lowercase().as_str() {
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "txt" | "md" => "text/plain; charset=utf-8",
        "js" | "mjs" => "text/javascript; charset=utf-8",
        "json" => "application/json",
        "xml" => "application/xml",
        "wasm" => "application/wasm",
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "webp" => "image/webp",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "mp4" => "video/mp4",
        "mp3" => "audio/mpeg",
        _ => FALLBACK,
    }
}
