use std::fmt::Write;
use std::path::{Component, Path};
use time::OffsetDateTime;
use crate::errors::WikiError;

/// Escape HTML special characters
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Escape HTML attribute values
pub fn escape_attr(text: &str) -> String {
    escape_html(text)
}

/// Percent-encode a page name for use in a URL path.
///
/// `:` and `-` stay readable; everything outside the unreserved set,
/// including the UTF-8 bytes of non-ASCII letters, is encoded.
pub fn encode_page_url(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for byte in name.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b':' => out.push(byte as char),
            _ => {
                let _ = write!(out, "%{:02X}", byte);
            }
        }
    }
    out
}

/// Reject request paths that could step outside the directory they are joined to
pub fn ensure_safe_path(req_path: &str) -> Result<(), WikiError> {
    for comp in Path::new(req_path).components() {
        match comp {
            Component::Normal(_) | Component::CurDir => {}
            _ => return Err(WikiError::InvalidPath),
        }
    }
    Ok(())
}

/// Determine content type for a static file based on its extension
pub fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|s| s.to_str()).map(|s| s.to_ascii_lowercase()).as_deref() {
        Some("html") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js") => "application/javascript; charset=utf-8",
        Some("json") => "application/json; charset=utf-8",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("ico") => "image/x-icon",
        Some("woff2") => "font/woff2",
        Some("txt") => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

/// Generate last modified metadata HTML
pub fn last_modified_html(path: &Path) -> String {
    let Ok(mtime) = std::fs::metadata(path).and_then(|m| m.modified()) else {
        return String::new();
    };
    let datetime = OffsetDateTime::from(mtime);
    match datetime.format(&time::format_description::well_known::Rfc3339) {
        Ok(s) => format!("<p class=\"meta\">Last modified: {}</p>", escape_html(&s)),
        Err(_) => String::new(),
    }
}
