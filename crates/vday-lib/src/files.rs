//! Static file plumbing: content-type lookup and safe path resolution.

use std::path::{Component, Path, PathBuf};

/// Extension → content-type table for the static site.
const MIME_TYPES: [(&str, &str); 9] = [
    ("html", "text/html"),
    ("css", "text/css"),
    ("js", "application/javascript"),
    ("json", "application/json"),
    ("ico", "image/x-icon"),
    ("mp3", "audio/mpeg"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
];

pub const DEFAULT_MIME: &str = "application/octet-stream";

/// Content-type for a file path, from the fixed extension table.
pub fn mime_for(path: &Path) -> &'static str {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return DEFAULT_MIME;
    };
    MIME_TYPES
        .iter()
        .find(|(e, _)| ext.eq_ignore_ascii_case(e))
        .map(|(_, mime)| *mime)
        .unwrap_or(DEFAULT_MIME)
}

/// Lexical resolution of a request path under the served root. Parent,
/// root, and prefix components are refused rather than normalized; the
/// empty path means `index.html`.
pub fn resolve_static(root: &Path, request_path: &str) -> Option<PathBuf> {
    let trimmed = request_path.trim_start_matches('/');
    let rel = if trimmed.is_empty() { "index.html" } else { trimmed };
    let rel = Path::new(rel);
    for component in rel.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(root.join(rel))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_extensions_map_case_insensitively() {
        assert_eq!(mime_for(Path::new("index.html")), "text/html");
        assert_eq!(mime_for(Path::new("app.js")), "application/javascript");
        assert_eq!(mime_for(Path::new("2020_VDAY.MP3")), "audio/mpeg");
        assert_eq!(mime_for(Path::new("photo.JPEG")), "image/jpeg");
    }

    #[test]
    fn unknown_extensions_fall_back_to_octet_stream() {
        assert_eq!(mime_for(Path::new("archive.tar")), DEFAULT_MIME);
        assert_eq!(mime_for(Path::new("no_extension")), DEFAULT_MIME);
    }

    #[test]
    fn empty_path_means_index() {
        let root = Path::new("/srv/site");
        assert_eq!(resolve_static(root, ""), Some(root.join("index.html")));
        assert_eq!(resolve_static(root, "/"), Some(root.join("index.html")));
    }

    #[test]
    fn nested_paths_resolve_under_the_root() {
        let root = Path::new("/srv/site");
        assert_eq!(
            resolve_static(root, "audio/2020_vday.mp3"),
            Some(root.join("audio/2020_vday.mp3"))
        );
        assert_eq!(resolve_static(root, "/app.js"), Some(root.join("app.js")));
    }

    #[test]
    fn traversal_components_are_refused() {
        let root = Path::new("/srv/site");
        assert_eq!(resolve_static(root, "../etc/passwd"), None);
        assert_eq!(resolve_static(root, "audio/../../secret"), None);
        assert_eq!(resolve_static(root, "a/../b"), None);
    }
}
