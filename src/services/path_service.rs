use std::path::{Component, Path, PathBuf};
use crate::errors::WikiError;
use crate::services::name_service::{PageName, NAMESPACE_SEPARATOR};

/// Extension given to every leaf page file
pub const PAGE_EXTENSION: &str = "txt";

/// Maps page names onto files under the storage root and back
#[derive(Debug, Clone)]
pub struct PathMapper {
    root: PathBuf,
}

impl PathMapper {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve the file backing `name`: `A:B` lives at `<root>/A/B.txt`.
    ///
    /// Segments are re-checked here even though [`PageName`] is already
    /// sanitized, so nothing outside the root is ever addressed.
    pub fn page_path(&self, name: &PageName) -> Result<PathBuf, WikiError> {
        let segments: Vec<&str> = name.segments().collect();
        let mut path = self.root.clone();
        for (i, segment) in segments.iter().enumerate() {
            ensure_safe_segment(segment)?;
            if i + 1 == segments.len() {
                path.push(format!("{}.{}", segment, PAGE_EXTENSION));
            } else {
                path.push(segment);
            }
        }

        if !path.starts_with(&self.root) || path == self.root {
            log::warn!("Page name '{}' resolved outside the storage root", name);
            return Err(WikiError::InvalidPath);
        }
        Ok(path)
    }

    /// Inverse of [`page_path`](Self::page_path) for a path relative to the root.
    ///
    /// Returns `None` for files that are not pages: wrong extension, hidden
    /// components (temp files included) or non UTF-8 names.
    pub fn page_name_for(&self, relative: &Path) -> Option<String> {
        if relative.extension().and_then(|e| e.to_str()) != Some(PAGE_EXTENSION) {
            return None;
        }
        let stem_path = relative.with_extension("");
        let mut segments = Vec::new();
        for comp in stem_path.components() {
            match comp {
                Component::Normal(seg) => {
                    let seg = seg.to_str()?;
                    if seg.is_empty() || seg.starts_with('.') {
                        return None;
                    }
                    segments.push(seg);
                }
                _ => return None,
            }
        }
        if segments.is_empty() {
            return None;
        }
        Some(segments.join(&NAMESPACE_SEPARATOR.to_string()))
    }
}

fn ensure_safe_segment(segment: &str) -> Result<(), WikiError> {
    if segment.is_empty()
        || segment == "."
        || segment == ".."
        || segment.contains(['/', '\\', '\0'])
    {
        return Err(WikiError::InvalidPath);
    }
    let mut comps = Path::new(segment).components();
    match (comps.next(), comps.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(WikiError::InvalidPath),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapper() -> PathMapper {
        PathMapper::new(PathBuf::from("/wiki/data"))
    }

    #[test]
    fn test_single_segment_maps_to_root_file() {
        let name = PageName::parse("Main").unwrap();
        assert_eq!(mapper().page_path(&name).unwrap(), PathBuf::from("/wiki/data/Main.txt"));
    }

    #[test]
    fn test_namespaces_become_directories() {
        let name = PageName::parse("Foo:Bar:Baz").unwrap();
        assert_eq!(
            mapper().page_path(&name).unwrap(),
            PathBuf::from("/wiki/data/Foo/Bar/Baz.txt")
        );
    }

    #[test]
    fn test_empty_segments_are_rejected() {
        for raw in ["Foo::Bar", ":Foo", "Foo:"] {
            let name = PageName::parse(raw).unwrap();
            assert!(matches!(mapper().page_path(&name), Err(WikiError::InvalidPath)), "{}", raw);
        }
    }

    #[test]
    fn test_traversal_segments_are_rejected() {
        assert!(ensure_safe_segment("..").is_err());
        assert!(ensure_safe_segment(".").is_err());
        assert!(ensure_safe_segment("a/b").is_err());
        assert!(ensure_safe_segment("a\\b").is_err());
        assert!(ensure_safe_segment("ok-name").is_ok());
    }

    #[test]
    fn test_mapping_is_deterministic() {
        let name = PageName::parse("Journal:2024").unwrap();
        let m = mapper();
        assert_eq!(m.page_path(&name).unwrap(), m.page_path(&name).unwrap());
        assert!(m.page_path(&name).unwrap().starts_with(m.root()));
    }

    #[test]
    fn test_page_name_for_inverts_page_path() {
        let m = mapper();
        for raw in ["Main", "Foo:Bar", "a:b:c:d"] {
            let name = PageName::parse(raw).unwrap();
            let path = m.page_path(&name).unwrap();
            let relative = path.strip_prefix(m.root()).unwrap();
            assert_eq!(m.page_name_for(relative).as_deref(), Some(raw));
        }
    }

    #[test]
    fn test_page_name_for_skips_non_pages() {
        let m = mapper();
        assert_eq!(m.page_name_for(Path::new("notes.md")), None);
        assert_eq!(m.page_name_for(Path::new("Foo/.Bar.txt.1.tmp")), None);
        assert_eq!(m.page_name_for(Path::new(".hidden/Page.txt")), None);
    }
}
