use std::path::Path;

use tracing::{debug, warn};
use walkdir::WalkDir;

use super::entry::{parse_document, ContentEntry};
use super::reading::ReadingSpeed;
use super::validate::ValidationError;
use super::ContentSet;
use crate::error::ContentError;

const POSTS_DIR: &str = "posts";

fn is_markdown(path: &Path) -> bool {
    matches!(path.extension().and_then(|e| e.to_str()), Some("md" | "mdx"))
}

/// Reads every markdown file under `<root>/posts`.
///
/// Files whose frontmatter cannot be parsed are left out of the set and
/// reported alongside it; only I/O failures abort the load.
pub fn load_dir(root: &Path, speed: &ReadingSpeed) -> Result<(ContentSet, Vec<ValidationError>), ContentError> {
    let posts_root = root.join(POSTS_DIR);
    let mut entries = Vec::new();
    let mut errors = Vec::new();

    if !posts_root.is_dir() {
        warn!(path = %posts_root.display(), "no posts directory");
        return Ok((ContentSet::default(), errors));
    }

    for item in WalkDir::new(&posts_root).sort_by_file_name() {
        let item = item?;
        if !item.file_type().is_file() || !is_markdown(item.path()) {
            continue;
        }

        let relative = item
            .path()
            .strip_prefix(root)
            .map_err(|_| ContentError::OutsideRoot(item.path().to_path_buf()))?;
        let source_path = relative.to_string_lossy().replace('\\', "/");

        let text = std::fs::read_to_string(item.path()).map_err(|source| ContentError::Read {
            path: item.path().to_path_buf(),
            source,
        })?;

        match parse_document(&source_path, &text) {
            Ok((frontmatter, body)) => {
                let entry = ContentEntry::new(&source_path, frontmatter, body, speed);
                debug!(path = %source_path, url = %entry.url, draft = entry.draft, "loaded post");
                entries.push(entry);
            }
            Err(err) => {
                warn!(path = %source_path, "{err}");
                errors.push(err);
            }
        }
    }

    Ok((ContentSet::new(entries), errors))
}
