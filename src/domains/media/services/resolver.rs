// 리소스 경로 해석 (경로 탐색 방지)
// Maps (folder, filename) to a safe on-disk path.
//
// Validation is split from I/O: `validate` is pure so token issuance can
// vet a resource without touching the filesystem, and all checks run before
// anything beyond a metadata probe so error timing reveals nothing about
// the tree.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use percent_encoding::percent_decode_str;

use crate::domains::media::models::{MediaFolder, MediaResource, content_type_for};
use crate::shared::errors::MediaError;

/// A file that passed every validation step.
#[derive(Debug)]
pub struct ResolvedFile {
    pub path: PathBuf,
    pub len: u64,
    pub modified: SystemTime,
}

#[derive(Debug, Clone)]
pub struct ResourceResolver {
    base_dir: PathBuf,
}

impl ResourceResolver {
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Syntactic validation only: folder whitelist, one URL-decode of the
    /// filename, traversal check on the decoded value (so encoded `../`
    /// does not slip through), and extension lookup.
    pub fn validate(folder_raw: &str, filename_raw: &str) -> Result<MediaResource, MediaError> {
        let folder = folder_raw
            .parse::<MediaFolder>()
            .map_err(|_| MediaError::InvalidFolder {
                folder: folder_raw.to_string(),
            })?;

        let filename = percent_decode_str(filename_raw)
            .decode_utf8()
            .map_err(|_| MediaError::PathTraversal {
                filename: filename_raw.to_string(),
            })?
            .into_owned();

        // Checked post-decode; also reject rooted names, which PathBuf::join
        // would let replace the base directory outright
        if filename.contains("../")
            || filename.contains("..\\")
            || Path::new(&filename).is_absolute()
            || filename.starts_with('/')
            || filename.starts_with('\\')
        {
            return Err(MediaError::PathTraversal { filename });
        }

        let extension = match filename.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => ext.to_ascii_lowercase(),
            _ => String::new(),
        };
        let Some(content_type) = content_type_for(&extension) else {
            return Err(MediaError::UnsupportedType { extension });
        };

        Ok(MediaResource {
            folder,
            filename,
            extension,
            content_type,
        })
    }

    /// Existence check on the filesystem; the only I/O in the resolution
    /// path. Missing files and non-files are both `FileNotFound`.
    pub async fn resolve(&self, resource: &MediaResource) -> Result<ResolvedFile, MediaError> {
        let path = self
            .base_dir
            .join(resource.folder.as_str())
            .join(&resource.filename);

        let metadata = tokio::fs::metadata(&path)
            .await
            .map_err(|_| MediaError::FileNotFound)?;
        if !metadata.is_file() {
            return Err(MediaError::FileNotFound);
        }
        let modified = metadata.modified().map_err(|e| {
            MediaError::Internal(format!("no modification time for {}: {e}", path.display()))
        })?;

        Ok(ResolvedFile {
            path,
            len: metadata.len(),
            modified,
        })
    }
}
