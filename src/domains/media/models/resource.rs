use std::fmt;
use std::str::FromStr;

/// 업로드 폴더 (화이트리스트)
/// Upload folder whitelist
///
/// Only these three folders are ever served through the gateway. Anything
/// else in the URL is rejected before any filesystem access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaFolder {
    Images,
    Thumbnails,
    Videos,
}

impl MediaFolder {
    pub const ALL: [MediaFolder; 3] = [
        MediaFolder::Images,
        MediaFolder::Thumbnails,
        MediaFolder::Videos,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaFolder::Images => "images",
            MediaFolder::Thumbnails => "thumbnails",
            MediaFolder::Videos => "videos",
        }
    }
}

impl FromStr for MediaFolder {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "images" => Ok(MediaFolder::Images),
            "thumbnails" => Ok(MediaFolder::Thumbnails),
            "videos" => Ok(MediaFolder::Videos),
            _ => Err(()),
        }
    }
}

impl fmt::Display for MediaFolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extension -> Content-Type table. Unknown extensions are rejected even if
/// the file exists, so nothing that merely lives under the upload tree
/// (source files, dotfiles) can be served with a guessed type.
pub fn content_type_for(extension: &str) -> Option<&'static str> {
    let content_type = match extension {
        // Images
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",

        // Videos
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "ogg" => "video/ogg",
        "mov" => "video/quicktime",

        // Audio
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",

        // Documents
        "pdf" => "application/pdf",

        _ => return None,
    };
    Some(content_type)
}

/// 요청에서 파생된 미디어 리소스 (저장되지 않음)
/// Media resource derived from the request (never persisted)
///
/// `filename` is the URL-decoded name, already checked for traversal.
#[derive(Debug, Clone)]
pub struct MediaResource {
    pub folder: MediaFolder,
    pub filename: String,
    pub extension: String,
    pub content_type: &'static str,
}

impl MediaResource {
    /// The canonical path a token's `sub` claim is bound to,
    /// e.g. `/uploads/videos/x.mp4`.
    pub fn resource_path(&self) -> String {
        format!("/uploads/{}/{}", self.folder.as_str(), self.filename)
    }
}
