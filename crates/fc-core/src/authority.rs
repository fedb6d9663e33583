//! Well-known provider authorities, content-index collections and columns.

/// OS-native storage documents.
pub const EXTERNAL_STORAGE_DOCUMENTS: &str = "com.android.externalstorage.documents";
/// Downloads documents.
pub const DOWNLOADS_DOCUMENTS: &str = "com.android.providers.downloads.documents";
/// Media-index documents.
pub const MEDIA_DOCUMENTS: &str = "com.android.providers.media.documents";

/// ES file explorer storage documents.
pub const EZ_FILE_MANAGER_DOCUMENTS: &str =
    "es.fileexplorer.filebrowser.ezfilemanager.externalstorage.documents";
/// QQ browser file provider.
pub const QQ_BROWSER_PROVIDER: &str = "com.tencent.mtt.fileprovider";
/// Photo gallery whose references are not filesystem-backed.
pub const GOOGLE_PHOTOS_CONTENT: &str = "com.google.android.apps.photos.content";

/// Suffix of the host application's own file provider authority.
pub const FILE_PROVIDER_SUFFIX: &str = ".fileprovider";

/// Content-index tables tried, in order, for numeric download ids.
pub const DOWNLOAD_TABLES: [&str; 3] = [
    "content://downloads/public_downloads",
    "content://downloads/my_downloads",
    "content://downloads/all_downloads",
];

/// Document id prefix carrying a raw filesystem path.
pub const RAW_DOCUMENT_PREFIX: &str = "raw:";

/// Storage volume names with a fixed location under the external root.
pub const PRIMARY_VOLUME: &str = "primary";
pub const HOME_VOLUME: &str = "home";
pub const HOME_VOLUME_DIR: &str = "documents";

/// First path segment marking a "root" reference (`content://x/root/storage/...`).
pub const ROOT_MARKER: &str = "root";

pub mod columns {
    pub const DATA: &str = "_data";
    pub const ID: &str = "_id";
    pub const DISPLAY_NAME: &str = "_display_name";
}

/// Media collection addressed by a media document id (`image:42`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
    Audio,
    Other,
}

impl MediaKind {
    pub fn from_document_kind(kind: &str) -> Self {
        match kind {
            "image" => MediaKind::Image,
            "video" => MediaKind::Video,
            "audio" => MediaKind::Audio,
            _ => MediaKind::Other,
        }
    }

    /// External content collection for this kind.
    pub fn collection(&self) -> &'static str {
        match self {
            MediaKind::Image => IMAGES_COLLECTION,
            MediaKind::Video => "content://media/external/video/media",
            MediaKind::Audio => "content://media/external/audio/media",
            MediaKind::Other => "content://media/external/file",
        }
    }
}

/// Collection the gallery step picks from.
pub const IMAGES_COLLECTION: &str = "content://media/external/images/media";

pub fn default_file_provider_authority(package_id: &str) -> String {
    format!("{package_id}{FILE_PROVIDER_SUFFIX}")
}
