use serde::{Deserialize, Serialize};

/// One static file belonging to the report, destined for inlining or
/// mock-serving.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    /// Path relative to the report root, forward-slash separated on every host
    pub url: String,
    pub mime_type: String,
    /// Pre-encoded payload: base64 for binary assets, raw UTF-8 text otherwise
    pub content: String,
    pub is_binary: bool,
}

impl Asset {
    pub fn text(url: String, mime_type: String, content: String) -> Self {
        Self {
            url,
            mime_type,
            content,
            is_binary: false,
        }
    }

    pub fn binary(url: String, mime_type: String, payload: String) -> Self {
        Self {
            url,
            mime_type,
            content: payload,
            is_binary: true,
        }
    }
}

/// Summary of one combine run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombineReport {
    pub info: CombineInfo,
    pub assets: Vec<AssetRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombineInfo {
    pub started_at: String,
    pub duration_seconds: f64,
    pub source_directory: String,
    pub output_file: String,
    pub assets_bundled: u64,
    pub assets_skipped: u64,
    pub total_asset_bytes: u64,
    pub output_size_bytes: u64,
}

/// Per-asset entry of the run summary, with the payload left out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetRecord {
    pub url: String,
    pub mime_type: String,
    pub is_binary: bool,
}

impl From<&Asset> for AssetRecord {
    fn from(asset: &Asset) -> Self {
        Self {
            url: asset.url.clone(),
            mime_type: asset.mime_type.clone(),
            is_binary: asset.is_binary,
        }
    }
}
