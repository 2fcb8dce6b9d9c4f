use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEntry {
    pub url: String,
    pub size: u64,
}

/// `GET /` 的响应体
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListingResponse {
    pub files: Vec<GameEntry>,
    pub directories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<String>,
}

impl ListingResponse {
    pub fn new(files: Vec<GameEntry>) -> Self {
        let directories = files.iter().map(|file| file.url.clone()).collect();
        ListingResponse {
            files,
            directories,
            success: None,
        }
    }
}
