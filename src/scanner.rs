use anyhow::{anyhow, Context, Result};
use bytesize::ByteSize;
use log::{debug, info};
use std::path::Path;
use tokio::fs;
use url::Url;

use crate::constants::{DOWNLOAD_PREFIX, GAME_EXTENSIONS};
use crate::types::GameEntry;

pub fn is_game_file(file_name: &str) -> bool {
    GAME_EXTENSIONS.iter().any(|ext| file_name.ends_with(ext))
}

/// 拼接下载链接: <EXTERNAL_URL>/download/<文件名>
pub fn download_url(external_url: &Url, file_name: &str) -> Result<String> {
    let mut url = external_url.clone();
    url.path_segments_mut()
        .map_err(|_| anyhow!("无法在该地址下拼接路径: {}", external_url))?
        .pop_if_empty()
        .push(DOWNLOAD_PREFIX)
        .push(file_name);
    Ok(url.into())
}

/// 扫描目录中的游戏文件，保持目录本身的遍历顺序
pub async fn scan_games(directory: &Path, external_url: &Url) -> Result<Vec<GameEntry>> {
    info!("扫描目录: {}", directory.display());

    let mut entries = fs::read_dir(directory)
        .await
        .with_context(|| format!("读取目录失败: {}", directory.display()))?;

    let mut files = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .with_context(|| format!("遍历目录失败: {}", directory.display()))?
    {
        let file_name = entry.file_name().to_string_lossy().to_string();
        if !is_game_file(&file_name) {
            debug!("跳过非游戏文件: {}", file_name);
            continue;
        }

        let path = entry.path();
        let metadata = fs::metadata(&path)
            .await
            .with_context(|| format!("读取文件元数据失败: {}", path.display()))?;

        info!("发现游戏文件: {} ({})", file_name, ByteSize(metadata.len()));
        files.push(GameEntry {
            url: download_url(external_url, &file_name)?,
            size: metadata.len(),
        });
    }

    info!("共找到 {} 个文件", files.len());
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn base() -> Url {
        Url::parse("http://localhost:9000").unwrap()
    }

    #[test]
    fn test_is_game_file() {
        assert!(is_game_file("Game.nsp"));
        assert!(is_game_file("Game.nsz"));
        assert!(is_game_file("Game [v1].xci"));
        assert!(is_game_file("Game.xcz"));
        assert!(!is_game_file("title.db"));
        assert!(!is_game_file("Game.NSP"));
        assert!(!is_game_file("Game.nsp.part"));
        assert!(!is_game_file("nsp"));
    }

    #[test]
    fn test_download_url() {
        assert_eq!(
            download_url(&base(), "Game.nsp").unwrap(),
            "http://localhost:9000/download/Game.nsp"
        );
        assert_eq!(
            download_url(&base(), "My Game #1 [0100].xci").unwrap(),
            "http://localhost:9000/download/My%20Game%20%231%20[0100].xci"
        );
    }

    #[test]
    fn test_download_url_keeps_base_path() {
        let base = Url::parse("https://example.com/switch/").unwrap();
        assert_eq!(
            download_url(&base, "a.nsz").unwrap(),
            "https://example.com/switch/download/a.nsz"
        );
    }

    #[tokio::test]
    async fn test_scan_filters_and_sizes() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("one.nsp"), vec![0u8; 10]).unwrap();
        std::fs::write(dir.path().join("two.xci"), vec![0u8; 2048]).unwrap();
        std::fs::write(dir.path().join("title.db"), b"{}").unwrap();
        std::fs::write(dir.path().join("readme.txt"), b"hi").unwrap();

        let mut files = scan_games(dir.path(), &base()).await.unwrap();
        files.sort_by(|a, b| a.url.cmp(&b.url));

        assert_eq!(
            files,
            vec![
                GameEntry {
                    url: "http://localhost:9000/download/one.nsp".to_string(),
                    size: 10,
                },
                GameEntry {
                    url: "http://localhost:9000/download/two.xci".to_string(),
                    size: 2048,
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_scan_empty_dir() {
        let dir = TempDir::new().unwrap();
        assert!(scan_games(dir.path(), &base()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_scan_missing_dir_fails() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        assert!(scan_games(&missing, &base()).await.is_err());
    }
}
