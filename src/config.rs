use anyhow::{Context, Result};
use log::{info, warn};
use std::env;
use std::path::PathBuf;
use url::Url;

use crate::constants::{
    DEFAULT_GAMES_DIR, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_SUCCESS_MESSAGE, DEFAULT_TITLE_DB_URL,
    TITLE_DB_FILE,
};

#[derive(Debug, Clone)]
pub struct Config {
    // 监听配置
    pub host: String,
    pub port: u16,

    // 对外地址，用于拼接下载链接
    pub external_url: Url,

    // 游戏目录
    pub games_dir: PathBuf,

    // 标题数据库
    pub title_db_url: String,

    pub success_message: String,
}

impl Config {
    /// 从进程环境变量读取配置
    pub fn new() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 从任意键值来源读取配置，空字符串视为未设置
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let host = get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match get("PORT") {
            Some(port_str) => match port_str.parse::<u16>() {
                Ok(port) => port,
                Err(_) => {
                    warn!("PORT={} 不是有效的端口号，使用默认端口 {}", port_str, DEFAULT_PORT);
                    DEFAULT_PORT
                }
            },
            None => DEFAULT_PORT,
        };

        let external_url_str =
            get("EXTERNAL_URL").unwrap_or_else(|| format!("http://localhost:{}", port));
        let external_url = Url::parse(&external_url_str)
            .with_context(|| format!("EXTERNAL_URL不是有效的URL: {}", external_url_str))?;
        if external_url.cannot_be_a_base() {
            return Err(anyhow::anyhow!(
                "EXTERNAL_URL必须是可作为基础地址的URL: {}",
                external_url_str
            ));
        }

        let games_dir = PathBuf::from(get("GAMES_DIR").unwrap_or_else(|| DEFAULT_GAMES_DIR.to_string()));
        let title_db_url = get("TITLE_DB_URL").unwrap_or_else(|| DEFAULT_TITLE_DB_URL.to_string());
        let success_message =
            get("SUCCESS_MESSAGE").unwrap_or_else(|| DEFAULT_SUCCESS_MESSAGE.to_string());

        Ok(Config {
            host,
            port,
            external_url,
            games_dir,
            title_db_url,
            success_message,
        })
    }

    /// 监听地址，主机名交给系统解析
    pub fn listen_addr(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }

    /// 标题数据库保存位置
    pub fn title_db_path(&self) -> PathBuf {
        self.games_dir.join(TITLE_DB_FILE)
    }

    pub fn log_summary(&self) {
        info!("监听地址: {}:{}", self.host, self.port);
        info!("对外地址: {}", self.external_url);
        info!("游戏目录: {}", self.games_dir.display());
        info!("标题数据库来源: {}", self.title_db_url);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9000);
        assert_eq!(config.external_url.as_str(), "http://localhost:9000/");
        assert_eq!(config.games_dir, PathBuf::from("/games"));
        assert_eq!(config.title_db_url, DEFAULT_TITLE_DB_URL);
        assert_eq!(config.success_message, "Operation Successful");
        assert_eq!(config.title_db_path(), PathBuf::from("/games/title.db"));
    }

    #[test]
    fn test_external_url_follows_port() {
        let config = config_from(&[("PORT", "8080")]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.external_url.as_str(), "http://localhost:8080/");
    }

    #[test]
    fn test_invalid_port_falls_back() {
        let config = config_from(&[("PORT", "not-a-port")]).unwrap();
        assert_eq!(config.port, 9000);
    }

    #[test]
    fn test_blank_values_are_unset() {
        let config = config_from(&[("HOST", "  "), ("SUCCESS_MESSAGE", "")]).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.success_message, "Operation Successful");
    }

    #[test]
    fn test_invalid_external_url() {
        assert!(config_from(&[("EXTERNAL_URL", "not a url")]).is_err());
        assert!(config_from(&[("EXTERNAL_URL", "mailto:someone@example.com")]).is_err());
    }

    #[test]
    fn test_listen_addr() {
        let config = config_from(&[("HOST", "localhost"), ("PORT", "9100")]).unwrap();
        assert_eq!(config.listen_addr(), ("localhost".to_string(), 9100));
    }
}
