use anyhow::{anyhow, Context, Result};
use log::{error, info};
use reqwest::{Client, StatusCode};
use std::path::Path;
use tokio::fs;

use crate::constants::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_REQUEST_TIMEOUT};

pub fn build_client() -> Result<Client> {
    let client = Client::builder()
        .connect_timeout(*DEFAULT_CONNECT_TIMEOUT)
        .timeout(*DEFAULT_REQUEST_TIMEOUT)
        .build()?;
    Ok(client)
}

/// 下载标题数据库并原样写入目标文件，返回写入的字节数
pub async fn prefetch(client: &Client, url: &str, dest: &Path) -> Result<u64> {
    info!("下载标题数据库: {}", url);

    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("请求标题数据库失败: {}", url))?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(anyhow!("下载标题数据库失败，HTTP状态码: {}", status));
    }

    let content = response.bytes().await.context("读取标题数据库内容失败")?;
    fs::write(dest, &content)
        .await
        .with_context(|| format!("写入标题数据库失败: {}", dest.display()))?;

    Ok(content.len() as u64)
}

/// 启动时的尽力而为下载，任何失败只记录日志，返回是否成功
pub async fn prefetch_logged(url: &str, dest: &Path) -> bool {
    let result = match build_client() {
        Ok(client) => prefetch(&client, url, dest).await,
        Err(e) => Err(e.context("创建HTTP客户端失败")),
    };

    match result {
        Ok(size) => {
            info!("标题数据库下载成功 ({} 字节): {}", size, dest.display());
            true
        }
        Err(e) => {
            error!("下载标题数据库时出错: {:#}", e);
            false
        }
    }
}
