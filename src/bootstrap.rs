use anyhow::Result;
use colored::Colorize;
use log::{info, warn};

use crate::config::Config;
use crate::server;
use crate::state::AppState;
use crate::title_db;

pub async fn bootstrap(version: &str) -> Result<()> {
    info!("{}", format!("启动 rust-gameserve {}", version).green());

    let config = Config::new()?;
    config.log_summary();

    if !config.games_dir.is_dir() {
        warn!("游戏目录不存在或不是目录: {}", config.games_dir.display());
    }

    // 标题数据库在后台下载，不阻塞服务启动
    let title_db_url = config.title_db_url.clone();
    let title_db_path = config.title_db_path();
    tokio::spawn(async move {
        title_db::prefetch_logged(&title_db_url, &title_db_path).await;
    });

    info!("{}", config.success_message);

    let state = AppState::new(config);
    server::serve(state).await
}
