use anyhow::{Context, Result};
use axum::body::Body;
use axum::extract::{ConnectInfo, Path, State};
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{routing::get, Json, Router};
use bytesize::ByteSize;
use log::{debug, error, info, warn};
use std::net::SocketAddr;
use tokio::fs;
use tokio::net::TcpListener;
use tokio::signal;
use tokio_util::io::ReaderStream;

use crate::range::parse_byte_range;
use crate::scanner::scan_games;
use crate::state::AppState;
use crate::types::ListingResponse;
use crate::util::{content_disposition, resolve_game_path};

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_games))
        .route("/download/:filename", get(download_game))
        .with_state(state)
}

/// 绑定监听地址并运行，直到收到 Ctrl+C
pub async fn serve(state: AppState) -> Result<()> {
    let (host, port) = state.config.listen_addr();
    let listener = TcpListener::bind((host.as_str(), port))
        .await
        .with_context(|| format!("无法监听 {}:{}", host, port))?;

    info!("服务器运行于 http://{}/", listener.local_addr()?);

    let router = create_router(state);
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("HTTP服务器错误")?;

    info!("服务已成功关闭");
    Ok(())
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("收到终止信号，开始关闭服务..."),
        Err(e) => {
            error!("无法监听Ctrl+C信号: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

fn peer_addr(connect_info: &Option<ConnectInfo<SocketAddr>>) -> String {
    connect_info
        .as_ref()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

// 游戏列表处理函数
async fn list_games(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    info!("收到请求: {} {} 来自 {}", method, uri, peer_addr(&connect_info));
    debug!("请求头: {:?}", headers);

    let files = match scan_games(&state.config.games_dir, &state.config.external_url).await {
        Ok(files) => files,
        Err(e) => {
            error!("扫描游戏目录失败: {:#}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error occurred while scanning games",
            )
                .into_response();
        }
    };

    let mut response = ListingResponse::new(files);
    response.success = state.notice.take();

    debug!(
        "响应内容: {}",
        serde_json::to_string(&response).unwrap_or_default()
    );

    (StatusCode::OK, Json(response)).into_response()
}

// 文件下载处理函数
async fn download_game(
    State(state): State<AppState>,
    Path(filename): Path<String>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
) -> Response {
    let peer = peer_addr(&connect_info);

    let metadata = match resolve_game_path(&state.config.games_dir, &filename) {
        Some(path) => match fs::metadata(&path).await {
            Ok(metadata) if metadata.is_file() => Some((path, metadata)),
            _ => None,
        },
        None => None,
    };

    let Some((path, metadata)) = metadata else {
        warn!("文件不存在: {}", filename);
        return (StatusCode::NOT_FOUND, "File not found").into_response();
    };

    // 小范围Range请求只是客户端的元数据探测，不读取文件
    let range = headers
        .get(header::RANGE)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_byte_range);
    if let Some(range) = range {
        if range.is_probe(metadata.len()) {
            info!("收到Range请求（可能是元数据检查）: {} 来自 {}", filename, peer);
            return StatusCode::PARTIAL_CONTENT.into_response();
        }
    }

    info!(
        "收到下载请求: {} ({}) 来自 {}",
        filename,
        ByteSize(metadata.len()),
        peer
    );

    open_download(&path, &filename).await
}

// 打开文件并构建附件响应，打开或读取元数据失败时返回 500
async fn open_download(path: &std::path::Path, filename: &str) -> Response {
    let file = match fs::File::open(path).await {
        Ok(file) => file,
        Err(e) => {
            error!("发送文件时出错: {} - {}", path.display(), e);
            return transfer_error();
        }
    };

    let len = match file.metadata().await {
        Ok(metadata) => metadata.len(),
        Err(e) => {
            error!("读取文件元数据失败: {} - {}", path.display(), e);
            return transfer_error();
        }
    };

    let body = Body::from_stream(ReaderStream::new(file));

    match Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .header(header::CONTENT_LENGTH, len)
        .header(header::CONTENT_DISPOSITION, content_disposition(filename))
        .body(body)
    {
        Ok(response) => response,
        Err(e) => {
            error!("构建下载响应失败: {}", e);
            transfer_error()
        }
    }
}

fn transfer_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Error occurred while downloading the file",
    )
        .into_response()
}
