use anyhow::Result;
use dotenv::dotenv;
use log::error;
use rust_gameserve::bootstrap::bootstrap;
use rust_gameserve::logger;

#[tokio::main]
async fn main() -> Result<()> {
    // 加载环境变量
    dotenv().ok();

    logger::init_logger()?;

    let version = env!("CARGO_PKG_VERSION");

    if let Err(e) = bootstrap(version).await {
        error!("启动错误: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
