use anyhow::Result;
use chrono::Local;
use env_logger::fmt::Color;
use log::{Level, LevelFilter};
use std::fs::create_dir_all;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, SystemTime};

const LOG_FILE_PREFIX: &str = "gameserve.log";
const MAX_LOG_FILES: usize = 5;

// 用于控制清理线程的标志
static CLEANER_STARTED: AtomicBool = AtomicBool::new(false);

// 同时写入标准输出和文件
struct DualWriter {
    console: io::Stdout,
    file: Box<dyn Write + Send>,
}

impl Write for DualWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let console_result = self.console.write(buf);
        let _ = self.file.write(buf);
        console_result
    }

    fn flush(&mut self) -> io::Result<()> {
        let _ = self.console.flush();
        let _ = self.file.flush();
        Ok(())
    }
}

/// 初始化日志，设置了 LOG_DIR 时额外写入按小时滚动的日志文件
pub fn init_logger() -> Result<()> {
    let log_dir = std::env::var("LOG_DIR")
        .ok()
        .filter(|dir| !dir.trim().is_empty())
        .map(PathBuf::from);

    let target = match &log_dir {
        Some(dir) => {
            create_dir_all(dir)?;
            let file_appender = tracing_appender::rolling::hourly(dir, LOG_FILE_PREFIX);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            // guard 被释放后文件写入会停止
            Box::leak(Box::new(guard));

            env_logger::Target::Pipe(Box::new(DualWriter {
                console: io::stdout(),
                file: Box::new(non_blocking),
            }))
        }
        None => env_logger::Target::Stdout,
    };

    env_logger::Builder::new()
        .format(|buf, record| {
            let mut style = buf.style();
            let level_color = match record.level() {
                Level::Error => Color::Red,
                Level::Warn => Color::Yellow,
                Level::Info => Color::Green,
                Level::Debug => Color::Blue,
                Level::Trace => Color::Cyan,
            };
            style.set_color(level_color);

            let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
            let level_str = style.value(format!("{:<5}", record.level()));

            writeln!(
                buf,
                "[{} {} {}] {}",
                timestamp,
                level_str,
                record.target(),
                record.args()
            )
        })
        .filter_level(LevelFilter::Info)
        .parse_env("RUST_LOG")
        .target(target)
        .init();

    if let Some(dir) = log_dir {
        log::info!("日志文件保存在 {}", dir.display());
        start_cleaner(dir);
    }

    Ok(())
}

fn start_cleaner(dir: PathBuf) {
    if CLEANER_STARTED.swap(true, Ordering::SeqCst) {
        return;
    }

    thread::spawn(move || loop {
        match clean_old_logs(&dir, MAX_LOG_FILES) {
            Ok(0) => (),
            Ok(removed) => log::debug!("已清理 {} 个旧日志文件", removed),
            Err(e) => log::error!("清理旧日志文件失败: {}", e),
        }
        thread::sleep(Duration::from_secs(600));
    });
}

/// 只保留最新的 keep 个日志文件，返回删除的数量
pub fn clean_old_logs(logs_dir: &Path, keep: usize) -> Result<usize> {
    let mut log_files: Vec<(SystemTime, PathBuf)> = Vec::new();

    for entry in std::fs::read_dir(logs_dir)? {
        let path = entry?.path();

        let is_log = path.is_file()
            && path
                .file_name()
                .and_then(|name| name.to_str())
                .map(|name| name.starts_with(LOG_FILE_PREFIX))
                .unwrap_or(false);
        if !is_log {
            continue;
        }

        if let Ok(metadata) = std::fs::metadata(&path) {
            let modified = metadata.modified().unwrap_or_else(|_| SystemTime::now());
            log_files.push((modified, path));
        }
    }

    // 最新的在前面
    log_files.sort_by(|a, b| b.0.cmp(&a.0));

    let mut removed = 0;
    for (_, path) in log_files.iter().skip(keep) {
        match std::fs::remove_file(path) {
            Ok(()) => removed += 1,
            Err(e) => log::warn!("无法删除旧日志文件 {:?}: {}", path, e),
        }
    }

    Ok(removed)
}
