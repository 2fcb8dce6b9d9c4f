use lazy_static::lazy_static;
use std::time::Duration;

/// 可被列出的游戏文件后缀
pub const GAME_EXTENSIONS: [&str; 4] = [".nsp", ".nsz", ".xci", ".xcz"];

/// 小于等于该大小的Range请求视为元数据探测 (1 MiB)
pub const PROBE_THRESHOLD: u64 = 1024 * 1024;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 9000;
pub const DEFAULT_GAMES_DIR: &str = "/games";
pub const DEFAULT_TITLE_DB_URL: &str = "https://github.com/blawar/titledb/raw/master/AU.en.json";
pub const DEFAULT_SUCCESS_MESSAGE: &str = "Operation Successful";
pub const TITLE_DB_FILE: &str = "title.db";

pub const DOWNLOAD_PREFIX: &str = "download";

lazy_static! {
    pub static ref DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
    pub static ref DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(300);
}
