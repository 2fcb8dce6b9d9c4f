use std::path::{Path, PathBuf};
use url::form_urlencoded;

// 将请求中的文件名映射到游戏目录下，拒绝任何可能跳出目录的名字
pub fn resolve_game_path(games_dir: &Path, file_name: &str) -> Option<PathBuf> {
    if file_name.is_empty()
        || file_name == "."
        || file_name == ".."
        || file_name.contains(&['/', '\\', '\0'][..])
    {
        return None;
    }

    Some(games_dir.join(file_name))
}

// 生成附件下载的Content-Disposition，非ASCII文件名附带RFC 5987编码
pub fn content_disposition(file_name: &str) -> String {
    let is_plain = |c: char| (c.is_ascii_graphic() || c == ' ') && c != '"' && c != '\\';

    if file_name.chars().all(is_plain) {
        return format!("attachment; filename=\"{}\"", file_name);
    }

    let fallback: String = file_name
        .chars()
        .map(|c| if is_plain(c) { c } else { '_' })
        .collect();

    // byte_serialize 把空格编码为 '+'，原本的 '+' 会变成 %2B
    let encoded = form_urlencoded::byte_serialize(file_name.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
        .replace('*', "%2A");

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback, encoded
    )
}
