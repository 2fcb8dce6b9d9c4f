//! Range请求头解析
//!
//! 在请求头中查找第一个 `bytes=<start>-<end?>` 片段，找不到时当作没有Range头处理。

use crate::constants::PROBE_THRESHOLD;

const BYTES_UNIT: &str = "bytes=";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    /// None 表示直到文件末尾
    pub end: Option<u64>,
}

impl ByteRange {
    /// 请求的字节数，end 缺省时取文件最后一个字节；end 小于 start 时为 0
    pub fn chunk_len(&self, file_size: u64) -> u64 {
        let end = match self.end {
            Some(end) => end,
            None if file_size == 0 => return 0,
            None => file_size - 1,
        };
        if end < self.start {
            return 0;
        }
        (end - self.start).saturating_add(1)
    }

    /// 小范围请求多半是客户端在探测文件是否可用
    pub fn is_probe(&self, file_size: u64) -> bool {
        self.chunk_len(file_size) <= PROBE_THRESHOLD
    }
}

pub fn parse_byte_range(header: &str) -> Option<ByteRange> {
    header
        .match_indices(BYTES_UNIT)
        .find_map(|(idx, _)| parse_spec(&header[idx + BYTES_UNIT.len()..]))
}

// 解析 "<digits>-<digits?>"，之后的内容忽略
fn parse_spec(spec: &str) -> Option<ByteRange> {
    let (start, rest) = take_digits(spec);
    let start = start?;
    let rest = rest.strip_prefix('-')?;
    let (end, _) = take_digits(rest);
    Some(ByteRange { start, end })
}

// 读取开头的连续数字，溢出时取 u64::MAX
fn take_digits(s: &str) -> (Option<u64>, &str) {
    let len = s.bytes().take_while(u8::is_ascii_digit).count();
    if len == 0 {
        return (None, s);
    }
    let value = s[..len].bytes().fold(0u64, |acc, b| {
        acc.saturating_mul(10).saturating_add(u64::from(b - b'0'))
    });
    (Some(value), &s[len..])
}
