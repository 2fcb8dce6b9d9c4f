use log::info;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::config::Config;

/// 只在进程生命周期内展示一次的成功提示
#[derive(Debug)]
pub struct SuccessNotice {
    message: String,
    shown: AtomicBool,
}

impl SuccessNotice {
    pub fn new(message: impl Into<String>) -> Self {
        SuccessNotice {
            message: message.into(),
            shown: AtomicBool::new(false),
        }
    }

    /// 第一次调用返回提示内容，之后都返回 None
    pub fn take(&self) -> Option<String> {
        if self.shown.swap(true, Ordering::SeqCst) {
            return None;
        }
        info!("发送成功提示: {}", self.message);
        Some(self.message.clone())
    }

    #[cfg(test)]
    fn is_shown(&self) -> bool {
        self.shown.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub notice: Arc<SuccessNotice>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let notice = SuccessNotice::new(config.success_message.clone());
        AppState {
            config: Arc::new(config),
            notice: Arc::new(notice),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_take_once() {
        let notice = SuccessNotice::new("hello");
        assert!(!notice.is_shown());
        assert_eq!(notice.take().as_deref(), Some("hello"));
        assert!(notice.is_shown());
        assert_eq!(notice.take(), None);
        assert_eq!(notice.take(), None);
    }

    #[test]
    fn test_take_once_across_threads() {
        let notice = Arc::new(SuccessNotice::new("once"));
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let notice = notice.clone();
                thread::spawn(move || notice.take().is_some())
            })
            .collect();

        let shown = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|shown| *shown)
            .count();
        assert_eq!(shown, 1);
    }
}
