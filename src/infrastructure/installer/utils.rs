use indicatif::{ProgressBar, ProgressStyle};

/// 创建下载进度条，`total` 为 0 时显示为未知长度
pub fn create_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({eta}) {percent}%")
        .map(|style| style.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb
}

/// 把下载器的进度回调同步到进度条
pub fn update_progress_bar(pb: &ProgressBar, downloaded: u64, total: u64) {
    if total > 0 && pb.length() != Some(total) {
        pb.set_length(total);
    }
    pb.set_position(downloaded);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_progress_bar() {
        let pb = ProgressBar::hidden();
        update_progress_bar(&pb, 512, 2048);
        assert_eq!(pb.length(), Some(2048));
        assert_eq!(pb.position(), 512);

        update_progress_bar(&pb, 1024, 0);
        assert_eq!(pb.length(), Some(2048));
        assert_eq!(pb.position(), 1024);
    }
}
