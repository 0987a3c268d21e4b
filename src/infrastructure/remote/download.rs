use super::http_client::{describe, HttpClient};
use crate::core::constants::download::{DEFAULT_PROGRESS_INTERVAL, PARTIAL_SUFFIX};
use crate::core::constants::network::DEFAULT_READ_TIMEOUT_SEC;
use crate::error::{BundlerError, BundlerResult};
use futures_util::StreamExt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncWriteExt;

/// 下载选项
#[derive(Debug, Clone)]
pub struct DownloadOptions {
    /// 两次进度回调之间至少间隔的字节数
    pub progress_interval: u64,
    /// 等待响应头或下一个数据块的最长时间
    pub read_timeout: Duration,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            read_timeout: Duration::from_secs(DEFAULT_READ_TIMEOUT_SEC),
        }
    }
}

/// 按字节数节流进度回调，与传输层的分块大小无关
#[derive(Debug)]
pub struct ProgressThrottle {
    interval: u64,
    received: u64,
    reported: u64,
}

impl ProgressThrottle {
    pub fn new(interval: u64) -> Self {
        Self {
            interval,
            received: 0,
            reported: 0,
        }
    }

    /// 记录新收到的字节，距离上次回调累计超过间隔时返回累计总数
    pub fn record(&mut self, bytes: u64) -> Option<u64> {
        self.received += bytes;
        if self.received - self.reported > self.interval {
            self.reported = self.received;
            Some(self.received)
        } else {
            None
        }
    }

    pub fn received(&self) -> u64 {
        self.received
    }
}

/// 带进度回调的下载器
pub struct Downloader {
    http: HttpClient,
    options: DownloadOptions,
}

impl Downloader {
    pub fn new(http: HttpClient, options: DownloadOptions) -> Self {
        Self { http, options }
    }

    /// 流式下载到文件，返回写入的字节数
    ///
    /// `progress` 的参数为 (已接收字节, 预期总字节)。数据先写入
    /// `<destination>.downloading`，成功后重命名，失败时删除。
    pub async fn download(
        &self,
        url: &str,
        destination: &Path,
        expected_size: u64,
        progress: impl Fn(u64, u64),
    ) -> BundlerResult<u64> {
        if let Some(parent) = destination.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| BundlerError::io(parent, e))?;
            }
        }

        let response = self.within_read_timeout(url, self.http.get(url)).await??;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BundlerError::Transfer {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let partial = partial_path(destination);
        let result = self
            .write_stream(url, response, &partial, expected_size, &progress)
            .await;

        let written = match result {
            Ok(written) => written,
            Err(e) => {
                // 删除未完成的文件
                let _ = tokio::fs::remove_file(&partial).await;
                return Err(e);
            }
        };

        tokio::fs::rename(&partial, destination)
            .await
            .map_err(|e| BundlerError::io(destination, e))?;

        if expected_size > 0 && written != expected_size {
            log::warn!(
                "下载大小与预期不一致: 实际 {written} 字节，预期 {expected_size} 字节"
            );
        }

        Ok(written)
    }

    async fn write_stream(
        &self,
        url: &str,
        response: reqwest::Response,
        partial: &Path,
        expected_size: u64,
        progress: &impl Fn(u64, u64),
    ) -> BundlerResult<u64> {
        let mut file = tokio::fs::File::create(partial)
            .await
            .map_err(|e| BundlerError::io(partial, e))?;
        let mut throttle = ProgressThrottle::new(self.options.progress_interval);
        let mut stream = response.bytes_stream();

        while let Some(chunk) = self.within_read_timeout(url, stream.next()).await? {
            let chunk = chunk.map_err(|e| BundlerError::network(url, describe(&e)))?;
            file.write_all(&chunk)
                .await
                .map_err(|e| BundlerError::io(partial, e))?;
            if let Some(received) = throttle.record(chunk.len() as u64) {
                progress(received, expected_size);
            }
        }

        file.flush().await.map_err(|e| BundlerError::io(partial, e))?;
        Ok(throttle.received())
    }

    async fn within_read_timeout<T>(
        &self,
        url: &str,
        future: impl Future<Output = T>,
    ) -> BundlerResult<T> {
        tokio::time::timeout(self.options.read_timeout, future)
            .await
            .map_err(|_| {
                BundlerError::network(
                    url,
                    format!("读取超时: {} 秒内没有收到数据", self.options.read_timeout.as_secs_f64()),
                )
            })
    }
}

fn partial_path(destination: &Path) -> PathBuf {
    let mut name = destination.as_os_str().to_owned();
    name.push(".");
    name.push(PARTIAL_SUFFIX);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config::NetworkConfig;
    use std::sync::Mutex;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MIB: u64 = 1024 * 1024;

    fn downloader(interval: u64) -> Downloader {
        let http = HttpClient::new(&NetworkConfig::default()).unwrap();
        Downloader::new(
            http,
            DownloadOptions {
                progress_interval: interval,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_throttle_fires_after_interval() {
        let mut throttle = ProgressThrottle::new(MIB);
        let mut calls = Vec::new();
        // 5MB 负载，64KB 分块
        for _ in 0..80 {
            if let Some(received) = throttle.record(64 * 1024) {
                calls.push(received);
            }
        }
        assert_eq!(calls.len(), 4);
        assert!(calls.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(throttle.received(), 5 * MIB);
    }

    #[test]
    fn test_throttle_requires_strictly_more_than_interval() {
        let mut throttle = ProgressThrottle::new(100);
        assert_eq!(throttle.record(100), None);
        assert_eq!(throttle.record(1), Some(101));
        assert_eq!(throttle.record(100), None);
    }

    #[test]
    fn test_throttle_large_chunk_fires_once() {
        let mut throttle = ProgressThrottle::new(MIB);
        assert_eq!(throttle.record(5 * MIB), Some(5 * MIB));
        assert_eq!(throttle.record(1), None);
    }

    #[test]
    fn test_partial_path_appends_suffix() {
        let path = partial_path(Path::new("/tmp/jre/jdk-21.zip"));
        assert_eq!(path, PathBuf::from("/tmp/jre/jdk-21.zip.downloading"));
    }

    #[tokio::test]
    async fn test_download_reports_progress() {
        let mock_server = MockServer::start().await;
        let payload: Vec<u8> = (0..5 * MIB).map(|i| (i % 251) as u8).collect();

        Mock::given(method("GET"))
            .and(path("/jre.zip"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(payload.clone()))
            .mount(&mock_server)
            .await;

        let temp_dir = TempDir::new().unwrap();
        let destination = temp_dir.path().join("nested").join("jre.zip");
        let calls = Mutex::new(Vec::new());

        let written = downloader(MIB)
            .download(
                &format!("{}/jre.zip", mock_server.uri()),
                &destination,
                payload.len() as u64,
                |received, total| {
                    assert_eq!(total, 5 * MIB);
                    calls.lock().unwrap().push(received);
                },
            )
            .await
            .unwrap();

        assert_eq!(written, payload.len() as u64);
        assert_eq!(std::fs::read(&destination).unwrap(), payload);
        assert!(!partial_path(&destination).exists());

        // 5MB 负载、1MB 间隔，至少触发 4 次
        let calls = calls.into_inner().unwrap();
        assert!(calls.len() >= 4, "progress called {} times", calls.len());
        assert!(calls.windows(2).all(|w| w[0] < w[1]));
        assert!(calls.iter().all(|&c| c <= 5 * MIB));
    }

    #[tokio::test]
    async fn test_download_error_status_is_transfer_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
            .mount(&mock_server)
            .await;

        let temp_dir = TempDir::new().unwrap();
        let destination = temp_dir.path().join("jre.zip");
        let url = format!("{}/missing.zip", mock_server.uri());

        match downloader(MIB).download(&url, &destination, 0, |_, _| {}).await {
            Err(BundlerError::Transfer { url: failed, status, body }) => {
                assert_eq!(failed, url);
                assert_eq!(status, 404);
                assert_eq!(body, "Not Found");
            }
            other => panic!("expected transfer error, got {other:?}"),
        }
        assert!(!destination.exists());
        assert!(!partial_path(&destination).exists());
    }

    #[tokio::test]
    async fn test_download_not_limited_by_request_timeout() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(b"PK-slow".to_vec())
                    .set_delay(Duration::from_millis(1500)),
            )
            .mount(&mock_server)
            .await;

        let config = NetworkConfig {
            timeout_sec: 1,
            ..Default::default()
        };
        let downloader = Downloader::new(
            HttpClient::for_downloads(&config).unwrap(),
            DownloadOptions::default(),
        );
        let temp_dir = TempDir::new().unwrap();
        let destination = temp_dir.path().join("jre.zip");

        let written = downloader
            .download(&format!("{}/jre.zip", mock_server.uri()), &destination, 7, |_, _| {})
            .await
            .unwrap();

        assert_eq!(written, 7);
    }

    #[tokio::test]
    async fn test_download_read_timeout_is_network_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(b"PK-stalled".to_vec())
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&mock_server)
            .await;

        let downloader = Downloader::new(
            HttpClient::for_downloads(&NetworkConfig::default()).unwrap(),
            DownloadOptions {
                read_timeout: Duration::from_millis(200),
                ..Default::default()
            },
        );
        let temp_dir = TempDir::new().unwrap();
        let destination = temp_dir.path().join("jre.zip");

        let result = downloader
            .download(&format!("{}/jre.zip", mock_server.uri()), &destination, 10, |_, _| {})
            .await;

        assert!(matches!(result, Err(BundlerError::Network { .. })));
        assert!(!destination.exists());
        assert!(!partial_path(&destination).exists());
    }

    #[tokio::test]
    async fn test_download_follows_redirects() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/latest"))
            .respond_with(
                ResponseTemplate::new(302)
                    .insert_header("Location", format!("{}/files/jre.zip", mock_server.uri()).as_str()),
            )
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/files/jre.zip"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"PK-data".to_vec()))
            .mount(&mock_server)
            .await;

        let temp_dir = TempDir::new().unwrap();
        let destination = temp_dir.path().join("jre.zip");

        let written = downloader(MIB)
            .download(&format!("{}/latest", mock_server.uri()), &destination, 7, |_, _| {})
            .await
            .unwrap();

        assert_eq!(written, 7);
        assert_eq!(std::fs::read(&destination).unwrap(), b"PK-data");
    }
}
