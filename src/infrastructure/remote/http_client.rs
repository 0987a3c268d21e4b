use crate::core::constants::network::{MAX_REDIRECTS, USER_AGENT};
use crate::error::{BundlerError, BundlerResult};
use crate::infrastructure::config::NetworkConfig;
use reqwest::{redirect, Client, Response};
use std::time::Duration;

/// HTTP 客户端包装器
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// 查询用客户端，整个请求受 `timeout_sec` 限制，重定向会被自动跟随
    pub fn new(config: &NetworkConfig) -> BundlerResult<Self> {
        Self::build(config, Some(Duration::from_secs(config.timeout_sec)))
    }

    /// 下载用客户端，不限制请求总时长
    ///
    /// 大文件在慢速网络上可能需要很久，空闲超时由下载器按数据块控制。
    pub fn for_downloads(config: &NetworkConfig) -> BundlerResult<Self> {
        Self::build(config, None)
    }

    fn build(config: &NetworkConfig, total_timeout: Option<Duration>) -> BundlerResult<Self> {
        let mut builder = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_sec))
            .redirect(redirect::Policy::limited(MAX_REDIRECTS))
            .user_agent(USER_AGENT);
        if let Some(timeout) = total_timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| BundlerError::config(format!("无法创建 HTTP 客户端: {e}")))?;

        Ok(Self { client })
    }

    /// GET 请求，只处理传输层错误，状态码由调用方判断
    pub async fn get(&self, url: &str) -> BundlerResult<Response> {
        log::debug!("GET {url}");
        self.client
            .get(url)
            .send()
            .await
            .map_err(|e| BundlerError::network(url, describe(&e)))
    }
}

/// 网络错误的简短描述
pub fn describe(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        format!("连接超时: {error}")
    } else if error.is_connect() {
        format!("无法建立连接: {error}")
    } else if error.is_redirect() {
        format!("重定向次数过多: {error}")
    } else {
        format!("网络请求失败: {error}")
    }
}
