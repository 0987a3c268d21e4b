use super::http_client::HttpClient;
use super::models::Release;
use super::platform::ReleaseQuery;
use crate::error::{BundlerError, BundlerResult};
use reqwest::StatusCode;
use url::Url;

/// Adoptium 发布目录客户端
pub struct AdoptiumClient {
    http: HttpClient,
    base_url: Url,
}

impl AdoptiumClient {
    /// 创建客户端，`base_url` 形如 `https://api.adoptium.net`
    pub fn new(http: HttpClient, base_url: &str) -> BundlerResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| BundlerError::validation("api_base_url", format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(BundlerError::validation(
                "api_base_url",
                format!("{base_url} 不能作为基础地址"),
            ));
        }
        Ok(Self { http, base_url })
    }

    /// 构造 `/v3/assets/latest/{feature_version}/{jvm_impl}` 查询地址
    pub fn latest_assets_url(&self, query: &ReleaseQuery) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["v3", "assets", "latest"])
                .push(&query.feature_version.to_string())
                .push(query.jvm_impl.as_str());
        }
        url.query_pairs_mut()
            .clear()
            .append_pair("architecture", query.architecture.as_str())
            .append_pair("image_type", query.image_type.as_str())
            .append_pair("os", query.os.as_str())
            .append_pair("vendor", query.vendor.as_str());
        url
    }

    /// 查询所有匹配的最新发布版本，保持响应中的顺序
    pub async fn latest_releases(&self, query: &ReleaseQuery) -> BundlerResult<Vec<Release>> {
        let url = self.latest_assets_url(query);
        let url_str = url.as_str();
        log::info!("查询发布目录: {url_str}");

        let response = self.http.get(url_str).await?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BundlerError::network(url_str, super::http_client::describe(&e)))?;

        if status != StatusCode::OK {
            return Err(BundlerError::Upstream {
                url: url_str.to_string(),
                status: Some(status.as_u16()),
                message: body,
            });
        }

        serde_json::from_str::<Vec<Release>>(&body).map_err(|e| BundlerError::Upstream {
            url: url_str.to_string(),
            status: Some(status.as_u16()),
            message: format!("无法解析响应: {e}"),
        })
    }

    /// 解析查询条件对应的发布版本
    ///
    /// 返回响应中的第一个条目，排序由发布目录负责。
    pub async fn resolve(&self, query: &ReleaseQuery) -> BundlerResult<Release> {
        let releases = self.latest_releases(query).await?;
        log::info!("找到 {} 个发布版本", releases.len());

        releases.into_iter().next().ok_or_else(|| BundlerError::NotFound {
            query: query.to_string(),
        })
    }
}
