use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Adoptium `/v3/assets/latest` 返回的发布版本
///
/// 除了下载链接和大小以外所有字段都是可选的，空的 `Release::default()`
/// 用作只能解析通用变量的占位版本。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Release {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binary: Option<Binary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<VersionData>,
}

/// 某个平台的二进制构建
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Binary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub architecture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heap_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installer: Option<Package>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jvm_impl: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<Package>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scm_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// 可下载的文件（压缩包或安装程序）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Package {
    pub link: String,
    pub size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_count: Option<u64>,
}

/// 版本号信息
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VersionData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minor: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optional: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openjdk_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semver: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adopt_build_number: Option<u32>,
}

impl Release {
    /// 压缩包下载信息
    pub fn package(&self) -> Option<&Package> {
        self.binary.as_ref().and_then(|b| b.package.as_ref())
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    /// 截取自 Adoptium API 的真实响应
    pub const RELEASE_JSON: &str = r#"{
        "binary": {
            "architecture": "x64",
            "download_count": 12345,
            "heap_size": "normal",
            "image_type": "jre",
            "jvm_impl": "hotspot",
            "os": "windows",
            "package": {
                "checksum": "5e1b0ac3a1bd4f2a6d3a5a8f2f5b7e4b2c7c9d0e1f2a3b4c5d6e7f8091a2b3c4",
                "checksum_link": "https://github.com/adoptium/temurin21-binaries/releases/download/jdk-21.0.4%2B7/OpenJDK21U-jre_x64_windows_hotspot_21.0.4_7.zip.sha256.txt",
                "download_count": 4321,
                "link": "https://github.com/adoptium/temurin21-binaries/releases/download/jdk-21.0.4%2B7/OpenJDK21U-jre_x64_windows_hotspot_21.0.4_7.zip",
                "metadata_link": "https://github.com/adoptium/temurin21-binaries/releases/download/jdk-21.0.4%2B7/OpenJDK21U-jre_x64_windows_hotspot_21.0.4_7.zip.json",
                "name": "OpenJDK21U-jre_x64_windows_hotspot_21.0.4_7.zip",
                "signature_link": "https://github.com/adoptium/temurin21-binaries/releases/download/jdk-21.0.4%2B7/OpenJDK21U-jre_x64_windows_hotspot_21.0.4_7.zip.sig",
                "size": 47775043
            },
            "project": "jdk",
            "scm_ref": "jdk-21.0.4+7_adopt",
            "updated_at": "2024-07-17T10:12:41Z"
        },
        "release_link": "https://github.com/adoptium/temurin21-binaries/releases/tag/jdk-21.0.4%2B7",
        "release_name": "jdk-21.0.4+7",
        "vendor": "eclipse",
        "version": {
            "build": 7,
            "major": 21,
            "minor": 0,
            "openjdk_version": "21.0.4+7-LTS",
            "security": 4,
            "semver": "21.0.4+7.0.LTS"
        }
    }"#;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_adoptium_release() {
        let release: Release = serde_json::from_str(fixtures::RELEASE_JSON).unwrap();
        assert_eq!(release.release_name.as_deref(), Some("jdk-21.0.4+7"));

        let package = release.package().unwrap();
        assert_eq!(package.size, 47775043);
        assert!(package.link.ends_with(".zip"));

        let version = release.version.unwrap();
        assert_eq!(version.major, Some(21));
        assert_eq!(version.security, Some(4));
        assert_eq!(version.patch, None);
    }

    #[test]
    fn test_ignores_unknown_fields() {
        let json = r#"{"release_name": "jdk8u422-b05", "binaries": [], "timestamp": "x"}"#;
        let release: Release = serde_json::from_str(json).unwrap();
        assert_eq!(release.release_name.as_deref(), Some("jdk8u422-b05"));
        assert!(release.package().is_none());
    }

    #[test]
    fn test_package_requires_link() {
        let json = r#"{"binary": {"package": {"size": 10}}}"#;
        assert!(serde_json::from_str::<Release>(json).is_err());
    }

    #[test]
    fn test_default_release_serializes_empty() {
        let value = serde_json::to_value(Release::default()).unwrap();
        assert_eq!(value, serde_json::json!({}));
    }
}
