//! 路径模板
//!
//! 把发布版本信息展开成 `binary.package.size`、`assets[0].name` 这样的扁平变量，
//! 然后替换模板中的 `{{变量}}` 占位符。找不到的变量保持原样。

use crate::infrastructure::remote::models::Release;
use regex::{Captures, Regex};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::OnceLock;

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\{\{([^{}]+)\}\}").expect("占位符正则表达式无效"))
}

/// 扁平化后的模板变量
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableMap {
    vars: BTreeMap<String, String>,
}

impl VariableMap {
    /// 从任意 JSON 值展开变量
    pub fn from_value(value: &Value) -> Self {
        let mut vars = BTreeMap::new();
        flatten_into(value, String::new(), &mut vars);
        Self { vars }
    }

    /// 从发布版本展开变量，未设置的字段不会产生变量
    pub fn from_release(release: &Release) -> Self {
        serde_json::to_value(release)
            .map(|value| Self::from_value(&value))
            .unwrap_or_default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// 按变量名排序遍历
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// 替换模板中的所有占位符
    pub fn render(&self, template: &str) -> String {
        placeholder_pattern()
            .replace_all(template, |caps: &Captures| match self.get(&caps[1]) {
                Some(value) => value.to_string(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }
}

/// 用发布版本的信息渲染路径模板
pub fn render(template: &str, release: &Release) -> String {
    VariableMap::from_release(release).render(template)
}

fn flatten_into(value: &Value, path: String, vars: &mut BTreeMap<String, String>) {
    match value {
        Value::Object(fields) => {
            for (key, child) in fields {
                let child_path = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{path}.{key}")
                };
                flatten_into(child, child_path, vars);
            }
        }
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                flatten_into(item, format!("{path}[{index}]"), vars);
            }
        }
        scalar => {
            if path.is_empty() {
                return;
            }
            let text = match scalar {
                Value::String(s) => s.clone(),
                Value::Null => String::new(),
                other => other.to_string(),
            };
            vars.insert(path, text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::remote::models::{fixtures::RELEASE_JSON, Binary, Package};
    use serde_json::json;

    fn release_with_size(size: u64) -> Release {
        Release {
            binary: Some(Binary {
                package: Some(Package {
                    link: "https://example.com/jre.zip".to_string(),
                    size,
                    ..Default::default()
                }),
                ..Default::default()
            }),
            release_name: Some("jdk-21.0.4+7".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_flatten_nested_object() {
        let vars = VariableMap::from_value(&json!({"binary": {"package": {"size": 100}}}));
        assert_eq!(vars.len(), 1);
        assert_eq!(vars.get("binary.package.size"), Some("100"));
    }

    #[test]
    fn test_flatten_arrays_and_scalars() {
        let vars = VariableMap::from_value(&json!({
            "assets": [{"name": "a.zip"}, "b.zip"],
            "lts": true,
            "optional": null,
            "nested": {"empty": {}, "list": []}
        }));

        let entries: Vec<_> = vars.iter().collect();
        assert_eq!(
            entries,
            vec![
                ("assets[0].name", "a.zip"),
                ("assets[1]", "b.zip"),
                ("lts", "true"),
                ("optional", ""),
            ]
        );
    }

    #[test]
    fn test_render_package_size() {
        let release = release_with_size(12345);
        assert_eq!(render("{{binary.package.size}} bytes", &release), "12345 bytes");
    }

    #[test]
    fn test_render_multiple_placeholders() {
        let release: Release = serde_json::from_str(RELEASE_JSON).unwrap();
        let rendered = render(
            "target/{{version.major}}/{{binary.os}}-{{binary.architecture}}/{{release_name}}",
            &release,
        );
        assert_eq!(rendered, "target/21/windows-x64/jdk-21.0.4+7");
    }

    #[test]
    fn test_unresolved_placeholder_is_kept() {
        let release = release_with_size(1);
        assert_eq!(
            render("{{missing.key}}/{{release_name}}", &release),
            "{{missing.key}}/jdk-21.0.4+7"
        );
        // 占位符内的空白不会被去除
        assert_eq!(render("{{ release_name }}", &release), "{{ release_name }}");
    }

    #[test]
    fn test_render_against_placeholder_release() {
        let placeholder = Release::default();
        assert!(VariableMap::from_release(&placeholder).is_empty());
        assert_eq!(render("target/runtime", &placeholder), "target/runtime");
        assert_eq!(
            render("target/{{binary.package.name}}", &placeholder),
            "target/{{binary.package.name}}"
        );
    }

    #[test]
    fn test_render_is_idempotent() {
        let release: Release = serde_json::from_str(RELEASE_JSON).unwrap();
        let template = "{{release_name}}-{{binary.image_type}}.zip";
        let first = render(template, &release);
        let second = render(template, &release);
        assert_eq!(first, second);
        assert_eq!(first, "jdk-21.0.4+7-jre.zip");
    }

    #[test]
    fn test_every_leaf_appears_once() {
        let release: Release = serde_json::from_str(RELEASE_JSON).unwrap();
        let vars = VariableMap::from_release(&release);
        assert_eq!(vars.get("binary.package.size"), Some("47775043"));
        assert_eq!(vars.get("binary.updated_at"), Some("2024-07-17T10:12:41Z"));
        assert_eq!(vars.get("version.semver"), Some("21.0.4+7.0.LTS"));
        assert_eq!(vars.get("binary.installer.link"), None);
        // 3 个顶层字段 + version 6 个 + binary 9 个 + package 8 个
        assert_eq!(vars.len(), 3 + 6 + 9 + 8);
    }
}
