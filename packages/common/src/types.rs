// 通用类型定义

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 插件目录条目
///
/// 插件根目录下的一个直接子目录。仅在单次请求内有效，
/// 每次列表请求重新枚举，不做持久化。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PluginEntry {
    /// 插件目录名
    pub name: String,
}

impl PluginEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// 仓库状态快照
///
/// 单次检查的时点快照，响应发送后即丢弃。
/// 非仓库目录只携带 `is_repo: false`，其余字段省略。
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RepoStatus {
    /// 目标目录是否为版本控制仓库根
    pub is_repo: bool,
    /// 本地分支是否与远端同步
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_up_to_date: Option<bool>,
    /// 第一个已配置远端的 fetch URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_url: Option<String>,
    /// 当前分支名
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    /// 当前提交标识
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
    /// 检查过程中发生的错误（不透明文本）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RepoStatus {
    /// 非仓库目录的状态
    pub fn not_a_repo() -> Self {
        Self {
            is_repo: false,
            ..Self::default()
        }
    }

    /// 检查失败时的状态，携带错误详情
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            is_repo: false,
            error: Some(error.into()),
            ..Self::default()
        }
    }
}
