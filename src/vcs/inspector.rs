// 仓库状态检查器

use crate::errors::PlugindError;
use crate::services::paths::resolve_plugin_dir;
use crate::vcs::GitClient;
use plugind_common::RepoStatus;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// 仓库状态检查器
///
/// 给定插件名，报告对应目录是否为仓库、当前分支/提交，
/// 以及远端是否有本地尚未包含的提交。每次调用都先 fetch，
/// 不做任何缓存，状态始终是新鲜的。
pub struct RepoInspector {
    client: Arc<GitClient>,
    root: PathBuf,
    remote: String,
}

impl RepoInspector {
    /// 创建检查器，插件根目录和远端名称显式注入
    pub fn new(client: Arc<GitClient>, root: PathBuf, remote: String) -> Self {
        Self {
            client,
            root,
            remote,
        }
    }

    /// 检查插件目录的仓库状态
    ///
    /// 名称非法返回 `InvalidName`；目录不是仓库返回
    /// `{isRepo: false}`；检查过程中的任何失败（仓库损坏、
    /// 网络不可达、未配置远端）被捕获并转换为带 error 字段的
    /// `{isRepo: false}`，调用方不会收到未处理的故障。
    pub async fn status(&self, name: &str) -> Result<RepoStatus, PlugindError> {
        let dir = resolve_plugin_dir(&self.root, name)?;

        if !self.client.is_repo_root(&dir) {
            debug!(plugin = %name, "目录不是版本控制仓库");
            return Ok(RepoStatus::not_a_repo());
        }

        match self.check(&dir).await {
            Ok(status) => Ok(status),
            Err(e) => {
                warn!(plugin = %name, error = %e, "仓库状态检查失败");
                Ok(RepoStatus::failed(e.to_string()))
            }
        }
    }

    async fn check(&self, dir: &Path) -> Result<RepoStatus, PlugindError> {
        // 每次检查都先同步远端引用
        self.client.fetch(dir, &self.remote).await?;

        let branch = self.client.current_branch(dir).await?;
        let commit = self.client.head_commit(dir).await?;
        let ahead = self.client.ahead_count(dir, &self.remote, &branch).await?;

        let remotes = self.client.remotes(dir).await?;
        let first_remote = remotes
            .first()
            .ok_or_else(|| PlugindError::internal("仓库未配置任何远端"))?;
        let remote_url = self.client.remote_fetch_url(dir, first_remote).await?;

        Ok(RepoStatus {
            is_repo: true,
            is_up_to_date: Some(ahead == 0),
            remote_url: Some(remote_url),
            branch: Some(branch),
            commit: Some(commit),
            error: None,
        })
    }
}
