// 插件生命周期管理
// 安装（克隆）、更新（拉取）、卸载（递归删除）

use crate::errors::PlugindError;
use crate::services::paths::{
    plugin_name_from_url, resolve_plugin_dir, validate_repo_url,
};
use crate::vcs::GitClient;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// 插件生命周期管理器
///
/// 同名插件的变更操作通过按名加锁的锁表串行化，避免两个
/// 并发的 update/uninstall 在文件系统层互相破坏工作树；
/// 不同名称的操作互不阻塞。
pub struct PluginLifecycleManager {
    root: PathBuf,
    client: Arc<GitClient>,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl PluginLifecycleManager {
    /// 创建生命周期管理器，插件根目录显式注入
    pub fn new(client: Arc<GitClient>, root: PathBuf) -> Self {
        info!(root = %root.display(), "初始化插件生命周期管理器");
        Self {
            root,
            client,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// 安装插件：把远端仓库克隆到插件根目录下
    ///
    /// 目标目录名从 URL 推导并用与其他操作相同的规则验证。
    /// 克隆是同步等待的，返回 `Ok` 表示克隆已完成。
    pub async fn install(&self, url: &str) -> Result<String, PlugindError> {
        validate_repo_url(url)?;
        let name = plugin_name_from_url(url)?;
        let dir = resolve_plugin_dir(&self.root, &name)?;

        let lock = self.lock_for(&name).await;
        let _guard = lock.lock().await;

        if tokio::fs::metadata(&dir).await.is_ok() {
            return Err(PlugindError::validation(
                "url",
                format!("同名插件已存在: {}", name),
            ));
        }

        GitClient::clone_into(&self.client, &self.root, url, &name).await?;

        info!(plugin = %name, url = %url, "插件安装完成");
        Ok(name)
    }

    /// 更新插件：在对应仓库执行 pull
    pub async fn update(&self, name: &str) -> Result<(), PlugindError> {
        let dir = resolve_plugin_dir(&self.root, name)?;

        let lock = self.lock_for(name).await;
        let _guard = lock.lock().await;

        if !self.client.is_repo_root(&dir) {
            return Err(PlugindError::not_a_repo(name));
        }

        self.client.pull(&dir).await?;

        info!(plugin = %name, "插件更新完成");
        Ok(())
    }

    /// 卸载插件：递归删除目录树
    ///
    /// 破坏性且不可逆，不做确认；确认交互由外部协作方负责。
    pub async fn uninstall(&self, name: &str) -> Result<(), PlugindError> {
        let dir = resolve_plugin_dir(&self.root, name)?;

        let lock = self.lock_for(name).await;
        let _guard = lock.lock().await;

        if tokio::fs::metadata(&dir).await.is_err() {
            warn!(plugin = %name, "插件目录不存在");
            return Err(PlugindError::io(format!("插件目录不存在: {}", name)));
        }

        tokio::fs::remove_dir_all(&dir).await.map_err(|e| {
            PlugindError::io(format!("删除插件目录 {} 失败: {}", name, e))
        })?;

        info!(plugin = %name, "插件卸载完成");
        Ok(())
    }

    /// 取得指定插件名的互斥锁
    async fn lock_for(&self, name: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
