// git 命令行客户端
// 通过子进程调用 git，网络操作统一施加超时

use crate::config::GitConfig;
use crate::errors::PlugindError;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// git 客户端
///
/// 所有仓库检查和变更操作都走 git 可执行文件。网络相关的
/// 子命令（fetch/clone/pull）在配置的超时内未完成时返回
/// `Timeout` 错误，而不是无限挂起请求。
#[derive(Debug, Clone)]
pub struct GitClient {
    binary: String,
    timeout: Duration,
    clone_depth: Option<u32>,
}

impl GitClient {
    /// 从配置创建客户端
    pub fn new(config: &GitConfig) -> Self {
        Self {
            binary: config.binary.clone(),
            timeout: Duration::from_secs(config.operation_timeout),
            clone_depth: config.clone_depth,
        }
    }

    /// 判断目录是否为版本控制仓库根
    pub fn is_repo_root(&self, dir: &Path) -> bool {
        dir.join(".git").exists()
    }

    /// 对远端执行 fetch
    pub async fn fetch(&self, dir: &Path, remote: &str) -> Result<(), PlugindError> {
        self.run_remote(Some(dir), &["fetch", remote], "git fetch").await?;
        Ok(())
    }

    /// 拉取当前分支
    pub async fn pull(&self, dir: &Path) -> Result<(), PlugindError> {
        self.run_remote(Some(dir), &["pull"], "git pull").await?;
        Ok(())
    }

    /// 在 `root` 下克隆 `url` 到名为 `dest_name` 的子目录
    pub async fn clone_into(
        &self,
        root: &Path,
        url: &str,
        dest_name: &str,
    ) -> Result<(), PlugindError> {
        let depth;
        let mut args = vec!["clone"];
        if let Some(d) = self.clone_depth {
            depth = d.to_string();
            args.push("--depth");
            args.push(&depth);
        }
        // `--` 终止选项解析，URL 不会被当作参数处理
        args.push("--");
        args.push(url);
        args.push(dest_name);

        self.run_remote(Some(root), &args, "git clone").await?;
        Ok(())
    }

    /// 读取当前分支名
    pub async fn current_branch(&self, dir: &Path) -> Result<String, PlugindError> {
        self.run_local(Some(dir), &["rev-parse", "--abbrev-ref", "HEAD"]).await
    }

    /// 读取当前提交标识
    pub async fn head_commit(&self, dir: &Path) -> Result<String, PlugindError> {
        self.run_local(Some(dir), &["rev-parse", "HEAD"]).await
    }

    /// 统计远端分支上本地尚未包含的提交数
    pub async fn ahead_count(
        &self,
        dir: &Path,
        remote: &str,
        branch: &str,
    ) -> Result<u64, PlugindError> {
        let range = format!("HEAD..{}/{}", remote, branch);
        let output = self
            .run_local(Some(dir), &["rev-list", "--count", &range])
            .await?;
        output.parse::<u64>().map_err(|_| {
            PlugindError::internal(format!("无法解析 rev-list 输出: {}", output))
        })
    }

    /// 列出已配置的远端名称
    pub async fn remotes(&self, dir: &Path) -> Result<Vec<String>, PlugindError> {
        let output = self.run_local(Some(dir), &["remote"]).await?;
        Ok(output
            .lines()
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect())
    }

    /// 读取指定远端的 fetch URL
    pub async fn remote_fetch_url(
        &self,
        dir: &Path,
        remote: &str,
    ) -> Result<String, PlugindError> {
        self.run_local(Some(dir), &["remote", "get-url", remote]).await
    }

    /// 执行本地 git 子命令
    ///
    /// 失败映射为 `Internal`，由调用方决定如何向上呈现。
    async fn run_local(
        &self,
        dir: Option<&Path>,
        args: &[&str],
    ) -> Result<String, PlugindError> {
        let output = self.spawn(dir, args).await?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(PlugindError::internal(format!(
                "git {} 失败: {}",
                args.first().unwrap_or(&""),
                stderr.trim()
            )))
        }
    }

    /// 执行网络相关的 git 子命令
    ///
    /// 超时返回 `Timeout`，非零退出码返回 `Network`。
    async fn run_remote(
        &self,
        dir: Option<&Path>,
        args: &[&str],
        operation: &str,
    ) -> Result<String, PlugindError> {
        let output = tokio::time::timeout(self.timeout, self.spawn(dir, args))
            .await
            .map_err(|_| PlugindError::timeout(operation))??;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(PlugindError::network(format!(
                "{} 失败: {}",
                operation,
                stderr.trim()
            )))
        }
    }

    async fn spawn(
        &self,
        dir: Option<&Path>,
        args: &[&str],
    ) -> Result<std::process::Output, PlugindError> {
        debug!(binary = %self.binary, args = ?args, dir = ?dir, "执行 git 命令");

        let mut cmd = Command::new(&self.binary);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let Some(dir) = dir {
            cmd.current_dir(dir);
        }

        cmd.output().await.map_err(|e| {
            PlugindError::io(format!("无法执行 {}: {}", self.binary, e))
        })
    }
}
