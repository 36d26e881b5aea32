// 插件目录枚举

use crate::errors::PlugindError;
use plugind_common::PluginEntry;
use std::path::PathBuf;
use tracing::debug;

/// 插件目录注册表
///
/// 枚举插件根目录的直接子目录。无副作用，每次请求重新
/// 读取文件系统，顺序为文件系统枚举顺序，不保证稳定。
pub struct PluginRegistry {
    root: PathBuf,
}

impl PluginRegistry {
    /// 创建注册表，插件根目录显式注入
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// 列出所有插件目录
    ///
    /// 仅包含文件类型为目录的条目；符号链接不被跟随，
    /// 指向目录的符号链接因此不会出现在结果中。
    /// 根目录不存在或不可读返回 `Io` 错误。
    pub async fn list(&self) -> Result<Vec<PluginEntry>, PlugindError> {
        let mut read_dir = tokio::fs::read_dir(&self.root).await.map_err(|e| {
            PlugindError::io(format!(
                "读取插件根目录 {} 失败: {}",
                self.root.display(),
                e
            ))
        })?;

        let mut entries = Vec::new();
        while let Some(entry) = read_dir.next_entry().await? {
            let file_type = entry.file_type().await?;
            if !file_type.is_dir() {
                continue;
            }

            match entry.file_name().into_string() {
                Ok(name) => entries.push(PluginEntry::new(name)),
                Err(raw) => {
                    debug!(name = ?raw, "跳过名称不是合法 UTF-8 的目录");
                }
            }
        }

        debug!(count = entries.len(), "插件目录枚举完成");
        Ok(entries)
    }
}
