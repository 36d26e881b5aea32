// 插件名称验证和路径解析
//
// 整个系统唯一的安全不变量：插件名解析出的路径永远不能
// 逃出插件根目录。所有操作在每次调用时重新验证，不信任
// 任何外部传入的路径。

use crate::errors::PlugindError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

/// 合法插件名：字母数字开头，之后允许字母数字、点、下划线、连字符
static PLUGIN_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").unwrap());

/// 插件名最大长度，与常见文件系统的目录名上限一致
const MAX_NAME_LEN: usize = 255;

/// 验证用户提供的插件名
pub fn validate_plugin_name(name: &str) -> Result<(), PlugindError> {
    if name.is_empty() {
        return Err(PlugindError::invalid_name(name, "插件名不能为空"));
    }

    if name.len() > MAX_NAME_LEN {
        return Err(PlugindError::invalid_name(name, "插件名过长"));
    }

    if !PLUGIN_NAME_RE.is_match(name) {
        return Err(PlugindError::invalid_name(
            name,
            "插件名只允许字母数字开头，包含字母数字、点、下划线和连字符",
        ));
    }

    // 正则已排除分隔符和前导点，这里再排除纯点序列
    if name.chars().all(|c| c == '.') {
        return Err(PlugindError::invalid_name(name, "插件名不能是点序列"));
    }

    Ok(())
}

/// 将插件名解析为插件根目录下的路径
///
/// 验证名称后拼接路径，并确认结果仍是根目录的直接子项。
pub fn resolve_plugin_dir(root: &Path, name: &str) -> Result<PathBuf, PlugindError> {
    validate_plugin_name(name)?;

    let dir = root.join(name);
    if dir.parent() != Some(root) {
        return Err(PlugindError::invalid_name(name, "解析路径逃出插件根目录"));
    }

    Ok(dir)
}

/// 校验不受信任的远端仓库 URL
///
/// 只做形状检查：非空、不以 `-` 开头（防止参数注入）、
/// 可解析时协议必须在白名单内。本地路径原样放行，
/// 由 git 客户端决定能否克隆。
pub fn validate_repo_url(url: &str) -> Result<(), PlugindError> {
    let trimmed = url.trim();

    if trimmed.is_empty() {
        return Err(PlugindError::validation("url", "仓库 URL 不能为空"));
    }

    if trimmed.starts_with('-') {
        return Err(PlugindError::validation("url", "仓库 URL 不能以 - 开头"));
    }

    if trimmed.contains('\0') {
        return Err(PlugindError::validation("url", "仓库 URL 包含非法字符"));
    }

    if let Ok(parsed) = url::Url::parse(trimmed) {
        const ALLOWED_SCHEMES: &[&str] = &["http", "https", "git", "ssh", "file"];
        if !ALLOWED_SCHEMES.contains(&parsed.scheme()) {
            return Err(PlugindError::validation(
                "url",
                format!("不支持的协议: {}", parsed.scheme()),
            ));
        }
    }

    Ok(())
}

/// 从远端 URL 推导目标目录名
///
/// 取最后一段路径并去掉 `.git` 后缀，推导结果必须通过与
/// 其他操作相同的插件名验证。
pub fn plugin_name_from_url(url: &str) -> Result<String, PlugindError> {
    let trimmed = url.trim().trim_end_matches('/');

    let last_segment = trimmed
        .rsplit('/')
        .next()
        .unwrap_or(trimmed);
    // scp 形式的地址（git@host:repo.git）没有斜杠分隔
    let last_segment = last_segment.rsplit(':').next().unwrap_or(last_segment);

    let name = last_segment.trim_end_matches(".git");

    validate_plugin_name(name)?;
    Ok(name.to_string())
}
