// 配置验证器
// 提供详细的配置验证逻辑

use crate::config::AppConfig;
use plugind_common::CommonError;

/// 配置验证器
pub struct ConfigValidator;

impl ConfigValidator {
    /// 验证完整配置
    pub fn validate_all(config: &AppConfig) -> Result<(), Vec<CommonError>> {
        let mut errors = Vec::new();

        // 验证各个模块
        if let Err(e) = Self::validate_server(&config.server) {
            errors.push(e);
        }

        if let Err(e) = Self::validate_plugins(&config.plugins) {
            errors.push(e);
        }

        if let Err(e) = Self::validate_git(&config.git) {
            errors.push(e);
        }

        if let Err(e) = Self::validate_logging(&config.logging) {
            errors.push(e);
        }

        if let Err(e) = Self::validate_environment(&config.environment) {
            errors.push(e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// 验证服务器配置
    pub fn validate_server(config: &crate::config::ServerConfig) -> Result<(), CommonError> {
        if config.port == 0 {
            return Err(CommonError::validation("服务器端口不能为 0"));
        }

        if config.port < 1024 && !cfg!(test) {
            return Err(CommonError::validation("建议使用 1024 以上的端口"));
        }

        if config.host.is_empty() {
            return Err(CommonError::validation("服务器主机地址不能为空"));
        }

        if let Some(workers) = config.workers {
            if workers == 0 {
                return Err(CommonError::validation("工作线程数不能为 0"));
            }
            if workers > 32 {
                return Err(CommonError::validation("工作线程数不建议超过 32"));
            }
        }

        Ok(())
    }

    /// 验证插件根目录配置
    pub fn validate_plugins(config: &crate::config::PluginsConfig) -> Result<(), CommonError> {
        if config.root.as_os_str().is_empty() {
            return Err(CommonError::validation("插件根目录不能为空"));
        }

        Ok(())
    }

    /// 验证版本控制客户端配置
    pub fn validate_git(config: &crate::config::GitConfig) -> Result<(), CommonError> {
        if config.binary.is_empty() {
            return Err(CommonError::validation("git 可执行文件不能为空"));
        }

        if config.remote.is_empty() {
            return Err(CommonError::validation("远端名称不能为空"));
        }

        // 远端名称混入空白或路径分隔符会破坏后续的命令行调用
        if config.remote.chars().any(|c| c.is_whitespace() || c == '/' || c == '\\') {
            return Err(CommonError::validation("远端名称包含非法字符"));
        }

        if config.operation_timeout == 0 {
            return Err(CommonError::validation("网络操作超时不能为 0"));
        }

        if let Some(depth) = config.clone_depth {
            if depth == 0 {
                return Err(CommonError::validation("克隆深度不能为 0"));
            }
        }

        Ok(())
    }

    /// 验证日志配置
    pub fn validate_logging(config: &crate::config::LoggingConfig) -> Result<(), CommonError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&config.level.to_lowercase().as_str()) {
            return Err(CommonError::validation(
                format!("无效的日志级别: {}", config.level)
            ));
        }

        let valid_formats = ["json", "pretty", "compact", "full"];
        if !valid_formats.contains(&config.format.as_str()) {
            return Err(CommonError::validation(
                format!("无效的日志格式: {}", config.format)
            ));
        }

        if config.file_enabled && config.file_path.is_none() {
            return Err(CommonError::validation("启用文件日志时必须指定日志文件路径"));
        }

        Ok(())
    }

    /// 验证环境配置
    pub fn validate_environment(config: &crate::config::EnvironmentConfig) -> Result<(), CommonError> {
        let valid_names = ["development", "production", "test"];
        if !valid_names.contains(&config.name.as_str()) {
            return Err(CommonError::validation(
                format!("无效的环境名称: {}", config.name)
            ));
        }

        Ok(())
    }
}
