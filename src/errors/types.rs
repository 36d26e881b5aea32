// 统一错误类型定义

use actix_web::{HttpResponse, ResponseError};
use plugind_common::CommonError;
use serde::{Deserialize, Serialize};

use thiserror::Error;
use tracing::error;

/// Plugind 统一错误类型
#[derive(Debug, Error, Serialize, Deserialize)]
#[serde(tag = "error_type", content = "details")]
pub enum PlugindError {
    /// 非法插件名称（路径穿越或格式错误）
    #[error("非法插件名称: {name} - {message}")]
    InvalidName { name: String, message: String },

    /// 目标目录不是版本控制仓库
    #[error("目标不是版本控制仓库: {plugin}")]
    NotARepo { plugin: String },

    /// 网络错误（fetch/clone/pull 失败）
    #[error("网络错误: {message}")]
    Network { message: String },

    /// 文件系统错误
    #[error("文件系统错误: {message}")]
    Io { message: String },

    /// 超时错误
    #[error("操作超时: {operation}")]
    Timeout { operation: String },

    /// 验证错误
    #[error("验证错误: {field} - {message}")]
    Validation { field: String, message: String },

    /// 配置错误
    #[error("配置错误: {message}")]
    Configuration { message: String },

    /// 内部服务器错误
    #[error("内部服务器错误: {message}")]
    Internal { message: String },
}

impl PlugindError {
    /// 获取错误代码
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidName { .. } => "INVALID_NAME",
            Self::NotARepo { .. } => "NOT_A_REPO",
            Self::Network { .. } => "NETWORK_ERROR",
            Self::Io { .. } => "IO_ERROR",
            Self::Timeout { .. } => "TIMEOUT_ERROR",
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::Configuration { .. } => "CONFIGURATION_ERROR",
            Self::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    /// 获取 HTTP 状态码
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidName { .. } => 400,
            Self::NotARepo { .. } => 404,
            Self::Network { .. } => 502,
            Self::Io { .. } => 500,
            Self::Timeout { .. } => 408,
            Self::Validation { .. } => 400,
            Self::Configuration { .. } => 500,
            Self::Internal { .. } => 500,
        }
    }

    /// 是否为客户端错误
    pub fn is_client_error(&self) -> bool {
        matches!(self.status_code(), 400..=499)
    }

    /// 是否为服务器错误
    pub fn is_server_error(&self) -> bool {
        matches!(self.status_code(), 500..=599)
    }

    /// 是否应该记录错误日志
    pub fn should_log(&self) -> bool {
        match self {
            Self::InvalidName { .. } | Self::Validation { .. } | Self::NotARepo { .. } => false,
            _ => true,
        }
    }

    /// 创建非法名称错误
    pub fn invalid_name(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidName {
            name: name.into(),
            message: message.into(),
        }
    }

    /// 创建非仓库错误
    pub fn not_a_repo(plugin: impl Into<String>) -> Self {
        Self::NotARepo {
            plugin: plugin.into(),
        }
    }

    /// 创建网络错误
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// 创建文件系统错误
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// 创建超时错误
    pub fn timeout(operation: impl Into<String>) -> Self {
        Self::Timeout {
            operation: operation.into(),
        }
    }

    /// 创建验证错误
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// 创建配置错误
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

/// 实现 ResponseError trait 以便与 Actix Web 集成
impl ResponseError for PlugindError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        actix_web::http::StatusCode::from_u16(self.status_code())
            .unwrap_or(actix_web::http::StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        // 记录错误日志
        if self.should_log() {
            error!(
                error_code = %self.error_code(),
                error_message = %self,
                "处理请求时发生错误"
            );
        }

        // 构建错误响应
        crate::errors::ErrorResponse::from_error(self).into_http_response()
    }
}

/// 从 CommonError 转换
impl From<CommonError> for PlugindError {
    fn from(err: CommonError) -> Self {
        match err {
            CommonError::Validation { message } => Self::validation("general", message),
            CommonError::Configuration { message } => Self::configuration(message),
            CommonError::NotFound { resource } => Self::io(format!("资源未找到: {}", resource)),
            CommonError::ExternalService { service, message } => {
                Self::network(format!("{}: {}", service, message))
            }
            CommonError::Internal { message } => Self::internal(message),
        }
    }
}

/// 从 config::ConfigError 转换
impl From<config::ConfigError> for PlugindError {
    fn from(err: config::ConfigError) -> Self {
        Self::configuration(format!("配置加载错误: {}", err))
    }
}

/// 从 std::io::Error 转换
impl From<std::io::Error> for PlugindError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::TimedOut => Self::timeout("文件操作"),
            _ => Self::io(format!("IO 错误: {}", err)),
        }
    }
}

/// 从 serde_json::Error 转换
impl From<serde_json::Error> for PlugindError {
    fn from(err: serde_json::Error) -> Self {
        Self::validation("json", format!("JSON 解析错误: {}", err))
    }
}
