// 错误响应格式化

use crate::errors::PlugindError;
use actix_web::HttpResponse;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 错误响应结构
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetail,
    pub timestamp: DateTime<Utc>,
    pub request_id: Option<String>,
}

/// 错误详情
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    /// 从 PlugindError 创建错误响应
    pub fn from_error(error: &PlugindError) -> Self {
        // 根据错误类型设置详细信息
        let details = match error {
            PlugindError::InvalidName { name, .. } => {
                Some(serde_json::json!({ "name": name }))
            }
            PlugindError::NotARepo { plugin } => {
                Some(serde_json::json!({ "plugin": plugin }))
            }
            PlugindError::Validation { field, .. } => {
                Some(serde_json::json!({ "field": field }))
            }
            PlugindError::Timeout { operation } => {
                Some(serde_json::json!({ "operation": operation }))
            }
            _ => None,
        };

        Self {
            success: false,
            error: ErrorDetail {
                code: error.error_code().to_string(),
                message: error.to_string(),
                details,
            },
            timestamp: Utc::now(),
            request_id: None,
        }
    }

    /// 设置请求 ID
    pub fn with_request_id(mut self, request_id: String) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// 转换为 HTTP 响应
    pub fn into_http_response(self) -> HttpResponse {
        let status_code = match self.error.code.as_str() {
            "INVALID_NAME" => 400,
            "NOT_A_REPO" => 404,
            "NETWORK_ERROR" => 502,
            "IO_ERROR" => 500,
            "TIMEOUT_ERROR" => 408,
            "VALIDATION_ERROR" => 400,
            "CONFIGURATION_ERROR" => 500,
            "INTERNAL_ERROR" => 500,
            _ => 500,
        };

        let mut response = HttpResponse::build(
            actix_web::http::StatusCode::from_u16(status_code)
                .unwrap_or(actix_web::http::StatusCode::INTERNAL_SERVER_ERROR),
        );

        // 添加请求 ID 头
        if let Some(ref request_id) = self.request_id {
            response.insert_header(("X-Request-ID", request_id.clone()));
        }

        response.json(self)
    }

    /// 创建通用错误响应
    pub fn generic_error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: ErrorDetail {
                code: "INTERNAL_ERROR".to_string(),
                message: message.into(),
                details: None,
            },
            timestamp: Utc::now(),
            request_id: None,
        }
    }
}
