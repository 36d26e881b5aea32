// 错误处理系统测试

#[cfg(test)]
mod tests {
    use crate::errors::{ErrorResponse, PlugindError};

    #[test]
    fn test_invalid_name_error() {
        let error = PlugindError::invalid_name("../../etc", "路径穿越");
        assert_eq!(error.error_code(), "INVALID_NAME");
        assert_eq!(error.status_code(), 400);
        assert!(error.is_client_error());
        assert!(!error.is_server_error());
    }

    #[test]
    fn test_not_a_repo_error() {
        let error = PlugindError::not_a_repo("my-plugin");
        assert_eq!(error.error_code(), "NOT_A_REPO");
        assert_eq!(error.status_code(), 404);
    }

    #[test]
    fn test_network_error() {
        let error = PlugindError::network("远端不可达");
        assert_eq!(error.error_code(), "NETWORK_ERROR");
        assert_eq!(error.status_code(), 502);
        assert!(error.is_server_error());
    }

    #[test]
    fn test_timeout_error() {
        let error = PlugindError::timeout("git fetch");
        assert_eq!(error.error_code(), "TIMEOUT_ERROR");
        assert_eq!(error.status_code(), 408);

        let response = ErrorResponse::from_error(&error);
        assert!(response.error.details.is_some());

        if let Some(details) = response.error.details {
            assert_eq!(details["operation"], "git fetch");
        }
    }

    #[test]
    fn test_error_logging() {
        let invalid_name = PlugindError::invalid_name("x", "y");
        assert!(!invalid_name.should_log());

        let not_a_repo = PlugindError::not_a_repo("x");
        assert!(!not_a_repo.should_log());

        let internal_error = PlugindError::internal("出错了");
        assert!(internal_error.should_log());

        let network_error = PlugindError::network("连接被拒绝");
        assert!(network_error.should_log());
    }

    #[test]
    fn test_error_response_creation() {
        let error = PlugindError::invalid_name("../../etc", "路径穿越");
        let response = ErrorResponse::from_error(&error);

        assert!(!response.success);
        assert_eq!(response.error.code, "INVALID_NAME");
        assert!(response.error.message.contains("路径穿越"));
        assert!(response.error.details.is_some());
    }

    #[test]
    fn test_error_response_with_request_id() {
        let error = PlugindError::internal("测试错误");
        let response = ErrorResponse::from_error(&error)
            .with_request_id("test-request-123".to_string());

        assert_eq!(response.request_id, Some("test-request-123".to_string()));
    }

    #[test]
    fn test_common_error_conversion() {
        let common_error = plugind_common::CommonError::validation("测试验证错误");
        let plugind_error: PlugindError = common_error.into();

        assert_eq!(plugind_error.error_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "权限不足");
        let plugind_error: PlugindError = io_error.into();

        assert_eq!(plugind_error.error_code(), "IO_ERROR");
        assert_eq!(plugind_error.status_code(), 500);
    }

    #[test]
    fn test_json_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let plugind_error: PlugindError = json_error.into();

        assert_eq!(plugind_error.error_code(), "VALIDATION_ERROR");
    }
}
