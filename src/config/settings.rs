// 应用程序设置和配置
// 定义配置结构体和加载逻辑

use config::{Config, ConfigError, Environment, File};
use plugind_common::CommonError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 应用程序配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub plugins: PluginsConfig,
    pub git: GitConfig,
    pub logging: LoggingConfig,
    pub environment: EnvironmentConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
    pub keep_alive: u64,
    pub client_timeout: u64,
    pub client_shutdown: u64,
}

/// 插件根目录配置
///
/// 插件根目录是显式注入的配置值，所有组件在构造时接收，
/// 不从进程工作目录隐式推导。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginsConfig {
    pub root: PathBuf,
}

/// 版本控制客户端配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitConfig {
    /// git 可执行文件名或路径
    pub binary: String,
    /// 跟踪的远端名称
    pub remote: String,
    /// 网络操作（fetch/clone/pull）超时，单位秒
    pub operation_timeout: u64,
    /// 克隆深度，None 表示完整克隆
    pub clone_depth: Option<u32>,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub file_enabled: bool,
    pub file_path: Option<String>,
    pub max_file_size: Option<u64>,
    pub max_files: Option<u32>,
}

/// 环境配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    pub name: String,
    pub debug: bool,
    pub version: String,
}

impl AppConfig {
    /// 从环境变量和配置文件加载配置
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Config::builder();

        // 1. 加载默认配置
        config = config.add_source(Config::try_from(&AppConfig::default())?);

        // 2. 尝试加载配置文件
        if Path::new("config.toml").exists() {
            config = config.add_source(File::with_name("config"));
        }

        // 3. 加载环境变量（优先级最高）
        config = config.add_source(
            Environment::with_prefix("PLUGIND")
                .prefix_separator("_")
                .separator("__")
        );

        // 4. 构建配置
        let config = config.build()?;

        // 5. 反序列化为结构体
        let mut app_config: AppConfig = config.try_deserialize()?;

        // 6. 设置版本信息
        app_config.environment.version = env!("CARGO_PKG_VERSION").to_string();

        Ok(app_config)
    }

    /// 验证配置
    pub fn validate(&self) -> Result<(), CommonError> {
        use crate::config::ConfigValidator;

        match ConfigValidator::validate_all(self) {
            Ok(()) => Ok(()),
            Err(errors) => {
                let error_messages: Vec<String> = errors.iter()
                    .map(|e| e.to_string())
                    .collect();
                Err(CommonError::configuration(
                    format!("配置验证失败: {}", error_messages.join("; "))
                ))
            }
        }
    }

    /// 获取环境类型
    pub fn is_development(&self) -> bool {
        self.environment.name == "development"
    }

    /// 获取环境类型
    pub fn is_production(&self) -> bool {
        self.environment.name == "production"
    }

    /// 获取环境类型
    pub fn is_test(&self) -> bool {
        self.environment.name == "test"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8188,
                workers: None,
                keep_alive: 75,
                client_timeout: 5000,
                client_shutdown: 5000,
            },
            plugins: PluginsConfig {
                root: PathBuf::from("./plugins"),
            },
            git: GitConfig {
                binary: "git".to_string(),
                remote: "origin".to_string(),
                operation_timeout: 60,
                clone_depth: None,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "json".to_string(),
                file_enabled: false,
                file_path: None,
                max_file_size: Some(100 * 1024 * 1024), // 100MB
                max_files: Some(10),
            },
            environment: EnvironmentConfig {
                name: "development".to_string(),
                debug: true,
                version: "0.1.0".to_string(),
            },
        }
    }
}
