use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use std::sync::Arc;
use std::time::Duration;

use plugind::api::routes::ApiRouteConfig;
use plugind::config::ConfigLoader;
use plugind::errors::ErrorHandlerMiddleware;
use plugind::logging::LoggingSetup;
use plugind::services::{PluginLifecycleManager, PluginRegistry, ProcessController};
use plugind::vcs::{GitClient, RepoInspector};

/// 端口被旧进程占用时的重试次数
const BIND_RETRY_LIMIT: u32 = 20;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // 初始化配置
    let config = ConfigLoader::init()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;

    // 初始化结构化日志系统
    LoggingSetup::init(&config.logging)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;

    tracing::info!("🚀 启动 Plugind v{}", config.environment.version);

    if !config.plugins.root.exists() {
        tracing::warn!(
            root = %config.plugins.root.display(),
            "插件根目录不存在，列表请求将返回错误"
        );
    }

    // 构建核心组件，插件根目录显式注入
    let client = Arc::new(GitClient::new(&config.git));
    let registry = Arc::new(PluginRegistry::new(config.plugins.root.clone()));
    let inspector = Arc::new(RepoInspector::new(
        client.clone(),
        config.plugins.root.clone(),
        config.git.remote.clone(),
    ));
    let lifecycle = Arc::new(PluginLifecycleManager::new(
        client.clone(),
        config.plugins.root.clone(),
    ));
    let (controller, mut control_rx) = ProcessController::new();
    let controller = Arc::new(controller);

    // 打印配置摘要
    ConfigLoader::print_summary();

    tracing::info!("🌐 服务器启动地址: http://{}:{}", config.server.host, config.server.port);
    tracing::info!("📋 健康检查: http://{}:{}/health", config.server.host, config.server.port);

    let registry_data = web::Data::new(registry);
    let inspector_data = web::Data::new(inspector);
    let lifecycle_data = web::Data::new(lifecycle);
    let controller_data = web::Data::new(controller);

    let build_server = || {
        let registry = registry_data.clone();
        let inspector = inspector_data.clone();
        let lifecycle = lifecycle_data.clone();
        let controller = controller_data.clone();

        HttpServer::new(move || {
            App::new()
                // CORS 配置
                .wrap(
                    Cors::default()
                        .allow_any_origin()
                        .allow_any_method()
                        .allow_any_header()
                        .max_age(3600)
                )
                // 添加错误处理中间件
                .wrap(ErrorHandlerMiddleware)
                // 添加 tracing 中间件
                .wrap(tracing_actix_web::TracingLogger::default())
                .app_data(registry.clone())
                .app_data(inspector.clone())
                .app_data(lifecycle.clone())
                .app_data(controller.clone())
                .configure(ApiRouteConfig::configure_all)
        })
    };

    // 重启后旧进程可能尚未释放监听端口，在宽限期内重试绑定
    let addr = (config.server.host.clone(), config.server.port);
    let mut attempts = 0u32;
    let server = loop {
        let mut server = build_server()
            .keep_alive(Duration::from_secs(config.server.keep_alive))
            .client_request_timeout(Duration::from_millis(config.server.client_timeout))
            .shutdown_timeout(config.server.client_shutdown / 1000);

        if let Some(workers) = config.server.workers {
            server = server.workers(workers);
        }

        match server.bind(addr.clone()) {
            Ok(bound) => break bound,
            Err(e) if e.kind() == std::io::ErrorKind::AddrInUse && attempts < BIND_RETRY_LIMIT => {
                attempts += 1;
                tracing::warn!(attempt = attempts, "监听端口被占用，等待释放后重试");
                tokio::time::sleep(Duration::from_millis(500)).await;
            }
            Err(e) => return Err(e),
        }
    };

    let server = server.run();
    let handle = server.handle();

    // 控制通道任务：收到信号后优雅停止 HTTP 服务器
    tokio::spawn(async move {
        if control_rx.recv().await.is_some() {
            tracing::info!("开始优雅关闭 HTTP 服务器");
            handle.stop(true).await;
        }
    });

    server.await
}
