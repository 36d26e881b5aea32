// API 路由定义
// 所有端点挂载在服务根路径下

use actix_web::{web, HttpResponse, Result as ActixResult};
use utoipa::OpenApi;

use crate::api::handlers::{plugin, process};
use crate::health;

/// API 文档聚合
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Plugind API",
        description = "插件管理边车服务 API 接口文档",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    paths(
        process::liveness,
        process::exit_server,
        process::restart_server,
        plugin::list_plugins,
        plugin::has_updates,
        plugin::update_plugin,
        plugin::install_plugin,
        plugin::uninstall_plugin,
    ),
    components(schemas(
        plugind_common::PluginEntry,
        plugind_common::RepoStatus,
        crate::api::handlers::plugin::PluginActionRequest,
        crate::api::handlers::plugin::InstallPluginRequest,
    )),
    tags(
        (name = "process", description = "宿主进程生命周期相关接口"),
        (name = "plugins", description = "插件管理相关接口"),
    )
)]
pub struct ApiDoc;

/// 配置 API 路由
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(process::configure_process_routes)
        .configure(plugin::configure_plugin_routes)
        .route("/health", web::get().to(health::health_check))
        .route("/openapi.json", web::get().to(get_openapi_spec));
}

/// 获取 OpenAPI 规范
async fn get_openapi_spec() -> ActixResult<HttpResponse> {
    let openapi = ApiDoc::openapi();
    Ok(HttpResponse::Ok().json(openapi))
}

/// 配置 Swagger UI
#[cfg(feature = "docs")]
pub fn configure_swagger_ui(cfg: &mut web::ServiceConfig) {
    cfg.service(
        utoipa_swagger_ui::SwaggerUi::new("/docs/{_:.*}")
            .url("/openapi.json", ApiDoc::openapi())
    );
}

/// API 路由配置辅助函数
pub struct ApiRouteConfig;

impl ApiRouteConfig {
    /// 配置所有 API 路由
    pub fn configure_all(cfg: &mut web::ServiceConfig) {
        configure_routes(cfg);

        #[cfg(feature = "docs")]
        configure_swagger_ui(cfg);
    }
}
