// 进程生命周期 API 处理器

use actix_web::{web, HttpResponse};
use std::sync::Arc;
use tracing::info;

use crate::errors::PlugindError;
use crate::services::ProcessController;

/// 存活探针
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "服务存活", body = String)
    ),
    tag = "process"
)]
pub async fn liveness() -> HttpResponse {
    HttpResponse::Ok().body("plugind 插件管理边车运行中")
}

/// 触发宿主进程优雅关闭
///
/// 响应在关闭完成之前发出。
#[utoipa::path(
    get,
    path = "/exit",
    responses(
        (status = 200, description = "已触发关闭", body = String),
        (status = 500, description = "控制通道不可用")
    ),
    tag = "process"
)]
pub async fn exit_server(
    controller: web::Data<Arc<ProcessController>>,
) -> Result<HttpResponse, PlugindError> {
    info!("通过 API 触发关闭");

    controller.request_shutdown()?;
    Ok(HttpResponse::Ok().body("plugind 正在关闭"))
}

/// 触发宿主进程重启
///
/// 新进程先派生并脱离进程组，随后旧进程开始关闭。
#[utoipa::path(
    get,
    path = "/restart",
    responses(
        (status = 200, description = "已触发重启", body = String),
        (status = 500, description = "派生新进程失败")
    ),
    tag = "process"
)]
pub async fn restart_server(
    controller: web::Data<Arc<ProcessController>>,
) -> Result<HttpResponse, PlugindError> {
    info!("通过 API 触发重启");

    controller.request_restart()?;
    Ok(HttpResponse::Ok().body("plugind 正在重启"))
}

/// 配置进程生命周期路由
pub fn configure_process_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(liveness))
        .route("/exit", web::get().to(exit_server))
        .route("/restart", web::get().to(restart_server));
}
