// 插件管理 API 处理器

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info};
use utoipa::ToSchema;

use crate::errors::PlugindError;
use crate::services::{PluginLifecycleManager, PluginRegistry};
use crate::vcs::RepoInspector;
use plugind_common::{PluginEntry, RepoStatus};

/// 插件操作请求
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct PluginActionRequest {
    /// 插件目录名
    pub plugin: String,
}

/// 插件安装请求
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct InstallPluginRequest {
    /// 远端仓库 URL
    pub url: String,
}

/// 列出插件目录
#[utoipa::path(
    get,
    path = "/list",
    responses(
        (status = 200, description = "插件目录列表", body = Vec<PluginEntry>),
        (status = 500, description = "插件根目录不可读")
    ),
    tag = "plugins"
)]
pub async fn list_plugins(
    registry: web::Data<Arc<PluginRegistry>>,
) -> Result<HttpResponse, PlugindError> {
    let entries = registry.list().await?;
    debug!(count = entries.len(), "返回插件列表");
    Ok(HttpResponse::Ok().json(entries))
}

/// 检查插件仓库状态
#[utoipa::path(
    post,
    path = "/hasUpdates",
    request_body = PluginActionRequest,
    responses(
        (status = 200, description = "仓库状态快照", body = RepoStatus),
        (status = 400, description = "插件名非法")
    ),
    tag = "plugins"
)]
pub async fn has_updates(
    inspector: web::Data<Arc<RepoInspector>>,
    request: web::Json<PluginActionRequest>,
) -> Result<HttpResponse, PlugindError> {
    debug!(plugin = %request.plugin, "检查插件更新");

    let status = inspector.status(&request.plugin).await?;
    Ok(HttpResponse::Ok().json(status))
}

/// 更新插件
#[utoipa::path(
    post,
    path = "/update",
    request_body = PluginActionRequest,
    responses(
        (status = 200, description = "更新是否成功", body = bool)
    ),
    tag = "plugins"
)]
pub async fn update_plugin(
    lifecycle: web::Data<Arc<PluginLifecycleManager>>,
    request: web::Json<PluginActionRequest>,
) -> HttpResponse {
    debug!(plugin = %request.plugin, "更新插件");

    match lifecycle.update(&request.plugin).await {
        Ok(()) => {
            info!(plugin = %request.plugin, "插件更新成功");
            HttpResponse::Ok().json(true)
        }
        Err(e) => {
            error!(plugin = %request.plugin, error = %e, "插件更新失败");
            HttpResponse::Ok().json(false)
        }
    }
}

/// 安装插件
#[utoipa::path(
    post,
    path = "/install",
    request_body = InstallPluginRequest,
    responses(
        (status = 200, description = "安装是否成功", body = bool)
    ),
    tag = "plugins"
)]
pub async fn install_plugin(
    lifecycle: web::Data<Arc<PluginLifecycleManager>>,
    request: web::Json<InstallPluginRequest>,
) -> HttpResponse {
    debug!(url = %request.url, "安装插件");

    match lifecycle.install(&request.url).await {
        Ok(name) => {
            info!(plugin = %name, url = %request.url, "插件安装成功");
            HttpResponse::Ok().json(true)
        }
        Err(e) => {
            error!(url = %request.url, error = %e, "插件安装失败");
            HttpResponse::Ok().json(false)
        }
    }
}

/// 卸载插件
#[utoipa::path(
    post,
    path = "/uninstall",
    request_body = PluginActionRequest,
    responses(
        (status = 200, description = "卸载是否成功", body = bool)
    ),
    tag = "plugins"
)]
pub async fn uninstall_plugin(
    lifecycle: web::Data<Arc<PluginLifecycleManager>>,
    request: web::Json<PluginActionRequest>,
) -> HttpResponse {
    debug!(plugin = %request.plugin, "卸载插件");

    match lifecycle.uninstall(&request.plugin).await {
        Ok(()) => {
            info!(plugin = %request.plugin, "插件卸载成功");
            HttpResponse::Ok().json(true)
        }
        Err(e) => {
            error!(plugin = %request.plugin, error = %e, "插件卸载失败");
            HttpResponse::Ok().json(false)
        }
    }
}

/// 配置插件管理路由
pub fn configure_plugin_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/list", web::get().to(list_plugins))
        .route("/hasUpdates", web::post().to(has_updates))
        .route("/update", web::post().to(update_plugin))
        .route("/install", web::post().to(install_plugin))
        .route("/uninstall", web::post().to(uninstall_plugin));
}
