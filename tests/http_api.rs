// HTTP 端点契约测试
//
// 涉及真实 git 仓库的场景在本地临时目录中搭建（以本地裸仓库
// 模拟远端），环境中没有 git 可执行文件时提前跳过。

use actix_web::{test, web, App};
use plugind::api::routes::configure_routes;
use plugind::config::GitConfig;
use plugind::services::process::ControlSignal;
use plugind::services::{PluginLifecycleManager, PluginRegistry, ProcessController};
use plugind::vcs::{GitClient, RepoInspector};
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn git_config() -> GitConfig {
    GitConfig {
        binary: "git".to_string(),
        remote: "origin".to_string(),
        operation_timeout: 60,
        clone_depth: None,
    }
}

/// 构建与 main 相同组件装配的测试应用
macro_rules! sidecar_app {
    ($root:expr) => {{
        let root: PathBuf = $root.to_path_buf();
        let client = Arc::new(GitClient::new(&git_config()));
        let registry = web::Data::new(Arc::new(PluginRegistry::new(root.clone())));
        let inspector = web::Data::new(Arc::new(RepoInspector::new(
            client.clone(),
            root.clone(),
            "origin".to_string(),
        )));
        let lifecycle = web::Data::new(Arc::new(PluginLifecycleManager::new(
            client.clone(),
            root.clone(),
        )));
        let (controller, control_rx) = ProcessController::new();
        let controller = web::Data::new(Arc::new(controller));

        let app = test::init_service(
            App::new()
                .app_data(registry)
                .app_data(inspector)
                .app_data(lifecycle)
                .app_data(controller)
                .configure(configure_routes),
        )
        .await;
        (app, control_rx)
    }};
}

fn git_available() -> bool {
    std::process::Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

fn run_git(dir: &Path, args: &[&str]) {
    let output = std::process::Command::new("git")
        .args([
            "-c",
            "user.email=test@example.com",
            "-c",
            "user.name=test",
            "-c",
            "init.defaultBranch=main",
        ])
        .args(args)
        .current_dir(dir)
        .output()
        .expect("无法执行 git");
    assert!(
        output.status.success(),
        "git {:?} 失败: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}

/// 搭建裸仓库充当远端，以及一个已推送初始提交的工作副本
fn setup_remote(base: &Path, name: &str) -> (PathBuf, PathBuf) {
    let bare = base.join(format!("{}.git", name));
    run_git(base, &["init", "--bare", bare.to_str().unwrap()]);

    let seed = base.join(format!("{}-seed", name));
    run_git(base, &[
        "clone",
        bare.to_str().unwrap(),
        seed.to_str().unwrap(),
    ]);
    std::fs::write(seed.join("README.md"), "hello").unwrap();
    run_git(&seed, &["add", "."]);
    run_git(&seed, &["commit", "-m", "init"]);
    run_git(&seed, &["push", "-u", "origin", "main"]);

    (bare, seed)
}

#[actix_web::test]
async fn test_liveness_and_health() {
    let tmp = tempfile::tempdir().unwrap();
    let (app, _rx) = sidecar_app!(tmp.path());

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert!(resp.status().is_success());

    let health: serde_json::Value =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri("/health").to_request())
            .await;
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["service"], "plugind");
}

#[actix_web::test]
async fn test_list_empty_root() {
    let tmp = tempfile::tempdir().unwrap();
    let (app, _rx) = sidecar_app!(tmp.path());

    let entries: Vec<serde_json::Value> =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri("/list").to_request())
            .await;
    assert!(entries.is_empty());
}

#[actix_web::test]
async fn test_list_only_directories() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::create_dir(tmp.path().join("a-plugin")).unwrap();
    std::fs::write(tmp.path().join("stray-file.txt"), "x").unwrap();

    let (app, _rx) = sidecar_app!(tmp.path());

    let entries: Vec<serde_json::Value> =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri("/list").to_request())
            .await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["name"], "a-plugin");
}

#[actix_web::test]
async fn test_list_missing_root_is_server_error() {
    let tmp = tempfile::tempdir().unwrap();
    let (app, _rx) = sidecar_app!(tmp.path().join("missing"));

    let resp = test::call_service(&app, test::TestRequest::get().uri("/list").to_request()).await;
    assert_eq!(resp.status(), 500);
}

#[actix_web::test]
async fn test_has_updates_rejects_traversal() {
    let tmp = tempfile::tempdir().unwrap();
    let (app, _rx) = sidecar_app!(tmp.path());

    let req = test::TestRequest::post()
        .uri("/hasUpdates")
        .set_json(serde_json::json!({ "plugin": "../../etc" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn test_has_updates_on_non_repo() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::create_dir(tmp.path().join("plain")).unwrap();

    let (app, _rx) = sidecar_app!(tmp.path());

    let status: serde_json::Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/hasUpdates")
            .set_json(serde_json::json!({ "plugin": "plain" }))
            .to_request(),
    )
    .await;
    assert_eq!(status["isRepo"], false);
}

#[actix_web::test]
async fn test_uninstall_then_list() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::create_dir(tmp.path().join("doomed")).unwrap();

    let (app, _rx) = sidecar_app!(tmp.path());

    let removed: bool = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/uninstall")
            .set_json(serde_json::json!({ "plugin": "doomed" }))
            .to_request(),
    )
    .await;
    assert!(removed);

    let entries: Vec<serde_json::Value> =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri("/list").to_request())
            .await;
    assert!(entries.is_empty());
}

#[actix_web::test]
async fn test_uninstall_traversal_is_false_and_harmless() {
    let tmp = tempfile::tempdir().unwrap();
    let victim = tmp.path().join("victim");
    std::fs::create_dir(&victim).unwrap();
    std::fs::write(victim.join("data"), "x").unwrap();

    let root = tmp.path().join("plugins");
    std::fs::create_dir(&root).unwrap();
    let (app, _rx) = sidecar_app!(&root);

    let removed: bool = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/uninstall")
            .set_json(serde_json::json!({ "plugin": "../victim" }))
            .to_request(),
    )
    .await;
    assert!(!removed);
    assert!(victim.join("data").exists());
}

#[actix_web::test]
async fn test_install_rejects_bad_url() {
    let tmp = tempfile::tempdir().unwrap();
    let (app, _rx) = sidecar_app!(tmp.path());

    let installed: bool = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/install")
            .set_json(serde_json::json!({ "url": "-oProxyCommand=evil" }))
            .to_request(),
    )
    .await;
    assert!(!installed);
}

#[actix_web::test]
async fn test_exit_sends_shutdown_signal() {
    let tmp = tempfile::tempdir().unwrap();
    let (app, mut rx) = sidecar_app!(tmp.path());

    let resp =
        test::call_service(&app, test::TestRequest::get().uri("/exit").to_request()).await;
    assert!(resp.status().is_success());

    assert_eq!(rx.recv().await, Some(ControlSignal::Shutdown));
}

#[actix_web::test]
async fn test_install_status_update_flow() {
    if !git_available() {
        eprintln!("git 不可用，跳过");
        return;
    }

    let tmp = tempfile::tempdir().unwrap();
    let (bare, seed) = setup_remote(tmp.path(), "myplugin");

    let root = tmp.path().join("plugins");
    std::fs::create_dir(&root).unwrap();
    let (app, _rx) = sidecar_app!(&root);

    // 安装：克隆被同步等待，返回 true 即克隆完成
    let installed: bool = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/install")
            .set_json(serde_json::json!({ "url": bare.to_str().unwrap() }))
            .to_request(),
    )
    .await;
    assert!(installed);

    // 列表包含新插件
    let entries: Vec<serde_json::Value> =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri("/list").to_request())
            .await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["name"], "myplugin");

    // 刚克隆的仓库与远端同步
    let status: serde_json::Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/hasUpdates")
            .set_json(serde_json::json!({ "plugin": "myplugin" }))
            .to_request(),
    )
    .await;
    assert_eq!(status["isRepo"], true);
    assert_eq!(status["isUpToDate"], true);
    assert_eq!(status["branch"], "main");
    assert!(status["commit"].as_str().is_some());
    assert!(status["remoteUrl"].as_str().is_some());

    // 向远端推送新提交后，本地落后
    std::fs::write(seed.join("update.txt"), "new").unwrap();
    run_git(&seed, &["add", "."]);
    run_git(&seed, &["commit", "-m", "update"]);
    run_git(&seed, &["push", "origin", "main"]);

    let status: serde_json::Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/hasUpdates")
            .set_json(serde_json::json!({ "plugin": "myplugin" }))
            .to_request(),
    )
    .await;
    assert_eq!(status["isUpToDate"], false);

    // 更新后恢复同步
    let updated: bool = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/update")
            .set_json(serde_json::json!({ "plugin": "myplugin" }))
            .to_request(),
    )
    .await;
    assert!(updated);

    let status: serde_json::Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/hasUpdates")
            .set_json(serde_json::json!({ "plugin": "myplugin" }))
            .to_request(),
    )
    .await;
    assert_eq!(status["isUpToDate"], true);

    // 卸载后列表为空
    let removed: bool = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/uninstall")
            .set_json(serde_json::json!({ "plugin": "myplugin" }))
            .to_request(),
    )
    .await;
    assert!(removed);

    let entries: Vec<serde_json::Value> =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri("/list").to_request())
            .await;
    assert!(entries.is_empty());
}

#[actix_web::test]
async fn test_concurrent_updates_on_distinct_plugins() {
    if !git_available() {
        eprintln!("git 不可用，跳过");
        return;
    }

    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path().join("plugins");
    std::fs::create_dir(&root).unwrap();

    for name in ["alpha", "beta"] {
        let (bare, _seed) = setup_remote(tmp.path(), name);
        run_git(&root, &["clone", bare.to_str().unwrap(), name]);
    }

    let (app, _rx) = sidecar_app!(&root);

    let req_a = test::TestRequest::post()
        .uri("/update")
        .set_json(serde_json::json!({ "plugin": "alpha" }))
        .to_request();
    let req_b = test::TestRequest::post()
        .uri("/update")
        .set_json(serde_json::json!({ "plugin": "beta" }))
        .to_request();

    let (resp_a, resp_b) = futures::join!(
        test::call_and_read_body_json::<_, _, bool>(&app, req_a),
        test::call_and_read_body_json::<_, _, bool>(&app, req_b),
    );
    assert!(resp_a);
    assert!(resp_b);
}
