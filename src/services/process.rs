// 宿主进程控制
// 优雅关闭与派生替身后关闭（重启）

use crate::errors::PlugindError;
use std::process::Stdio;
use tokio::sync::mpsc;
use tracing::info;

/// 进程控制信号
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlSignal {
    /// 请求优雅关闭
    Shutdown,
}

/// 进程控制器
///
/// 通过控制通道通知主循环停止 HTTP 服务器。重启时先把
/// 当前可执行文件以脱离进程组的方式派生出去，再发出关闭
/// 信号，保证新进程不会随旧进程一起终止。
pub struct ProcessController {
    tx: mpsc::UnboundedSender<ControlSignal>,
}

impl ProcessController {
    /// 创建控制器，返回主循环监听的接收端
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ControlSignal>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// 请求优雅关闭
    ///
    /// 只发出信号立即返回，不等待关闭完成；响应在关闭
    /// 真正发生之前就已发出。
    pub fn request_shutdown(&self) -> Result<(), PlugindError> {
        info!("收到关闭请求");
        self.tx
            .send(ControlSignal::Shutdown)
            .map_err(|_| PlugindError::internal("控制通道已关闭"))
    }

    /// 请求重启
    ///
    /// 先派生并完全脱离新进程，再触发当前进程的关闭；
    /// 派生失败时不发出关闭信号。
    pub fn request_restart(&self) -> Result<(), PlugindError> {
        self.spawn_replacement()?;
        self.request_shutdown()
    }

    /// 以相同的可执行文件和参数派生新进程
    fn spawn_replacement(&self) -> Result<(), PlugindError> {
        let exe = std::env::current_exe()
            .map_err(|e| PlugindError::internal(format!("无法定位当前可执行文件: {}", e)))?;

        let mut cmd = std::process::Command::new(&exe);
        cmd.args(std::env::args_os().skip(1))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        // 脱离当前进程组，旧进程退出后新进程继续存活
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }

        let child = cmd
            .spawn()
            .map_err(|e| PlugindError::internal(format!("无法派生新进程: {}", e)))?;

        info!(pid = child.id(), exe = %exe.display(), "新进程已派生");
        Ok(())
    }
}
