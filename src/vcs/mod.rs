// 版本控制模块
// 封装 git 命令行客户端和仓库状态检查

pub mod client;
pub mod inspector;

pub use client::*;
pub use inspector::*;
