// 服务层模块
// 插件枚举、生命周期管理和进程控制

pub mod paths;
pub mod registry;
pub mod lifecycle;
pub mod process;

pub use registry::PluginRegistry;
pub use lifecycle::PluginLifecycleManager;
pub use process::ProcessController;
