// API 模块
// 统一导出所有 API 相关组件

pub mod routes;
pub mod handlers;

pub use routes::*;
pub use handlers::*;
