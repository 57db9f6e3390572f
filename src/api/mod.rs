// ==========================================
// 催收名单导入系统 - API 层
// ==========================================
// 职责: 对外导入接口,返回带本地化提示的响应
// ==========================================

pub mod error;
pub mod import_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use import_api::{ImportApi, ImportApiResponse};
