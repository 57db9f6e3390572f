// ==========================================
// 催收名单导入系统 - 应用层
// ==========================================
// 职责: 应用状态装配（数据库路径 + API 实例）
// ==========================================

pub mod state;

// 重导出
pub use state::{get_default_db_path, AppState, DB_PATH_ENV};
