// ==========================================
// 催收名单导入系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use crate::api::{ApiResult, ImportApi};
use std::path::PathBuf;
use std::sync::Arc;

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "CALLFILE_IMPORT_DB_PATH";

/// 应用状态
///
/// 包含导入API实例和数据库路径
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 导入API
    pub import_api: Arc<ImportApi>,
}

impl AppState {
    /// 创建应用状态（建表幂等）
    pub fn new(db_path: String) -> ApiResult<Self> {
        tracing::info!(db_path = %db_path, "初始化应用状态");
        let import_api = ImportApi::new(&db_path)?;

        Ok(Self {
            db_path,
            import_api: Arc::new(import_api),
        })
    }
}

/// 获取默认数据库路径
///
/// 优先级: `CALLFILE_IMPORT_DB_PATH` → 用户数据目录 → 当前目录
pub fn get_default_db_path() -> String {
    // 允许通过环境变量显式指定 DB 路径（便于调试/测试/CI）
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./callfile_import.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("callfile-import");
        // 目录创建失败时回退到当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("callfile_import.db");
        }
    }

    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_default_db_path() {
        let path = get_default_db_path();
        assert!(!path.is_empty());
        assert!(path.ends_with(".db"));
    }

    #[test]
    fn test_app_state_new() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("state.db").to_string_lossy().to_string();

        let state = AppState::new(db_path.clone()).unwrap();
        assert_eq!(state.db_path, db_path);
        assert!(!state.import_api.is_uploading());
    }
}
