// ==========================================
// 催收名单导入系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (scope_id + key → value)
// ==========================================

use crate::config::import_config_trait::{
    ImportConfigReader, DEFAULT_CHUNK_SIZE, DEFAULT_MAX_CONCURRENT_CHUNKS,
};
use crate::db::{init_schema, open_sqlite_connection};
use crate::importer::error::{ImportError, ImportResult};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> ImportResult<Self> {
        let conn = open_sqlite_connection(db_path).map_err(|e| read_error("<open>", e))?;
        init_schema(&conn).map_err(|e| read_error("<schema>", e))?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：会对传入连接再次应用统一 PRAGMA 与建表（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ImportResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| ImportError::InternalError(format!("锁获取失败: {}", e)))?;
            crate::db::configure_sqlite_connection(&guard)
                .map_err(|e| read_error("<configure>", e))?;
            init_schema(&guard).map_err(|e| read_error("<schema>", e))?;
        }

        Ok(Self { conn })
    }

    fn lock(&self) -> ImportResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| ImportError::InternalError(format!("锁获取失败: {}", e)))
    }

    /// 读取 global scope 的配置值
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_global_config_value(&self, key: &str) -> ImportResult<Option<String>> {
        let conn = self.lock()?;
        conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        )
        .optional()
        .map_err(|e| read_error(key, e))
    }

    /// 写入 global scope 的配置值（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> ImportResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2",
            params![key, value],
        )
        .map_err(|e| read_error(key, e))?;

        tracing::info!(config_key = key, value = value, "配置已更新");
        Ok(())
    }

    /// 获取所有 global 配置的快照（JSON格式）
    pub fn get_config_snapshot(&self) -> ImportResult<String> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")
            .map_err(|e| read_error("<snapshot>", e))?;

        let rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })
            .map_err(|e| read_error("<snapshot>", e))?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        for row in rows {
            let (key, value) = row.map_err(|e| read_error("<snapshot>", e))?;
            config_map.insert(key, value);
        }

        serde_json::to_string(&json!(config_map))
            .map_err(|e| ImportError::InternalError(e.to_string()))
    }

    /// 读取正整数配置；缺失时取默认值
    fn get_positive_or_default(&self, key: &str, default: usize) -> ImportResult<usize> {
        let Some(raw) = self.get_global_config_value(key)? else {
            return Ok(default);
        };

        match raw.trim().parse::<usize>() {
            Ok(value) if value > 0 => Ok(value),
            Ok(_) => Err(ImportError::ConfigValueError {
                key: key.to_string(),
                value: raw,
                message: "必须大于 0".to_string(),
            }),
            Err(e) => Err(ImportError::ConfigValueError {
                key: key.to_string(),
                value: raw,
                message: e.to_string(),
            }),
        }
    }
}

fn read_error(key: &str, err: rusqlite::Error) -> ImportError {
    ImportError::ConfigReadError {
        key: key.to_string(),
        message: err.to_string(),
    }
}

// ==========================================
// ImportConfigReader Trait 实现
// ==========================================
#[async_trait]
impl ImportConfigReader for ConfigManager {
    async fn get_chunk_size(&self) -> ImportResult<usize> {
        self.get_positive_or_default(config_keys::CHUNK_SIZE, DEFAULT_CHUNK_SIZE)
    }

    async fn get_max_concurrent_chunks(&self) -> ImportResult<usize> {
        self.get_positive_or_default(
            config_keys::MAX_CONCURRENT_CHUNKS,
            DEFAULT_MAX_CONCURRENT_CHUNKS,
        )
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 分块
    pub const CHUNK_SIZE: &str = "import.chunk_size";

    // 并发
    pub const MAX_CONCURRENT_CHUNKS: &str = "import.max_concurrent_chunks";
}
