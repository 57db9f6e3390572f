// ==========================================
// 催收名单导入系统 - 客户导入 Repository 实现
// ==========================================
// 职责: 实现分块写入与名单/bucket 管理（使用 rusqlite）
// 红线: 一个分块一个事务；分块之间不回滚
// ==========================================

use crate::db::{init_schema, open_sqlite_connection};
use crate::domain::customer::CustomerRecord;
use crate::domain::import::SubmissionContext;
use crate::repository::customer_import_repo::CustomerImportRepository;
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};

const CALLFILE_UNIQUE_INDEX: &str = "ux_callfile_name_bucket";

// ==========================================
// CallfileEntity - 名单查询结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallfileEntity {
    pub callfile_id: i64,
    pub name: String,
    pub bucket_id: Option<String>,
    pub import_id: String,
    pub created_at: String,
    pub customer_count: usize,
}

// ==========================================
// CustomerImportRepositoryImpl
// ==========================================
pub struct CustomerImportRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl CustomerImportRepositoryImpl {
    /// 创建新的 Repository 实例（建表幂等）
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        init_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建（与 ConfigManager 共享连接）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            crate::db::configure_sqlite_connection(&guard)?;
            init_schema(&guard)?;
        }
        Ok(Self { conn })
    }

    fn lock(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ===== bucket 管理 =====

    /// 登记（或重新启用）一个允许导入的 bucket
    pub fn register_bucket(&self, bucket_id: &str, name: &str) -> RepositoryResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO bucket (bucket_id, name, is_active) VALUES (?1, ?2, 1)
             ON CONFLICT(bucket_id) DO UPDATE SET name = ?2, is_active = 1",
            params![bucket_id, name],
        )?;
        Ok(())
    }

    /// 停用 bucket（之后的导入将被拒绝）
    pub fn deactivate_bucket(&self, bucket_id: &str) -> RepositoryResult<bool> {
        let conn = self.lock()?;
        let affected = conn.execute(
            "UPDATE bucket SET is_active = 0 WHERE bucket_id = ?1",
            params![bucket_id],
        )?;
        Ok(affected > 0)
    }

    // ===== 查询 =====

    /// 统计某名单下的客户数（名单不存在返回 0）
    pub fn count_customers(
        &self,
        callfile_name: &str,
        bucket_id: Option<&str>,
    ) -> RepositoryResult<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row(
            r#"
            SELECT COUNT(c.customer_id)
            FROM callfile f
            JOIN customer c ON c.callfile_id = f.callfile_id
            WHERE f.name = ?1 AND IFNULL(f.bucket_id, '') = IFNULL(?2, '')
            "#,
            params![callfile_name, bucket_id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// 列出全部名单（按创建顺序）
    pub fn list_callfiles(&self) -> RepositoryResult<Vec<CallfileEntity>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT f.callfile_id, f.name, f.bucket_id, f.import_id, f.created_at,
                   (SELECT COUNT(*) FROM customer c WHERE c.callfile_id = f.callfile_id)
            FROM callfile f
            ORDER BY f.callfile_id
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(CallfileEntity {
                callfile_id: row.get(0)?,
                name: row.get(1)?,
                bucket_id: row.get(2)?,
                import_id: row.get(3)?,
                created_at: row.get(4)?,
                customer_count: row.get::<_, i64>(5)? as usize,
            })
        })?;

        let mut callfiles = Vec::new();
        for row in rows {
            callfiles.push(row?);
        }
        Ok(callfiles)
    }

    // ===== 事务内步骤 =====

    /// bucket 必须存在且处于启用状态（未指定 bucket 时放行）
    fn ensure_bucket_included_tx(tx: &Transaction, bucket_id: Option<&str>) -> RepositoryResult<()> {
        let Some(bucket_id) = bucket_id else {
            return Ok(());
        };

        let active: Option<bool> = tx
            .query_row(
                "SELECT is_active FROM bucket WHERE bucket_id = ?1",
                params![bucket_id],
                |row| row.get(0),
            )
            .optional()?;

        match active {
            Some(true) => Ok(()),
            _ => Err(RepositoryError::BucketNotIncluded {
                bucket_id: bucket_id.to_string(),
            }),
        }
    }

    /// 获取本次导入运行的名单 ID；名称被其他运行占用时违反唯一约束
    fn resolve_callfile_tx(tx: &Transaction, context: &SubmissionContext) -> RepositoryResult<i64> {
        let existing: Option<(i64, String)> = tx
            .query_row(
                "SELECT callfile_id, import_id FROM callfile
                 WHERE name = ?1 AND IFNULL(bucket_id, '') = IFNULL(?2, '')",
                params![context.callfile_name, context.bucket_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        match existing {
            Some((callfile_id, import_id)) if import_id == context.import_id => Ok(callfile_id),
            Some(_) => Err(RepositoryError::UniqueConstraintViolation(format!(
                "duplicate key value violates unique constraint \"{}\" (name={})",
                CALLFILE_UNIQUE_INDEX, context.callfile_name
            ))),
            None => {
                tx.execute(
                    "INSERT INTO callfile (name, bucket_id, import_id, created_at)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![
                        context.callfile_name,
                        context.bucket_id,
                        context.import_id,
                        Utc::now().to_rfc3339()
                    ],
                )?;
                Ok(tx.last_insert_rowid())
            }
        }
    }

    fn insert_customers_tx(
        tx: &Transaction,
        callfile_id: i64,
        records: &[CustomerRecord],
    ) -> RepositoryResult<usize> {
        let mut stmt = tx.prepare(
            r#"
            INSERT INTO customer (
                callfile_id, case_id, principal, total_os, balance, payload_json, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )?;

        let created_at = Utc::now().to_rfc3339();
        let mut count = 0;
        for record in records {
            let payload = serde_json::to_string(record)?;
            stmt.execute(params![
                callfile_id,
                record.text("case_id"),
                record.number("principal").unwrap_or(0.0),
                record.number("total_os").unwrap_or(0.0),
                record.number("balance").unwrap_or(0.0),
                payload,
                created_at,
            ])?;
            count += 1;
        }
        Ok(count)
    }
}

#[async_trait]
impl CustomerImportRepository for CustomerImportRepositoryImpl {
    async fn bulk_insert_customers(
        &self,
        records: &[CustomerRecord],
        context: &SubmissionContext,
    ) -> RepositoryResult<usize> {
        let mut conn = self.lock()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        Self::ensure_bucket_included_tx(&tx, context.bucket_id.as_deref())?;
        let callfile_id = Self::resolve_callfile_tx(&tx, context)?;
        let inserted = Self::insert_customers_tx(&tx, callfile_id, records)?;

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        tracing::debug!(
            callfile = %context.callfile_name,
            callfile_id,
            inserted,
            "分块写入完成"
        );
        Ok(inserted)
    }
}
