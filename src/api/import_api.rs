// ==========================================
// 催收名单导入API
// ==========================================
// 职责: 封装名单导入,把终态翻译为用户提示
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::ConfigManager;
use crate::db::{init_schema, open_sqlite_connection};
use crate::domain::import::{ImportReport, ImportStatus};
use crate::i18n::{status_message, t_with_args};
use crate::importer::{CustomerImporter, CustomerImporterImpl, ImportError};
use crate::repository::{CallfileEntity, CustomerImportRepositoryImpl};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// 导入API响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportApiResponse {
    /// 导入终态
    pub status: ImportStatus,
    /// 本地化提示文案
    pub message: String,
    /// 提交的记录数
    pub submitted: usize,
    pub chunk_count: usize,
    pub failed_chunks: usize,
    /// 名单名称（文件名去扩展名）
    pub batch_name: String,
    /// 本次导入运行 ID
    pub import_id: String,
    /// 全局服务降级提示
    pub service_degraded: bool,
    /// 导入耗时（毫秒）
    pub elapsed_ms: i64,
}

impl ImportApiResponse {
    fn from_report(report: &ImportReport) -> Self {
        let message = status_message(report.status, report.submitted);

        Self {
            status: report.status,
            message,
            submitted: report.submitted,
            chunk_count: report.chunk_count,
            failed_chunks: report.failed_chunks,
            batch_name: report.context.callfile_name.clone(),
            import_id: report.context.import_id.clone(),
            service_degraded: report.status.is_service_degraded(),
            elapsed_ms: report.elapsed_time.as_millis() as i64,
        }
    }
}

type SqliteImporter = CustomerImporterImpl<CustomerImportRepositoryImpl, ConfigManager>;

/// 导入API
pub struct ImportApi {
    importer: SqliteImporter,
}

impl ImportApi {
    /// 创建新的ImportApi实例（仓储与配置共享同一连接）
    pub fn new(db_path: &str) -> ApiResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| ApiError::DatabaseConnectionError(e.to_string()))?;
        init_schema(&conn).map_err(|e| ApiError::DatabaseError(e.to_string()))?;
        let conn = Arc::new(Mutex::new(conn));

        let import_repo = CustomerImportRepositoryImpl::from_connection(conn.clone())?;
        let config = ConfigManager::from_connection(conn)?;

        Ok(Self {
            importer: CustomerImporterImpl::new(import_repo, config),
        })
    }

    /// 导入客户名单
    ///
    /// # 参数
    /// - file_name: 原始文件名
    /// - bytes: 文件内容
    /// - bucket_id: 目标 bucket（可选）
    ///
    /// # 返回
    /// - Ok(ImportApiResponse): 已完成提交（包括被拒的终态）
    /// - Err(ApiError): 提交前失败（格式不支持、解析失败、配置错误）
    pub async fn import_customers(
        &self,
        file_name: &str,
        bytes: &[u8],
        bucket_id: Option<&str>,
    ) -> ApiResult<ImportApiResponse> {
        if file_name.trim().is_empty() {
            return Err(ApiError::InvalidInput("文件名不能为空".to_string()));
        }
        let bucket_id = bucket_id.map(str::trim).filter(|b| !b.is_empty());

        match self
            .importer
            .import_spreadsheet(file_name, bytes, bucket_id)
            .await
        {
            Ok(report) => Ok(ImportApiResponse::from_report(&report)),
            Err(ImportError::UnsupportedFormat(ext)) => Err(ApiError::InvalidInput(
                t_with_args("import.unsupported_format", &[("ext", &ext)]),
            )),
            Err(e) if e.is_parse_error() => Err(ApiError::ImportError(t_with_args(
                "import.pipeline_failed",
                &[("reason", &e.to_string())],
            ))),
            Err(e) => Err(e.into()),
        }
    }

    /// 从文件路径导入
    pub async fn import_file(
        &self,
        file_path: &Path,
        bucket_id: Option<&str>,
    ) -> ApiResult<ImportApiResponse> {
        let bytes = tokio::fs::read(file_path)
            .await
            .map_err(|e| ApiError::InvalidInput(format!("{}: {}", file_path.display(), e)))?;
        let file_name = file_path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        self.import_customers(&file_name, &bytes, bucket_id).await
    }

    /// 是否有导入正在进行
    pub fn is_uploading(&self) -> bool {
        self.importer.is_uploading()
    }

    /// 登记允许导入的 bucket
    pub fn register_bucket(&self, bucket_id: &str, name: &str) -> ApiResult<()> {
        if bucket_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("bucket_id 不能为空".to_string()));
        }
        Ok(self.importer.repository().register_bucket(bucket_id.trim(), name)?)
    }

    /// 列出已导入的名单
    pub fn list_callfiles(&self) -> ApiResult<Vec<CallfileEntity>> {
        Ok(self.importer.repository().list_callfiles()?)
    }
}
