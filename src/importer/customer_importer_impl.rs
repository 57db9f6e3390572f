// ==========================================
// 催收名单导入系统 - 客户名单导入器实现
// ==========================================
// 职责: 串联导入管道,从文件字节到终态
// 流程: 解析 → 标准化 → 分块 → 并发提交 → 汇总
// 红线: 解析失败时不提交任何分块；提交开始后一定产出终态
// ==========================================

use crate::config::ImportConfigReader;
use crate::domain::import::{ImportReport, SubmissionContext};
use crate::importer::batch_planner::BatchPlanner;
use crate::importer::customer_importer_trait::{CustomerImporter, FieldNormalizer};
use crate::importer::error::ImportResult;
use crate::importer::field_normalizer::FieldNormalizer as FieldNormalizerImpl;
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::result_aggregator::ResultAggregator;
use crate::importer::submitter::ConcurrentSubmitter;
use crate::perf::PerfGuard;
use crate::repository::CustomerImportRepository;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// 进行中的导入运行计数；drop 时递减
struct UploadingGuard<'a>(&'a AtomicUsize);

impl<'a> UploadingGuard<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for UploadingGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// 名单名称: 文件名去掉扩展名
pub fn batch_name_from_file(file_name: &str) -> String {
    let path = Path::new(file_name);
    path.file_stem()
        .or_else(|| path.file_name())
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_string())
}

// ==========================================
// CustomerImporterImpl - 客户名单导入器实现
// ==========================================
pub struct CustomerImporterImpl<R, C>
where
    R: CustomerImportRepository,
    C: ImportConfigReader,
{
    // 数据访问层
    import_repo: R,

    // 配置读取器
    config: C,

    // 导入组件
    field_normalizer: Box<dyn FieldNormalizer>,
    aggregator: ResultAggregator,

    // 进度标志
    active_runs: AtomicUsize,
}

impl<R, C> CustomerImporterImpl<R, C>
where
    R: CustomerImportRepository,
    C: ImportConfigReader,
{
    /// 使用默认组件创建导入器
    pub fn new(import_repo: R, config: C) -> Self {
        Self::with_normalizer(import_repo, config, Box::new(FieldNormalizerImpl::default()))
    }

    /// 指定字段标准化器创建导入器
    pub fn with_normalizer(
        import_repo: R,
        config: C,
        field_normalizer: Box<dyn FieldNormalizer>,
    ) -> Self {
        Self {
            import_repo,
            config,
            field_normalizer,
            aggregator: ResultAggregator,
            active_runs: AtomicUsize::new(0),
        }
    }

    /// 是否有导入运行正在进行（从开始到终态计算完成）
    pub fn is_uploading(&self) -> bool {
        self.active_runs.load(Ordering::SeqCst) > 0
    }

    pub fn repository(&self) -> &R {
        &self.import_repo
    }
}

#[async_trait::async_trait]
impl<R, C> CustomerImporter for CustomerImporterImpl<R, C>
where
    R: CustomerImportRepository + Send + Sync,
    C: ImportConfigReader + Send + Sync,
{
    #[instrument(skip(self, bytes), fields(import_id = tracing::field::Empty, file_size = bytes.len()))]
    async fn import_spreadsheet(
        &self,
        file_name: &str,
        bytes: &[u8],
        bucket_id: Option<&str>,
    ) -> ImportResult<ImportReport> {
        let _uploading = UploadingGuard::enter(&self.active_runs);
        let mut perf = PerfGuard::new("import_spreadsheet");

        let import_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("import_id", import_id.as_str());
        info!(file_name = %file_name, bucket_id = ?bucket_id, "开始导入客户名单");

        let chunk_size = self.config.get_chunk_size().await?;
        let max_in_flight = self.config.get_max_concurrent_chunks().await?;
        debug!(chunk_size, max_in_flight, "导入参数");

        // === 步骤 1: 解析文件 ===
        debug!("步骤 1: 解析文件");
        let raw_rows = UniversalFileParser
            .parse(file_name, bytes)
            .map_err(|e| {
                error!(error = %e, "文件解析失败,本次导入未提交任何数据");
                e
            })?;
        info!(total_rows = raw_rows.len(), "文件解析完成");

        // === 步骤 2: 字段标准化 ===
        debug!("步骤 2: 字段标准化");
        let records: Vec<_> = raw_rows
            .iter()
            .map(|row| self.field_normalizer.normalize(row))
            .collect();
        perf.set_rows(records.len());
        info!(records = records.len(), "字段标准化完成");

        // === 步骤 3: 分块 ===
        let context = SubmissionContext {
            callfile_name: batch_name_from_file(file_name),
            bucket_id: bucket_id.map(str::to_string),
            import_id,
        };
        let submitted = records.len();
        let chunks = BatchPlanner::new(chunk_size).plan(records, &context);
        let chunk_count = chunks.len();
        info!(chunk_count, callfile = %context.callfile_name, "分块完成");
        if chunk_count == 0 {
            warn!("文件无数据行,跳过提交");
        }

        // === 步骤 4: 并发提交 ===
        let outcomes = ConcurrentSubmitter::new(max_in_flight)
            .submit_all(&self.import_repo, chunks)
            .await;

        // === 步骤 5: 汇总 ===
        let status = self.aggregator.classify(&outcomes, chunk_count)?;
        let failed_chunks = outcomes.iter().filter(|o| !o.is_fulfilled()).count();

        if status.is_service_degraded() {
            error!(%status, failed_chunks, "导入失败,原因未知或部分失败");
        } else {
            info!(%status, failed_chunks, submitted, "导入完成");
        }

        Ok(ImportReport {
            status,
            context,
            submitted,
            chunk_count,
            failed_chunks,
            outcomes,
            elapsed_time: perf.elapsed(),
        })
    }

    async fn import_from_file<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
        bucket_id: Option<&str>,
    ) -> ImportResult<ImportReport> {
        let path = file_path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        self.import_spreadsheet(&file_name, &bytes, bucket_id).await
    }
}
