// ==========================================
// 催收名单导入系统 - 客户导入 Trait
// ==========================================
// 职责: 定义导入管道各阶段接口（不包含实现）
// 管道: 解析 → 标准化 → 分块 → 并发提交 → 汇总
// ==========================================

use crate::domain::customer::{CellValue, CustomerRecord, RawRow};
use crate::domain::import::ImportReport;
use crate::importer::error::ImportResult;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::path::Path;

// ==========================================
// CustomerImporter Trait
// ==========================================
// 用途: 客户名单导入主接口
// 实现者: CustomerImporterImpl
#[async_trait]
pub trait CustomerImporter: Send + Sync {
    /// 从内存字节导入一份客户名单
    ///
    /// # 参数
    /// - file_name: 原始文件名（用于格式识别与名单命名）
    /// - bytes: 文件内容
    /// - bucket_id: 目标 bucket（可选）
    ///
    /// # 返回
    /// - Ok(ImportReport): 已完成提交,终态见 `status`
    /// - Err: 解析失败等阻断错误,此时没有任何分块被提交
    async fn import_spreadsheet(
        &self,
        file_name: &str,
        bytes: &[u8],
        bucket_id: Option<&str>,
    ) -> ImportResult<ImportReport>;

    /// 从文件路径导入（读取后委托 `import_spreadsheet`）
    async fn import_from_file<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
        bucket_id: Option<&str>,
    ) -> ImportResult<ImportReport>;
}

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口（阶段 0）
// 实现者: ExcelParser, CsvParser
pub trait FileParser: Send + Sync {
    /// 解析文件字节为原始行（表头 → 单元格）
    ///
    /// 只读取第一个工作表；完全空白的行被跳过。
    fn parse_to_raw_rows(&self, bytes: &[u8]) -> ImportResult<Vec<RawRow>>;
}

// ==========================================
// FieldNormalizer Trait
// ==========================================
// 用途: 字段标准化接口（阶段 1）
// 实现者: FieldNormalizer
pub trait FieldNormalizer: Send + Sync {
    /// 原始行 → 标准化客户记录（不失败）
    fn normalize(&self, row: &RawRow) -> CustomerRecord;
}

// ==========================================
// DataCleaner Trait
// ==========================================
// 用途: 单元格级清洗接口
// 实现者: DataCleaner
pub trait DataCleaner: Send + Sync {
    /// 清洗文本字段（TRIM）
    fn clean_text(&self, value: &str) -> String;

    /// 标准化 NULL 值（空字符串/空白 → None）
    fn normalize_null(&self, value: Option<String>) -> Option<String>;

    /// 解析金额
    ///
    /// # 返回
    /// - Some(f64): 有限非负数
    /// - None: 空值、不可解析、负数或非有限数
    fn parse_money(&self, cell: &CellValue) -> Option<f64>;

    /// 解析日期（多种文本格式 + Excel 序列日期）
    fn parse_date(&self, cell: &CellValue) -> Option<NaiveDate>;

    /// 逗号拆分为列表,空段忽略
    fn split_list(&self, cell: &CellValue) -> Vec<String>;

    /// 清洗标识字段（TRIM,可选去掉一个前导 `-`）
    fn clean_identifier(&self, cell: &CellValue, strip_leading_hyphen: bool) -> Option<String>;
}
