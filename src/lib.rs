// ==========================================
// 催收名单导入系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 客户欠款表格 → 标准化记录 → 分块并发写入
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// 性能统计
pub mod perf;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - 状态装配
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域实体
pub use domain::{
    CellValue, Chunk, CustomerRecord, FieldValue, ImportReport, ImportStatus, RawRow,
    RejectionCause, RejectionKind, SubmissionContext, SubmissionOutcome,
};

// 导入管道
pub use importer::{
    BatchPlanner, ConcurrentSubmitter, CustomerImporter, CustomerImporterImpl, ResultAggregator,
    UniversalFileParser,
};

// API
pub use api::{ImportApi, ImportApiResponse};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "催收名单导入系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert!(!APP_NAME.is_empty());
    }
}
