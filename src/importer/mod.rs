// ==========================================
// 催收名单导入系统 - 导入层
// ==========================================
// 职责: 表格文件 → 标准化客户记录 → 分块并发提交 → 终态
// 支持: Excel (xlsx/xls/xlsb/ods), CSV
// ==========================================

// 模块声明
pub mod batch_planner;
pub mod customer_importer_impl;
pub mod customer_importer_trait;
pub mod data_cleaner;
pub mod error;
pub mod field_normalizer;
pub mod field_rules;
pub mod file_parser;
pub mod phone;
pub mod result_aggregator;
pub mod submitter;

// 重导出核心类型
pub use batch_planner::BatchPlanner;
pub use customer_importer_impl::{batch_name_from_file, CustomerImporterImpl};
pub use data_cleaner::DataCleaner as DataCleanerImpl;
pub use error::{ImportError, ImportResult};
pub use field_normalizer::FieldNormalizer as FieldNormalizerImpl;
pub use field_rules::{FieldKind, FieldRule, FIELD_RULES};
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};
pub use result_aggregator::ResultAggregator;
pub use submitter::ConcurrentSubmitter;

// 重导出 Trait 接口
pub use customer_importer_trait::{CustomerImporter, DataCleaner, FieldNormalizer, FileParser};
