// ==========================================
// 催收名单导入系统 - 领域层
// ==========================================
// 职责: 导入管道各阶段的数据结构
// 红线: 领域层不依赖仓储与导入实现
// ==========================================

pub mod customer;
pub mod import;

// 重导出核心类型
pub use customer::{format_number, CellValue, CustomerRecord, FieldValue, RawRow};
pub use import::{
    Chunk, ImportReport, ImportStatus, RejectionCause, RejectionKind, SubmissionContext,
    SubmissionOutcome,
};
