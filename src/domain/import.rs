// ==========================================
// 催收名单导入系统 - 导入批次领域模型
// ==========================================
// 职责: 分块 (Chunk)、提交结果 (SubmissionOutcome)、终态 (ImportStatus / ImportReport)
// ==========================================

use crate::domain::customer::CustomerRecord;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

// ==========================================
// SubmissionContext - 分块共享的提交上下文
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionContext {
    /// 名单名称（源文件名去扩展名）
    pub callfile_name: String,
    /// 目标 bucket（可为空）
    pub bucket_id: Option<String>,
    /// 本次导入运行 ID（同一运行的分块共享名单）
    pub import_id: String,
}

// ==========================================
// Chunk - 提交分块
// ==========================================
// 红线: 创建后不可变,只被提交一次
#[derive(Debug, Clone)]
pub struct Chunk {
    /// 分块序号（从 0 开始,按原始顺序）
    pub index: usize,
    pub records: Vec<CustomerRecord>,
    pub context: SubmissionContext,
}

impl Chunk {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ==========================================
// RejectionKind / RejectionCause - 分块被拒原因
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RejectionKind {
    /// 名单名称唯一约束冲突
    UniqueViolation,
    /// bucket 不在允许集合内
    BucketNotIncluded,
    /// 其他后端错误
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectionCause {
    pub kind: RejectionKind,
    pub message: String,
}

impl RejectionCause {
    pub fn new(kind: RejectionKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for RejectionCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

// ==========================================
// SubmissionOutcome - 单个分块的提交结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Fulfilled { chunk_index: usize, inserted: usize },
    Rejected { chunk_index: usize, cause: RejectionCause },
}

impl SubmissionOutcome {
    pub fn chunk_index(&self) -> usize {
        match self {
            SubmissionOutcome::Fulfilled { chunk_index, .. }
            | SubmissionOutcome::Rejected { chunk_index, .. } => *chunk_index,
        }
    }

    pub fn is_fulfilled(&self) -> bool {
        matches!(self, SubmissionOutcome::Fulfilled { .. })
    }

    pub fn cause(&self) -> Option<&RejectionCause> {
        match self {
            SubmissionOutcome::Rejected { cause, .. } => Some(cause),
            SubmissionOutcome::Fulfilled { .. } => None,
        }
    }
}

// ==========================================
// ImportStatus - 导入终态（调用方可见）
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImportStatus {
    AllSucceeded,
    DuplicateBatchName,
    BucketNotIncluded,
    PartialOrUnknownFailure,
}

impl ImportStatus {
    /// 用户提示文案的 i18n key
    pub fn message_key(&self) -> &'static str {
        match self {
            ImportStatus::AllSucceeded => "import.all_succeeded",
            ImportStatus::DuplicateBatchName => "import.duplicate_batch_name",
            ImportStatus::BucketNotIncluded => "import.bucket_not_included",
            ImportStatus::PartialOrUnknownFailure => "import.partial_failure",
        }
    }

    /// 是否触发全局服务降级提示
    pub fn is_service_degraded(&self) -> bool {
        matches!(self, ImportStatus::PartialOrUnknownFailure)
    }
}

impl fmt::Display for ImportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ImportStatus::AllSucceeded => "ALL_SUCCEEDED",
            ImportStatus::DuplicateBatchName => "DUPLICATE_BATCH_NAME",
            ImportStatus::BucketNotIncluded => "BUCKET_NOT_INCLUDED",
            ImportStatus::PartialOrUnknownFailure => "PARTIAL_OR_UNKNOWN_FAILURE",
        };
        f.write_str(s)
    }
}

// ==========================================
// ImportReport - 单次导入运行结果
// ==========================================
#[derive(Debug, Clone)]
pub struct ImportReport {
    pub status: ImportStatus,
    pub context: SubmissionContext,
    /// 提交的记录总数（不论成功与否）
    pub submitted: usize,
    pub chunk_count: usize,
    pub failed_chunks: usize,
    pub outcomes: Vec<SubmissionOutcome>,
    pub elapsed_time: Duration,
}
