// ==========================================
// 催收名单导入系统 - 提交结果汇总
// ==========================================
// 阶段 4: Vec<SubmissionOutcome> → ImportStatus
// 判定（只取决于被拒原因的集合,与顺序无关）:
// - 无被拒分块 → AllSucceeded
// - 被拒原因全部为唯一约束冲突 → DuplicateBatchName
// - 存在 bucket 排除且无唯一约束冲突 → BucketNotIncluded
// - 其他 → PartialOrUnknownFailure
// ==========================================

use crate::domain::import::{ImportStatus, RejectionCause, RejectionKind, SubmissionOutcome};
use crate::importer::error::{ImportError, ImportResult};

/// 唯一约束冲突的错误文本特征
const UNIQUE_SIGNATURES: &[&str] = &[
    "duplicate key value violates unique constraint",
    "UNIQUE constraint failed",
];

/// bucket 排除的错误文本特征
const BUCKET_SIGNATURE: &str = "not included";

pub struct ResultAggregator;

impl ResultAggregator {
    fn is_unique_violation(cause: &RejectionCause) -> bool {
        cause.kind == RejectionKind::UniqueViolation
            || UNIQUE_SIGNATURES.iter().any(|sig| cause.message.contains(sig))
    }

    fn is_bucket_exclusion(cause: &RejectionCause) -> bool {
        cause.kind == RejectionKind::BucketNotIncluded || cause.message.contains(BUCKET_SIGNATURE)
    }

    /// 汇总所有分块结果
    ///
    /// 结果数量必须等于分块数量,否则返回 `OutcomeCountMismatch`。
    pub fn classify(
        &self,
        outcomes: &[SubmissionOutcome],
        expected_chunks: usize,
    ) -> ImportResult<ImportStatus> {
        if outcomes.len() != expected_chunks {
            return Err(ImportError::OutcomeCountMismatch {
                expected: expected_chunks,
                actual: outcomes.len(),
            });
        }

        let causes: Vec<&RejectionCause> =
            outcomes.iter().filter_map(SubmissionOutcome::cause).collect();

        if causes.is_empty() {
            return Ok(ImportStatus::AllSucceeded);
        }

        let any_unique = causes.iter().any(|c| Self::is_unique_violation(c));
        if causes.iter().all(|c| Self::is_unique_violation(c)) {
            return Ok(ImportStatus::DuplicateBatchName);
        }
        if !any_unique && causes.iter().any(|c| Self::is_bucket_exclusion(c)) {
            return Ok(ImportStatus::BucketNotIncluded);
        }

        Ok(ImportStatus::PartialOrUnknownFailure)
    }
}
