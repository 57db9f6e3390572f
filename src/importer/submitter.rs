// ==========================================
// 催收名单导入系统 - 并发提交器
// ==========================================
// 阶段 3: Vec<Chunk> → Vec<SubmissionOutcome>
// 模型: N 个工作者从共享队列取分块,同时在途的分块数不超过 N
// 红线: 每个分块恰好提交一次、恰好产生一个结果；单块失败不影响其他分块
// 红线: 不重试、不回滚已成功的分块（至少一次语义）
// ==========================================

use crate::domain::import::{Chunk, RejectionCause, RejectionKind, SubmissionOutcome};
use crate::repository::{CustomerImportRepository, RepositoryError};
use futures::future::join_all;
use std::collections::VecDeque;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

pub struct ConcurrentSubmitter {
    max_in_flight: usize,
}

/// 仓储错误 → 分块被拒原因
pub fn rejection_cause(err: &RepositoryError) -> RejectionCause {
    let kind = match err {
        RepositoryError::UniqueConstraintViolation(_) => RejectionKind::UniqueViolation,
        RepositoryError::BucketNotIncluded { .. } => RejectionKind::BucketNotIncluded,
        _ => RejectionKind::Other,
    };
    RejectionCause::new(kind, err.to_string())
}

impl ConcurrentSubmitter {
    /// 并发上限为 0 时按 1 处理
    pub fn new(max_in_flight: usize) -> Self {
        Self {
            max_in_flight: max_in_flight.max(1),
        }
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight
    }

    /// 提交全部分块,返回按分块序号排序的结果
    pub async fn submit_all<R>(&self, repo: &R, chunks: Vec<Chunk>) -> Vec<SubmissionOutcome>
    where
        R: CustomerImportRepository + ?Sized,
    {
        let total = chunks.len();
        if total == 0 {
            return Vec::new();
        }

        let workers = self.max_in_flight.min(total);
        info!(chunks = total, workers, "开始并发提交");

        let queue = Mutex::new(chunks.into_iter().collect::<VecDeque<_>>());
        let queue = &queue;

        let worker_futures = (0..workers).map(|worker_id| async move {
            let mut settled = Vec::new();
            loop {
                let next = queue.lock().await.pop_front();
                let Some(chunk) = next else {
                    break;
                };
                settled.push(Self::submit_chunk(repo, worker_id, chunk).await);
            }
            settled
        });

        let mut outcomes: Vec<SubmissionOutcome> = join_all(worker_futures)
            .await
            .into_iter()
            .flatten()
            .collect();
        outcomes.sort_by_key(SubmissionOutcome::chunk_index);

        let rejected = outcomes.iter().filter(|o| !o.is_fulfilled()).count();
        info!(chunks = total, rejected, "并发提交结束");
        outcomes
    }

    async fn submit_chunk<R>(repo: &R, worker_id: usize, chunk: Chunk) -> SubmissionOutcome
    where
        R: CustomerImportRepository + ?Sized,
    {
        debug!(worker_id, chunk_index = chunk.index, records = chunk.len(), "提交分块");

        match repo
            .bulk_insert_customers(&chunk.records, &chunk.context)
            .await
        {
            Ok(inserted) => {
                info!(chunk_index = chunk.index, inserted, "分块提交成功");
                SubmissionOutcome::Fulfilled {
                    chunk_index: chunk.index,
                    inserted,
                }
            }
            Err(err) => {
                let cause = rejection_cause(&err);
                warn!(
                    chunk_index = chunk.index,
                    records = chunk.len(),
                    kind = ?cause.kind,
                    error = %err,
                    "分块提交被拒"
                );
                SubmissionOutcome::Rejected {
                    chunk_index: chunk.index,
                    cause,
                }
            }
        }
    }
}
