// ==========================================
// 催收名单导入系统 - 分块规划器
// ==========================================
// 阶段 2: Vec<CustomerRecord> → Vec<Chunk>
// 红线: 保持原始顺序；分块拼接后与输入完全一致
// ==========================================

use crate::domain::customer::CustomerRecord;
use crate::domain::import::{Chunk, SubmissionContext};

pub struct BatchPlanner {
    chunk_size: usize,
}

impl BatchPlanner {
    /// 分块大小为 0 时按 1 处理
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// 按固定大小切分,最后一块可以更小
    ///
    /// 分块数 = ceil(n / chunk_size),n = 0 时没有分块。
    pub fn plan(&self, records: Vec<CustomerRecord>, context: &SubmissionContext) -> Vec<Chunk> {
        let mut chunks = Vec::with_capacity(records.len().div_ceil(self.chunk_size));
        let mut remaining = records.into_iter().peekable();

        while remaining.peek().is_some() {
            let batch: Vec<CustomerRecord> = remaining.by_ref().take(self.chunk_size).collect();
            chunks.push(Chunk {
                index: chunks.len(),
                records: batch,
                context: context.clone(),
            });
        }

        chunks
    }
}
