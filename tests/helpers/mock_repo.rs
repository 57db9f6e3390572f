// ==========================================
// Mock 仓储实现 - 用于集成测试
// ==========================================
// 按分块首条记录的 case_id 注入失败；记录最大在途分块数
// ==========================================

use async_trait::async_trait;
use callfile_import::domain::{CustomerRecord, SubmissionContext};
use callfile_import::repository::{CustomerImportRepository, RepositoryError, RepositoryResult};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub enum FailMode {
    Unique,
    Bucket,
    Other,
}

#[derive(Default)]
pub struct MockRepo {
    pub fail_on: HashMap<String, FailMode>,
    pub delay_ms: u64,
    pub in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    pub calls: AtomicUsize,
    pub inserted: Mutex<Vec<CustomerRecord>>,
}

impl MockRepo {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            ..Self::default()
        }
    }

    pub fn failing(mut self, case_id: &str, mode: FailMode) -> Self {
        self.fail_on.insert(case_id.to_string(), mode);
        self
    }

    pub fn inserted_count(&self) -> usize {
        self.inserted.lock().unwrap().len()
    }
}

#[async_trait]
impl CustomerImportRepository for MockRepo {
    async fn bulk_insert_customers(
        &self,
        records: &[CustomerRecord],
        context: &SubmissionContext,
    ) -> RepositoryResult<usize> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let first = records
            .first()
            .and_then(|r| r.text("case_id"))
            .unwrap_or_default()
            .to_string();
        match self.fail_on.get(&first) {
            Some(FailMode::Unique) => Err(RepositoryError::UniqueConstraintViolation(format!(
                "duplicate key value violates unique constraint (name={})",
                context.callfile_name
            ))),
            Some(FailMode::Bucket) => Err(RepositoryError::BucketNotIncluded {
                bucket_id: context.bucket_id.clone().unwrap_or_default(),
            }),
            Some(FailMode::Other) => Err(RepositoryError::DatabaseQueryError(
                "connection reset by peer".to_string(),
            )),
            None => {
                self.inserted.lock().unwrap().extend_from_slice(records);
                Ok(records.len())
            }
        }
    }
}
