// ==========================================
// 催收名单导入系统 - 客户导入 Repository Trait
// ==========================================
// 职责: 定义分块批量写入接口（不包含业务逻辑）
// 红线: Repository 不含业务规则,只做数据写入
// ==========================================

use crate::domain::customer::CustomerRecord;
use crate::domain::import::SubmissionContext;
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

// ==========================================
// CustomerImportRepository Trait
// ==========================================
// 用途: 名单分块批量写入
// 实现者: CustomerImportRepositoryImpl（使用 rusqlite）
#[async_trait]
pub trait CustomerImportRepository: Send + Sync {
    /// 批量写入一个分块的客户记录
    ///
    /// # 参数
    /// - records: 分块内的标准化记录
    /// - context: 名单名称 / bucket / 导入运行 ID
    ///
    /// # 返回
    /// - Ok(usize): 写入的记录数
    /// - Err(UniqueConstraintViolation): 同名名单已被其他导入运行占用
    /// - Err(BucketNotIncluded): bucket 不在允许集合内
    /// - Err: 其他数据库错误（本分块整体回滚）
    async fn bulk_insert_customers(
        &self,
        records: &[CustomerRecord],
        context: &SubmissionContext,
    ) -> RepositoryResult<usize>;
}
