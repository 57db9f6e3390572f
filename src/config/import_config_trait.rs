// ==========================================
// 催收名单导入系统 - 导入配置读取 Trait
// ==========================================
// 职责: 定义导入管道所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::importer::error::ImportResult;
use async_trait::async_trait;

/// 默认分块大小（条记录）
pub const DEFAULT_CHUNK_SIZE: usize = 2000;

/// 默认同时在途的分块数
pub const DEFAULT_MAX_CONCURRENT_CHUNKS: usize = 3;

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 用途: 导入管道所需的配置读取接口
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait ImportConfigReader: Send + Sync {
    /// 获取分块大小
    ///
    /// # 默认值
    /// - 2000
    ///
    /// # 用途
    /// - BatchPlanner 按此大小切分记录
    async fn get_chunk_size(&self) -> ImportResult<usize>;

    /// 获取同时在途的分块上限
    ///
    /// # 默认值
    /// - 3
    ///
    /// # 用途
    /// - ConcurrentSubmitter 的工作者数量
    async fn get_max_concurrent_chunks(&self) -> ImportResult<usize>;
}
