// ==========================================
// Mock 配置实现 - 用于集成测试
// ==========================================

use async_trait::async_trait;
use callfile_import::config::ImportConfigReader;
use callfile_import::importer::ImportResult;

/// Mock 配置结构
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub chunk_size: usize,
    pub max_concurrent_chunks: usize,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            chunk_size: 2000,
            max_concurrent_chunks: 3,
        }
    }
}

impl MockConfig {
    /// 创建自定义分块配置
    pub fn with_chunks(chunk_size: usize, max_concurrent_chunks: usize) -> Self {
        Self {
            chunk_size,
            max_concurrent_chunks,
        }
    }
}

#[async_trait]
impl ImportConfigReader for MockConfig {
    async fn get_chunk_size(&self) -> ImportResult<usize> {
        Ok(self.chunk_size)
    }

    async fn get_max_concurrent_chunks(&self) -> ImportResult<usize> {
        Ok(self.max_concurrent_chunks)
    }
}
