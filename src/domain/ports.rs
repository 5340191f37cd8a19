use crate::domain::model::ScrubRule;
use crate::utils::error::Result;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// 提供依序套用到目標檔案的規則列表
pub trait RuleProvider {
    fn rules(&self) -> Vec<ScrubRule>;
}
