use crate::domain::model::{GeneratedContent, GenerationRequest};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn company_name(&self) -> &str;
    fn page_title(&self) -> &str;
    fn generation_endpoint(&self) -> &str;
    fn model(&self) -> &str;
    fn request_timeout(&self) -> Option<Duration>;
    fn output_path(&self) -> &str;
    fn output_filename(&self) -> &str;
    fn submission_delay(&self) -> Duration;
    fn fill_unmatched(&self) -> bool;
}

#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedContent>;
}
