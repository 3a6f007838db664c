use crate::core::catalog;
use crate::core::dom::Document;
use crate::core::populator::{self, PageEvent, PageSnapshot, PopulateOptions};
use crate::core::renderer::{page_shell, render_services};
use crate::core::{ConfigProvider, ContentGenerator, GenerationRequest, Storage};
use crate::domain::model::Service;
use crate::utils::error::Result;

#[derive(Debug, Clone)]
pub struct SiteOutput {
    pub output_path: String,
    pub snapshot: PageSnapshot,
    pub document: Document,
    pub generation_succeeded: bool,
}

pub struct SiteEngine<S: Storage, C: ConfigProvider, G: ContentGenerator> {
    storage: S,
    config: C,
    generator: G,
    services: &'static [Service],
}

impl<S: Storage, C: ConfigProvider, G: ContentGenerator> SiteEngine<S, C, G> {
    pub fn new(storage: S, config: C, generator: G) -> Self {
        Self {
            storage,
            config,
            generator,
            services: catalog::services(),
        }
    }

    pub fn generation_request(&self) -> GenerationRequest {
        GenerationRequest::for_catalog(self.config.company_name(), self.services)
    }

    pub async fn run(&self) -> Result<SiteOutput> {
        tracing::info!("🚀 Rendering site for {}", self.config.company_name());

        // 1. 初始頁面與 loading 卡片
        let mut document = page_shell(self.config.company_name(), self.config.page_title());
        render_services(&mut document, self.services)?;
        let snapshot = PageSnapshot::loading(self.services);

        // 2. 只呼叫一次生成服務，任何失敗都改用預設文字
        let request = self.generation_request();
        let event = match self.generator.generate(&request).await {
            Ok(content) => PageEvent::ContentGenerated(content),
            Err(e) => {
                tracing::error!(
                    "❌ Error generating content: {} (Category: {:?})",
                    e,
                    e.category()
                );
                tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
                PageEvent::GenerationFailed
            }
        };
        let generation_succeeded = matches!(event, PageEvent::ContentGenerated(_));

        // 3. 套用內容
        let options = PopulateOptions {
            fill_unmatched: self.config.fill_unmatched(),
        };
        let transition = populator::reduce(&snapshot, &event, &options);
        for title in &transition.unmatched_titles {
            tracing::warn!("No service card matches generated title '{}'", title);
        }
        let touched = document.apply_all(&transition.patches)?;
        tracing::debug!("Applied {} patches to {} nodes", transition.patches.len(), touched);

        let pending = transition.state.pending_count();
        if pending > 0 {
            tracing::warn!("{} service card(s) still waiting for a description", pending);
        }

        // 4. 輸出
        let html = document.to_html();
        let filename = self.config.output_filename();
        tracing::debug!("Writing {} bytes to storage as {}", html.len(), filename);
        self.storage.write_file(filename, html.as_bytes()).await?;

        let output_path = format!(
            "{}/{}",
            self.config.output_path().trim_end_matches('/'),
            filename
        );
        Ok(SiteOutput {
            output_path,
            snapshot: transition.state,
            document,
            generation_succeeded,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::toml_config::SiteConfig;
    use crate::core::dom::LOADING_PLACEHOLDER;
    use crate::core::populator::{DESCRIPTION_FAILURE, FALLBACK_TAGLINE};
    use crate::domain::model::{GeneratedContent, ServiceDescription};
    use crate::utils::error::SiteError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct StubGenerator {
        response: Option<GeneratedContent>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ContentGenerator for StubGenerator {
        async fn generate(&self, _request: &GenerationRequest) -> Result<GeneratedContent> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.response.clone().ok_or(SiteError::EmptyResponseError)
        }
    }

    fn all_descriptions() -> GeneratedContent {
        GeneratedContent {
            tagline: "Building India's Tomorrow".to_string(),
            service_descriptions: catalog::services()
                .iter()
                .map(|s| ServiceDescription {
                    title: s.title.to_string(),
                    description: format!("{} done right.", s.title),
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_run_populates_and_stores_page() {
        let storage = MockStorage::new();
        let generator = StubGenerator {
            response: Some(all_descriptions()),
            calls: AtomicUsize::new(0),
        };
        let engine = SiteEngine::new(storage.clone(), SiteConfig::default(), generator);

        let output = engine.run().await.unwrap();

        assert!(output.generation_succeeded);
        assert_eq!(output.output_path, "./public/index.html");
        assert_eq!(engine.generator.calls.load(Ordering::SeqCst), 1);
        assert_eq!(output.snapshot.pending_count(), 0);

        let html = String::from_utf8(storage.get_file("index.html").await.unwrap()).unwrap();
        assert!(!html.contains(LOADING_PLACEHOLDER));
        assert!(html.contains("Building India&#39;s Tomorrow"));
        assert!(html.contains("Renovation &amp; Redevelopment done right."));
    }

    #[tokio::test]
    async fn test_run_falls_back_when_generation_fails() {
        let storage = MockStorage::new();
        let generator = StubGenerator {
            response: None,
            calls: AtomicUsize::new(0),
        };
        let engine = SiteEngine::new(storage.clone(), SiteConfig::default(), generator);

        let output = engine.run().await.unwrap();

        assert!(!output.generation_succeeded);
        let tagline = output.document.get_element_by_id("tagline").unwrap();
        assert_eq!(tagline.text_content(), FALLBACK_TAGLINE);
        let descriptions = output.document.query_all(&|el| el.has_class("description"));
        assert_eq!(descriptions.len(), catalog::services().len());
        for description in descriptions {
            assert_eq!(description.text_content(), DESCRIPTION_FAILURE);
        }
        assert!(storage.get_file("index.html").await.is_some());
    }
}
