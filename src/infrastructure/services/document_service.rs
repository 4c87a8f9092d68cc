//! Document processing, listing and search

use std::fmt;
use std::sync::Arc;

use tracing::{info, instrument};

use crate::domain::clock::Clock;
use crate::domain::{
    Document, DocumentRepository, DocumentSource, DomainError, ScoredDocument, UploadedFile,
};
use crate::infrastructure::analysis::ContentAnalyzer;
use crate::infrastructure::extraction::ContentExtractor;

/// Default minimum relevance of a search hit
pub const DEFAULT_SEARCH_THRESHOLD: f64 = 0.3;

/// Turns uploads and pasted text into analyzed, stored documents
pub struct DocumentService {
    extractor: Arc<ContentExtractor>,
    analyzer: Arc<ContentAnalyzer>,
    repository: Arc<dyn DocumentRepository>,
    clock: Arc<dyn Clock>,
    search_threshold: f64,
}

impl fmt::Debug for DocumentService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentService")
            .field("extractor", &self.extractor)
            .field("search_threshold", &self.search_threshold)
            .finish_non_exhaustive()
    }
}

impl DocumentService {
    pub fn new(
        extractor: Arc<ContentExtractor>,
        analyzer: Arc<ContentAnalyzer>,
        repository: Arc<dyn DocumentRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            extractor,
            analyzer,
            repository,
            clock,
            search_threshold: DEFAULT_SEARCH_THRESHOLD,
        }
    }

    pub fn with_search_threshold(mut self, threshold: f64) -> Self {
        self.search_threshold = threshold;
        self
    }

    /// Extracts, analyzes and stores an uploaded PDF or image
    #[instrument(skip(self, file), fields(mime_type = %file.mime_type, size = file.bytes.len()))]
    pub async fn process_file(
        &self,
        file: &UploadedFile,
        actor: &str,
    ) -> Result<Document, DomainError> {
        let extracted = self.extractor.extract(file).await?;
        self.store(extracted.text, extracted.source, actor).await
    }

    /// Analyzes and stores text submitted directly
    #[instrument(skip(self, text), fields(chars = text.len()))]
    pub async fn process_text(&self, text: &str, actor: &str) -> Result<Document, DomainError> {
        if text.trim().is_empty() {
            return Err(DomainError::validation("text must not be empty"));
        }

        self.store(text.to_string(), DocumentSource::Text, actor).await
    }

    /// Most recent documents, newest first
    pub async fn recent(&self, limit: usize) -> Result<Vec<Document>, DomainError> {
        self.repository.recent(limit).await
    }

    /// Documents similar to `query`, best first
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Result<Vec<ScoredDocument>, DomainError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(DomainError::validation("search query must not be empty"));
        }

        let hits = self.repository.search(query, self.search_threshold).await?;
        info!(hits = hits.len(), "Document search completed");

        Ok(hits)
    }

    /// Releases the OCR engine; returns whether one was running
    pub async fn shutdown(&self) -> Result<bool, DomainError> {
        self.extractor.shutdown().await
    }

    async fn store(
        &self,
        content: String,
        source: DocumentSource,
        actor: &str,
    ) -> Result<Document, DomainError> {
        let analysis = self.analyzer.analyze_as(&content, actor).await;
        let document = Document::new(content, source, self.clock.now(), analysis);

        let stored = self.repository.insert(document).await?;
        info!(
            document_id = %stored.id,
            source = %stored.source,
            keywords = stored.keywords.len(),
            "Document stored"
        );

        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::*;

    use crate::domain::clock::mock::ManualClock;
    use crate::domain::document::MockDocumentRepository;
    use crate::domain::extraction::{FixedPdfDecoder, MockOcrEngine, MockOcrLauncher};
    use crate::domain::translation::MockTranslator;
    use crate::infrastructure::extraction::SharedOcrEngine;

    struct Fixture {
        service: DocumentService,
        ocr: Arc<MockOcrEngine>,
    }

    fn fixture(repository: MockDocumentRepository, pdf: FixedPdfDecoder) -> Fixture {
        let ocr = Arc::new(MockOcrEngine::new().with_text("Fracture of left radius."));
        let launcher = Arc::new(MockOcrLauncher::new(ocr.clone()));
        let extractor = Arc::new(ContentExtractor::new(
            Arc::new(pdf),
            Arc::new(SharedOcrEngine::new(launcher)),
        ));
        let analyzer = Arc::new(ContentAnalyzer::new(Arc::new(
            MockTranslator::new().with_error("providers down"),
        )));

        Fixture {
            service: DocumentService::new(
                extractor,
                analyzer,
                Arc::new(repository),
                Arc::new(ManualClock::new()),
            ),
            ocr,
        }
    }

    fn echoing_repository() -> MockDocumentRepository {
        let mut repository = MockDocumentRepository::new();
        repository.expect_insert().times(1).returning(Ok);
        repository
    }

    #[tokio::test]
    async fn test_process_pdf() {
        let f = fixture(
            echoing_repository(),
            FixedPdfDecoder::with_pages(&["Hypertension noted.", "Patient reports mild headache."]),
        );
        let file = UploadedFile::new("application/pdf", b"%PDF-1.4".to_vec());

        let document = f.service.process_file(&file, "anonymous").await.unwrap();

        assert_eq!(document.source, DocumentSource::Pdf);
        assert_eq!(
            document.content,
            "Hypertension noted.\nPatient reports mild headache."
        );
        assert!(document.keywords.iter().any(|k| k == "hypertension"));
        assert!(document.medical_terms.is_empty());
    }

    #[tokio::test]
    async fn test_process_image_uses_ocr() {
        let f = fixture(echoing_repository(), FixedPdfDecoder::default());
        let file = UploadedFile::new("image/png", vec![0x89, 0x50, 0x4e, 0x47]);

        let document = f.service.process_file(&file, "anonymous").await.unwrap();

        assert_eq!(document.source, DocumentSource::Image);
        assert_eq!(document.content, "Fracture of left radius.");
        assert_eq!(f.ocr.recognized().len(), 1);
    }

    #[tokio::test]
    async fn test_unsupported_type_is_not_stored() {
        let mut repository = MockDocumentRepository::new();
        repository.expect_insert().never();
        let f = fixture(repository, FixedPdfDecoder::default());
        let file = UploadedFile::new("application/zip", vec![1, 2, 3]);

        let err = f.service.process_file(&file, "anonymous").await.unwrap_err();

        assert!(matches!(err, DomainError::UnsupportedFileType { .. }));
    }

    #[tokio::test]
    async fn test_process_text_rejects_blank() {
        let mut repository = MockDocumentRepository::new();
        repository.expect_insert().never();
        let f = fixture(repository, FixedPdfDecoder::default());

        let err = f.service.process_text("   ", "anonymous").await.unwrap_err();

        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_storage_failure_is_surfaced() {
        let mut repository = MockDocumentRepository::new();
        repository
            .expect_insert()
            .returning(|_| Err(DomainError::storage("connection refused")));
        let f = fixture(repository, FixedPdfDecoder::default());

        let err = f
            .service
            .process_text("Hypertension noted.", "anonymous")
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Storage { .. }));
    }

    #[tokio::test]
    async fn test_search_uses_configured_threshold() {
        let mut repository = MockDocumentRepository::new();
        repository
            .expect_search()
            .with(eq("hypertension"), eq(0.5))
            .times(1)
            .returning(|_, _| Ok(Vec::new()));
        let f = fixture(repository, FixedPdfDecoder::default());
        let service = f.service.with_search_threshold(0.5);

        let hits = service.search("  hypertension ").await.unwrap();

        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_search_rejects_blank_query() {
        let mut repository = MockDocumentRepository::new();
        repository.expect_search().never();
        let f = fixture(repository, FixedPdfDecoder::default());

        assert!(matches!(
            f.service.search(" ").await,
            Err(DomainError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn test_shutdown_releases_ocr_once() {
        let f = fixture(echoing_repository(), FixedPdfDecoder::default());
        let file = UploadedFile::new("image/jpeg", vec![0xff, 0xd8]);
        f.service.process_file(&file, "anonymous").await.unwrap();

        assert!(f.service.shutdown().await.unwrap());
        assert!(!f.service.shutdown().await.unwrap());
        assert_eq!(f.ocr.terminations(), 1);

        let err = f.service.process_file(&file, "anonymous").await.unwrap_err();
        assert!(matches!(err, DomainError::Extraction { .. }));
    }
}
