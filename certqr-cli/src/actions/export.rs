//! Export the QR sheet as a PDF and store it

use anyhow::{Context, Result};

use super::Outcome;
use crate::export::{DocumentExporter, ExportRequest, ExportSource, PdfLayout};
use crate::prompt::Prompt;
use crate::storage::{FileStore, StoredFile};

const PDF_MIME: &str = "application/pdf";

/// Ask for confirmation, export columns A..I of every row and store the file as
/// `<sheet name>_QR_Codes.pdf`
pub async fn export_pdf(
    source: &dyn ExportSource,
    layout: PdfLayout,
    exporter: &dyn DocumentExporter,
    store: &dyn FileStore,
    prompt: &dyn Prompt,
) -> Result<Outcome<StoredFile>> {
    let confirmed = prompt.confirm("Download PDF", "Do you want to download the QR Code PDF?")?;
    if !confirmed {
        log::info!("PDF export was canceled by the user.");
        prompt.notify("❌ Download Canceled", "");
        return Ok(Outcome::Canceled);
    }

    let target = source
        .export_target()
        .await
        .context("Failed to determine the export range")?;
    let file_name = target.file_name();
    let request = ExportRequest { target, layout };

    let pdf = exporter
        .export_pdf(&request)
        .await
        .context("Failed to export the sheet as PDF")?;

    let stored = store
        .create_file(&file_name, PDF_MIME, pdf)
        .await
        .with_context(|| format!("Failed to store {}", file_name))?;

    prompt.notify("✅ PDF Created!", &stored.location);
    log::info!("Download PDF: {}", stored.location);

    Ok(Outcome::Done(stored))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::ExportTarget;
    use crate::prompt::testing::ScriptedPrompt;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingExporter {
        requests: Mutex<Vec<ExportRequest>>,
    }

    #[async_trait]
    impl DocumentExporter for RecordingExporter {
        async fn export_pdf(&self, request: &ExportRequest) -> Result<Vec<u8>> {
            self.requests.lock().unwrap().push(request.clone());
            Ok(b"%PDF-1.7 fake".to_vec())
        }
    }

    #[derive(Default)]
    struct RecordingStore {
        files: Mutex<Vec<(String, String, Vec<u8>)>>,
    }

    #[async_trait]
    impl FileStore for RecordingStore {
        async fn create_file(&self, name: &str, mime_type: &str, content: Vec<u8>) -> Result<StoredFile> {
            self.files
                .lock()
                .unwrap()
                .push((name.to_string(), mime_type.to_string(), content));
            Ok(StoredFile {
                name: name.to_string(),
                location: format!("https://drive.example/{}", name),
            })
        }
    }

    struct FailingExporter;

    #[async_trait]
    impl DocumentExporter for FailingExporter {
        async fn export_pdf(&self, _request: &ExportRequest) -> Result<Vec<u8>> {
            anyhow::bail!("Export PDF: HTTP 401 Unauthorized")
        }
    }

    struct FixedSource {
        target: ExportTarget,
        reads: Mutex<usize>,
    }

    #[async_trait]
    impl ExportSource for FixedSource {
        async fn export_target(&self) -> Result<ExportTarget> {
            *self.reads.lock().unwrap() += 1;
            Ok(self.target.clone())
        }
    }

    fn source() -> FixedSource {
        FixedSource {
            target: ExportTarget {
                spreadsheet_id: "sheet-doc".to_string(),
                sheet_id: 7,
                sheet_name: "Batch 3".to_string(),
                last_row: 25,
            },
            reads: Mutex::new(0),
        }
    }

    #[tokio::test]
    async fn test_confirmed_export_stores_one_file() {
        let source = source();
        let exporter = RecordingExporter::default();
        let store = RecordingStore::default();
        let prompt = ScriptedPrompt::answering(true);

        let outcome = export_pdf(&source, PdfLayout::default(), &exporter, &store, &prompt)
            .await
            .unwrap();

        let requests = exporter.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].target.range(), "A1:I25");

        let files = store.files.lock().unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].0, "Batch 3_QR_Codes.pdf");
        assert_eq!(files[0].1, "application/pdf");
        assert_eq!(files[0].2, b"%PDF-1.7 fake");

        match outcome {
            Outcome::Done(file) => assert_eq!(file.location, "https://drive.example/Batch 3_QR_Codes.pdf"),
            Outcome::Canceled => panic!("export should not be canceled"),
        }
        assert_eq!(prompt.titles(), ["Download PDF", "✅ PDF Created!"]);
    }

    #[tokio::test]
    async fn test_canceled_export_does_nothing() {
        let source = source();
        let exporter = RecordingExporter::default();
        let store = RecordingStore::default();
        let prompt = ScriptedPrompt::answering(false);

        let outcome = export_pdf(&source, PdfLayout::default(), &exporter, &store, &prompt)
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Canceled);
        assert_eq!(*source.reads.lock().unwrap(), 0);
        assert!(exporter.requests.lock().unwrap().is_empty());
        assert!(store.files.lock().unwrap().is_empty());
        assert_eq!(prompt.titles(), ["Download PDF", "❌ Download Canceled"]);
    }

    #[tokio::test]
    async fn test_export_failure_stores_nothing() {
        let store = RecordingStore::default();
        let prompt = ScriptedPrompt::answering(true);

        let err = export_pdf(&source(), PdfLayout::default(), &FailingExporter, &store, &prompt)
            .await
            .unwrap_err();

        assert!(format!("{:#}", err).contains("HTTP 401"));
        assert!(store.files.lock().unwrap().is_empty());
    }
}
