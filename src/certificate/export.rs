// src/certificate/export.rs

use std::{
    fs,
    path::{Path, PathBuf},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use chrono::NaiveDate;

use crate::{
    certificate::{
        layout::{CertificateDetails, CertificateLayout},
        pdf::{DocumentWriter, PdfWriter},
        raster::{BitmapRasterizer, RASTER_SCALE, Rasterizer, encode_png},
    },
    error::ExportError,
    models::identity::Identity,
    sync::CertificateNotifier,
};

/// Name of the downloaded document.
pub const CERTIFICATE_FILENAME: &str = "certificat.pdf";

/// Where the finished document goes.
pub trait FileSink: Send + Sync {
    fn save(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf, ExportError>;
}

/// Saves into a directory. Writes a hidden temporary file first and renames
/// it, so a failed write never leaves a partial certificate behind.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl FileSink for DirectorySink {
    fn save(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf, ExportError> {
        fs::create_dir_all(&self.dir)?;
        let target = self.dir.join(filename);
        let partial = self.dir.join(format!(".{filename}.part"));

        if let Err(e) = fs::write(&partial, bytes).and_then(|_| fs::rename(&partial, &target)) {
            let _ = fs::remove_file(&partial);
            return Err(e.into());
        }
        Ok(target)
    }
}

/// Shared "generating" indicator.
#[derive(Debug, Clone, Default)]
pub struct GeneratingIndicator(Arc<AtomicBool>);

impl GeneratingIndicator {
    pub fn is_generating(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn start(&self) -> GeneratingGuard {
        self.0.store(true, Ordering::SeqCst);
        GeneratingGuard(self.clone())
    }
}

/// Clears the indicator when dropped, whatever path the export took.
struct GeneratingGuard(GeneratingIndicator);

impl Drop for GeneratingGuard {
    fn drop(&mut self) {
        self.0.0.store(false, Ordering::SeqCst);
    }
}

/// What the certificate page shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CertificateView {
    /// No identity: placeholder text, no export action.
    Unauthenticated { message: String },
    Ready { details: CertificateDetails },
}

/// Result of one export attempt. Never an error: failures are logged and reported here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Unauthenticated,
    /// The file was saved. `notified` tells whether the server acknowledged it.
    Saved { path: PathBuf, notified: bool },
    Failed { reason: String },
}

/// Layout, rasterize, wrap in a PDF, save, then notify the server.
pub struct CertificateExporter {
    rasterizer: Arc<dyn Rasterizer>,
    writer: Arc<dyn DocumentWriter>,
    sink: Arc<dyn FileSink>,
    notifier: Arc<dyn CertificateNotifier>,
    indicator: GeneratingIndicator,
}

impl CertificateExporter {
    /// Exporter with the built-in rasterizer and PDF writer.
    pub fn new(sink: Arc<dyn FileSink>, notifier: Arc<dyn CertificateNotifier>) -> Self {
        Self {
            rasterizer: Arc::new(BitmapRasterizer),
            writer: Arc::new(PdfWriter::default()),
            sink,
            notifier,
            indicator: GeneratingIndicator::default(),
        }
    }

    pub fn with_rasterizer(mut self, rasterizer: Arc<dyn Rasterizer>) -> Self {
        self.rasterizer = rasterizer;
        self
    }

    pub fn with_writer(mut self, writer: Arc<dyn DocumentWriter>) -> Self {
        self.writer = writer;
        self
    }

    pub fn with_indicator(mut self, indicator: GeneratingIndicator) -> Self {
        self.indicator = indicator;
        self
    }

    pub fn is_generating(&self) -> bool {
        self.indicator.is_generating()
    }

    pub fn view(identity: Option<&Identity>, issued_on: NaiveDate) -> CertificateView {
        match identity {
            Some(identity) => CertificateView::Ready {
                details: CertificateDetails::for_identity(identity, issued_on),
            },
            None => CertificateView::Unauthenticated {
                message: "Please sign in to view your certificate.".to_string(),
            },
        }
    }

    /// Exports the certificate dated today. See [`Self::export_on`].
    pub async fn export(&self, identity: Option<&Identity>) -> ExportOutcome {
        self.export_on(identity, chrono::Local::now().date_naive())
            .await
    }

    /// Renders, writes and saves the certificate, then notifies the server.
    ///
    /// Rasterizing and PDF encoding run synchronously on the calling task and
    /// block it until the file is written; only the notification awaits.
    pub async fn export_on(&self, identity: Option<&Identity>, issued_on: NaiveDate) -> ExportOutcome {
        let Some(identity) = identity else {
            tracing::warn!("Certificate export requested without identity");
            return ExportOutcome::Unauthenticated;
        };

        let _generating = self.indicator.start();

        let details = CertificateDetails::for_identity(identity, issued_on);
        let path = match self.build_and_save(&details) {
            Ok(path) => path,
            Err(e) => {
                tracing::error!("Certificate export failed: {}", e);
                return ExportOutcome::Failed {
                    reason: e.to_string(),
                };
            }
        };
        tracing::info!("Certificate saved to {}", path.display());

        let notified = match self.notifier.notify_certificate(&identity.email).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Failed to record certificate for {}: {}", identity.email, e);
                false
            }
        };

        ExportOutcome::Saved { path, notified }
    }

    fn build_and_save(&self, details: &CertificateDetails) -> Result<PathBuf, ExportError> {
        let layout = CertificateLayout::render(details);
        let raster = self.rasterizer.rasterize(&layout, RASTER_SCALE)?;
        let png = encode_png(&raster)?;
        let document = self.writer.write_document(&png)?;
        self.sink.save(CERTIFICATE_FILENAME, &document)
    }
}
