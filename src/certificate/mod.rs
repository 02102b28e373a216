// src/certificate/mod.rs

pub mod export;
pub mod font;
pub mod layout;
pub mod pdf;
pub mod raster;

pub use export::{
    CERTIFICATE_FILENAME, CertificateExporter, CertificateView, DirectorySink, ExportOutcome,
    FileSink, GeneratingIndicator,
};
pub use layout::{CertificateDetails, CertificateLayout};
pub use pdf::{DocumentWriter, PdfWriter};
pub use raster::{BitmapRasterizer, RASTER_SCALE, Rasterizer};
