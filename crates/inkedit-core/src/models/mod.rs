//! Data models shared across the library.

pub mod config;
pub mod region;

pub use config::{InkeditConfig, OcrConfig, PdfConfig, PhotoConfig};
pub use region::{
    FontSpec, Point, Rect, RegionId, RegionIdGen, Rgb, Selection, SelectionSource, TextRegion,
};
