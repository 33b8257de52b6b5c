use indexmap::IndexMap;

use super::UploadedFile;

#[derive(Debug, Clone)]
pub enum ConversionResult {
    /// Converted locally, still has to be relayed.
    File(UploadedFile),
    /// Converted and hosted by the converter itself.
    Url(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadResult {
    pub url: String,
    /// In request order.
    pub formats: IndexMap<String, String>,
}
