use std::path::Path;

use mime::Mime;
use normalize_path::NormalizePath;
use reqwest::multipart::Part;
use resolve_path::PathResolveExt;

use crate::error::{Result, SearchError};

/// An image held in memory, ready to be sent as a multipart part
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime: Mime,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(file_name: impl Into<String>, mime: Mime, bytes: Vec<u8>) -> Result<Self> {
        let file_name = file_name.into();

        if mime.type_() != mime::IMAGE {
            return Err(SearchError::UnsupportedImage {
                file: file_name,
                mime: mime.to_string(),
            });
        }
        if bytes.is_empty() {
            return Err(SearchError::EmptyImage(file_name));
        }

        Ok(Self {
            file_name,
            mime,
            bytes,
        })
    }

    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().resolve().normalize();
        log::info!("Loading image {}", path.display());

        let mime = mime_guess::from_path(&path).first_or_octet_stream();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());

        if mime.type_() != mime::IMAGE {
            return Err(SearchError::UnsupportedImage {
                file: path.display().to_string(),
                mime: mime.to_string(),
            });
        }

        let bytes = tokio::fs::read(&path).await?;
        log::debug!("Read {} bytes from {}", bytes.len(), path.display());

        Self::new(file_name, mime, bytes)
    }

    pub fn to_part(&self) -> Result<Part> {
        Part::bytes(self.bytes.clone())
            .file_name(self.file_name.clone())
            .mime_str(self.mime.as_ref())
            .map_err(SearchError::from)
    }
}
