//! Bulk asset export: fetch the photo referenced by each student row and pack
//! the successful fetches into a single zip archive. An unreachable image is
//! skipped and counted, never failing the whole request.

use crate::config::ExportConfig;
use crate::db::models::StudentPhoto;
use crate::error::Error;
use anyhow::Result;
use async_trait::async_trait;
use serde_json::json;
use std::io::{Cursor, Write};
use std::time::Duration;
use tracing::warn;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

const MANIFEST_ENTRY: &str = "manifest.json";

/// Outcome of building an export archive
#[derive(Debug, Clone)]
pub struct ImageArchive {
    pub bytes: Vec<u8>,
    pub included: usize,
    pub skipped: usize,
}

/// Fetches one remote image. A trait seam so tests can inject failures
/// without a network.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// HTTP fetcher with the fixed per-request timeout from configuration
pub struct HttpImageFetcher {
    client: reqwest::Client,
}

impl HttpImageFetcher {
    pub fn new(config: &ExportConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.fetch_timeout_secs))
            .build()
            .map_err(|e| Error::Export(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Export(format!("Request failed: {}", e)))?
            .error_for_status()
            .map_err(|e| Error::Export(format!("Request failed: {}", e)))?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Export(format!("Failed to read response body: {}", e)))?;

        Ok(bytes.to_vec())
    }
}

/// Build the export archive. Images are fetched sequentially; each failure is
/// logged and skipped. The manifest entry records what was included.
pub async fn build_image_archive(
    photos: &[StudentPhoto],
    fetcher: &dyn ImageFetcher,
) -> Result<ImageArchive> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let opts = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut included = Vec::new();
    let mut skipped = 0usize;

    for photo in photos {
        let bytes = match fetcher.fetch(&photo.photo_url).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(
                    "Skipping image for {} ({}): {}",
                    photo.student_code, photo.photo_url, e
                );
                skipped += 1;
                continue;
            }
        };

        let entry_name = entry_name(photo);
        zip.start_file(&entry_name, opts)
            .map_err(|e| Error::Export(format!("Failed to start archive entry: {}", e)))?;
        zip.write_all(&bytes)
            .map_err(|e| Error::Export(format!("Failed to write archive entry: {}", e)))?;

        included.push(entry_name);
    }

    let manifest = json!({
        "format": "sentinel-student-images-v1",
        "included": included,
        "skipped": skipped,
    });
    zip.start_file(MANIFEST_ENTRY, opts)
        .map_err(|e| Error::Export(format!("Failed to start manifest entry: {}", e)))?;
    zip.write_all(
        serde_json::to_string_pretty(&manifest)
            .map_err(|e| Error::Serialization(e.to_string()))?
            .as_bytes(),
    )
    .map_err(|e| Error::Export(format!("Failed to write manifest entry: {}", e)))?;

    let cursor = zip
        .finish()
        .map_err(|e| Error::Export(format!("Failed to finalize archive: {}", e)))?;

    Ok(ImageArchive {
        bytes: cursor.into_inner(),
        included: included.len(),
        skipped,
    })
}

/// Archive entry name: student code plus the URL's file extension when it has
/// one, defaulting to jpg.
fn entry_name(photo: &StudentPhoto) -> String {
    let extension = photo
        .photo_url
        .rsplit('.')
        .next()
        .filter(|ext| ext.len() <= 4 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or("jpg");
    format!("images/{}.{}", photo.student_code, extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Read;
    use zip::ZipArchive;

    struct StubFetcher {
        responses: HashMap<String, Vec<u8>>,
    }

    #[async_trait]
    impl ImageFetcher for StubFetcher {
        async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
            self.responses
                .get(url)
                .cloned()
                .ok_or_else(|| Error::Export(format!("Request failed: {}", url)).into())
        }
    }

    fn photo(code: &str, url: &str) -> StudentPhoto {
        StudentPhoto {
            student_code: code.to_string(),
            full_name: format!("Student {}", code),
            photo_url: url.to_string(),
        }
    }

    #[tokio::test]
    async fn unreachable_image_is_skipped_not_fatal() {
        let photos: Vec<_> = (1..=5)
            .map(|i| {
                photo(
                    &format!("S-{:03}", i),
                    &format!("https://cdn.example/photos/s{}.jpg", i),
                )
            })
            .collect();

        // Four of five URLs resolve; s3 is unreachable.
        let responses: HashMap<_, _> = [1, 2, 4, 5]
            .into_iter()
            .map(|i| {
                (
                    format!("https://cdn.example/photos/s{}.jpg", i),
                    vec![0xFFu8, 0xD8, i as u8],
                )
            })
            .collect();
        let fetcher = StubFetcher { responses };

        let archive = build_image_archive(&photos, &fetcher).await.unwrap();

        assert_eq!(archive.included, 4);
        assert_eq!(archive.skipped, 1);

        let mut zip = ZipArchive::new(Cursor::new(archive.bytes)).unwrap();
        // Four images plus the manifest
        assert_eq!(zip.len(), 5);
        assert!(zip.by_name("images/S-001.jpg").is_ok());
        assert!(zip.by_name("images/S-003.jpg").is_err());

        let mut manifest = String::new();
        zip.by_name(MANIFEST_ENTRY)
            .unwrap()
            .read_to_string(&mut manifest)
            .unwrap();
        let manifest: serde_json::Value = serde_json::from_str(&manifest).unwrap();
        assert_eq!(manifest["skipped"], 1);
        assert_eq!(manifest["included"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn empty_photo_set_yields_manifest_only_archive() {
        let fetcher = StubFetcher {
            responses: HashMap::new(),
        };

        let archive = build_image_archive(&[], &fetcher).await.unwrap();

        assert_eq!(archive.included, 0);
        assert_eq!(archive.skipped, 0);

        let zip = ZipArchive::new(Cursor::new(archive.bytes)).unwrap();
        assert_eq!(zip.len(), 1);
    }

    #[test]
    fn entry_name_keeps_known_extension_and_defaults_to_jpg() {
        assert_eq!(
            entry_name(&photo("S-001", "https://cdn.example/a.png")),
            "images/S-001.png"
        );
        assert_eq!(
            entry_name(&photo("S-002", "https://cdn.example/photos/raw")),
            "images/S-002.jpg"
        );
    }
}
