use std::path::Path;

use bytes::Bytes;

use crate::error::UploadError;

/// 待识别的图片
#[derive(Debug, Clone)]
pub struct ImagePayload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Bytes,
}

impl ImagePayload {
    pub fn new(
        file_name: impl Into<String>,
        mime: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            mime: mime.into(),
            bytes: bytes.into(),
        }
    }

    /// 从文件读取图片，MIME 类型按扩展名推断
    pub async fn from_path(path: &Path) -> Result<Self, UploadError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| UploadError::ImageRead {
                path: path.display().to_string(),
                source,
            })?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "image".to_string());

        Ok(Self::new(file_name, mime_for_path(path), bytes))
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase());

    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("heic") => "image/heic",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_is_guessed_from_extension() {
        assert_eq!(mime_for_path(Path::new("leaf.JPG")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("flower.png")), "image/png");
        assert_eq!(mime_for_path(Path::new("scan")), "application/octet-stream");
    }

    #[test]
    fn missing_file_reports_path() {
        let err = tokio_test::block_on(ImagePayload::from_path(Path::new("/no/such/leaf.jpg")))
            .unwrap_err();
        assert!(err.to_string().contains("/no/such/leaf.jpg"));
    }
}
