//! Decides whether a file is treated as binary rather than text.

use crate::options::BinaryDetection;
use std::path::Path;

/// Extensions (lowercase, without the dot) that are never read as text.
pub const BINARY_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "bmp", "svg", "ico", "webp", // images
    "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", // documents
    "zip", "tar", "gz", "rar", "7z", // archives
    "exe", "dll", "so", "dylib", // executables
    "mp3", "mp4", "avi", "mov", "wmv", "flv", // media
    "ttf", "otf", "woff", "woff2", // fonts
    "class", "jar", "war", // jvm
    "o", "obj", "lib", "a", // objects
    "node", "pyc", "pyo",
];

/// Bytes inspected by [`BinaryDetection::Accurate`].
const INSPECT_LEN: usize = 4096;

#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryClassifier {
    detection: BinaryDetection,
}

impl BinaryClassifier {
    pub fn new(detection: BinaryDetection) -> Self {
        Self { detection }
    }

    /// True if the file name carries a known binary extension.
    pub fn has_binary_extension(&self, name: impl AsRef<Path>) -> bool {
        name.as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                let ext = ext.to_ascii_lowercase();
                BINARY_EXTENSIONS.contains(&ext.as_str())
            })
    }

    /// Decodes raw bytes as text. `None` means the content is binary.
    pub fn decode(&self, bytes: Vec<u8>) -> Option<String> {
        if self.detection == BinaryDetection::Accurate {
            let head = &bytes[..bytes.len().min(INSPECT_LEN)];
            if content_inspector::inspect(head).is_binary() {
                return None;
            }
        }
        String::from_utf8(bytes).ok()
    }
}
