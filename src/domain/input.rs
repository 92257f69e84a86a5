use std::path::Path;

use anyhow::{Context, Result};
use thiserror::Error;

use crate::config::InputLimits;

const ALLOWED_EXTENSIONS: [&str; 2] = ["txt", "pdf"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    pub async fn read(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { name, bytes })
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
    }
}

/// User input for one classification.
#[derive(Debug, Clone, Default)]
pub struct ClassificationRequest {
    pub text: Option<String>,
    pub file: Option<Attachment>,
    pub generate_reply: bool,
    pub detailed_analysis: bool,
}

impl ClassificationRequest {
    /// Text as typed, `None` when blank.
    pub fn submitted_text(&self) -> Option<&str> {
        self.text
            .as_deref()
            .filter(|text| !text.trim().is_empty())
    }

    pub fn text(&self) -> Option<&str> {
        self.text
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }

    pub fn validate(&self, limits: &InputLimits) -> Result<(), InputError> {
        let text = self.text();
        if text.is_none() && self.file.is_none() {
            return Err(InputError::Empty);
        }

        if let Some(text) = text {
            let chars = text.chars().count();
            if chars < limits.min_text_chars {
                return Err(InputError::TooShort {
                    min: limits.min_text_chars,
                });
            }
            if chars > limits.max_chars {
                return Err(InputError::TooLong {
                    chars,
                    max: limits.max_chars,
                });
            }
        }

        if let Some(file) = &self.file {
            if file.size() > limits.max_file_size {
                return Err(InputError::FileTooLarge {
                    name: file.name.clone(),
                    size: file.size(),
                    max: limits.max_file_size,
                });
            }
            let supported = file
                .extension()
                .is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()));
            if !supported {
                return Err(InputError::UnsupportedFileType {
                    name: file.name.clone(),
                });
            }
        }

        Ok(())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("enter the email text or select a file")]
    Empty,
    #[error("the email text is too short; enter at least {min} characters")]
    TooShort { min: usize },
    #[error("the email text has {chars} characters; the limit is {max}")]
    TooLong { chars: usize, max: usize },
    #[error("file {name} is {size} bytes; the limit is {max} bytes")]
    FileTooLarge { name: String, size: u64, max: u64 },
    #[error("file {name} is not supported; use .txt or .pdf")]
    UnsupportedFileType { name: String },
}
