//! Multipart upload form parsing shared by the upload handlers

use crate::error::HttpAppError;
use axum::extract::Multipart;
use fusion_core::AppError;
use std::collections::HashMap;

pub const FILE_FIELD: &str = "file";

#[derive(Debug)]
pub struct UploadedFile {
    pub filename: Option<String>,
    pub data: Vec<u8>,
}

/// The `file` part plus every text field of the form
#[derive(Debug, Default)]
pub struct UploadForm {
    pub file: Option<UploadedFile>,
    fields: HashMap<String, String>,
}

impl UploadForm {
    /// Read the whole form into memory. At most one `file` part is accepted.
    pub async fn read(mut multipart: Multipart) -> Result<Self, HttpAppError> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().map(str::to_string).unwrap_or_default();

            if name == FILE_FIELD {
                if form.file.is_some() {
                    return Err(AppError::BadRequest(
                        "Multiple file fields are not allowed; send exactly one field named 'file'"
                            .to_string(),
                    )
                    .into());
                }
                let filename = field.file_name().and_then(base_filename);
                let data = field.bytes().await?;
                form.file = Some(UploadedFile {
                    filename,
                    data: data.to_vec(),
                });
            } else if !name.is_empty() {
                let value = field.text().await?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    /// Take the file part, failing with "No file provided" when it is absent.
    pub fn take_file(&mut self) -> Result<UploadedFile, HttpAppError> {
        self.file
            .take()
            .ok_or_else(|| AppError::BadRequest("No file provided".to_string()).into())
    }

    /// Trimmed text field, `None` when missing or blank.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}

/// Last path component of a client-supplied file name.
fn base_filename(raw: &str) -> Option<String> {
    raw.rsplit(['/', '\\'])
        .next()
        .map(str::trim)
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
        .map(str::to_string)
}
