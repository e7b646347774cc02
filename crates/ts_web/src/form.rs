use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
    Form,
};
use std::collections::HashMap;
use ts_core::Error;
use crate::error::ApiError;

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Form fields from either a urlencoded or a multipart body.
#[derive(Debug, Default)]
pub struct FormFields {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl FormFields {
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn require_text(&self, name: &str) -> Result<&str, ApiError> {
        self.text(name)
            .ok_or_else(|| ApiError(Error::InvalidInput(format!("missing form field `{}`", name))))
    }

    /// Integer field with a default when absent or blank.
    pub fn integer_or(&self, name: &str, default: u32) -> Result<u32, ApiError> {
        match self.text(name).map(str::trim).filter(|v| !v.is_empty()) {
            Some(raw) => raw
                .parse()
                .map_err(|_| ApiError(Error::InvalidInput(format!("`{}` must be a non-negative integer", name)))),
            None => Ok(default),
        }
    }

    pub fn take_file(&mut self, name: &str) -> Result<UploadedFile, ApiError> {
        self.files
            .remove(name)
            .ok_or_else(|| ApiError(Error::InvalidInput(format!("missing file field `{}`", name))))
    }
}

fn bad_form(err: impl std::fmt::Display) -> ApiError {
    ApiError(Error::InvalidInput(err.to_string()))
}

#[async_trait]
impl<S> FromRequest<S> for FormFields
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.starts_with("multipart/form-data"))
            .unwrap_or(false);

        if !is_multipart {
            let Form(fields) = Form::<HashMap<String, String>>::from_request(req, state)
                .await
                .map_err(bad_form)?;
            return Ok(Self { fields, files: HashMap::new() });
        }

        let mut multipart = Multipart::from_request(req, state).await.map_err(bad_form)?;
        let mut form = Self::default();
        while let Some(field) = multipart.next_field().await.map_err(bad_form)? {
            let name = field.name().unwrap_or_default().to_string();
            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let bytes = field.bytes().await.map_err(bad_form)?;
                    form.files.insert(name, UploadedFile { file_name, bytes: bytes.to_vec() });
                }
                None => {
                    let value = field.text().await.map_err(bad_form)?;
                    form.fields.insert(name, value);
                }
            }
        }
        Ok(form)
    }
}
