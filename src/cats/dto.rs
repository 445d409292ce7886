use std::collections::HashMap;

use axum::{
    extract::{multipart::MultipartError, Multipart},
    http::StatusCode,
};
use bytes::Bytes;
use serde::Deserialize;
use time::{macros::format_description, Date};
use validator::Validate;

use crate::error::{field_errors, AppError, FieldError};

/// Validated descriptive fields of a new cat. Identity, upload and location
/// fields are not part of it.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct PostCat {
    #[validate(length(min = 1, message = "cat_name is required"))]
    pub cat_name: String,
    #[validate(range(min = 0.1, message = "weight must be a positive number"))]
    pub weight: f64,
    pub birthdate: Date,
}

/// Request body for updating a cat; every field is optional.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct PutCat {
    #[validate(length(min = 1, message = "cat_name is required"))]
    pub cat_name: Option<String>,
    #[validate(range(min = 0.1, message = "weight must be a positive number"))]
    pub weight: Option<f64>,
    #[serde(default, with = "super::iso_date::option")]
    pub birthdate: Option<Date>,
}

#[derive(Debug)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub body: Bytes,
}

/// Everything a cat-create multipart request carried.
#[derive(Debug, Default)]
pub struct CatForm {
    pub texts: HashMap<String, String>,
    pub file: Option<UploadedFile>,
}

/// Multipart part holding the picture.
pub const FILE_FIELD: &str = "cat";

impl CatForm {
    pub async fn read(mut mp: Multipart) -> Result<Self, AppError> {
        let mut form = CatForm::default();
        while let Some(field) = mp.next_field().await.map_err(bad_multipart)? {
            let name = field.name().unwrap_or_default().to_string();
            if name == FILE_FIELD {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let body = field.bytes().await.map_err(bad_multipart)?;
                // browsers send an empty part when no file was picked
                if !body.is_empty() {
                    form.file = Some(UploadedFile {
                        file_name,
                        content_type,
                        body,
                    });
                }
            } else {
                let value = field.text().await.map_err(bad_multipart)?;
                form.texts.insert(name, value);
            }
        }
        Ok(form)
    }

    pub fn location(&self) -> Option<&str> {
        self.texts.get("location").map(String::as_str)
    }

    /// Parses and checks the descriptive fields, reporting every bad field at
    /// once: fields that fail to parse plus rule violations on the rest.
    pub fn post_cat(&self) -> Result<PostCat, AppError> {
        let mut errors = Vec::new();
        let weight = self.parse(
            "weight",
            |v| v.parse::<f64>().ok().filter(|w| w.is_finite()),
            &mut errors,
        );
        let birthdate = self.parse(
            "birthdate",
            |v| Date::parse(v, format_description!("[year]-[month]-[day]")).ok(),
            &mut errors,
        );
        // unparsed fields get stand-ins; their rule errors are dropped below
        let cat = PostCat {
            cat_name: self.texts.get("cat_name").cloned().unwrap_or_default(),
            weight: weight.unwrap_or(1.0),
            birthdate: birthdate.unwrap_or(Date::MIN),
        };
        if let Err(rules) = cat.validate() {
            let unparsed: Vec<String> = errors.iter().map(|e| e.field.clone()).collect();
            errors.extend(
                field_errors(&rules)
                    .into_iter()
                    .filter(|e| !unparsed.contains(&e.field)),
            );
        }
        if errors.is_empty() {
            return Ok(cat);
        }
        errors.sort_by(|a, b| a.field.cmp(&b.field));
        Err(AppError::Validation(errors))
    }

    fn parse<T>(
        &self,
        field: &str,
        parse: impl Fn(&str) -> Option<T>,
        errors: &mut Vec<FieldError>,
    ) -> Option<T> {
        let parsed = self.texts.get(field).and_then(|v| parse(v.trim()));
        if parsed.is_none() {
            errors.push(FieldError::invalid(field));
        }
        parsed
    }
}

fn bad_multipart(e: MultipartError) -> AppError {
    // over DefaultBodyLimit; surfaces while the parts are being read
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::PayloadTooLarge(e.body_text());
    }
    AppError::BadRequest(e.body_text())
}
