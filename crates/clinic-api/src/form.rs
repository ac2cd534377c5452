//! Request forms for endpoints that accept files
//!
//! Upload endpoints take `multipart/form-data` as sent by the admin panel.
//! A JSON body is accepted too when no file is attached. Text parts become a
//! JSON object of strings so the input types deserialize the same way in both
//! cases, and repeated parts collect into an array. Only fields a handler
//! names through [`FormData::decode_json`] are read as embedded JSON.

use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request},
    http::header,
    Json,
};
use clinic_attachments::FileUpload;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{ApiError, ApiResult};

const LEGACY_CHAMBER_FIELDS: [&str; 4] = [
    "location",
    "appointmentNumber",
    "consultationDays",
    "consultationTime",
];

/// Text fields and files of a request
#[derive(Debug, Default)]
pub struct FormData {
    fields: Map<String, Value>,
    files: Vec<(String, FileUpload)>,
}

impl FormData {
    pub fn from_json(value: Value) -> ApiResult<Self> {
        match value {
            Value::Object(fields) => Ok(Self {
                fields,
                files: Vec::new(),
            }),
            _ => Err(ApiError::bad_request("Request body must be a JSON object")),
        }
    }

    pub fn push_text(&mut self, name: impl Into<String>, text: String) {
        let name = name.into();
        let value = Value::String(text);

        match self.fields.get_mut(&name) {
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let previous = existing.take();
                *existing = Value::Array(vec![previous, value]);
            }
            None => {
                self.fields.insert(name, value);
            }
        }
    }

    pub fn push_file(&mut self, name: impl Into<String>, file: FileUpload) {
        self.files.push((name.into(), file));
    }

    /// First file sent under `name`
    pub fn take_file(&mut self, name: &str) -> Option<FileUpload> {
        let index = self.files.iter().position(|(field, _)| field == name)?;
        Some(self.files.remove(index).1)
    }

    /// Every file sent under `name`, in request order
    pub fn take_files(&mut self, name: &str) -> Vec<FileUpload> {
        let (taken, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.files)
            .into_iter()
            .partition(|(field, _)| field == name);
        self.files = rest;
        taken.into_iter().map(|(_, file)| file).collect()
    }

    /// Remove a boolean field; `true`, `1` and `on` count as set
    pub fn take_flag(&mut self, name: &str) -> bool {
        match self.fields.remove(name) {
            Some(Value::Bool(set)) => set,
            Some(Value::String(s)) => {
                matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "1" | "on")
            }
            Some(Value::Number(n)) => n.as_u64() == Some(1),
            _ => false,
        }
    }

    /// Read a structured field sent as a JSON text part.
    ///
    /// A string holding a JSON array or object is replaced by the decoded
    /// value; so is each such string of a repeated field. Anything else is
    /// left as sent.
    pub fn decode_json(&mut self, name: &str) {
        let decoded = match self.fields.get(name) {
            Some(Value::String(text)) => embedded_json(text),
            Some(Value::Array(items)) if items.iter().any(Value::is_string) => Some(Value::Array(
                items
                    .iter()
                    .map(|item| match item {
                        Value::String(text) => {
                            embedded_json(text).unwrap_or_else(|| item.clone())
                        }
                        other => other.clone(),
                    })
                    .collect(),
            )),
            _ => None,
        };

        if let Some(decoded) = decoded {
            self.fields.insert(name.to_string(), decoded);
        }
    }

    /// Make sure `name` holds a list; a single part becomes a one-item list
    pub fn ensure_list(&mut self, name: &str) {
        if let Some(value) = self.fields.get_mut(name) {
            *value = match value.take() {
                Value::Array(items) => Value::Array(items),
                Value::String(s) if s.trim().is_empty() => Value::Array(Vec::new()),
                Value::Null => Value::Array(Vec::new()),
                other => Value::Array(vec![other]),
            };
        }
    }

    /// Normalize chamber entries for profile inputs.
    ///
    /// Older forms send a single chamber as flat `location`,
    /// `appointmentNumber`, `consultationDays` and `consultationTime` fields;
    /// they are folded into one `chambers` entry when no list is present.
    pub fn fold_chambers(&mut self) {
        self.decode_json("chambers");
        self.decode_json("locations");
        if let Some(locations) = self.fields.remove("locations") {
            self.fields.entry("chambers").or_insert(locations);
        }

        if !self.fields.contains_key("chambers") {
            let mut entry = Map::new();
            for field in LEGACY_CHAMBER_FIELDS {
                if let Some(value) = self.fields.remove(field) {
                    entry.insert(field.to_string(), value);
                }
            }
            if entry.is_empty() {
                return;
            }
            self.fields
                .insert("chambers".into(), Value::Array(vec![Value::Object(entry)]));
        }

        if let Some(chambers) = self.fields.get_mut("chambers") {
            if chambers.is_object() {
                let single = chambers.take();
                *chambers = Value::Array(vec![single]);
            }
            if let Value::Array(entries) = chambers {
                for entry in entries.iter_mut() {
                    if let Some(days) = entry.get_mut("consultationDays") {
                        *days = normalize_days(days.take());
                    }
                }
            }
        }
    }

    /// Deserialize the text fields into an input type
    pub fn parse<T: DeserializeOwned>(self) -> ApiResult<T> {
        serde_json::from_value(Value::Object(self.fields))
            .map_err(|e| ApiError::bad_request(format!("Invalid request body: {}", e)))
    }
}

fn embedded_json(text: &str) -> Option<Value> {
    let trimmed = text.trim_start();
    if !trimmed.starts_with('[') && !trimmed.starts_with('{') {
        return None;
    }
    serde_json::from_str::<Value>(text)
        .ok()
        .filter(|value| value.is_array() || value.is_object())
}

/// Weekday lists arrive as numbers, numeric strings or `"0,3"`
fn normalize_days(value: Value) -> Value {
    let items = match value {
        Value::Array(items) => items,
        Value::String(s) => {
            if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(&s) {
                items
            } else {
                s.split(',')
                    .map(str::trim)
                    .filter(|part| !part.is_empty())
                    .map(|part| Value::String(part.to_string()))
                    .collect()
            }
        }
        Value::Null => Vec::new(),
        other => vec![other],
    };

    Value::Array(
        items
            .into_iter()
            .map(|item| {
                let day = item.as_str().and_then(|s| s.trim().parse::<u8>().ok());
                day.map(Value::from).unwrap_or(item)
            })
            .collect(),
    )
}

#[async_trait]
impl<S> FromRequest<S> for FormData
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|ct| ct.starts_with("application/json"))
            .unwrap_or(false);

        if is_json {
            let Json(value) = Json::<Value>::from_request(req, state).await?;
            return FormData::from_json(value);
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;

        let mut form = FormData::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?
        {
            let name = field
                .name()
                .unwrap_or_default()
                .trim_end_matches("[]")
                .to_string();

            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let content_type = field.content_type().map(str::to_string);
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| ApiError::bad_request(e.body_text()))?;
                    // an empty file input still sends a part
                    if file_name.is_empty() && bytes.is_empty() {
                        continue;
                    }
                    let upload = FileUpload::new(file_name, bytes)
                        .with_content_type(content_type.as_deref());
                    form.push_file(name, upload);
                }
                None => {
                    let text = field
                        .text()
                        .await
                        .map_err(|e| ApiError::bad_request(e.body_text()))?;
                    form.push_text(name, text);
                }
            }
        }

        Ok(form)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinic_models::{AlbumChanges, NewAlbum, NewBlogPost, NewProfile};
    use serde_json::json;

    #[test]
    fn test_repeated_parts_collect() {
        let mut form = FormData::default();
        form.push_text("removedImages", "a".into());
        form.push_text("removedImages", "b".into());
        form.push_text("removedImages", "c".into());
        form.ensure_list("removedImages");

        let changes: AlbumChanges = form.parse().unwrap();
        assert_eq!(changes.removed_images, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_bracketed_text_stays_text() {
        let mut form = FormData::default();
        form.push_text("name", "[2024]".into());

        let input: NewAlbum = form.parse().unwrap();
        assert_eq!(input.name.as_deref(), Some("[2024]"));
    }

    #[test]
    fn test_decode_json_only_touches_named_field() {
        let mut form = FormData::default();
        form.push_text("title", r#"{"draft":true}"#.into());
        form.push_text("editorData", r#"{"blocks":[{"type":"paragraph"}]}"#.into());
        form.decode_json("editorData");

        let input: NewBlogPost = form.parse().unwrap();
        assert_eq!(input.title.as_deref(), Some(r#"{"draft":true}"#));
        let editor_data = input.editor_data.unwrap();
        assert_eq!(editor_data["blocks"][0]["type"], "paragraph");
    }

    #[test]
    fn test_removed_images_as_json_part() {
        let mut form = FormData::default();
        form.push_text("removedImages", r#"["a","b"]"#.into());
        form.decode_json("removedImages");
        form.ensure_list("removedImages");

        let changes: AlbumChanges = form.parse().unwrap();
        assert_eq!(changes.removed_images, vec!["a", "b"]);
    }

    #[test]
    fn test_single_part_becomes_list() {
        let mut form = FormData::default();
        form.push_text("newImageOrder", "x".into());
        form.ensure_list("newImageOrder");

        let changes: AlbumChanges = form.parse().unwrap();
        assert_eq!(changes.new_image_order, vec!["x"]);
    }

    #[test]
    fn test_legacy_chamber_fields_fold() {
        let mut form = FormData::default();
        form.push_text("name", "Dr. Example".into());
        form.push_text("location", "Dhanmondi".into());
        form.push_text("appointmentNumber", "01811111111".into());
        form.push_text("consultationDays", "0, 3".into());
        form.push_text("consultationTime", "5pm - 9pm".into());
        form.fold_chambers();

        let input: NewProfile = form.parse().unwrap();
        assert_eq!(input.chambers.len(), 1);
        assert_eq!(input.chambers[0].location.as_deref(), Some("Dhanmondi"));
        assert_eq!(input.chambers[0].consultation_days, vec![0, 3]);
    }

    #[test]
    fn test_chamber_json_part() {
        let mut form = FormData::default();
        form.push_text(
            "chambers",
            r#"[{"location":"Mirpur","consultationDays":["1","5"]}]"#.into(),
        );
        form.fold_chambers();

        let input: NewProfile = form.parse().unwrap();
        assert_eq!(input.chambers[0].consultation_days, vec![1, 5]);
    }

    #[test]
    fn test_flag_and_json_body() {
        let mut form = FormData::from_json(json!({"removeCoverImage": "true"})).unwrap();
        assert!(form.take_flag("removeCoverImage"));
        assert!(!form.take_flag("removeCoverImage"));

        assert!(FormData::from_json(json!([1, 2])).is_err());
    }

    #[test]
    fn test_take_files_by_field() {
        let mut form = FormData::default();
        form.push_file("images", FileUpload::new("a.jpg", vec![1u8]));
        form.push_file("cover", FileUpload::new("c.jpg", vec![1u8]));
        form.push_file("images", FileUpload::new("b.jpg", vec![1u8]));

        let images = form.take_files("images");
        assert_eq!(images.len(), 2);
        assert_eq!(images[1].file_name, "b.jpg");
        assert!(form.take_file("cover").is_some());
        assert!(form.take_file("cover").is_none());
    }
}
