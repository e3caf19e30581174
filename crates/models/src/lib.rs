use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Image content as handed to the pipeline.
///
/// Producers supply exactly one encoding. Backends only ever see raw bytes,
/// see [`ImageRecord::payload_bytes`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Bytes(Bytes),
    Base64(String),
}

/// Standard alphabet, padding optional.
const BASE64: GeneralPurpose = GeneralPurpose::new(
    &base64::alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

impl Payload {
    /// Base64 may be line-wrapped or unpadded.
    pub fn to_bytes(&self) -> Result<Bytes, base64::DecodeError> {
        match self {
            Payload::Bytes(data) => Ok(data.clone()),
            Payload::Base64(encoded) => {
                let compact: String = encoded
                    .chars()
                    .filter(|c| !c.is_ascii_whitespace())
                    .collect();
                BASE64.decode(compact).map(Bytes::from)
            }
        }
    }
}

/// One image of a batch, plus the metadata the upload fills in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRecord {
    pub file_name: String,
    /// File-type suffix, with or without the leading dot. May be empty.
    pub extension: String,
    pub payload: Option<Payload>,
    pub img_url: Option<String>,
    /// Tag of the backend that produced `img_url`.
    pub backend_type: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl ImageRecord {
    pub fn from_bytes(file_name: impl Into<String>, extension: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self::with_payload(file_name.into(), extension.into(), Payload::Bytes(data.into()))
    }

    pub fn from_base64(file_name: impl Into<String>, extension: impl Into<String>, encoded: impl Into<String>) -> Self {
        Self::with_payload(file_name.into(), extension.into(), Payload::Base64(encoded.into()))
    }

    fn with_payload(file_name: String, extension: String, payload: Payload) -> Self {
        Self {
            file_name,
            extension,
            payload: Some(payload),
            img_url: None,
            backend_type: None,
            width: None,
            height: None,
        }
    }

    pub fn has_payload(&self) -> bool {
        self.payload.is_some()
    }

    /// Raw payload bytes, decoding base64 when that is what was supplied.
    /// `Ok(None)` means there is nothing left to upload.
    pub fn payload_bytes(&self) -> Result<Option<Bytes>, base64::DecodeError> {
        self.payload.as_ref().map(Payload::to_bytes).transpose()
    }

    pub fn is_published(&self) -> bool {
        self.img_url.is_some()
    }

    /// Extension without the leading dot, falling back to the file name's suffix.
    pub fn normalized_extension(&self) -> Option<String> {
        let ext = self.extension.trim_start_matches('.');
        if !ext.is_empty() {
            return Some(ext.to_ascii_lowercase());
        }

        self.file_name
            .rsplit_once('.')
            .map(|(_, suffix)| suffix)
            .filter(|suffix| !suffix.is_empty())
            .map(str::to_ascii_lowercase)
    }

    /// Marks the record as published. The payload is dropped in the same step,
    /// so a record never holds both.
    pub fn publish(&mut self, img_url: impl Into<String>, backend_type: impl Into<String>) {
        self.payload = None;
        self.img_url = Some(img_url.into());
        self.backend_type = Some(backend_type.into());
    }
}

/// How a configuration field is rendered by prompt layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum InputKind {
    Input,
    Select { choices: Vec<String> },
    Secret,
}

/// Describes one backend setting for prompt and validation layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(flatten)]
    pub kind: InputKind,
    pub alias: String,
    pub default: String,
    pub required: bool,
}

impl FieldDescriptor {
    pub fn input(name: &str, alias: String, default: String, required: bool) -> Self {
        Self {
            name: name.to_string(),
            kind: InputKind::Input,
            alias,
            default,
            required,
        }
    }

    pub fn secret(name: &str, alias: String, default: String, required: bool) -> Self {
        Self {
            name: name.to_string(),
            kind: InputKind::Secret,
            alias,
            default,
            required,
        }
    }

    pub fn select(name: &str, alias: String, choices: Vec<String>, default: String, required: bool) -> Self {
        Self {
            name: name.to_string(),
            kind: InputKind::Select { choices },
            alias,
            default,
            required,
        }
    }
}
