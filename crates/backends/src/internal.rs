//! Internal image server: objects are stored under a random UUID and the
//! server answers with the public URL.

use async_trait::async_trait;
use picbed_config::BackendSettings;
use picbed_i18n::Translator;
use picbed_models::{FieldDescriptor, ImageRecord};
use picbed_uploader::{
    payload_bytes, require_fields, resolve_content_type, BackendPlugin, TransportRequest,
    UploadContext, UploadError,
};
use serde::Deserialize;
use std::fmt;
use uuid::Uuid;

pub const NAME: &str = "internal";

const FALLBACK_EXTENSION: &str = "png";
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// API version segment. Accepts `version = 2` as well as `version = "2"`,
/// since values written from the command line are stored as strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ApiVersion {
    Number(i64),
    Text(String),
}

impl Default for ApiVersion {
    fn default() -> Self {
        ApiVersion::Number(1)
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiVersion::Number(n) => write!(f, "{}", n),
            ApiVersion::Text(s) if s.trim().is_empty() => write!(f, "1"),
            ApiVersion::Text(s) => write!(f, "{}", s.trim()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InternalConfig {
    pub url: String,
    pub version: ApiVersion,
    pub token: String,
}

impl InternalConfig {
    /// `{url}/v{version}/{id}.{ext}`
    pub fn object_url(&self, id: &Uuid, extension: &str) -> String {
        format!(
            "{}/v{}/{}.{}",
            self.url.trim_end_matches('/'),
            self.version,
            id,
            extension
        )
    }
}

const KNOWN_VERSIONS: &[&str] = &["1", "2"];

/// Known API versions, plus the stored one when the server runs another.
fn version_choices(current: &str) -> Vec<String> {
    let mut choices: Vec<String> = KNOWN_VERSIONS.iter().map(|v| v.to_string()).collect();
    if !choices.iter().any(|v| v == current) {
        choices.push(current.to_string());
    }
    choices
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    url: Option<String>,
}

pub struct InternalPlugin;

#[async_trait]
impl BackendPlugin for InternalPlugin {
    fn name(&self) -> &str {
        NAME
    }

    fn display_name(&self, translator: &dyn Translator) -> String {
        translator.tr("PICBED_INTERNAL")
    }

    fn config(&self, current: Option<&BackendSettings>, translator: &dyn Translator) -> Vec<FieldDescriptor> {
        let url = current.and_then(|s| s.get_str("url")).unwrap_or_default();
        let version = current
            .and_then(|s| s.get_str("version"))
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| ApiVersion::default().to_string());
        let token = current.and_then(|s| s.get_str("token")).unwrap_or_default();

        vec![
            FieldDescriptor::input("url", translator.tr("PICBED_INTERNAL_URL"), url, true),
            FieldDescriptor::select("version", translator.tr("PICBED_INTERNAL_VERSION"), version_choices(&version), version, false),
            FieldDescriptor::secret("token", translator.tr("PICBED_INTERNAL_TOKEN"), token, false),
        ]
    }

    async fn handle(&self, ctx: &UploadContext<'_>, batch: &mut [ImageRecord]) -> Result<(), UploadError> {
        let config: InternalConfig = ctx.parse_settings()?;
        require_fields(NAME, &[("url", config.url.as_str())])?;

        for record in batch.iter_mut() {
            let Some(body) = payload_bytes(record)? else {
                continue;
            };

            let extension = record
                .normalized_extension()
                .unwrap_or_else(|| FALLBACK_EXTENSION.to_string());
            let content_type =
                resolve_content_type(record).unwrap_or_else(|_| FALLBACK_CONTENT_TYPE.to_string());

            let mut request = TransportRequest::put(config.object_url(&Uuid::new_v4(), &extension))
                .header("Content-Type", content_type)
                .body(body);
            if !config.token.trim().is_empty() {
                request = request.header("Authorization", format!("Bearer {}", config.token.trim()));
            }

            let response = ctx.transport().request(request).await?;
            if !response.is_success() {
                return Err(UploadError::UploadRejected {
                    file_name: record.file_name.clone(),
                    status: response.status,
                    reason: response.text(),
                });
            }

            let img_url = serde_json::from_slice::<UploadResponse>(&response.body)
                .ok()
                .and_then(|parsed| parsed.url)
                .filter(|url| !url.is_empty())
                .ok_or_else(|| UploadError::UploadRejected {
                    file_name: record.file_name.clone(),
                    status: response.status,
                    reason: format!("no url in server response: {}", response.text()),
                })?;

            ctx.publish(record, img_url);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use picbed_i18n::Locale;
    use picbed_uploader::test_helpers::MockTransport;

    const SETTINGS: &str = "url = \"https://img.local/api/\"\nversion = 2\n";

    fn settings(text: &str) -> BackendSettings {
        BackendSettings::new(text.parse::<toml::Table>().unwrap())
    }

    async fn run(text: &str, transport: &MockTransport, batch: &mut [ImageRecord]) -> Result<(), UploadError> {
        let ctx = UploadContext::new(NAME, Some(settings(text)), transport);
        InternalPlugin.handle(&ctx, batch).await
    }

    fn uuid_segment(url: &str) -> &str {
        let last = url.rsplit('/').next().unwrap();
        last.split('.').next().unwrap()
    }

    #[tokio::test]
    async fn publishes_url_from_server() {
        let transport = MockTransport::new().respond(200, r#"{"url":"https://img.local/x.png"}"#);
        let mut batch = vec![ImageRecord::from_bytes("shot.png", ".png", b"png".to_vec())];

        run(SETTINGS, &transport, &mut batch).await.unwrap();

        assert_eq!(batch[0].img_url.as_deref(), Some("https://img.local/x.png"));
        assert_eq!(batch[0].backend_type.as_deref(), Some("internal"));
        assert!(!batch[0].has_payload());

        let request = &transport.requests()[0];
        assert!(request.url.starts_with("https://img.local/api/v2/"));
        assert!(request.url.ends_with(".png"));
        assert!(Uuid::parse_str(uuid_segment(&request.url)).is_ok());
        assert_eq!(request.header_value("content-type"), Some("image/png"));
        assert_eq!(request.header_value("authorization"), None);
    }

    #[tokio::test]
    async fn empty_json_is_rejected_despite_success_status() {
        let transport = MockTransport::new().respond(200, "{}");
        let mut batch = vec![ImageRecord::from_bytes("shot.png", ".png", b"png".to_vec())];

        let err = run(SETTINGS, &transport, &mut batch).await.unwrap_err();

        assert!(matches!(err, UploadError::UploadRejected { status: 200, .. }));
        assert!(batch[0].has_payload());
        assert!(!batch[0].is_published());
    }

    #[tokio::test]
    async fn unparsable_body_is_rejected() {
        let transport = MockTransport::new().respond(200, "<html>oops</html>");
        let mut batch = vec![ImageRecord::from_bytes("shot.png", ".png", b"png".to_vec())];

        let err = run(SETTINGS, &transport, &mut batch).await.unwrap_err();
        assert!(matches!(err, UploadError::UploadRejected { .. }));
    }

    #[tokio::test]
    async fn error_status_is_rejected() {
        let transport = MockTransport::new().respond(502, "bad gateway");
        let mut batch = vec![ImageRecord::from_bytes("shot.png", ".png", b"png".to_vec())];

        let err = run(SETTINGS, &transport, &mut batch).await.unwrap_err();
        assert!(matches!(err, UploadError::UploadRejected { status: 502, .. }));
    }

    #[tokio::test]
    async fn every_image_gets_a_fresh_identifier() {
        let transport = MockTransport::new()
            .respond(200, r#"{"url":"https://img.local/1"}"#)
            .respond(200, r#"{"url":"https://img.local/2"}"#);
        let mut batch = vec![
            ImageRecord::from_bytes("a.png", ".png", b"a".to_vec()),
            ImageRecord::from_base64("b.jpg", "jpg", "Yg=="),
        ];

        run(SETTINGS, &transport, &mut batch).await.unwrap();

        let requests = transport.requests();
        assert_ne!(uuid_segment(&requests[0].url), uuid_segment(&requests[1].url));
        assert!(requests[1].url.ends_with(".jpg"));
        assert_eq!(requests[1].body.as_ref(), b"b");
    }

    #[tokio::test]
    async fn version_defaults_to_one_and_token_is_sent() {
        let transport = MockTransport::new().respond(200, r#"{"url":"https://img.local/1"}"#);
        let mut batch = vec![ImageRecord::from_bytes("a", "", b"a".to_vec())];

        run("url = \"https://img.local\"\ntoken = \"t0k\"", &transport, &mut batch)
            .await
            .unwrap();

        let request = &transport.requests()[0];
        assert!(request.url.starts_with("https://img.local/v1/"));
        assert!(request.url.ends_with(".png"));
        assert_eq!(request.header_value("authorization"), Some("Bearer t0k"));
        assert_eq!(request.header_value("content-type"), Some("application/octet-stream"));
    }

    #[tokio::test]
    async fn string_version_from_cli_is_accepted() {
        let transport = MockTransport::new().respond(200, r#"{"url":"https://img.local/1"}"#);
        let mut batch = vec![ImageRecord::from_bytes("a.png", "png", b"a".to_vec())];

        run("url = \"https://img.local\"\nversion = \"3\"", &transport, &mut batch)
            .await
            .unwrap();

        assert!(transport.requests()[0].url.starts_with("https://img.local/v3/"));
    }

    #[tokio::test]
    async fn missing_url_is_missing_config() {
        let transport = MockTransport::new();
        let mut batch = vec![ImageRecord::from_bytes("a.png", "png", b"a".to_vec())];

        let err = run("version = 1", &transport, &mut batch).await.unwrap_err();

        assert!(matches!(err, UploadError::MissingConfig { .. }));
        assert_eq!(transport.request_count(), 0);
    }

    #[test]
    fn config_reflects_current_settings() {
        let current = settings(SETTINGS);
        let fields = InternalPlugin.config(Some(&current), &Locale::english());

        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0].default, "https://img.local/api/");
        assert!(fields[0].required);
        assert_eq!(fields[1].default, "2");
        assert_eq!(
            fields[1].kind,
            picbed_models::InputKind::Select {
                choices: vec!["1".to_string(), "2".to_string()]
            }
        );
        let custom = InternalPlugin.config(Some(&settings("url = \"x\"\nversion = \"3\"")), &Locale::english());
        assert_eq!(
            custom[1].kind,
            picbed_models::InputKind::Select {
                choices: vec!["1".to_string(), "2".to_string(), "3".to_string()]
            }
        );
        assert_eq!(
            InternalPlugin.config(None, &Locale::english())[1].default,
            "1"
        );
    }
}
