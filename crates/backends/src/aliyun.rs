//! Aliyun OSS: HMAC-SHA1 signed PUT into a bucket.

use async_trait::async_trait;
use base64::Engine;
use hmac::{Hmac, Mac};
use picbed_config::BackendSettings;
use picbed_i18n::Translator;
use picbed_models::{FieldDescriptor, ImageRecord};
use picbed_uploader::{
    build_public_url, payload_bytes, require_fields, resolve_content_type, BackendPlugin,
    TransportRequest, UploadContext, UploadError,
};
use picbed_utils::{encode_uri_path, http_date_now};
use serde::Deserialize;
use sha1::Sha1;

pub const NAME: &str = "aliyun";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AliyunConfig {
    pub access_key_id: String,
    pub access_key_secret: String,
    pub bucket: String,
    pub area: String,
    pub path: String,
    pub custom_url: String,
    /// Appended verbatim to every published URL, e.g. `?x-oss-process=...`
    pub options: String,
}

impl AliyunConfig {
    fn validate(&self) -> Result<(), UploadError> {
        require_fields(
            NAME,
            &[
                ("accessKeyId", self.access_key_id.as_str()),
                ("accessKeySecret", self.access_key_secret.as_str()),
                ("bucket", self.bucket.as_str()),
                ("area", self.area.as_str()),
            ],
        )
    }

    pub fn host(&self) -> String {
        format!("{}.{}.aliyuncs.com", self.bucket, self.area)
    }
}

/// `Authorization` header value for a PUT of `file_name`.
///
/// Only the inputs go into the signature, so the same arguments always give
/// the same header.
pub fn sign(
    config: &AliyunConfig,
    file_name: &str,
    content_type: &str,
    date: &str,
) -> Result<String, UploadError> {
    let string_to_sign = format!(
        "PUT\n\n{}\n{}\n/{}/{}{}",
        content_type, date, config.bucket, config.path, file_name
    );

    let mut mac = Hmac::<Sha1>::new_from_slice(config.access_key_secret.as_bytes()).map_err(|e| {
        UploadError::AuthConstructionFailed {
            file_name: file_name.to_string(),
            reason: e.to_string(),
        }
    })?;
    mac.update(string_to_sign.as_bytes());
    let signature = base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes());

    Ok(format!("OSS {}:{}", config.access_key_id, signature))
}

pub struct AliyunPlugin;

#[async_trait]
impl BackendPlugin for AliyunPlugin {
    fn name(&self) -> &str {
        NAME
    }

    fn display_name(&self, translator: &dyn Translator) -> String {
        translator.tr("PICBED_ALICLOUD")
    }

    fn config(&self, current: Option<&BackendSettings>, translator: &dyn Translator) -> Vec<FieldDescriptor> {
        let value = |key: &str| current.and_then(|s| s.get_str(key)).unwrap_or_default();

        vec![
            FieldDescriptor::input("accessKeyId", translator.tr("PICBED_ALICLOUD_ACCESSKEYID"), value("accessKeyId"), true),
            FieldDescriptor::secret("accessKeySecret", translator.tr("PICBED_ALICLOUD_ACCESSKEYSECRET"), value("accessKeySecret"), true),
            FieldDescriptor::input("bucket", translator.tr("PICBED_ALICLOUD_BUCKET"), value("bucket"), true),
            FieldDescriptor::input("area", translator.tr("PICBED_ALICLOUD_AREA"), value("area"), true),
            FieldDescriptor::input("path", translator.tr("PICBED_ALICLOUD_PATH"), value("path"), false),
            FieldDescriptor::input("customUrl", translator.tr("PICBED_ALICLOUD_CUSTOMURL"), value("customUrl"), false),
            FieldDescriptor::input("options", translator.tr("PICBED_ALICLOUD_OPTIONS"), value("options"), false),
        ]
    }

    async fn handle(&self, ctx: &UploadContext<'_>, batch: &mut [ImageRecord]) -> Result<(), UploadError> {
        let config: AliyunConfig = ctx.parse_settings()?;
        config.validate()?;

        let host = config.host();
        let canonical_base = format!("https://{}", host);

        for record in batch.iter_mut() {
            if !record.has_payload() {
                continue;
            }

            let content_type = resolve_content_type(record)?;
            let Some(body) = payload_bytes(record)? else {
                continue;
            };

            // Fresh date and signature per object
            let date = http_date_now();
            let authorization = sign(&config, &record.file_name, &content_type, &date)?;

            let url = format!(
                "{}/{}{}",
                canonical_base,
                encode_uri_path(&config.path),
                encode_uri_path(&record.file_name)
            );
            let request = TransportRequest::put(url)
                .header("Host", host.as_str())
                .header("Authorization", authorization)
                .header("Date", date)
                .header("Content-Type", content_type)
                .body(body);

            let response = ctx.transport().request(request).await?;
            if response.status != 200 {
                return Err(UploadError::UploadRejected {
                    file_name: record.file_name.clone(),
                    status: response.status,
                    reason: response.text(),
                });
            }

            let img_url = build_public_url(
                &config.custom_url,
                &canonical_base,
                &config.path,
                &record.file_name,
                &config.options,
            );
            ctx.publish(record, img_url);
        }

        Ok(())
    }
}
