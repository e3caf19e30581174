//! GitHub: commits each image into a repository through the contents API.

use async_trait::async_trait;
use base64::Engine;
use picbed_config::BackendSettings;
use picbed_i18n::Translator;
use picbed_models::{FieldDescriptor, ImageRecord};
use picbed_uploader::{
    build_public_url, payload_bytes, require_fields, BackendPlugin, TransportRequest,
    UploadContext, UploadError,
};
use picbed_utils::encode_uri_path;
use serde::{Deserialize, Serialize};

pub const NAME: &str = "github";

const API_BASE: &str = "https://api.github.com";

fn default_branch() -> String {
    "master".to_string()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GithubConfig {
    #[serde(default)]
    pub token: String,
    /// `owner/name`
    #[serde(default)]
    pub repo: String,
    #[serde(default)]
    pub path: String,
    #[serde(default = "default_branch")]
    pub branch: String,
    #[serde(default)]
    pub custom_url: String,
}

impl GithubConfig {
    fn branch(&self) -> &str {
        if self.branch.trim().is_empty() {
            "master"
        } else {
            self.branch.trim()
        }
    }

    pub fn contents_url(&self, file_name: &str) -> String {
        format!(
            "{}/repos/{}/contents/{}{}",
            API_BASE,
            self.repo.trim_matches('/'),
            encode_uri_path(&self.path),
            encode_uri_path(file_name)
        )
    }
}

#[derive(Serialize)]
struct CommitRequest<'a> {
    message: &'a str,
    branch: &'a str,
    content: String,
}

#[derive(Deserialize)]
struct CommitResponse {
    content: Option<CommittedFile>,
}

#[derive(Deserialize)]
struct CommittedFile {
    download_url: Option<String>,
}

pub struct GithubPlugin;

#[async_trait]
impl BackendPlugin for GithubPlugin {
    fn name(&self) -> &str {
        NAME
    }

    fn display_name(&self, translator: &dyn Translator) -> String {
        translator.tr("PICBED_GITHUB")
    }

    fn config(&self, current: Option<&BackendSettings>, translator: &dyn Translator) -> Vec<FieldDescriptor> {
        let value = |key: &str| current.and_then(|s| s.get_str(key)).unwrap_or_default();
        let branch = current
            .and_then(|s| s.get_str("branch"))
            .filter(|b| !b.trim().is_empty())
            .unwrap_or_else(default_branch);

        vec![
            FieldDescriptor::input("repo", translator.tr("PICBED_GITHUB_REPO"), value("repo"), true),
            FieldDescriptor::input("branch", translator.tr("PICBED_GITHUB_BRANCH"), branch, false),
            FieldDescriptor::secret("token", translator.tr("PICBED_GITHUB_TOKEN"), value("token"), true),
            FieldDescriptor::input("path", translator.tr("PICBED_GITHUB_PATH"), value("path"), false),
            FieldDescriptor::input("customUrl", translator.tr("PICBED_GITHUB_CUSTOMURL"), value("customUrl"), false),
        ]
    }

    async fn handle(&self, ctx: &UploadContext<'_>, batch: &mut [ImageRecord]) -> Result<(), UploadError> {
        let config: GithubConfig = ctx.parse_settings()?;
        require_fields(
            NAME,
            &[("repo", config.repo.as_str()), ("token", config.token.as_str())],
        )?;

        for record in batch.iter_mut() {
            let Some(data) = payload_bytes(record)? else {
                continue;
            };

            let message = format!("Upload {} by picbed", record.file_name);
            let payload = CommitRequest {
                message: &message,
                branch: config.branch(),
                content: base64::engine::general_purpose::STANDARD.encode(&data),
            };
            let body = serde_json::to_vec(&payload).map_err(|e| UploadError::InvalidPayload {
                file_name: record.file_name.clone(),
                reason: e.to_string(),
            })?;

            let request = TransportRequest::put(config.contents_url(&record.file_name))
                .header("Authorization", format!("token {}", config.token.trim()))
                .header("Accept", "application/vnd.github+json")
                .header("Content-Type", "application/json")
                .body(body);

            let response = ctx.transport().request(request).await?;
            if response.status != 200 && response.status != 201 {
                return Err(UploadError::UploadRejected {
                    file_name: record.file_name.clone(),
                    status: response.status,
                    reason: response.text(),
                });
            }

            let img_url = if config.custom_url.trim().is_empty() {
                serde_json::from_slice::<CommitResponse>(&response.body)
                    .ok()
                    .and_then(|parsed| parsed.content)
                    .and_then(|file| file.download_url)
                    .filter(|url| !url.is_empty())
                    .ok_or_else(|| UploadError::UploadRejected {
                        file_name: record.file_name.clone(),
                        status: response.status,
                        reason: "no download_url in response".to_string(),
                    })?
            } else {
                build_public_url(&config.custom_url, "", &config.path, &record.file_name, "")
            };

            ctx.publish(record, img_url);
        }

        Ok(())
    }
}
