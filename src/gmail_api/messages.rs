use crate::email_content::decode_body_data;
use crate::error::{ApiError, Result};
use crate::gmail_api::client::AuthorizedClient;
use crate::types::{AttachmentResponse, Message, MessagesResponse};
use async_trait::async_trait;
use reqwest::Response;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

pub const GMAIL_API_BASE_URL: &str = "https://gmail.googleapis.com/gmail/v1";

// The subset of the Gmail API the quickstart uses
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MailApi: Send + Sync {
    async fn list_message_ids(&self, user: &str) -> Result<Vec<String>>;
    async fn get_message(&self, user: &str, id: &str) -> Result<Message>;
    async fn get_attachment(
        &self,
        user: &str,
        message_id: &str,
        attachment_id: &str,
    ) -> Result<Vec<u8>>;
}

pub struct GmailSession {
    client: AuthorizedClient,
    base_url: String,
}

impl GmailSession {
    pub fn new(client: AuthorizedClient) -> Self {
        Self::with_base_url(client, GMAIL_API_BASE_URL)
    }

    pub fn with_base_url(client: AuthorizedClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn client(&self) -> &AuthorizedClient {
        &self.client
    }

    /// `<base>/users/<user>/messages/<rest..>`, with every caller-supplied
    /// value escaped as a single path segment.
    fn messages_url(&self, user: &str, rest: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ApiError::Url(format!("{}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::Url(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(["users", user, "messages"])
            .extend(rest);
        Ok(url)
    }
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = response.text().await.map_err(ApiError::from)?;
    serde_json::from_str(&body)
        .map_err(|e| ApiError::Payload(format!("unexpected response body: {}", e)).into())
}

#[async_trait]
impl MailApi for GmailSession {
    async fn list_message_ids(&self, user: &str) -> Result<Vec<String>> {
        let url = self.messages_url(user, &[])?;
        let response = self.client.get(url.as_str()).await?;
        let messages_data: MessagesResponse = parse_json(response).await?;

        let ids: Vec<String> = messages_data
            .messages
            .unwrap_or_default()
            .into_iter()
            .filter_map(|m| m.id)
            .collect();
        debug!("Listed {} message ids", ids.len());
        Ok(ids)
    }

    async fn get_message(&self, user: &str, id: &str) -> Result<Message> {
        let mut message_url = self.messages_url(user, &[id])?;
        message_url.query_pairs_mut().append_pair("format", "full");
        let response = self.client.get(message_url.as_str()).await?;
        parse_json(response).await
    }

    async fn get_attachment(
        &self,
        user: &str,
        message_id: &str,
        attachment_id: &str,
    ) -> Result<Vec<u8>> {
        let attachment_url =
            self.messages_url(user, &[message_id, "attachments", attachment_id])?;
        let response = self.client.get(attachment_url.as_str()).await?;
        let attachment: AttachmentResponse = parse_json(response).await?;

        let bytes = match (attachment.data.as_deref(), attachment.size) {
            (Some(data), _) => decode_body_data(data)?,
            // Zero-byte attachments may come back without a data field
            (None, Some(0)) => Vec::new(),
            (None, _) => {
                return Err(ApiError::Payload("attachment response has no data".to_string()).into())
            }
        };
        if let Some(size) = attachment.size {
            if size >= 0 && size as usize != bytes.len() {
                debug!(
                    "Attachment {} reported {} bytes but decoded {}",
                    attachment_id,
                    size,
                    bytes.len()
                );
            }
        }
        Ok(bytes)
    }
}
