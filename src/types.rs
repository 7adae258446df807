use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagesResponse {
    pub messages: Option<Vec<MessageRef>>,
    pub next_page_token: Option<String>,
    pub result_size_estimate: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRef {
    pub id: Option<String>,
    pub thread_id: Option<String>,
}

// Gmail encodes int64 fields (historyId, internalDate) as JSON strings.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Option<String>,
    pub thread_id: Option<String>,
    pub history_id: Option<String>,
    pub internal_date: Option<String>,
    pub size_estimate: Option<i64>,
    pub label_ids: Option<Vec<String>>,
    pub snippet: Option<String>,
    pub payload: Option<MessagePart>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct MessagePart {
    pub part_id: Option<String>,
    pub mime_type: Option<String>,
    pub filename: Option<String>,
    pub headers: Option<Vec<Header>>,
    pub body: Option<MessagePartBody>,
    pub parts: Option<Vec<MessagePart>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Header {
    pub name: Option<String>,
    pub value: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct MessagePartBody {
    pub attachment_id: Option<String>,
    pub size: Option<i64>,
    pub data: Option<String>,
}

// Response of users.messages.attachments.get
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentResponse {
    pub attachment_id: Option<String>,
    pub size: Option<i64>,
    pub data: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_deserializes_gmail_shape() {
        let json = r#"{
            "id": "18c1f2",
            "threadId": "18c1f0",
            "labelIds": ["INBOX", "UNREAD"],
            "snippet": "Quarterly report attached",
            "historyId": "987654",
            "internalDate": "1700000000000",
            "sizeEstimate": 20480,
            "payload": {
                "partId": "",
                "mimeType": "multipart/mixed",
                "filename": "",
                "headers": [{"name": "Subject", "value": "Report"}],
                "body": {"size": 0},
                "parts": [
                    {
                        "partId": "1",
                        "mimeType": "application/octet-stream",
                        "filename": "report.bin",
                        "body": {"attachmentId": "ANGjdJ8", "size": 1024}
                    }
                ]
            }
        }"#;

        let message: Message = serde_json::from_str(json).unwrap();
        assert_eq!(message.history_id.as_deref(), Some("987654"));
        assert_eq!(message.internal_date.as_deref(), Some("1700000000000"));
        assert_eq!(message.size_estimate, Some(20480));
        let payload = message.payload.unwrap();
        let part = &payload.parts.unwrap()[0];
        assert_eq!(part.filename.as_deref(), Some("report.bin"));
        let body = part.body.as_ref().unwrap();
        assert_eq!(body.attachment_id.as_deref(), Some("ANGjdJ8"));
        assert_eq!(body.size, Some(1024));
    }
}
