use crate::error::ApiError;
use crate::types::MessagePart;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::engine::Engine;

pub const ATTACHMENT_MIME_TYPE: &str = "application/octet-stream";

/// A body part that should be saved to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentPart {
    pub filename: String,
    pub attachment_id: Option<String>,
    pub size: i64,
    // Set when the API already inlined the payload
    pub inline_data: Option<String>,
}

/// Decodes base64url body data. Gmail sends it both with and without padding.
pub fn decode_body_data(data: &str) -> Result<Vec<u8>, ApiError> {
    URL_SAFE_NO_PAD
        .decode(data.trim_end_matches('='))
        .map_err(|e| ApiError::Payload(format!("invalid base64url data: {}", e)))
}

fn decode_text(payload: &MessagePart) -> Option<String> {
    let data = payload.body.as_ref().and_then(|b| b.data.as_ref())?;
    let decoded = decode_body_data(data).ok()?;
    String::from_utf8(decoded).ok()
}

fn extract_body_of_type(payload: &MessagePart, wanted: &str) -> Option<String> {
    // Check if this part is the wanted type
    if payload.mime_type.as_deref() == Some(wanted) {
        if let Some(text) = decode_text(payload) {
            return Some(text);
        }
    }

    // Recursively search parts
    if let Some(parts) = &payload.parts {
        for part in parts {
            if let Some(text) = extract_body_of_type(part, wanted) {
                if !text.trim().is_empty() {
                    return Some(text);
                }
            }
        }
    }

    None
}

// Extract plain text content specifically
pub fn extract_plain_text_body(payload: &MessagePart) -> Option<String> {
    extract_body_of_type(payload, "text/plain")
}

// Extract HTML content specifically
pub fn extract_html_body(payload: &MessagePart) -> Option<String> {
    extract_body_of_type(payload, "text/html")
}

/// The body shown to the user: HTML when present, plain text otherwise.
pub fn extract_display_body(payload: &MessagePart) -> Option<String> {
    extract_html_body(payload).or_else(|| extract_plain_text_body(payload))
}

/// Collects every `application/octet-stream` part, depth first, in the order
/// the API returned them.
pub fn find_attachments(payload: &MessagePart) -> Vec<AttachmentPart> {
    let mut found = Vec::new();
    collect_attachments(payload, &mut found);
    found
}

fn collect_attachments(part: &MessagePart, found: &mut Vec<AttachmentPart>) {
    if part.mime_type.as_deref() == Some(ATTACHMENT_MIME_TYPE) {
        let body = part.body.clone().unwrap_or_default();
        found.push(AttachmentPart {
            filename: part.filename.clone().unwrap_or_default(),
            attachment_id: body.attachment_id,
            size: body.size.unwrap_or(0),
            inline_data: body.data,
        });
    }
    for child in part.parts.iter().flatten() {
        collect_attachments(child, found);
    }
}
