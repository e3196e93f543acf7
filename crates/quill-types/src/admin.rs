use serde::{Deserialize, Serialize};

use crate::api::LooseId;

/// Body of `POST /admin`.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct AdminRequest {
    pub encrypted: Option<EncryptedBlob>,
}

/// The sealed command, either base64 text, a plain byte array, or a
/// Node-style `{ "type": "Buffer", "data": [...] }` object.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum EncryptedBlob {
    Text(String),
    Bytes(Vec<u8>),
    Buffer { data: Vec<u8> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminOperation {
    AddArticle,
    RemoveArticle,
    RemoveComment,
}

impl AdminOperation {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "addarticle" => Some(Self::AddArticle),
            "removearticle" => Some(Self::RemoveArticle),
            "removecomment" => Some(Self::RemoveComment),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Self::AddArticle => "addarticle",
            Self::RemoveArticle => "removearticle",
            Self::RemoveComment => "removecomment",
        }
    }
}

/// Decrypted admin command. Which fields are required depends on
/// `operation`; the handler checks them after the freshness window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdminCommand {
    /// Client clock, epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    pub operation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(rename = "catelogyID", default, skip_serializing_if = "Option::is_none")]
    pub catelogy_id: Option<LooseId>,
    #[serde(rename = "postID", default, skip_serializing_if = "Option::is_none")]
    pub post_id: Option<LooseId>,
    #[serde(rename = "commentID", default, skip_serializing_if = "Option::is_none")]
    pub comment_id: Option<LooseId>,
}

impl AdminCommand {
    pub fn add_article(
        timestamp: i64,
        title: &str,
        thumbnail: &str,
        description: &str,
        content: &str,
        catelogy_id: i64,
    ) -> Self {
        Self {
            timestamp: Some(timestamp),
            operation: AdminOperation::AddArticle.tag().to_string(),
            title: Some(title.to_string()),
            thumbnail: Some(thumbnail.to_string()),
            description: Some(description.to_string()),
            content: Some(content.to_string()),
            catelogy_id: Some(catelogy_id.into()),
            ..Self::default()
        }
    }

    pub fn remove_article(timestamp: i64, post_id: i64) -> Self {
        Self {
            timestamp: Some(timestamp),
            operation: AdminOperation::RemoveArticle.tag().to_string(),
            post_id: Some(post_id.into()),
            ..Self::default()
        }
    }

    pub fn remove_comment(timestamp: i64, comment_id: i64) -> Self {
        Self {
            timestamp: Some(timestamp),
            operation: AdminOperation::RemoveComment.tag().to_string(),
            comment_id: Some(comment_id.into()),
            ..Self::default()
        }
    }

    pub fn operation(&self) -> Option<AdminOperation> {
        AdminOperation::from_tag(&self.operation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blob_accepts_all_shapes() {
        let text: EncryptedBlob = serde_json::from_str(r#""AAEC""#).unwrap();
        assert!(matches!(text, EncryptedBlob::Text(s) if s == "AAEC"));

        let bytes: EncryptedBlob = serde_json::from_str("[0, 1, 2]").unwrap();
        assert!(matches!(bytes, EncryptedBlob::Bytes(b) if b == vec![0, 1, 2]));

        let buffer: EncryptedBlob =
            serde_json::from_str(r#"{"type": "Buffer", "data": [0, 1, 2]}"#).unwrap();
        assert!(matches!(buffer, EncryptedBlob::Buffer { data } if data == vec![0, 1, 2]));
    }

    #[test]
    fn command_wire_shape() {
        let cmd = AdminCommand::remove_comment(1_700_000_000_000, 4);
        let json = serde_json::to_value(&cmd).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "timestamp": 1_700_000_000_000i64,
                "operation": "removecomment",
                "commentID": 4
            })
        );
        assert_eq!(cmd.operation(), Some(AdminOperation::RemoveComment));
    }

    #[test]
    fn unknown_operation_still_parses() {
        let cmd: AdminCommand =
            serde_json::from_str(r#"{"timestamp": 1, "operation": "dropdatabase"}"#).unwrap();
        assert_eq!(cmd.operation(), None);
    }
}
