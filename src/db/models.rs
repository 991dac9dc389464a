use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// One original URL, its short identifier and everyone who shortened it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlRecord {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub short_id: String,
    pub original_url: String,
    #[serde(default)]
    pub users: Vec<String>,
}

impl UrlRecord {
    pub fn new(short_id: String, original_url: String, user_id: String) -> Self {
        Self {
            id: None,
            short_id,
            original_url,
            users: vec![user_id],
        }
    }

    pub fn has_user(&self, user_id: &str) -> bool {
        self.users.iter().any(|u| u == user_id)
    }
}

#[cfg(test)]
mod tests {
    use mongodb::bson::{doc, to_document};

    use super::*;

    #[test]
    fn serializes_with_collection_field_names() {
        let record = UrlRecord::new("1a2b3c".into(), "https://example.com".into(), "u1".into());
        let document = to_document(&record).unwrap();
        assert_eq!(
            document,
            doc! {
                "shortId": "1a2b3c",
                "originalUrl": "https://example.com",
                "users": ["u1"],
            }
        );
    }

    #[test]
    fn missing_users_reads_as_empty() {
        let record: UrlRecord = mongodb::bson::from_document(doc! {
            "shortId": "1a2b3c",
            "originalUrl": "https://example.com",
        })
        .unwrap();
        assert!(record.users.is_empty());
        assert!(!record.has_user("u1"));
    }
}
