//! Wire types exchanged with the REST API.

use serde::{Deserialize, Serialize};

/// Body of an entry create/update request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryPayload {
    pub title: String,
    pub description: String,
    pub visibility: String,
    pub content_type: String,
    pub content: String,
}

/// Entry as returned by the API after a create/update.
///
/// Only the fields the client acts on are typed; the rest rides along.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Author profile.
///
/// Unknown fields are kept so a fetched author can be echoed back inside
/// like and follow activities exactly as the server sent it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeCount {
    #[serde(default)]
    pub count: u64,
}

/// A comment on an entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub author: Author,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub published: Option<String>,
    #[serde(default)]
    pub likes: LikeCount,
}

/// `GET .../comments/` response envelope.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CommentList {
    #[serde(default)]
    pub src: Vec<Comment>,
}

/// Activity objects posted to the API.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Activity {
    Comment(CommentActivity),
    Like(LikeActivity),
    Follow(FollowActivity),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentActivity {
    pub comment: String,
    pub content_type: String,
    /// Full id of the entry being commented on
    pub object: String,
    /// RFC 3339 timestamp
    pub published: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LikeActivity {
    pub id: String,
    pub author: Author,
    /// Full id of the liked entry or comment
    pub object: String,
    pub published: String,
}

impl LikeActivity {
    /// Like id under the liking author: `{author id}/liked/{unique}`.
    pub fn like_id(author_id: &str, unique: &str) -> String {
        format!("{}/liked/{}", author_id.trim_end_matches('/'), unique)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FollowActivity {
    pub summary: String,
    pub actor: Author,
    pub object: Author,
}

impl FollowActivity {
    pub fn new(actor: Author, object: Author) -> Self {
        Self {
            summary: format!(
                "{} wants to follow {}",
                actor.display_name, object.display_name
            ),
            actor,
            object,
        }
    }
}

/// Body of the follow management endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowPair {
    pub from_author: String,
    pub to_author: String,
}

/// One author search suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorSuggestion {
    pub id: String,
    #[serde(default)]
    pub display_name: String,
}

/// `GET /api/author_autocomplete/` response envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AuthorSuggestions {
    #[serde(default)]
    pub results: Vec<AuthorSuggestion>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn author(id: &str, name: &str) -> Author {
        serde_json::from_value(json!({ "id": id, "displayName": name, "type": "author" }))
            .unwrap()
    }

    #[test]
    fn test_entry_payload_uses_camel_case() {
        let payload = EntryPayload {
            title: "t".into(),
            description: "d".into(),
            visibility: "PUBLIC".into(),
            content_type: "text/markdown".into(),
            content: "# hi".into(),
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["contentType"], "text/markdown");
        assert!(value.get("content_type").is_none());
    }

    #[test]
    fn test_author_keeps_unknown_fields() {
        let a = author("http://node/api/authors/1", "Ada");
        assert_eq!(a.extra.get("type"), Some(&json!("author")));
        let round = serde_json::to_value(&a).unwrap();
        assert_eq!(round["type"], "author");
        assert_eq!(round["displayName"], "Ada");
    }

    #[test]
    fn test_comment_list_defaults() {
        let list: CommentList = serde_json::from_str("{}").unwrap();
        assert!(list.src.is_empty());

        let list: CommentList = serde_json::from_value(json!({
            "src": [{
                "id": "http://node/api/authors/1/commented/5",
                "author": { "id": "http://node/api/authors/1", "displayName": "Ada" },
                "comment": "nice",
                "likes": {}
            }]
        }))
        .unwrap();
        assert_eq!(list.src[0].likes.count, 0);
        assert_eq!(list.src[0].comment, "nice");
    }

    #[test]
    fn test_activity_tagging() {
        let like = Activity::Like(LikeActivity {
            id: LikeActivity::like_id("http://node/api/authors/1/", "u"),
            author: author("http://node/api/authors/1", "Ada"),
            object: "http://node/api/authors/2/entries/3".into(),
            published: "2025-01-01T00:00:00Z".into(),
        });
        let value = serde_json::to_value(&like).unwrap();
        assert_eq!(value["type"], "like");
        assert_eq!(value["id"], "http://node/api/authors/1/liked/u");

        let follow = Activity::Follow(FollowActivity::new(
            author("a", "Ada"),
            author("b", "Grace"),
        ));
        let value = serde_json::to_value(&follow).unwrap();
        assert_eq!(value["type"], "follow");
        assert_eq!(value["summary"], "Ada wants to follow Grace");

        let comment = Activity::Comment(CommentActivity {
            comment: "hi".into(),
            content_type: "text/plain".into(),
            object: "e".into(),
            published: "now".into(),
        });
        let value = serde_json::to_value(&comment).unwrap();
        assert_eq!(value["type"], "comment");
        assert_eq!(value["contentType"], "text/plain");
    }

    #[test]
    fn test_author_suggestions_are_snake_case() {
        let list: AuthorSuggestions = serde_json::from_value(json!({
            "results": [{ "id": "http://node/api/authors/1/", "display_name": "Ada" }]
        }))
        .unwrap();
        assert_eq!(list.results.len(), 1);
        assert_eq!(list.results[0].display_name, "Ada");
        let empty: AuthorSuggestions = serde_json::from_str("{}").unwrap();
        assert!(empty.results.is_empty());
    }
}
