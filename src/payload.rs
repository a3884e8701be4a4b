//! Webhook wire format
//!
//! Field names follow the Discord execute-webhook JSON body.

use serde::{Deserialize, Serialize};

use crate::config::Identity;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Payload {
    pub wait: bool,
    pub content: String,
    /// Omitted when empty, the API rejects a blank username.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub username: String,
    pub avatar_url: String,
    pub tts: bool,
    pub embeds: Vec<Embed>,
}

impl Payload {
    /// An empty payload carrying only the sender identity for this run.
    pub fn new(identity: &Identity) -> Self {
        Self {
            wait: identity.wait,
            username: identity.username.clone(),
            avatar_url: identity.avatar_url.clone(),
            tts: identity.tts,
            ..Default::default()
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_embeds(mut self, embeds: Vec<Embed>) -> Self {
        self.embeds = embeds;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub url: String,
    pub color: u32,
    pub footer: EmbedFooter,
    pub author: EmbedAuthor,
    pub fields: Vec<EmbedField>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbedFooter {
    pub text: String,
    pub icon_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbedAuthor {
    pub name: String,
    pub url: String,
    pub icon_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn identity() -> Identity {
        Identity {
            username: "drone".to_string(),
            avatar_url: "https://example.com/a.png".to_string(),
            tts: true,
            wait: true,
        }
    }

    #[test]
    fn serializes_wire_field_names() {
        let payload = Payload::new(&identity()).with_embeds(vec![Embed {
            title: "t".to_string(),
            color: 0x1ac600,
            footer: EmbedFooter {
                text: "f".to_string(),
                icon_url: "https://example.com/f.png".to_string(),
            },
            ..Default::default()
        }]);

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["wait"], json!(true));
        assert_eq!(value["content"], json!(""));
        assert_eq!(value["username"], json!("drone"));
        assert_eq!(value["avatar_url"], json!("https://example.com/a.png"));
        assert_eq!(value["tts"], json!(true));
        assert_eq!(value["embeds"][0]["color"], json!(0x1ac600));
        assert_eq!(value["embeds"][0]["footer"]["icon_url"], json!("https://example.com/f.png"));
        assert_eq!(value["embeds"][0]["author"]["url"], json!(""));
        assert_eq!(value["embeds"][0]["fields"], json!([]));
    }

    #[test]
    fn empty_username_is_omitted() {
        let value = serde_json::to_value(Payload::default()).unwrap();
        assert!(value.get("username").is_none());
        assert_eq!(value["avatar_url"], json!(""));
    }

    #[test]
    fn json_round_trip_keeps_embed_order() {
        let embeds = (0..3)
            .map(|i| Embed {
                title: format!("embed {}", i),
                description: "d".to_string(),
                url: "https://ci.example.com/1".to_string(),
                color: i,
                author: EmbedAuthor {
                    name: "octocat".to_string(),
                    url: "https://github.com/octocat".to_string(),
                    icon_url: "https://example.com/o.png".to_string(),
                },
                fields: vec![
                    EmbedField { name: "a".to_string(), value: "1".to_string() },
                    EmbedField { name: "b".to_string(), value: "2".to_string() },
                ],
                ..Default::default()
            })
            .collect();
        let payload = Payload::new(&identity())
            .with_content("hello")
            .with_embeds(embeds);

        let wire = serde_json::to_string(&payload).unwrap();
        let back: Payload = serde_json::from_str(&wire).unwrap();
        assert_eq!(back, payload);
    }
}
