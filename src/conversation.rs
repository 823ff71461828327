//! Chat messages carrying extracted pages to a multimodal model.
//!
//! Messages serialize to the widely used chat-completions shape:
//!
//! ```json
//! {"role": "user", "content": [
//!     {"type": "text", "text": "..."},
//!     {"type": "image_url", "image_url": {"url": "data:image/png;base64,..."}}
//! ]}
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::extract::ExtractMode;
use crate::model::RasterImage;

/// Context prompt sent with a single extracted page.
pub const SINGLE_PAGE_PROMPT: &str = "This image shows the exact page of the book the user \
is currently on. Assist them with any questions. Do not describe or summarize its content, \
as the user already sees it. Keep this context in mind for subsequent conversation.";

/// Context prompt sent with the pages of a chapter.
pub const CHAPTER_PROMPT: &str = "This image represents an entire chapter from the book the \
user is reading. Assist them with any questions. Do not describe or summarize its content, \
as the user already sees it. Keep this context in mind for subsequent conversation.";

/// Author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Reference to an image by URL (usually a data URL).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

/// One part of a multi-part message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

impl ContentPart {
    /// A text part.
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text { text: text.into() }
    }

    /// An image part referencing `url`.
    pub fn image_url(url: impl Into<String>) -> Self {
        ContentPart::ImageUrl {
            image_url: ImageUrl { url: url.into() },
        }
    }
}

/// Message body: plain text, or an ordered list of parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub role: Role,
    pub content: MessageContent,
}

impl ConversationMessage {
    /// A plain-text user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Text(text.into()),
        }
    }

    /// A plain-text assistant message.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: MessageContent::Text(text.into()),
        }
    }

    /// The user message that hands extracted pages to the model.
    ///
    /// The prompt comes first, then one PNG data URL per image in page order.
    pub fn context(mode: ExtractMode, images: &[RasterImage]) -> Result<Self> {
        let prompt = match mode {
            ExtractMode::Chapter => CHAPTER_PROMPT,
            ExtractMode::SinglePage => SINGLE_PAGE_PROMPT,
        };

        let mut parts = Vec::with_capacity(images.len() + 1);
        parts.push(ContentPart::text(prompt));
        for image in images {
            parts.push(ContentPart::image_url(image.to_data_url()?));
        }

        Ok(Self {
            role: Role::User,
            content: MessageContent::Parts(parts),
        })
    }

    /// Number of image parts in this message.
    pub fn image_count(&self) -> usize {
        match &self.content {
            MessageContent::Text(_) => 0,
            MessageContent::Parts(parts) => parts
                .iter()
                .filter(|p| matches!(p, ContentPart::ImageUrl { .. }))
                .count(),
        }
    }
}

/// Ordered message history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Conversation {
    messages: Vec<ConversationMessage>,
}

impl Conversation {
    /// Create an empty conversation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a user message.
    pub fn push_user_text(&mut self, text: impl Into<String>) {
        self.messages.push(ConversationMessage::user(text));
    }

    /// Append an assistant reply.
    pub fn push_assistant_text(&mut self, text: impl Into<String>) {
        self.messages.push(ConversationMessage::assistant(text));
    }

    /// Start over with a fresh context message.
    pub fn set_context(&mut self, mode: ExtractMode, images: &[RasterImage]) -> Result<()> {
        let context = ConversationMessage::context(mode, images)?;
        self.messages.clear();
        self.messages.push(context);
        log::debug!("Context set with {} images", images.len());
        Ok(())
    }

    /// All messages in order.
    pub fn messages(&self) -> &[ConversationMessage] {
        &self.messages
    }

    /// Check if there is no history.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Serialize the history as a JSON array of messages.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.messages)?)
    }
}
