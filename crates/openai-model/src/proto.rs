use healthchat_model::{ModelFinishReason, ModelMessage, ModelRequest};
use serde::{Deserialize, Serialize};

use crate::OpenAIConfig;

// ------------------------------
// Types received from the server
// ------------------------------

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct ChatCompletionChunk {
    pub id: String,
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct Choice {
    pub delta: Delta,
    pub finish_reason: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct Delta {
    pub content: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct ErrorDetail {
    pub message: String,
}

// ------------------------
// Types sent to the server
// ------------------------

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Message {
    System { content: String },
    User { content: String },
    Assistant { content: String },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChatCompletionRequest {
    model: String,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    stream: bool,
}

// -----------
// Conversions
// -----------

#[inline]
pub fn create_request(
    req: &ModelRequest,
    config: &OpenAIConfig,
) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: config.model.clone(),
        messages: req.messages.iter().map(create_message).collect(),
        temperature: req.temperature.or(config.temperature),
        stream: true,
    }
}

#[inline]
fn create_message(msg: &ModelMessage) -> Message {
    let content = msg.text().to_owned();
    match msg {
        ModelMessage::System(_) => Message::System { content },
        ModelMessage::User(_) => Message::User { content },
        ModelMessage::Assistant(_) => Message::Assistant { content },
    }
}

pub fn parse_finish_reason(reason: &str) -> ModelFinishReason {
    match reason {
        "length" => ModelFinishReason::Length,
        "content_filter" => ModelFinishReason::ContentFilter,
        _ => ModelFinishReason::Stop,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::OpenAIConfigBuilder;

    #[test]
    fn test_create_request() {
        let request = ModelRequest::with_messages([
            ModelMessage::System("You are a health assistant.".to_owned()),
            ModelMessage::User("I have a cough".to_owned()),
        ]);
        let config = OpenAIConfigBuilder::with_api_key("xxx")
            .with_model("custom")
            .build();
        let expected = ChatCompletionRequest {
            model: "custom".to_owned(),
            messages: vec![
                Message::System {
                    content: "You are a health assistant.".to_owned(),
                },
                Message::User {
                    content: "I have a cough".to_owned(),
                },
            ],
            temperature: None,
            stream: true,
        };
        assert_eq!(create_request(&request, &config), expected);
    }

    #[test]
    fn test_request_wire_format() {
        let mut request = ModelRequest::with_messages([ModelMessage::User(
            "fever".to_owned(),
        )]);
        request.temperature = Some(0.5);
        let config = OpenAIConfigBuilder::with_api_key("xxx")
            .with_model("m")
            .with_temperature(0.9)
            .build();
        let value = serde_json::to_value(create_request(&request, &config))
            .unwrap();
        assert_eq!(
            value,
            json!({
                "model": "m",
                "messages": [{ "role": "user", "content": "fever" }],
                "temperature": 0.5,
                "stream": true
            })
        );
    }

    #[test]
    fn test_finish_reason() {
        assert_eq!(parse_finish_reason("stop"), ModelFinishReason::Stop);
        assert_eq!(parse_finish_reason("length"), ModelFinishReason::Length);
        assert_eq!(
            parse_finish_reason("content_filter"),
            ModelFinishReason::ContentFilter
        );
    }
}
