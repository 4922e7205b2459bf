use std::sync::Arc;

use tracing::{debug, warn};

use crate::clients::PlantApiClient;
use crate::models::Message;

/// 聊天窗口的开场白
pub const CHAT_GREETING: &str = "Hi! Ask me anything about plants.";

/// 单次对话失败时以助手身份显示的内容
pub const CHAT_ERROR_REPLY: &str = "Error contacting chatbot.";

/// 聊天会话
///
/// 消息只追加，不修改、不重排。每次对话的失败都在会话内部消化，
/// 以一条助手消息的形式出现，不会影响后续对话。
pub struct ChatSession {
    client: Arc<PlantApiClient>,
    open: bool,
    messages: Vec<Message>,
}

impl ChatSession {
    pub fn new(client: Arc<PlantApiClient>) -> Self {
        Self {
            client,
            open: false,
            messages: vec![Message::assistant(CHAT_GREETING)],
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last_reply(&self) -> Option<&Message> {
        self.messages.last().filter(|m| !m.is_user())
    }

    /// 发送一条消息，返回是否真的发出了请求
    ///
    /// 空白输入直接忽略。
    pub async fn send(&mut self, input: &str, context_plant: Option<&str>) -> bool {
        if input.trim().is_empty() {
            return false;
        }

        self.messages.push(Message::user(input));

        let reply = match self.client.chat(input, context_plant).await {
            Ok(reply) => {
                debug!("聊天回复 {} 字符", reply.reply.chars().count());
                reply.reply
            }
            Err(e) => {
                warn!("⚠️ 聊天请求失败: {}", e);
                CHAT_ERROR_REPLY.to_string()
            }
        };

        self.messages.push(Message::assistant(reply));
        true
    }
}
