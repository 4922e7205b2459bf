//! 展示层状态
//!
//! 每个界面部件持有自己的状态对象，不存在全局可变状态。

pub mod chat;
pub mod home;
pub mod results;

pub use chat::{ChatSession, CHAT_ERROR_REPLY, CHAT_GREETING};
pub use home::HomeState;
pub use results::render_results;
