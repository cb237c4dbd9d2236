//! Pagebot core contracts and value types.
//!
//! This crate holds everything between the HTTP transport and the bot: callback
//! payload validation, typed event dispatch, the verification handshake, the
//! message template renderer/builder, outbound message validation, and the
//! Graph API sender. The webhook binary wires these together per request.

pub mod callback;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod messages;
pub mod profiles;
pub mod render;
pub mod sender;
pub mod templates;
pub mod validate;
pub mod verify;

pub use callback::{
    AuthEvent, CallbackEvent, DeliveryEvent, MediaAttachment, MediaKind, MessageContent,
    MessageEvent, PostbackEvent,
};
pub use config::WebhookConfig;
pub use dispatch::{dispatch_callback, EventHandler};
pub use error::{ErrorKind, WebhookError};
pub use messages::{add_message_element, make_message, make_postback_button, make_url_button};
pub use profiles::{ProfileClient, UserProfile};
pub use render::render;
pub use sender::{MessengerSender, SendResult};
pub use templates::TemplateStore;
pub use validate::{validate_callback, validate_message};
pub use verify::{verify, VerifyQuery};
