//! Chat command handling.
//!
//! # Architecture
//!
//! - **Command** (`command.rs`) - parses message text and button data
//! - **Reply** (`reply.rs`) - outbound messages and their formatting
//! - **Router** (`router.rs`) - runs commands against the library and catalog
//! - **Transport** (`transport.rs`) - delivers replies; console implementation
//!
//! The router never talks to a messaging platform directly. A transport turns
//! platform events into [`Update`]s and sends the resulting [`Reply`]s through
//! a [`ReplySink`].

pub mod command;
pub mod reply;
pub mod router;
pub mod transport;

pub use command::{Callback, Command};
pub use reply::{AudioReply, Button, Reply, TextFormat};
pub use router::Router;
pub use transport::{ReplySink, deliver};

use crate::model::UserId;

/// Who sent an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sender {
    /// Messaging-platform identity
    pub id: UserId,
    pub username: Option<String>,
    pub first_name: String,
}

/// An inbound event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Update {
    /// A text message.
    Message { sender: Sender, text: String },
    /// A press on an inline button carrying `data`.
    Callback { sender: Sender, data: String },
}

impl Update {
    pub fn sender(&self) -> &Sender {
        match self {
            Self::Message { sender, .. } | Self::Callback { sender, .. } => sender,
        }
    }
}
