//! Reply delivery and the console transport.
//!
//! A real messaging platform implements [`ReplySink`] and feeds updates to
//! [`deliver`]. The console transport reads lines from stdin instead:
//! `!cb <data>` presses a button, anything else is a message.

use std::future::Future;
use std::io::Write;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use super::reply::{Reply, TextFormat};
use super::{Router, Sender, Update};

/// Prefix that turns a console line into a button press.
pub const CALLBACK_PREFIX: &str = "!cb ";

/// Outbound side of a transport.
#[async_trait]
pub trait ReplySink: Send + Sync {
    /// Send `reply` to `chat`.
    async fn send(&self, chat: i64, reply: Reply) -> std::io::Result<()>;
}

/// Handle `update` and send every reply to the sender's chat.
///
/// A reply that fails to send is logged and the rest are still attempted.
pub async fn deliver(router: &Router, update: Update, sink: &dyn ReplySink) {
    let chat = update.sender().id;
    for reply in router.handle(&update).await {
        if let Err(e) = sink.send(chat, reply).await {
            warn!(target: "tunebot::transport", chat, error = %e, "Failed to send reply");
        }
    }
}

/// Writes replies as text, one block per reply.
pub struct ConsoleSink<W> {
    out: Mutex<W>,
}

impl<W: Write + Send> ConsoleSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

impl ConsoleSink<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

#[async_trait]
impl<W: Write + Send> ReplySink for ConsoleSink<W> {
    async fn send(&self, chat: i64, reply: Reply) -> std::io::Result<()> {
        let text = render(chat, &reply);
        let mut out = self.out.lock();
        out.write_all(text.as_bytes())?;
        out.flush()
    }
}

/// Console rendering of a reply.
pub fn render(chat: i64, reply: &Reply) -> String {
    let mut text = format!("[chat {chat}]");
    if reply.format == TextFormat::Html {
        text.push_str(" (html)");
    }
    text.push('\n');

    if let Some(audio) = &reply.audio {
        let performer = audio.performer.as_deref().unwrap_or("unknown");
        text.push_str(&format!(
            "<audio: {} by {}, {} bytes>\n",
            audio.title,
            performer,
            audio.data.len()
        ));
    }
    if !reply.text.is_empty() {
        text.push_str(&reply.text);
        text.push('\n');
    }
    for button in &reply.buttons {
        text.push_str(&format!("[{} -> {}]\n", button.label, button.data));
    }
    text.push('\n');
    text
}

/// Turn one console line into an update from `sender`.
pub fn parse_line(line: &str, sender: &Sender) -> Option<Update> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let update = match line.strip_prefix(CALLBACK_PREFIX) {
        Some(data) => Update::Callback {
            sender: sender.clone(),
            data: data.trim().to_string(),
        },
        None => Update::Message {
            sender: sender.clone(),
            text: line.to_string(),
        },
    };
    Some(update)
}

/// Read updates line by line until EOF or `shutdown` resolves.
///
/// Each line runs on its own task. A line that isn't valid UTF-8 is skipped.
/// Any other read error stops the loop and is returned, but only after every
/// in-flight task has finished.
pub async fn run_console<R, S>(
    input: R,
    router: Arc<Router>,
    sender: Sender,
    sink: Arc<dyn ReplySink>,
    shutdown: S,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    S: Future<Output = ()>,
{
    let mut lines = input.split(b'\n');
    let mut tasks = JoinSet::new();
    let mut read_error = None;
    tokio::pin!(shutdown);

    info!(target: "tunebot::transport", user = sender.id, "Console transport started");
    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!(target: "tunebot::transport", "Shutdown requested");
                break;
            }
            segment = lines.next_segment() => {
                let bytes = match segment {
                    Ok(Some(bytes)) => bytes,
                    Ok(None) => {
                        debug!(target: "tunebot::transport", "End of input");
                        break;
                    }
                    Err(e) => {
                        warn!(target: "tunebot::transport", error = %e, "Failed to read input");
                        read_error = Some(e);
                        break;
                    }
                };
                let line = match String::from_utf8(bytes) {
                    Ok(line) => line,
                    Err(e) => {
                        warn!(target: "tunebot::transport", error = %e, "Skipping line that is not valid UTF-8");
                        continue;
                    }
                };
                let Some(update) = parse_line(&line, &sender) else {
                    continue;
                };

                let router = Arc::clone(&router);
                let sink = Arc::clone(&sink);
                tasks.spawn(async move { deliver(&router, update, sink.as_ref()).await });
            }
            Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                if let Err(e) = joined {
                    warn!(target: "tunebot::transport", error = %e, "Update task failed");
                }
            }
        }
    }

    while let Some(joined) = tasks.join_next().await {
        if let Err(e) = joined {
            warn!(target: "tunebot::transport", error = %e, "Update task failed");
        }
    }

    match read_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
