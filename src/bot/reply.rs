//! Outbound replies.

/// How a transport should interpret `Reply::text`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextFormat {
    #[default]
    Plain,
    /// Telegram-style HTML subset (`<b>`, `<i>`, `<code>`)
    Html,
}

/// An inline button. Pressing it sends `data` back as a callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub data: String,
}

/// Audio attached to a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioReply {
    pub data: Vec<u8>,
    pub title: String,
    pub performer: Option<String>,
}

/// One outbound message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
    /// Message text, or the caption when `audio` is set
    pub text: String,
    pub format: TextFormat,
    pub buttons: Vec<Button>,
    pub audio: Option<AudioReply>,
}

impl Reply {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// An HTML reply. Interpolated values must already be escaped.
    pub fn html(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: TextFormat::Html,
            ..Default::default()
        }
    }

    /// An audio message with a caption.
    pub fn audio(caption: impl Into<String>, audio: AudioReply) -> Self {
        Self {
            text: caption.into(),
            audio: Some(audio),
            ..Default::default()
        }
    }

    pub fn with_button(mut self, label: impl Into<String>, data: impl Into<String>) -> Self {
        self.buttons.push(Button {
            label: label.into(),
            data: data.into(),
        });
        self
    }
}

/// Escape text for inclusion in an HTML reply.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn welcome_text(first_name: &str) -> String {
    format!(
        "👋 Hi, {first_name}!\n\n\
         Here's what I can do:\n\
         - Find music and play previews\n\
         - Like tracks and collect them into playlists\n\n\
         Send /help to learn more."
    )
}

pub const HELP_TEXT: &str = "📖 <b>Available commands:</b>\n\
- /start: Start using the bot\n\
- /help: Show this message\n\
- /auth: Check your registration\n\
- /search &lt;type&gt; &lt;query&gt;: Find a track, artist or album (e.g. /search track Imagine Dragons)\n\
- /play &lt;query&gt;: Play a 30-second preview of a track or episode\n\
- /like &lt;track_id&gt;: Like a track by ID\n\
- /likes: Show your liked tracks\n\
- /create_playlist &lt;name&gt;: Create a playlist\n\
- /rename_playlist &lt;old&gt; &lt;new&gt;: Rename a playlist\n\
- /delete_playlist &lt;name&gt;: Delete a playlist\n\
- /add_to_playlist &lt;playlist&gt; &lt;track_id&gt;: Add a track to a playlist\n\
- /remove_from_playlist &lt;playlist&gt; &lt;track_id&gt;: Remove a track from a playlist\n\
- /playlists (or /get_all_playlists): Show your playlists, each with a button to view its tracks\n\
- /playlist (or /get_playlist) &lt;name&gt;: Show the tracks of a playlist\n\n\
Quote a playlist name with spaces when more follows it, e.g. /add_to_playlist \"Road Trip\" track_id\n";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("Tom & Jerry <live> \"remix\""),
            "Tom &amp; Jerry &lt;live&gt; &quot;remix&quot;"
        );
        assert_eq!(escape_html("Plain"), "Plain");
    }

    #[test]
    fn test_builders() {
        let reply = Reply::html("<b>x</b>").with_button("Like", "like:t1");
        assert_eq!(reply.format, TextFormat::Html);
        assert_eq!(
            reply.buttons,
            vec![Button {
                label: "Like".to_string(),
                data: "like:t1".to_string()
            }]
        );
        assert!(reply.audio.is_none());
        assert_eq!(Reply::plain("hi").format, TextFormat::Plain);
    }

    #[test]
    fn test_help_mentions_every_command() {
        for cmd in [
            "/start", "/help", "/auth", "/search", "/play", "/like ", "/likes",
            "/create_playlist", "/rename_playlist", "/delete_playlist",
            "/add_to_playlist", "/remove_from_playlist", "/playlists", "/playlist ",
            "/get_all_playlists", "/get_playlist ", "\"Road Trip\"",
        ] {
            assert!(HELP_TEXT.contains(cmd), "help text is missing {cmd}");
        }
    }
}
