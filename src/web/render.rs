//! Chat Page Rendering
//!
//! Single parameterized render path for the chat page. The page is rebuilt
//! wholesale on every navigation: clock region, transcript, input form, clear
//! button, and a reference to the client script.
//!
//! An empty transcript renders the welcome prompt instead of message bubbles.
//! Message text is HTML-escaped and embedded newlines become `<br>`.

use crate::chat::ChatMessage;

/// Prompt shown when the transcript is empty.
pub const WELCOME_MESSAGE: &str =
    "Welcome! Enter a bus stop number to see upcoming arrivals, or ask a question.";

/// Render the full chat page for the given transcript.
pub fn render_page(history: &[ChatMessage]) -> String {
    let transcript = if history.is_empty() {
        format!(
            "<div class=\"message bot welcome\">{}</div>\n",
            escape_html(WELCOME_MESSAGE)
        )
    } else {
        history.iter().map(render_message).collect()
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>BusChat</title>
<style>
body {{ font-family: sans-serif; max-width: 40rem; margin: 0 auto; padding: 1rem; }}
header {{ display: flex; justify-content: space-between; align-items: baseline; }}
#clock {{ font-variant-numeric: tabular-nums; color: #555; }}
#transcript {{ margin: 1rem 0; }}
.message {{ padding: 0.5rem 0.75rem; margin: 0.5rem 0; border-radius: 0.75rem; }}
.message.user {{ background: #d0e7ff; margin-left: 20%; }}
.message.bot {{ background: #eee; margin-right: 20%; }}
#chat-form {{ display: flex; gap: 0.5rem; }}
#chat-form input {{ flex: 1; }}
</style>
</head>
<body>
<header>
<h1>BusChat</h1>
<span id="clock"></span>
</header>
<div id="transcript">
{transcript}</div>
<form id="chat-form" method="post" action="/">
<input type="text" name="message" placeholder="Bus stop number or question" autocomplete="off" required>
<button type="submit">Send</button>
<button type="button" id="clear-chat">Clear chat</button>
</form>
<script src="/static/app.js"></script>
</body>
</html>
"#
    )
}

fn render_message(message: &ChatMessage) -> String {
    format!(
        "<div class=\"message {}\">{}</div>\n",
        message.sender.as_str(),
        format_text(&message.text)
    )
}

/// Escape then turn newlines into explicit line breaks.
fn format_text(text: &str) -> String {
    escape_html(text).replace('\n', "<br>")
}

fn escape_html(text: &str) -> String {
    quick_xml::escape::escape(text).into_owned()
}
