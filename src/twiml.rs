//! TwiML Replies
//!
//! Minimal TwiML (Twilio Markup Language) for answering inbound SMS webhooks.
//! A reply is a `<Response>` document with one `<Message>` body; Twilio sends
//! the body back to the sender.

use quick_xml::escape::escape;

/// Build a TwiML messaging response carrying `body` as the reply text.
pub fn messaging_response(body: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?><Response><Message>{}</Message></Response>",
        escape(body)
    )
}
