//! Private messages
//!
//! One call, one compose request. Nothing is validated or retried here; the
//! platform's answer (or error) is handed back as is.

use subkit_core::{ComposeRequest, Destination, PlatformClient, Result};
use tracing::{debug, info};

/// Send a private message to a user or to a community's moderators
///
/// `from_sr` sends the message on behalf of that community, which requires
/// moderator access to it.
///
/// # Example
///
/// ```
/// use subkit_actions::send_message;
/// use subkit_core::testing::RecordingClient;
/// use subkit_core::Subreddit;
///
/// let client = RecordingClient::new();
/// send_message(&client, &Subreddit::new("test"), "Hi", "Hello mods", None).unwrap();
/// assert_eq!(client.sent()[0].to, "/r/test");
/// ```
pub fn send_message(
    client: &dyn PlatformClient,
    to: impl Into<Destination>,
    subject: &str,
    body: &str,
    from_sr: Option<&str>,
) -> Result<serde_json::Value> {
    let to = to.into();
    let request = ComposeRequest {
        subject: subject.to_string(),
        text: body.to_string(),
        to: to.wire_format(),
        from_sr: from_sr.map(str::to_string),
    };
    debug!(target: "subkit::message", to = %to, from_sr = ?request.from_sr, "Composing message");
    let reply = client.compose_message(&request)?;
    info!(target: "subkit::message", to = %to, subject, "Message sent");
    Ok(reply)
}

/// [`send_message`] as a method on any client
pub trait MessageExt {
    /// Send a private message; see [`send_message`]
    fn message(
        &self,
        to: impl Into<Destination>,
        subject: &str,
        body: &str,
        from_sr: Option<&str>,
    ) -> Result<serde_json::Value>;
}

impl<C: PlatformClient> MessageExt for C {
    fn message(
        &self,
        to: impl Into<Destination>,
        subject: &str,
        body: &str,
        from_sr: Option<&str>,
    ) -> Result<serde_json::Value> {
        send_message(self, to, subject, body, from_sr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use subkit_core::testing::RecordingClient;
    use subkit_core::{Error, Redditor};

    #[test]
    fn test_user_names_are_sent_unchanged() {
        let client = RecordingClient::new();
        client.message("spez", "Subject", "Body", None).unwrap();
        let sent = client.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "spez");
        assert_eq!(sent[0].subject, "Subject");
        assert_eq!(sent[0].text, "Body");
        assert_eq!(sent[0].from_sr, None);
    }

    #[test]
    fn test_community_destination_is_prefixed() {
        let client = RecordingClient::new();
        send_message(&client, Destination::Community("test".into()), "s", "b", Some("modteam")).unwrap();
        let sent = client.sent();
        assert_eq!(sent[0].to, "/r/test");
        assert_eq!(sent[0].from_sr.as_deref(), Some("modteam"));
    }

    #[test]
    fn test_redditor_destination() {
        let client = RecordingClient::new();
        client.message(&Redditor::new("alice"), "s", "b", None).unwrap();
        assert_eq!(client.sent()[0].to, "alice");
    }

    #[test]
    fn test_reply_is_returned_and_errors_propagate() {
        let client = RecordingClient::new();
        let reply = client.message("bob", "s", "b", None).unwrap();
        assert_eq!(reply["json"]["errors"], serde_json::json!([]));

        client.fail_compose("USER_DOESNT_EXIST");
        let err = client.message("ghost", "s", "b", None).unwrap_err();
        assert!(matches!(err, Error::Client(ref m) if m == "USER_DOESNT_EXIST"));
        assert_eq!(client.sent().len(), 1);
    }
}
