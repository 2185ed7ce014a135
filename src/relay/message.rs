//! Inbound message type for the relay.
//!
//! `Email` is the view of a message the routing core works with: the
//! primary recipient is readable and writable, the full recipient list is
//! readable and used at send time. Everything else (subject, sender, text
//! body) is carried along for the outbound copy.

use mailparse::{addrparse, parse_mail, MailAddr, MailHeaderMap, ParsedMail};

use crate::{EphemailError, Result};

/// Split a mailbox address into local part and domain name.
///
/// Splits on the last `@`. Returns `None` when either side is empty or no
/// `@` is present.
pub fn split_address(address: &str) -> Option<(&str, &str)> {
    match address.rsplit_once('@') {
        Some((local_part, domain)) if !local_part.is_empty() && !domain.is_empty() => {
            Some((local_part, domain))
        }
        _ => None,
    }
}

/// An inbound mail message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    from: Option<String>,
    /// Recipient list; the first entry is the primary recipient.
    recipients: Vec<String>,
    subject: Option<String>,
    body: String,
}

impl Email {
    /// Create a message addressed to a single recipient.
    pub fn addressed_to(recipient: impl Into<String>) -> Self {
        Self {
            from: None,
            recipients: vec![recipient.into()],
            subject: None,
            body: String::new(),
        }
    }

    /// Create a message with an empty recipient list.
    pub fn empty() -> Self {
        Self {
            from: None,
            recipients: Vec::new(),
            subject: None,
            body: String::new(),
        }
    }

    /// Set the sender address.
    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    /// Set the subject.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Set the text body.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Add a further recipient to the list.
    pub fn with_recipient(mut self, recipient: impl Into<String>) -> Self {
        self.recipients.push(recipient.into());
        self
    }

    /// Parse a raw RFC 822 message.
    ///
    /// Recipients are collected from the `To` headers. For multipart
    /// messages the first `text/plain` part becomes the body.
    pub fn parse(raw: &[u8]) -> Result<Self> {
        let parsed = parse_mail(raw).map_err(|e| EphemailError::Malformed(e.to_string()))?;

        let from = parsed
            .headers
            .get_first_value("From")
            .and_then(|value| parse_addresses(&value).into_iter().next());

        let mut recipients = Vec::new();
        for value in parsed.headers.get_all_values("To") {
            recipients.extend(parse_addresses(&value));
        }

        let subject = parsed.headers.get_first_value("Subject");
        let body = extract_text_body(&parsed)?;

        Ok(Self {
            from,
            recipients,
            subject,
            body,
        })
    }

    /// The sender address, if the message carries one.
    pub fn from(&self) -> Option<&str> {
        self.from.as_deref()
    }

    /// The primary recipient: the first entry of the recipient list.
    pub fn primary_recipient(&self) -> Option<&str> {
        self.recipients.first().map(String::as_str)
    }

    /// Overwrite the primary recipient.
    ///
    /// The whole recipient list is replaced with the single new address;
    /// any other recipients originally on the message are dropped. The
    /// rewritten message models exactly one recipient.
    pub fn set_primary_recipient(&mut self, recipient: impl Into<String>) {
        self.recipients.clear();
        self.recipients.push(recipient.into());
    }

    /// The full recipient list, used at send time.
    pub fn recipients(&self) -> &[String] {
        &self.recipients
    }

    /// The subject, if any.
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    /// The text body.
    pub fn body(&self) -> &str {
        &self.body
    }
}

/// Extract bare addresses from an address header value.
///
/// Falls back to the trimmed raw value when the header does not parse as
/// an address list; the filter classifies such recipients later.
fn parse_addresses(value: &str) -> Vec<String> {
    match addrparse(value) {
        Ok(list) => {
            let mut addresses = Vec::new();
            for addr in list.iter() {
                match addr {
                    MailAddr::Single(info) => addresses.push(info.addr.clone()),
                    MailAddr::Group(group) => {
                        addresses.extend(group.addrs.iter().map(|a| a.addr.clone()));
                    }
                }
            }
            addresses
        }
        Err(_) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                Vec::new()
            } else {
                vec![trimmed.to_string()]
            }
        }
    }
}

fn extract_text_body(parsed: &ParsedMail) -> Result<String> {
    if parsed.subparts.is_empty() {
        return parsed
            .get_body()
            .map_err(|e| EphemailError::Malformed(e.to_string()));
    }

    for part in &parsed.subparts {
        if part.ctype.mimetype.eq_ignore_ascii_case("text/plain") {
            return part
                .get_body()
                .map_err(|e| EphemailError::Malformed(e.to_string()));
        }
    }

    parsed.subparts[0]
        .get_body()
        .map_err(|e| EphemailError::Malformed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_address() {
        assert_eq!(
            split_address("test123@example.org"),
            Some(("test123", "example.org"))
        );
    }

    #[test]
    fn test_split_address_splits_on_last_at() {
        assert_eq!(
            split_address("weird@name@example.org"),
            Some(("weird@name", "example.org"))
        );
    }

    #[test]
    fn test_split_address_rejects_malformed() {
        assert_eq!(split_address("no-at-sign"), None);
        assert_eq!(split_address("@example.org"), None);
        assert_eq!(split_address("test123@"), None);
        assert_eq!(split_address(""), None);
    }

    #[test]
    fn test_addressed_to() {
        let message = Email::addressed_to("test123@example.org");
        assert_eq!(message.primary_recipient(), Some("test123@example.org"));
        assert_eq!(message.recipients().len(), 1);
    }

    #[test]
    fn test_primary_recipient_empty() {
        let message = Email::empty();
        assert_eq!(message.primary_recipient(), None);
    }

    #[test]
    fn test_set_primary_recipient_drops_other_recipients() {
        let mut message = Email::addressed_to("test123@example.org")
            .with_recipient("second@example.org")
            .with_recipient("third@example.org");

        message.set_primary_recipient("alice@mailbox.example");

        assert_eq!(message.recipients(), ["alice@mailbox.example"]);
    }

    #[test]
    fn test_parse_simple_message() {
        let raw = b"From: Sender <sender@outside.example>\r\n\
            To: test123@example.org\r\n\
            Subject: Hello\r\n\
            \r\n\
            Message body.\r\n";

        let message = Email::parse(raw).unwrap();

        assert_eq!(message.from(), Some("sender@outside.example"));
        assert_eq!(message.primary_recipient(), Some("test123@example.org"));
        assert_eq!(message.subject(), Some("Hello"));
        assert_eq!(message.body().trim(), "Message body.");
    }

    #[test]
    fn test_parse_display_name_recipient() {
        let raw = b"From: sender@outside.example\r\n\
            To: \"Test Address\" <test123@example.org>, other@example.org\r\n\
            Subject: Hi\r\n\
            \r\n\
            Body\r\n";

        let message = Email::parse(raw).unwrap();

        assert_eq!(message.primary_recipient(), Some("test123@example.org"));
        assert_eq!(message.recipients().len(), 2);
        assert_eq!(message.recipients()[1], "other@example.org");
    }

    #[test]
    fn test_parse_no_recipient() {
        let raw = b"From: sender@outside.example\r\n\
            Subject: Lost\r\n\
            \r\n\
            Body\r\n";

        let message = Email::parse(raw).unwrap();
        assert_eq!(message.primary_recipient(), None);
    }

    #[test]
    fn test_parse_multipart_prefers_text_plain() {
        let raw = b"From: sender@outside.example\r\n\
            To: test123@example.org\r\n\
            Subject: Multipart\r\n\
            MIME-Version: 1.0\r\n\
            Content-Type: multipart/alternative; boundary=\"sep\"\r\n\
            \r\n\
            --sep\r\n\
            Content-Type: text/html\r\n\
            \r\n\
            <p>html body</p>\r\n\
            --sep\r\n\
            Content-Type: text/plain\r\n\
            \r\n\
            plain body\r\n\
            --sep--\r\n";

        let message = Email::parse(raw).unwrap();
        assert_eq!(message.body().trim(), "plain body");
    }
}
