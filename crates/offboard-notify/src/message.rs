//! Notification message and its MIME rendering.

use std::path::{Path, PathBuf};

use lettre::address::{Address, Envelope};
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::Message;

use crate::error::{Result, SendError};

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Everything needed to send one employee's notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    pub to: String,
    pub cc: Vec<String>,
    pub subject: String,
    pub html_body: String,
    pub attachment_path: PathBuf,
}

impl NotificationMessage {
    /// SMTP envelope recipients: the To address followed by every CC.
    pub fn recipients(&self) -> Vec<&str> {
        std::iter::once(self.to.as_str())
            .chain(self.cc.iter().map(String::as_str))
            .collect()
    }

    /// Base name of the attachment, used as its MIME filename.
    pub fn attachment_name(&self) -> String {
        self.attachment_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "attachment.xlsx".to_string())
    }
}

fn parse_address(raw: &str) -> Result<Address> {
    raw.parse::<Address>().map_err(|e| SendError::Address {
        address: raw.to_string(),
        reason: e.to_string(),
    })
}

fn parse_mailbox(raw: &str) -> Result<Mailbox> {
    raw.parse::<Mailbox>().map_err(|e| SendError::Address {
        address: raw.to_string(),
        reason: e.to_string(),
    })
}

fn read_attachment(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|source| SendError::Attachment {
        path: path.display().to_string(),
        source,
    })
}

/// Build the multipart message: HTML body plus the spreadsheet attachment.
///
/// The Cc header is only set when there are CC addresses. The envelope lists
/// To and every CC explicitly.
pub fn build_mime(sender: &str, msg: &NotificationMessage) -> Result<Message> {
    let from = parse_mailbox(sender)?;

    let mut builder = Message::builder()
        .from(from.clone())
        .to(parse_mailbox(&msg.to)?)
        .subject(msg.subject.clone());
    for cc in &msg.cc {
        builder = builder.cc(parse_mailbox(cc)?);
    }

    let recipients = msg
        .recipients()
        .into_iter()
        .map(parse_address)
        .collect::<Result<Vec<_>>>()?;
    let envelope = Envelope::new(Some(from.email), recipients)
        .map_err(|e| SendError::Build(e.to_string()))?;

    let content_type =
        ContentType::parse(XLSX_CONTENT_TYPE).map_err(|e| SendError::Build(e.to_string()))?;
    let attachment = Attachment::new(msg.attachment_name())
        .body(read_attachment(&msg.attachment_path)?, content_type);

    builder
        .envelope(envelope)
        .multipart(
            MultiPart::mixed()
                .singlepart(SinglePart::html(msg.html_body.clone()))
                .singlepart(attachment),
        )
        .map_err(|e| SendError::Build(e.to_string()))
}
