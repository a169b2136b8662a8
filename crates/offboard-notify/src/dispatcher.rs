//! Compose and send one notification per employee.
//!
//! Send failures are caught here, logged with the intended recipient and
//! returned as a typed error for the run summary. They never abort a batch
//! and are never retried.

use std::path::Path;

use offboard_core::config::MailConfig;
use offboard_core::types::EmployeeDirective;

use crate::error::SendError;
use crate::message::NotificationMessage;
use crate::recipient::build_recipient_email;
use crate::templates::render_body;
use crate::transport::MailTransport;

#[derive(Debug)]
pub struct Dispatcher<T: MailTransport> {
    transport: T,
    recipient_domain: String,
    subject: String,
    sender: String,
}

impl<T: MailTransport> Dispatcher<T> {
    pub fn new(transport: T, cfg: &MailConfig) -> Self {
        Self {
            transport,
            recipient_domain: cfg.recipient_domain.clone(),
            subject: cfg.subject.clone(),
            sender: cfg.sender.clone(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn recipient_for(&self, directive: &EmployeeDirective) -> String {
        build_recipient_email(
            &directive.given_name,
            &directive.surname,
            &self.recipient_domain,
        )
    }

    /// Build the message for one employee. `table_html` is ignored when
    /// `row_count` is zero.
    pub fn compose(
        &self,
        directive: &EmployeeDirective,
        row_count: usize,
        table_html: &str,
        attachment_path: &Path,
    ) -> NotificationMessage {
        NotificationMessage {
            to: self.recipient_for(directive),
            cc: directive.cc_emails.clone(),
            subject: self.subject.clone(),
            html_body: render_body(
                &directive.given_name,
                &directive.surname,
                row_count,
                table_html,
            ),
            attachment_path: attachment_path.to_path_buf(),
        }
    }

    /// Hand the message to the transport, logging the result either way.
    pub fn dispatch(&mut self, message: &NotificationMessage) -> Result<(), SendError> {
        let cc = if message.cc.is_empty() {
            "none".to_string()
        } else {
            message.cc.join(", ")
        };

        match self.transport.send(message) {
            Ok(()) => {
                tracing::info!(
                    to = %message.to,
                    cc = %cc,
                    from = %self.sender,
                    via = %self.transport.describe(),
                    attachment = %message.attachment_path.display(),
                    "sent notification"
                );
                Ok(())
            }
            Err(e) => {
                tracing::error!(to = %message.to, error = %e, "failed to send notification");
                Err(e)
            }
        }
    }

    pub fn close(&mut self) {
        self.transport.close();
    }
}
