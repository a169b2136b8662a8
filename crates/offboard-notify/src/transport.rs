//! Mail transports.
//!
//! - `SmtpRelay`: plain relay (no auth, no TLS), one pooled connection per run.
//! - `MemoryTransport`: records messages instead of sending; used for tests
//!   and `--dry-run`.

use std::collections::HashSet;

use lettre::transport::smtp::extension::ClientId;
use lettre::transport::smtp::PoolConfig;
use lettre::{SmtpTransport, Transport};
use offboard_core::config::MailConfig;

use crate::error::{Result, SendError};
use crate::message::{build_mime, NotificationMessage};

pub trait MailTransport {
    /// Hand one message to the transport.
    fn send(&mut self, message: &NotificationMessage) -> Result<()>;

    /// Short description for log lines, e.g. `host:port`.
    fn describe(&self) -> String;

    /// Release the connection. Called once at the end of a run.
    fn close(&mut self) {}
}

impl<T: MailTransport + ?Sized> MailTransport for Box<T> {
    fn send(&mut self, message: &NotificationMessage) -> Result<()> {
        (**self).send(message)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }

    fn close(&mut self) {
        (**self).close()
    }
}

pub struct SmtpRelay {
    transport: Option<SmtpTransport>,
    sender: String,
    endpoint: String,
}

impl std::fmt::Debug for SmtpRelay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpRelay")
            .field("sender", &self.sender)
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl SmtpRelay {
    /// Configure the relay. No connection is opened until the first send.
    pub fn new(cfg: &MailConfig) -> Self {
        let mut builder = SmtpTransport::builder_dangerous(cfg.smtp_host.as_str())
            .port(cfg.smtp_port)
            .pool_config(PoolConfig::new().max_size(1));
        if let Some(name) = &cfg.hello_name {
            builder = builder.hello_name(ClientId::Domain(name.clone()));
        }

        Self {
            transport: Some(builder.build()),
            sender: cfg.sender.clone(),
            endpoint: format!("{}:{}", cfg.smtp_host, cfg.smtp_port),
        }
    }

    /// Check the relay answers. Failures are only logged: a down relay fails each
    /// send individually rather than the run.
    pub fn check_connection(&self) -> bool {
        let Some(transport) = &self.transport else {
            return false;
        };
        match transport.test_connection() {
            Ok(true) => true,
            Ok(false) => {
                tracing::warn!(relay = %self.endpoint, "smtp relay did not accept the greeting");
                false
            }
            Err(e) => {
                tracing::warn!(relay = %self.endpoint, error = %e, "smtp relay unreachable");
                false
            }
        }
    }
}

impl MailTransport for SmtpRelay {
    fn send(&mut self, message: &NotificationMessage) -> Result<()> {
        let transport = self
            .transport
            .as_ref()
            .ok_or_else(|| SendError::Transport("relay already closed".into()))?;
        let mime = build_mime(&self.sender, message)?;
        transport
            .send(&mime)
            .map_err(|e| SendError::Transport(e.to_string()))?;
        Ok(())
    }

    fn describe(&self) -> String {
        self.endpoint.clone()
    }

    fn close(&mut self) {
        // Dropping the transport drops its pool and the pooled connection.
        if self.transport.take().is_some() {
            tracing::debug!(relay = %self.endpoint, "smtp relay closed");
        }
    }
}

/// Records messages instead of sending them.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    sent: Vec<NotificationMessage>,
    failing: HashSet<String>,
    closed: bool,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sends to this To address fail with a transport error.
    pub fn fail_for(&mut self, to: &str) {
        self.failing.insert(to.to_string());
    }

    pub fn sent(&self) -> &[NotificationMessage] {
        &self.sent
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl MailTransport for MemoryTransport {
    fn send(&mut self, message: &NotificationMessage) -> Result<()> {
        if self.closed {
            return Err(SendError::Transport("transport already closed".into()));
        }
        if self.failing.contains(&message.to) {
            return Err(SendError::Transport(format!(
                "550 mailbox unavailable: {}",
                message.to
            )));
        }
        tracing::debug!(to = %message.to, cc = message.cc.len(), "recorded message");
        self.sent.push(message.clone());
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }

    fn close(&mut self) {
        self.closed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn msg(to: &str) -> NotificationMessage {
        NotificationMessage {
            to: to.into(),
            cc: vec![],
            subject: "s".into(),
            html_body: String::new(),
            attachment_path: PathBuf::from("a.xlsx"),
        }
    }

    #[test]
    fn memory_transport_records_and_fails_on_demand() {
        let mut t = MemoryTransport::new();
        t.fail_for("bad@example.com");
        assert!(t.send(&msg("ok@example.com")).is_ok());
        assert!(matches!(
            t.send(&msg("bad@example.com")),
            Err(SendError::Transport(_))
        ));
        assert_eq!(t.sent().len(), 1);
        t.close();
        assert!(t.send(&msg("ok@example.com")).is_err());
    }

    #[test]
    fn relay_describes_endpoint() {
        let cfg = MailConfig {
            smtp_host: "relay.internal".into(),
            smtp_port: 2525,
            ..MailConfig::default()
        };
        let mut relay = SmtpRelay::new(&cfg);
        assert_eq!(relay.describe(), "relay.internal:2525");
        relay.close();
        assert!(matches!(relay.send(&msg("a@b.com")), Err(SendError::Transport(_))));
    }
}
