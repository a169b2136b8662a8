#![forbid(unsafe_code)]
//! offboard-notify: one email per employee.
//!
//! `recipient` derives the To address, `templates` renders the HTML body,
//! `message` assembles the MIME message, `transport` hands it to a relay and
//! `dispatcher` wires those together and contains send failures.

pub mod dispatcher;
pub mod error;
pub mod message;
pub mod recipient;
pub mod templates;
pub mod transport;

pub use dispatcher::Dispatcher;
pub use error::{Result, SendError};
pub use message::NotificationMessage;
pub use recipient::build_recipient_email;
pub use transport::{MailTransport, MemoryTransport, SmtpRelay};
