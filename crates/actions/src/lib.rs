//! Account and wiki actions
//!
//! - [`send_message`] / [`MessageExt`]: private messages to users and
//!   community moderators
//! - [`update_page`] / [`WikiPageExt`]: wiki edits that survive concurrent
//!   editors by reapplying a transformation

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod message;
pub mod update;

pub use message::{send_message, MessageExt};
pub use update::{update_page, update_page_with, UpdateOptions, UpdateReport, WikiPageExt};
