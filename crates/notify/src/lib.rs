//! Notification dispatch over email, Slack, Teams and SMS.
//!
//! [`dispatcher::ChannelDispatcher`] fans a notification out to every
//! configured channel; [`sms_notifier::SmsNotifier`] is the single-channel
//! variant. The remaining modules are the live adapters and reference
//! builders behind the ports of `courier_core::notify::port`.

pub mod builders;
pub mod channel;
pub mod dispatcher;
pub mod email;
pub mod live;
pub mod sms;
pub mod sms_notifier;
pub mod webhook;

pub use channel::{Delivery, FailurePolicy};
pub use dispatcher::{ChannelDispatcher, ChannelOutcome, DispatchReport};
pub use sms_notifier::SmsNotifier;
