//! Logging support.
//!
//! The library logs through the `log` facade and never installs a logger itself. Hosts that
//! want the messages in their own UI can install a [`ChannelLogger`] and drain its receiver.

mod channel;

pub use channel::{ChannelLogger, LogMessage};
