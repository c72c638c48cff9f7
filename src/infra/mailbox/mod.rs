//! Single-slot mailboxes carrying "latest state" messages between tasks.
//!
//! Firmware provides pre-allocated mailboxes (typically in a `StaticCell`) and
//! hands shared references to the producer and consumer tasks. Every operation
//! is zero-timeout: nothing here ever waits on another task. Instead of hiding
//! dropped messages, each post reports a [`Delivery`].

use embassy_sync::{
    blocking_mutex::raw::CriticalSectionRawMutex,
    channel::{Channel, TrySendError},
};

/// Fate of a message offered to a [`Mailbox`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Delivery {
    /// Stored in a free slot.
    Accepted,
    /// Stored after evicting a pending, unread message.
    Replaced,
    /// Mailbox full; the new message was discarded.
    Dropped,
}

impl Delivery {
    /// Whether the offered message is now pending in the mailbox.
    pub fn is_stored(self) -> bool {
        !matches!(self, Self::Dropped)
    }
}

/// Bounded, non-blocking message slot(s) built on an embassy channel.
pub struct Mailbox<T, const N: usize = 1> {
    channel: Channel<CriticalSectionRawMutex, T, N>,
}

impl<T, const N: usize> Mailbox<T, N> {
    /// Create an empty mailbox; usable in `static` initialisers.
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
        }
    }

    /// Offer a message; when full the new message is dropped.
    pub fn try_post(&self, message: T) -> Delivery {
        match self.channel.try_send(message) {
            Ok(()) => Delivery::Accepted,
            Err(TrySendError::Full(_)) => Delivery::Dropped,
        }
    }

    /// Offer a message with latest-value semantics: when full, the oldest
    /// pending message is evicted to make room.
    pub fn post_latest(&self, message: T) -> Delivery {
        match self.channel.try_send(message) {
            Ok(()) => Delivery::Accepted,
            Err(TrySendError::Full(message)) => {
                // Evict the stale message, then retry once.
                let _stale = self.channel.try_receive();
                match self.channel.try_send(message) {
                    Ok(()) => Delivery::Replaced,
                    Err(TrySendError::Full(_)) => Delivery::Dropped,
                }
            }
        }
    }

    /// Take the oldest pending message, if any.
    pub fn try_take(&self) -> Option<T> {
        self.channel.try_receive().ok()
    }

    /// Whether no message is pending.
    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }
}

impl<T, const N: usize> Default for Mailbox<T, N> {
    fn default() -> Self {
        Self::new()
    }
}
