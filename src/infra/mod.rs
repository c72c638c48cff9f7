//! Infrastructure shared by both components: the byte codec used to lay out
//! frames and the mailboxes carrying messages between tasks.
pub mod codec;
pub mod mailbox;
