//! Asynchronous timer abstraction providing the millisecond delays used by
//! the task loops and the bounded bus polls.

/// Timer trait abstraction; the delay is the only yield point of a task loop.
pub trait NodeTimer {
    /// Asynchronously wait for `millis` milliseconds.
    fn delay_ms<'a>(&'a mut self, millis: u32) -> impl core::future::Future<Output = ()> + 'a;
}

/// [`NodeTimer`] backed by the embassy time driver.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmbassyTimer;

impl NodeTimer for EmbassyTimer {
    async fn delay_ms(&mut self, millis: u32) {
        embassy_time::Timer::after_millis(u64::from(millis)).await;
    }
}
