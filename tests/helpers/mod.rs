/// Test doubles simulating the transceiver bus, timers and real-time clock
/// during integration tests.
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use telemetry_node::radio::registers::{
    CHIP_VERSION, IRQFLAGS1_MODE_READY, IRQFLAGS2_PACKET_SENT, IRQFLAGS2_PAYLOAD_READY,
    REG_IRQFLAGS1, REG_IRQFLAGS2, REG_VERSION,
};
use telemetry_node::telemetry::types::{Angle, DateTime, EnvironmentalSample, Hemisphere, LocationTimeFix};
use telemetry_node::traits::{
    clock_authority::ClockAuthority, node_timer::NodeTimer, radio_bus::RadioBus,
};
use tokio::time::{sleep, Duration};

//==================================================================================MOCK_RADIO_BUS
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)]
/// Reset line transitions seen by the bus.
pub enum ResetEdge {
    Asserted,
    Released,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Error returned by the simulated bus once `fail_bus` is set.
pub struct MockBusError;

#[allow(dead_code)]
/// Register file and instrumentation behind a [`MockRadioBus`].
pub struct BusState {
    pub registers: [u8; 128],
    pub version: u8,
    pub mode_ready: bool,
    pub packet_sent: bool,
    pub payload_ready: bool,
    pub fail_bus: bool,
    /// Bytes served by FIFO reads, in order.
    pub rx_fifo: VecDeque<u8>,
    /// Every FIFO burst written by the driver.
    pub tx_bursts: Vec<Vec<u8>>,
    /// Every register write, in order.
    pub writes: Vec<(u8, u8)>,
    pub reads: [u32; 128],
    pub reset_edges: Vec<ResetEdge>,
}

#[derive(Clone)]
#[allow(dead_code)]
/// In-memory transceiver reproducing the `RadioBus` behavior of an RFM69.
/// Clones share the same register file, so a test keeps one as a probe.
pub struct MockRadioBus {
    state: Arc<Mutex<BusState>>,
}

#[allow(dead_code)]
impl MockRadioBus {
    /// A responsive transceiver: correct version, mode-ready and packet-sent
    /// flags raised immediately.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(BusState {
                registers: [0; 128],
                version: CHIP_VERSION,
                mode_ready: true,
                packet_sent: true,
                payload_ready: false,
                fail_bus: false,
                rx_fifo: VecDeque::new(),
                tx_bursts: Vec::new(),
                writes: Vec::new(),
                reads: [0; 128],
                reset_edges: Vec::new(),
            })),
        }
    }

    /// Inspect or tweak the simulated transceiver.
    pub fn with<R>(&self, f: impl FnOnce(&mut BusState) -> R) -> R {
        let mut state = self.state.lock().unwrap();
        f(&mut state)
    }

    /// Forget reads and writes recorded so far.
    pub fn clear_log(&self) {
        self.with(|s| {
            s.writes.clear();
            s.reads = [0; 128];
            s.tx_bursts.clear();
        });
    }

    pub fn register(&self, addr: u8) -> u8 {
        self.with(|s| s.registers[usize::from(addr)])
    }

    pub fn reads_of(&self, addr: u8) -> u32 {
        self.with(|s| s.reads[usize::from(addr)])
    }

    /// Last value written to `addr`, if any.
    pub fn last_write(&self, addr: u8) -> Option<u8> {
        self.with(|s| {
            s.writes
                .iter()
                .rev()
                .find(|(a, _)| *a == addr)
                .map(|(_, v)| *v)
        })
    }

    /// Queue a received packet (length byte first) and raise payload-ready.
    pub fn receive_packet(&self, packet: &[u8]) {
        self.with(|s| {
            s.rx_fifo.extend(packet.iter().copied());
            s.payload_ready = true;
        });
    }
}

impl RadioBus for MockRadioBus {
    type Error = MockBusError;

    async fn read_register(&mut self, addr: u8) -> Result<u8, Self::Error> {
        let mut s = self.state.lock().unwrap();
        if s.fail_bus {
            return Err(MockBusError);
        }
        let index = usize::from(addr & 0x7F);
        s.reads[index] += 1;
        let value = match addr {
            REG_VERSION => s.version,
            REG_IRQFLAGS1 if s.mode_ready => IRQFLAGS1_MODE_READY,
            REG_IRQFLAGS1 => 0,
            REG_IRQFLAGS2 => {
                let mut flags = 0;
                if s.packet_sent {
                    flags |= IRQFLAGS2_PACKET_SENT;
                }
                if s.payload_ready {
                    flags |= IRQFLAGS2_PAYLOAD_READY;
                }
                flags
            }
            _ => s.registers[index],
        };
        Ok(value)
    }

    async fn write_register(&mut self, addr: u8, value: u8) -> Result<(), Self::Error> {
        let mut s = self.state.lock().unwrap();
        if s.fail_bus {
            return Err(MockBusError);
        }
        s.registers[usize::from(addr & 0x7F)] = value;
        s.writes.push((addr, value));
        Ok(())
    }

    async fn read_fifo<'a>(&'a mut self, buffer: &'a mut [u8]) -> Result<(), Self::Error> {
        let mut s = self.state.lock().unwrap();
        if s.fail_bus {
            return Err(MockBusError);
        }
        for byte in buffer.iter_mut() {
            *byte = s.rx_fifo.pop_front().unwrap_or(0);
        }
        if s.rx_fifo.is_empty() {
            s.payload_ready = false;
        }
        Ok(())
    }

    async fn write_fifo<'a>(&'a mut self, data: &'a [u8]) -> Result<(), Self::Error> {
        let mut s = self.state.lock().unwrap();
        if s.fail_bus {
            return Err(MockBusError);
        }
        s.tx_bursts.push(data.to_vec());
        Ok(())
    }

    fn assert_reset(&mut self) -> Result<(), Self::Error> {
        self.with(|s| s.reset_edges.push(ResetEdge::Asserted));
        Ok(())
    }

    fn release_reset(&mut self) -> Result<(), Self::Error> {
        self.with(|s| s.reset_edges.push(ResetEdge::Released));
        Ok(())
    }
}

//==================================================================================MOCK_TIMERS
#[derive(Clone, Default)]
#[allow(dead_code)]
/// Timer that records requested delays and only yields to the runtime, so
/// bounded polls run instantly.
pub struct CountingTimer {
    calls: Arc<AtomicU32>,
    total_ms: Arc<AtomicU32>,
}

#[allow(dead_code)]
impl CountingTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `delay_ms` calls so far.
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Sum of all requested delays.
    pub fn total_ms(&self) -> u32 {
        self.total_ms.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.calls.store(0, Ordering::SeqCst);
        self.total_ms.store(0, Ordering::SeqCst);
    }
}

impl NodeTimer for CountingTimer {
    async fn delay_ms(&mut self, millis: u32) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.total_ms.fetch_add(millis, Ordering::SeqCst);
        tokio::task::yield_now().await;
    }
}

#[allow(dead_code)]
/// Timer based on `tokio::time::sleep` to drive task loops in tests.
pub struct MockTimer;

impl NodeTimer for MockTimer {
    async fn delay_ms(&mut self, millis: u32) {
        sleep(Duration::from_millis(millis as u64)).await;
    }
}

//==================================================================================MOCK_CLOCK
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Error returned by the simulated RTC.
pub struct ClockFault;

#[derive(Default)]
#[allow(dead_code)]
pub struct ClockState {
    pub now: Option<DateTime>,
    pub fail_get: bool,
    pub fail_set: bool,
    pub set_calls: u32,
}

#[derive(Clone, Default)]
#[allow(dead_code)]
/// Simulated real-time clock; clones share the same time.
pub struct MockClock {
    state: Arc<Mutex<ClockState>>,
}

#[allow(dead_code)]
impl MockClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clock already holding `now`.
    pub fn at(now: DateTime) -> Self {
        let clock = Self::new();
        clock.with(|s| s.now = Some(now));
        clock
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut ClockState) -> R) -> R {
        let mut state = self.state.lock().unwrap();
        f(&mut state)
    }
}

impl ClockAuthority for MockClock {
    type Error = ClockFault;

    fn set(&mut self, now: &DateTime) -> Result<(), Self::Error> {
        self.with(|s| {
            s.set_calls += 1;
            if s.fail_set {
                return Err(ClockFault);
            }
            s.now = Some(*now);
            Ok(())
        })
    }

    fn get(&mut self) -> Result<DateTime, Self::Error> {
        self.with(|s| match (s.fail_get, s.now) {
            (false, Some(now)) => Ok(now),
            _ => Err(ClockFault),
        })
    }
}

//==================================================================================FIXTURES
#[allow(dead_code)]
pub fn datetime(hour: u8, minute: u8, second: u8) -> DateTime {
    DateTime::new(20, 5, 26, hour, minute, second).unwrap()
}

#[allow(dead_code)]
/// Fix at 47°36'21" N, `longitude_degrees`°19'55" W.
pub fn fix_at(dt: DateTime, longitude_degrees: u8) -> LocationTimeFix {
    LocationTimeFix::new(
        dt,
        Angle::latitude(47, 36, 21, Hemisphere::North).unwrap(),
        Angle::longitude(longitude_degrees, 19, 55, Hemisphere::West).unwrap(),
    )
    .unwrap()
}

#[allow(dead_code)]
pub fn sample() -> EnvironmentalSample {
    EnvironmentalSample::new(215, 10132, 455).unwrap()
}
