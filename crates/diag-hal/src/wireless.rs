//! Wireless radio status for the soft access-point diagnostic.

use serde::{Serialize, Serializer};
use std::collections::VecDeque;
use std::fmt;
use std::net::Ipv4Addr;
use tracing::{debug, info, warn};

/// Default soft AP gateway address of ESP8266-class radios.
pub const DEFAULT_AP_ADDRESS: Ipv4Addr = Ipv4Addr::new(192, 168, 4, 1);

/// 48-bit hardware address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MacAddress(pub [u8; 6]);

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02X}:{b:02X}:{c:02X}:{d:02X}:{e:02X}:{g:02X}")
    }
}

impl Serialize for MacAddress {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Chip identification reported before bring-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChipInfo {
    /// Chip identifier.
    pub chip_id: u32,
    /// Flash chip identifier.
    pub flash_chip_id: u32,
    /// Flash size in bytes.
    pub flash_size: u32,
    /// Station-interface hardware address.
    pub mac: MacAddress,
}

/// Radio status provider for the access-point diagnostic.
///
/// Queries have no failure path: a radio that cannot answer returns its
/// last-known value.
pub trait WirelessStatusProvider {
    /// Switch to access-point mode and start broadcasting `ssid`.
    ///
    /// Returns `false` if the radio refused.
    fn start_access_point(&mut self, ssid: &str, password: &str) -> bool;

    /// Number of stations currently associated with the access point.
    fn connected_client_count(&mut self) -> u32;

    /// Access point gateway address.
    fn ap_address(&self) -> Ipv4Addr;

    /// Access-point interface hardware address.
    fn ap_mac_address(&self) -> MacAddress;

    /// Chip identification.
    fn chip_info(&self) -> ChipInfo;
}

/// Simulated radio replaying a script of client counts.
///
/// Each [`connected_client_count`](WirelessStatusProvider::connected_client_count)
/// call consumes one scripted value; once the script is exhausted the last
/// value is repeated. Before a successful start the count is always zero.
#[derive(Debug, Clone)]
pub struct SimulatedAccessPoint {
    script: VecDeque<u32>,
    last_count: u32,
    start_ok: bool,
    ssid: Option<String>,
    address: Ipv4Addr,
    chip: ChipInfo,
    queries: u64,
}

impl Default for SimulatedAccessPoint {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl SimulatedAccessPoint {
    /// Create a radio that accepts the access-point request.
    pub fn new(script: impl IntoIterator<Item = u32>) -> Self {
        Self {
            script: script.into_iter().collect(),
            last_count: 0,
            start_ok: true,
            ssid: None,
            address: DEFAULT_AP_ADDRESS,
            chip: ChipInfo {
                chip_id: 0x00C0_FFEE,
                flash_chip_id: 0x0016_40EF,
                flash_size: 4 * 1024 * 1024,
                mac: MacAddress([0x5C, 0xCF, 0x7F, 0x12, 0x34, 0x56]),
            },
            queries: 0,
        }
    }

    /// Make the next access-point request fail.
    #[must_use]
    pub fn failing_start(mut self) -> Self {
        self.start_ok = false;
        self
    }

    /// SSID currently broadcast, if started.
    pub fn ssid(&self) -> Option<&str> {
        self.ssid.as_deref()
    }

    /// Number of client-count queries served (for testing).
    pub fn queries(&self) -> u64 {
        self.queries
    }
}

impl WirelessStatusProvider for SimulatedAccessPoint {
    fn start_access_point(&mut self, ssid: &str, _password: &str) -> bool {
        if !self.start_ok {
            warn!(ssid, "Simulated radio refused access point");
            return false;
        }
        info!(ssid, address = %self.address, "Simulated access point up");
        self.ssid = Some(ssid.to_owned());
        true
    }

    fn connected_client_count(&mut self) -> u32 {
        self.queries += 1;
        if self.ssid.is_none() {
            return 0;
        }
        if let Some(next) = self.script.pop_front() {
            self.last_count = next;
        }
        debug!(clients = self.last_count, "Simulated station count");
        self.last_count
    }

    fn ap_address(&self) -> Ipv4Addr {
        self.address
    }

    fn ap_mac_address(&self) -> MacAddress {
        // Soft AP MAC is the station MAC with the locally administered bit set
        let mut mac = self.chip.mac;
        mac.0[0] |= 0x02;
        mac
    }

    fn chip_info(&self) -> ChipInfo {
        self.chip
    }
}
