use std::{
    io,
    net::{IpAddr, UdpSocket},
};

use serde::Serialize;
use sysinfo::System as InfoSystem;
use systemstat::{Platform, System as StatSystem};

use crate::Result;

pub const DEFAULT_IP_PROBE: &str = "8.8.8.8:80";
pub const TEMPERATURE_UNAVAILABLE: &str = "N/A";

/// Host figures shown on the metrics screen. Fields that could not be read
/// carry a display-ready sentinel instead of failing the sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HostMetrics {
    pub ip_address: String,
    pub cpu_percent: f32,
    pub temperature: String,
}

/// Source of host metrics, sampled once per cycle.
pub trait MetricsSource {
    fn sample(&mut self) -> HostMetrics;
}

/// CPU usage via sysinfo, SoC temperature via systemstat, outbound IP via a
/// connected UDP socket.
pub struct HostProbe {
    sysinfo: InfoSystem,
    stats: StatSystem,
    ip_probe: String,
}

impl HostProbe {
    pub fn new(ip_probe: impl Into<String>) -> Self {
        let mut sysinfo = InfoSystem::new();
        // Prime the usage counters so the first sample has a baseline.
        sysinfo.refresh_cpu_usage();
        Self {
            sysinfo,
            stats: StatSystem::new(),
            ip_probe: ip_probe.into(),
        }
    }

    fn cpu_percent(&mut self) -> f32 {
        self.sysinfo.refresh_cpu_usage();
        let usage = self.sysinfo.global_cpu_usage();
        if usage.is_finite() {
            usage.clamp(0.0, 100.0)
        } else {
            0.0
        }
    }
}

impl MetricsSource for HostProbe {
    fn sample(&mut self) -> HostMetrics {
        let cpu_percent = self.cpu_percent();
        let temperature = temperature_label(self.stats.cpu_temp());
        let ip_address = match local_ip(&self.ip_probe) {
            Ok(ip) => ip.to_string(),
            Err(err) => format!("IP error: {err}"),
        };
        HostMetrics {
            ip_address,
            cpu_percent,
            temperature,
        }
    }
}

/// `48.3°C` for a reading in degrees Celsius, the sentinel when the sensor
/// could not be read.
pub fn temperature_label(reading: io::Result<f32>) -> String {
    match reading {
        Ok(celsius) if celsius.is_finite() => format!("{celsius:.1}°C"),
        _ => TEMPERATURE_UNAVAILABLE.to_string(),
    }
}

/// Local address of the interface that routes towards `probe`. Connecting a
/// UDP socket only selects a route; no packet is sent.
pub fn local_ip(probe: &str) -> Result<IpAddr> {
    let socket = UdpSocket::bind("0.0.0.0:0")?;
    socket.connect(probe)?;
    Ok(socket.local_addr()?.ip())
}
