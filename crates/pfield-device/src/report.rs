//! Human-readable platform and device enumeration.

use std::fmt::Write;

use crate::device::PlatformInfo;

/// Render a nested text record of every platform and its devices.
pub fn device_report(platforms: &[PlatformInfo]) -> String {
    let mut out = String::new();
    if platforms.is_empty() {
        out.push_str("No platforms found.\n");
        return out;
    }
    // Writing into a String cannot fail.
    for (p, platform) in platforms.iter().enumerate() {
        let _ = writeln!(out, "Platform {p}: {}", platform.name);
        let _ = writeln!(out, "  Vendor:  {}", platform.vendor);
        let _ = writeln!(out, "  Version: {}", platform.version);
        let _ = writeln!(out, "  Devices: {}", platform.devices.len());
        for (d, device) in platform.devices.iter().enumerate() {
            let _ = writeln!(out, "  Device {d}: {}", device.name);
            let _ = writeln!(out, "    Vendor:              {}", device.vendor);
            let _ = writeln!(out, "    Compute units:       {}", device.compute_units);
            let _ = writeln!(
                out,
                "    Max work-group size: {}",
                device.max_work_group_size
            );
            let _ = writeln!(
                out,
                "    Local memory:        {} KiB",
                device.local_mem_bytes / 1024
            );
        }
    }
    out
}
