//! Output formatting for CLI responses

use std::path::Path;

use anyhow::Error;
use colored::*;
use densha_hid_mascon_protocol::{ConfigDescriptor, DescriptorSet, DeviceDescriptor, HatDirection};
use densha_usb_mascon::{InputBindingInfo, MasconState, MasconVariant, UsbDeviceModel};
use serde_json::{Value, json};

use crate::error::CliError;

/// Space-separated uppercase hex.
pub fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("Failed to format output as JSON: {}", e),
    }
}

/// Print error in JSON format
pub fn print_error_json(error: &Error) {
    print_json(&json!({
        "success": false,
        "error": {
            "message": error.to_string(),
            "type": error_type_name(error)
        }
    }));
}

/// Print error in human-readable format
pub fn print_error_human(error: &Error) {
    eprintln!("{} {}", "Error:".red().bold(), error);

    let mut source = error.source();
    while let Some(err) = source {
        eprintln!("  {} {}", "Caused by:".yellow(), err);
        source = err.source();
    }
}

fn error_type_name(error: &Error) -> &'static str {
    match error.downcast_ref::<CliError>() {
        Some(CliError::UnknownControl(_)) => "UnknownControl",
        Some(CliError::Device(_)) => "Device",
        Some(CliError::Report(_)) => "Report",
        Some(CliError::Snapshot(_)) => "Snapshot",
        Some(CliError::Stalled(_)) => "Stalled",
        Some(CliError::IoError(_)) => "IoError",
        Some(CliError::JsonError(_)) => "JsonError",
        Some(CliError::YamlError(_)) => "YamlError",
        None => "Unknown",
    }
}

/// Print an interrupt report with the state that produced it
pub fn print_report(variant: MasconVariant, device: &MasconState, report: &[u8], json: bool) {
    if json {
        print_json(&json!({
            "success": true,
            "variant": variant,
            "product": device.record().product_desc,
            "power": device.power(),
            "brake": device.brake(),
            "hat_switch": device.hat_switch(),
            "buttons": device.buttons(),
            "report": report,
            "hex": hex(report),
        }));
    } else {
        println!("{} {}", "Model:".bold(), variant.to_string().cyan());
        println!(
            "  Power: {:02X}  Brake: {:02X}  Hat: {} ({:?})  Buttons: {:06b}",
            device.power(),
            device.brake(),
            device.hat_switch(),
            HatDirection::from_nibble(device.hat_switch()),
            device.buttons()
        );
        println!("  {} {}", "Report:".bold(), hex(report).green());
    }
}

/// Print every descriptor of a model
pub fn print_descriptors(
    set: &DescriptorSet,
    device: &DeviceDescriptor,
    config: &ConfigDescriptor,
    json: bool,
) {
    if json {
        print_json(&json!({
            "success": true,
            "variant": set.variant,
            "vendor_id": format!("{:04X}", device.vendor_id),
            "product_id": format!("{:04X}", device.product_id),
            "device": hex(set.device),
            "config": hex(set.config),
            "hid_report": hex(set.hid_report),
            "strings": &set.strings[1..],
        }));
        return;
    }

    println!(
        "{} {} ({:04X}:{:04X})",
        "Model:".bold(),
        set.variant.to_string().cyan(),
        device.vendor_id,
        device.product_id
    );
    for (index, string) in set.strings.iter().enumerate().skip(1) {
        println!("  String {}: {}", index, string);
    }
    println!("  {} {}", "Device:".bold(), hex(set.device));
    println!("  {} {}", "Configuration:".bold(), hex(set.config));
    for interface in &config.interfaces {
        for endpoint in &interface.endpoints {
            println!(
                "    Interface {} endpoint {:02X}: max packet {}, interval {}",
                interface.number, endpoint.address, endpoint.max_packet_size, endpoint.interval
            );
        }
    }
    println!(
        "  {} ({} bytes) {}",
        "HID report:".bold(),
        set.hid_report.len(),
        hex(set.hid_report)
    );
}

/// Print a model's binding table
pub fn print_bindings(variant: MasconVariant, bindings: &[InputBindingInfo], json: bool) {
    if json {
        print_json(&json!({
            "success": true,
            "variant": variant,
            "bindings": bindings,
        }));
        return;
    }

    if bindings.is_empty() {
        println!("{} has no bindings", variant.to_string().yellow());
        return;
    }

    println!("{} {}", "Bindings:".bold(), variant.to_string().cyan());
    for binding in bindings {
        println!(
            "  {:>2}  {:<8} {:<12} {:?} ({:?})",
            binding.bind_index(),
            binding.name,
            binding.display_name,
            binding.kind,
            binding.generic
        );
    }
}

/// Confirm a written save state
pub fn print_saved(path: &Path, device: &MasconState, len: usize, json: bool) {
    if json {
        print_json(&json!({
            "success": true,
            "path": path.display().to_string(),
            "bytes": len,
            "power": device.power(),
            "brake": device.brake(),
        }));
    } else {
        println!(
            "{} Saved {} bytes to {} (power {:02X}, brake {:02X})",
            "✓".green(),
            len,
            path.display(),
            device.power(),
            device.brake()
        );
    }
}
