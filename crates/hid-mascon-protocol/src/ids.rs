//! TAITO Densha de GO! controller USB vendor and product IDs.
//!
//! All three cataloged controllers enumerate under TAITO's vendor ID. The
//! values below are the ones the physical controllers report and are what a
//! guest driver matches on, so they are a compatibility contract.
//!
//! Sources:
//! - marcriera's controller documentation
//!   (<https://marcriera.github.io/ddgo-controller-docs/controllers/usb/>)
//! - HID report descriptor dumps `tcpp20009`, `tcpp20011`, `tcpp20014`

/// TAITO USB vendor ID.
pub const VENDOR_ID: u16 = 0x0AE4;

/// Two-handle "Type 2" controller (TCPP20009).
pub const PRODUCT_TYPE2: u16 = 0x0004;

/// Shinkansen controller (TCPP20011).
pub const PRODUCT_SHINKANSEN: u16 = 0x0005;

/// Ryojouhen controller (TCPP20014).
pub const PRODUCT_RYOJOUHEN: u16 = 0x0007;

/// Device release number reported in `bcdDevice` (1.02).
pub const BCD_DEVICE: u16 = 0x0102;

/// USB specification release reported in `bcdUSB` (1.1).
pub const BCD_USB: u16 = 0x0110;

/// Returns `true` if the VID/PID pair identifies a cataloged mascon controller.
pub fn is_mascon(vid: u16, pid: u16) -> bool {
    vid == VENDOR_ID && matches!(pid, PRODUCT_TYPE2 | PRODUCT_SHINKANSEN | PRODUCT_RYOJOUHEN)
}

/// Returns the TAITO model code for a known PID, or `None`.
pub fn product_name(pid: u16) -> Option<&'static str> {
    match pid {
        PRODUCT_TYPE2 => Some("TCPP20009"),
        PRODUCT_SHINKANSEN => Some("TCPP20011"),
        PRODUCT_RYOJOUHEN => Some("TCPP20014"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_products_recognised() {
        assert!(is_mascon(VENDOR_ID, PRODUCT_TYPE2));
        assert!(is_mascon(VENDOR_ID, PRODUCT_SHINKANSEN));
        assert!(is_mascon(VENDOR_ID, PRODUCT_RYOJOUHEN));
    }

    #[test]
    fn unknown_product_not_recognised() {
        assert!(!is_mascon(VENDOR_ID, 0x0006));
        assert!(!is_mascon(0x0000, PRODUCT_TYPE2));
    }

    #[test]
    fn product_names() {
        assert_eq!(product_name(PRODUCT_TYPE2), Some("TCPP20009"));
        assert_eq!(product_name(PRODUCT_SHINKANSEN), Some("TCPP20011"));
        assert_eq!(product_name(PRODUCT_RYOJOUHEN), Some("TCPP20014"));
        assert_eq!(product_name(0xFFFF), None);
    }
}
