//! Cross-checks the ID constants against the descriptor tables that carry them.

use densha_hid_mascon_protocol::{
    DescriptorSet, DeviceDescriptor, MasconVariant, VENDOR_ID, is_mascon, product_name,
};

#[test]
fn descriptor_ids_match_constants() -> Result<(), Box<dyn std::error::Error>> {
    for variant in MasconVariant::ALL {
        let set = DescriptorSet::for_variant(variant);
        let desc = DeviceDescriptor::parse(set.device)?;
        assert_eq!(desc.vendor_id, VENDOR_ID);
        assert_eq!(desc.product_id, variant.product_id());
        assert!(is_mascon(desc.vendor_id, desc.product_id));
        assert_eq!(product_name(desc.product_id), Some(variant.model_code()));
        assert_eq!(MasconVariant::from_pid(desc.product_id), Some(variant));
    }
    Ok(())
}

#[test]
fn string_indices_resolve() -> Result<(), Box<dyn std::error::Error>> {
    for variant in MasconVariant::ALL {
        let set = DescriptorSet::for_variant(variant);
        let desc = DeviceDescriptor::parse(set.device)?;
        assert_eq!(set.string(usize::from(desc.manufacturer_index)), Some("TAITO"));
        assert_eq!(
            set.string(usize::from(desc.serial_index)),
            Some(variant.model_code())
        );
        assert!(
            set.string(usize::from(desc.product_index))
                .is_some_and(|s| s.starts_with("TAITO_DENSYA_CON_T0"))
        );
    }
    Ok(())
}
