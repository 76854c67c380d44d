//! Fuzz target for role normalization.
//!
//! Goal: any raw role string maps to a canonical role without panicking.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_role_normalize
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;
use permatrix_domain::RoleNormalizer;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let normalizer = RoleNormalizer::standard();
        let role = normalizer.normalize(Some(text));
        // Normalizing the canonical spelling is a fixed point.
        assert_eq!(normalizer.normalize(Some(role.as_str())), role);
    }
});
