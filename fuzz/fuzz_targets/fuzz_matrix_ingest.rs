//! Fuzz target for policy matrix ingestion.
//!
//! Goal: ingesting whatever the store holds should **never panic**, and no
//! action other than `view` is granted on a node whose `view` is not.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_matrix_ingest
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;
use permatrix_domain::{Matrix, Role, evaluate_triple, find_violations};
use permatrix_types::Triple;

fuzz_target!(|data: &[u8]| {
    let Ok(value) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };
    let matrix = Matrix::from_json(&value);
    let _ = find_violations(&matrix);

    for key in matrix.roles.keys() {
        let role = Role::new(key);
        if role.is_bypass() {
            continue;
        }
        for (page, tab) in matrix.known_tabs() {
            let configured = matrix
                .role_policy(&role)
                .and_then(|p| p.node(&page, &tab))
                .is_some();
            if !configured {
                continue;
            }
            let view = evaluate_triple(&matrix, &role, &Triple::new(&page, &tab, "view"));
            let edit = evaluate_triple(&matrix, &role, &Triple::new(&page, &tab, "edit"));
            assert!(view || !edit, "edit granted without view");
        }
    }

    // The serialized form reads back unchanged.
    assert_eq!(Matrix::from_json(&matrix.to_json()), matrix);
});
