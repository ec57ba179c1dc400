//! Native resource accounting across construct/destroy cycles
//!
//! Kept as a single test in its own binary so the engine's live-state
//! counter is not perturbed by concurrently running tests.

use libxmm::{init, CLASS_NAME};
use xmm_sdk::Value;

#[test]
fn test_construct_destroy_cycles_leak_no_native_state() {
    let module = init().unwrap();
    let before = xmm_engine::live_state_count();

    // Exercised instances
    for i in 0..256 {
        let instance = module.construct(CLASS_NAME, &[]).unwrap();
        instance.call("push", &[]).unwrap();
        instance
            .call("add_v", &[Value::str("x"), Value::Int(i)])
            .unwrap();
        instance
            .call("add_d", &[Value::str("x"), Value::str("def")])
            .unwrap();
        drop(instance);
    }
    assert_eq!(xmm_engine::live_state_count(), before);

    // Untouched instances, destroyed immediately
    for _ in 0..256 {
        let instance = module.construct(CLASS_NAME, &[]).unwrap();
        drop(instance);
    }
    assert_eq!(xmm_engine::live_state_count(), before);

    // Held instances are live until the last reference drops
    let held: Vec<_> = (0..8)
        .map(|_| module.construct(CLASS_NAME, &[]).unwrap())
        .collect();
    assert_eq!(xmm_engine::live_state_count(), before + 8);

    let extra = held[0].clone();
    drop(held);
    assert_eq!(xmm_engine::live_state_count(), before + 1);
    drop(extra);
    assert_eq!(xmm_engine::live_state_count(), before);
}
