//! XMM native engine
//!
//! A stateful scope-stack engine (frames with two independent namespaces)
//! and a stateless term-substitution transform, exposed through the XMM
//! calling convention: opaque runtime-sized state blocks, raw positional
//! arguments, failure signals carried by `xmm_sdk::NativeError`.
//!
//! Hosts bind this crate through [`api`]: the one-time [`api::state_layout`]
//! query, the [`api::init_state`]/[`api::teardown_state`] lifecycle hooks,
//! and the symbolic entry-point registry ([`api::resolve_method`],
//! [`api::resolve_function`]). The data structures behind the state pointer
//! are deliberately private.

pub mod api;
mod scope;
mod subst;

pub use api::{
    init_state, live_state_count, resolve_function, resolve_method, startup, state_layout,
    teardown_state,
};
