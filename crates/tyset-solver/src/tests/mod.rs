//! Engine unit tests.

mod bdd_tests;
mod constraint_tests;
mod leaf_lattice_tests;
mod recursion_tests;
mod type_law_tests;

/// Install a tracing subscriber once, honoring `RUST_LOG`. Call from tests
/// whose failures are easiest to read with the engine's trace output on.
pub(crate) fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
