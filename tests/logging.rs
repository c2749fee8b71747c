//! Process-wide logging setup. Kept in its own test binary because the
//! `log` and `tracing` backends can only be installed once per process.

#[test]
fn test_init_logging_installs_once() {
    assert!(quarry::init_logging());
    assert!(!quarry::init_logging());

    log::info!(target: "quarry::plugin", "records from the log crate are bridged");
    quarry::log::info!(target: "quarry::plugin", "native record");

    #[cfg(feature = "tracing")]
    {
        assert!(tracing::dispatcher::has_been_set());
        tracing::info!(locale = "en_US", "event bus style record");
    }
}
