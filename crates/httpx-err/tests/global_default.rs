//! The process-wide default dispatcher.
//!
//! Kept in its own test binary: installing the default is a one-time,
//! process-wide operation.

use http::StatusCode;
use httpx_core::{ErrorConfig, ResponseWriter};
use httpx_err::{global, Dispatcher, HttpError, Marker, NoRows};

#[test]
fn test_install_then_use() {
    let dispatcher = Dispatcher::new()
        .with_config(ErrorConfig::development())
        .with_sentinel(Marker::no_rows(), HttpError::new(StatusCode::GONE));
    global::install(dispatcher).expect("first install should succeed");

    let rejected = global::install(Dispatcher::empty()).expect_err("second install should fail");
    assert!(rejected.sentinels().is_empty());

    let shared = global::shared();
    assert!(shared.config().shows_internal_errors());

    let (request, ()) = http::Request::new(()).into_parts();

    let mut writer = ResponseWriter::new();
    assert!(global::handle(Some(&NoRows), &request, &mut writer));
    assert_eq!(writer.status(), Some(StatusCode::GONE));

    let mut writer = ResponseWriter::new();
    assert!(!global::handle(None, &request, &mut writer));

    let mut writer = ResponseWriter::new();
    assert!(global::handle_panic(Box::new("kaputt"), &request, &mut writer));
    assert_eq!(writer.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    assert!(String::from_utf8_lossy(writer.body()).contains("kaputt"));
}
