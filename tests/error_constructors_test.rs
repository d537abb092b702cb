use starcharge::error::{FetchError, SetupError, StarChargeError};

#[test]
fn error_constructors_group_1() {
    assert!(matches!(
        StarChargeError::config("x"),
        StarChargeError::Config { .. }
    ));
    assert!(matches!(StarChargeError::web("x"), StarChargeError::Web { .. }));
    assert!(matches!(StarChargeError::io("x"), StarChargeError::Io { .. }));
    assert!(matches!(
        StarChargeError::network("x"),
        StarChargeError::Network { .. }
    ));
}

#[test]
fn error_constructors_group_2() {
    assert!(matches!(StarChargeError::api("x"), StarChargeError::Api { .. }));
    assert!(matches!(
        StarChargeError::validation("f", "m"),
        StarChargeError::Validation { .. }
    ));
    assert!(matches!(
        StarChargeError::timeout("x"),
        StarChargeError::Timeout { .. }
    ));
    assert!(matches!(
        StarChargeError::generic("x"),
        StarChargeError::Generic { .. }
    ));
}

#[test]
fn io_and_json_errors_convert() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    assert!(matches!(StarChargeError::from(io), StarChargeError::Io { .. }));

    let json = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    assert!(matches!(
        StarChargeError::from(json),
        StarChargeError::Serialization { .. }
    ));
}

#[test]
fn display_messages() {
    let e = StarChargeError::validation("field", "bad");
    assert!(format!("{}", e).contains("Validation error"));

    assert_eq!(
        FetchError::Communication("refused".into()).to_string(),
        "Error communicating with API: refused"
    );
    assert_eq!(
        FetchError::MalformedBody("eof".into()).to_string(),
        "Invalid JSON response: eof"
    );
    assert_eq!(SetupError::CannotConnect.form_code(), "cannot_connect");
}
