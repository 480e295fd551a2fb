use super::*;

#[test]
fn test_auth_statuses_classify_as_auth() {
    assert_eq!(classify_status(StatusCode::UNAUTHORIZED), ErrorKind::Auth);
    assert_eq!(classify_status(StatusCode::FORBIDDEN), ErrorKind::Auth);
}

#[test]
fn test_not_found_classifies_as_not_found() {
    assert_eq!(classify_status(StatusCode::NOT_FOUND), ErrorKind::NotFound);
}

#[test]
fn test_other_statuses_classify_as_server() {
    assert_eq!(
        classify_status(StatusCode::INTERNAL_SERVER_ERROR),
        ErrorKind::Server
    );
    assert_eq!(classify_status(StatusCode::BAD_GATEWAY), ErrorKind::Server);
    assert_eq!(classify_status(StatusCode::BAD_REQUEST), ErrorKind::Server);
}

#[test]
fn test_base_url_trailing_slash_is_trimmed() {
    let client = ApiClient::new(&ApiConfig {
        base_url: "https://incubator.example.org/".to_string(),
        timeout_secs: 5,
        session_cookie: None,
    })
    .unwrap();
    assert_eq!(client.base_url, "https://incubator.example.org");
}

#[test]
fn test_invalid_session_cookie_is_rejected() {
    let result = ApiClient::new(&ApiConfig {
        base_url: "https://incubator.example.org".to_string(),
        timeout_secs: 5,
        session_cookie: Some("sid=\n".to_string()),
    });
    assert!(result.is_err());
}
