use assert_matches::assert_matches;
use reqwest::{blocking::Client, StatusCode};
use tools::{StaticServer, TarGzBuilder};
use tzfetch_streaming::reqwest::{extract_tar_gz, FetchError};
use tzfetch_streaming::ExtractError;

/// A client that never goes through a proxy, the test server is always local.
fn client() -> Client {
    Client::builder().no_proxy().build().unwrap()
}

fn hello_archive() -> Vec<u8> {
    TarGzBuilder::new()
        .directory("dir/", 0o755)
        .file("dir/file.txt", 0o644, b"hello")
        .finish()
}

#[test]
fn test_extract_url() {
    let server = StaticServer::new([("/hello.tar.gz", StatusCode::OK, hello_archive())]);
    let temp_dir = tempfile::tempdir().unwrap();

    let result = extract_tar_gz(
        client(),
        server.url("/hello.tar.gz"),
        temp_dir.path(),
    )
    .unwrap();

    assert_eq!(result.directories, 1);
    assert_eq!(result.files, 1);
    assert_eq!(
        fs_err::read_to_string(temp_dir.path().join("dir/file.txt")).unwrap(),
        "hello"
    );
}

#[test]
fn test_not_found() {
    let server = StaticServer::empty();
    let temp_dir = tempfile::tempdir().unwrap();
    let url = server.url("/missing.tar.gz");

    let result = extract_tar_gz(client(), url.clone(), temp_dir.path());

    assert_matches!(
        result,
        Err(ExtractError::Fetch(FetchError::Status { url: failed, status }))
            if status == StatusCode::NOT_FOUND && failed == url
    );
    assert_eq!(fs_err::read_dir(temp_dir.path()).unwrap().count(), 0);
}

#[test]
fn test_non_ok_success_status_is_rejected() {
    // The body is a valid archive, but only `200 OK` is accepted.
    let server = StaticServer::new([("/partial", StatusCode::PARTIAL_CONTENT, hello_archive())]);
    let temp_dir = tempfile::tempdir().unwrap();

    let err = extract_tar_gz(client(), server.url("/partial"), temp_dir.path()).unwrap_err();

    assert_matches!(
        &err,
        ExtractError::Fetch(FetchError::Status { status, .. }) if status.as_u16() == 206
    );
    assert!(err.to_string().contains("206"));
    assert_eq!(fs_err::read_dir(temp_dir.path()).unwrap().count(), 0);
}

#[test]
fn test_body_is_not_gzip() {
    let server = StaticServer::new([(
        "/index.html",
        StatusCode::OK,
        b"<html>not an archive</html>".to_vec(),
    )]);
    let temp_dir = tempfile::tempdir().unwrap();

    assert_matches!(
        extract_tar_gz(client(), server.url("/index.html"), temp_dir.path()),
        Err(ExtractError::CorruptArchive(_))
    );
    assert_eq!(fs_err::read_dir(temp_dir.path()).unwrap().count(), 0);
}

#[test]
fn test_connection_refused() {
    // Bind and release a port so nothing is listening on it.
    let address = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let url = url::Url::parse(&format!("http://{address}/archive.tar.gz")).unwrap();
    let temp_dir = tempfile::tempdir().unwrap();

    let err = extract_tar_gz(client(), url.clone(), temp_dir.path()).unwrap_err();

    assert_matches!(&err, ExtractError::Fetch(fetch_err @ FetchError::Transport { .. }) if fetch_err.url() == &url);
}
