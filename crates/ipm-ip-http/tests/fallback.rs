//! Provider fallback behavior against local HTTP endpoints
//!
//! Each test stands up throwaway TCP listeners serving canned HTTP/1.1
//! responses, so ordering and exhaustion are exercised without touching the
//! real lookup services.

use ipm_core::{Error, IpProbe};
use ipm_ip_http::HttpIpProbe;
use std::net::Ipv4Addr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

const TIMEOUT: Duration = Duration::from_secs(2);

/// Serve one canned HTTP response, returning the endpoint URL
async fn serve_once(status: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        if let Ok((mut stream, _)) = listener.accept().await {
            let mut buf = [0u8; 1024];
            let _ = stream.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = stream.write_all(response.as_bytes()).await;
            let _ = stream.shutdown().await;
        }
    });

    format!("http://{addr}")
}

/// An endpoint that refuses connections
async fn dead_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

#[tokio::test]
async fn first_provider_short_circuits() {
    let first = serve_once("200 OK", "your ip is 10.0.0.1 today").await;
    let second = serve_once("200 OK", "203.0.113.9").await;

    let probe = HttpIpProbe::with_services(vec![first, second], TIMEOUT);
    assert_eq!(probe.discover().await.unwrap(), Ipv4Addr::new(10, 0, 0, 1));
}

#[tokio::test]
async fn unreachable_provider_falls_through() {
    let first = dead_endpoint().await;
    let second = serve_once("200 OK", "8.8.8.8").await;

    let probe = HttpIpProbe::with_services(vec![first, second], TIMEOUT);
    assert_eq!(probe.discover().await.unwrap(), Ipv4Addr::new(8, 8, 8, 8));
}

#[tokio::test]
async fn invalid_body_falls_through() {
    let first = serve_once("200 OK", "999.1.1.1").await;
    let second = serve_once("200 OK", "your ip is 10.0.0.2").await;

    let probe = HttpIpProbe::with_services(vec![first, second], TIMEOUT);
    assert_eq!(probe.discover().await.unwrap(), Ipv4Addr::new(10, 0, 0, 2));
}

#[tokio::test]
async fn http_error_status_falls_through() {
    let first = serve_once("500 Internal Server Error", "203.0.113.1").await;
    let second = serve_once("200 OK", "203.0.113.2").await;

    let probe = HttpIpProbe::with_services(vec![first, second], TIMEOUT);
    assert_eq!(
        probe.discover().await.unwrap(),
        Ipv4Addr::new(203, 0, 113, 2)
    );
}

#[tokio::test]
async fn exhausted_provider_list_is_terminal() {
    let first = dead_endpoint().await;
    let second = serve_once("200 OK", "no address here").await;

    let probe = HttpIpProbe::with_services(vec![first, second], TIMEOUT);
    let err = probe.discover().await.unwrap_err();
    assert!(matches!(err, Error::DiscoveryExhausted), "got {err:?}");
}
