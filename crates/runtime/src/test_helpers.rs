//! Test helper utilities and mock implementations for the cm runtime.
//!
//! # Example
//!
//! ```rust,ignore
//! use cm_runtime::test_helpers::MockHttpTransportMock;
//! use cm_runtime::deps::TransportResponse;
//!
//! let mut transport = MockHttpTransportMock::new();
//! transport
//!     .expect_execute()
//!     .times(1)
//!     .returning(|_| Ok(TransportResponse::new(200, "{}")));
//! ```

use async_trait::async_trait;
use mockall::mock;

use crate::deps::{HttpTransport, TransportError, TransportResponse};

// Mock implementation of the `HttpTransport` trait for testing.
//
// Lets executor tests decide whether a request "reached" a server without
// opening any socket.
mock! {
    pub HttpTransportMock {}

    #[async_trait]
    impl HttpTransport for HttpTransportMock {
        async fn execute(
            &self,
            request: reqwest::Request,
        ) -> Result<TransportResponse, TransportError>;
    }
}

/// HTTPS server presenting a freshly generated self-signed certificate.
///
/// Every connection that completes the handshake gets one `200` response
/// carrying `body`; clients rejecting the certificate just drop off.
pub mod tls {
    use std::net::SocketAddr;
    use std::sync::Arc;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio_rustls::TlsAcceptor;
    use tokio_rustls::rustls::ServerConfig;
    use tokio_rustls::rustls::pki_types::{PrivateKeyDer, PrivatePkcs8KeyDer};

    /// Start the server on an ephemeral loopback port
    pub async fn spawn_self_signed_server(body: &'static str) -> SocketAddr {
        let rcgen::CertifiedKey { cert, key_pair } =
            rcgen::generate_simple_self_signed(vec!["untrusted.invalid".to_string()]).unwrap();
        let key = PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(key_pair.serialize_der()));
        let config = ServerConfig::builder()
            .with_no_client_auth()
            .with_single_cert(vec![cert.der().clone()], key)
            .unwrap();
        let acceptor = TlsAcceptor::from(Arc::new(config));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let acceptor = acceptor.clone();
                tokio::spawn(async move {
                    let Ok(mut tls) = acceptor.accept(stream).await else {
                        return;
                    };

                    let mut request = Vec::new();
                    let mut buf = [0u8; 1024];
                    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                        match tls.read(&mut buf).await {
                            Ok(0) | Err(_) => return,
                            Ok(n) => request.extend_from_slice(&buf[..n]),
                        }
                    }

                    let response = format!(
                        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                        body.len()
                    );
                    let _ = tls.write_all(response.as_bytes()).await;
                    let _ = tls.shutdown().await;
                });
            }
        });

        addr
    }
}
