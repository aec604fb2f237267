//! Default HTTP/1.1 transport over TCP, with TLS for `https` URLs.
//!
//! Deliberately minimal: one connection per hop, `connection: close`
//! semantics, body framing via `Content-Length`, chunked transfer encoding,
//! or read-to-close. All request lifecycle logic (redirects, codecs,
//! classification) lives above this layer.

use std::time::Duration;

use futures::future::BoxFuture;
use futures::StreamExt;
use log::trace;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::time::timeout;

use crate::config::{READ_CHUNK_SIZE, TCP_CONNECT_TIMEOUT_SECS, TLS_HANDSHAKE_TIMEOUT_SECS};
use crate::error::TransportError;
use crate::headers::HeaderMap;
use crate::method::Method;
use crate::transport::{tls, BodyStream, Transport, TransportReply, TransportRequest};

trait Conn: AsyncRead + AsyncWrite + Send + Unpin {}
impl<T: AsyncRead + AsyncWrite + Send + Unpin> Conn for T {}

/// How the remaining response body is delimited.
enum Framing {
    /// No body bytes follow the header section.
    Empty,
    /// Exactly this many bytes follow.
    Length(usize),
    /// Chunked transfer encoding.
    Chunked,
    /// Body runs until the peer closes the connection.
    Eof,
}

/// The default transport: HTTP/1.1 over `tokio::net::TcpStream`, TLS via
/// rustls for `https` URLs.
pub struct HttpTransport {
    tls: tokio_rustls::TlsConnector,
}

impl HttpTransport {
    /// Creates a transport with the webpki root certificate bundle.
    pub fn new() -> Self {
        Self { tls: tls::connector() }
    }

    async fn connect(&self, url: &url::Url) -> Result<Box<dyn Conn>, TransportError> {
        if !matches!(url.scheme(), "http" | "https") {
            return Err(TransportError::UnsupportedScheme(url.scheme().to_string()));
        }
        let host = url
            .host_str()
            .ok_or_else(|| TransportError::Connect("URL has no host".into()))?
            .trim_matches(['[', ']'])
            .to_string();
        let port = url
            .port_or_known_default()
            .ok_or_else(|| TransportError::UnsupportedScheme(url.scheme().to_string()))?;

        let tcp = timeout(
            Duration::from_secs(TCP_CONNECT_TIMEOUT_SECS),
            TcpStream::connect((host.as_str(), port)),
        )
        .await
        .map_err(|_| TransportError::Timeout)?
        .map_err(|e| TransportError::Connect(e.to_string()))?;

        if url.scheme() == "http" {
            return Ok(Box::new(tcp));
        }
        let name = rustls::pki_types::ServerName::try_from(host)
            .map_err(|e| TransportError::Tls(e.to_string()))?;
        let stream = timeout(
            Duration::from_secs(TLS_HANDSHAKE_TIMEOUT_SECS),
            self.tls.connect(name, tcp),
        )
        .await
        .map_err(|_| TransportError::Timeout)?
        .map_err(|e| TransportError::Tls(e.to_string()))?;
        Ok(Box::new(stream))
    }

    async fn exchange(&self, request: TransportRequest) -> Result<TransportReply, TransportError> {
        let mut conn = self.connect(&request.url).await?;
        write_request(&mut conn, &request).await?;

        let mut reader = BufReader::new(conn);
        let (status, headers) = read_head(&mut reader).await?;
        trace!("{} {} -> {}", request.method, request.url, status);

        let framing = response_framing(request.method, status, &headers);
        Ok(TransportReply {
            status,
            headers,
            body: spawn_body_pump(reader, framing),
        })
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for HttpTransport {
    fn open(&self, request: TransportRequest) -> BoxFuture<'_, Result<TransportReply, TransportError>> {
        Box::pin(self.exchange(request))
    }
}

async fn write_request(conn: &mut Box<dyn Conn>, request: &TransportRequest) -> Result<(), TransportError> {
    let url = &request.url;
    let mut target = url.path().to_string();
    if let Some(query) = url.query() {
        target.push('?');
        target.push_str(query);
    }

    let mut head = format!("{} {} HTTP/1.1\r\n", request.method, target);
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => head.push_str(&format!("host: {}:{}\r\n", host, port)),
        None => head.push_str(&format!("host: {}\r\n", host)),
    }
    for (name, value) in request.headers.iter() {
        // Connection management and framing are owned by this layer
        if matches!(name, "host" | "content-length" | "connection" | "transfer-encoding") {
            continue;
        }
        head.push_str(&format!("{}: {}\r\n", name, value));
    }
    if let Some(body) = &request.body {
        head.push_str(&format!("content-length: {}\r\n", body.len()));
    }
    head.push_str("connection: close\r\n\r\n");

    conn.write_all(head.as_bytes()).await?;
    if let Some(body) = &request.body {
        conn.write_all(body).await?;
    }
    conn.flush().await?;
    Ok(())
}

async fn read_head(
    reader: &mut BufReader<Box<dyn Conn>>,
) -> Result<(u16, HeaderMap), TransportError> {
    let mut line = String::new();
    if reader.read_line(&mut line).await? == 0 {
        return Err(TransportError::MalformedResponse(
            "connection closed before status line".into(),
        ));
    }
    let status = parse_status_line(line.trim_end())?;

    let mut headers = HeaderMap::new();
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).await? == 0 {
            return Err(TransportError::MalformedResponse(
                "connection closed inside header section".into(),
            ));
        }
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        let Some((name, value)) = line.split_once(':') else {
            return Err(TransportError::MalformedResponse(format!(
                "header line without colon: {:?}",
                line
            )));
        };
        headers.insert(name.trim(), value.trim());
    }
    Ok((status, headers))
}

fn parse_status_line(line: &str) -> Result<u16, TransportError> {
    let mut parts = line.splitn(3, ' ');
    let version = parts.next().unwrap_or_default();
    if !version.starts_with("HTTP/") {
        return Err(TransportError::MalformedResponse(format!(
            "bad status line: {:?}",
            line
        )));
    }
    parts
        .next()
        .and_then(|code| code.parse::<u16>().ok())
        .ok_or_else(|| TransportError::MalformedResponse(format!("bad status line: {:?}", line)))
}

fn response_framing(method: Method, status: u16, headers: &HeaderMap) -> Framing {
    if method == Method::Head || status == 204 || status == 304 || (100..200).contains(&status) {
        return Framing::Empty;
    }
    if headers
        .get("transfer-encoding")
        .is_some_and(|v| v.to_ascii_lowercase().contains("chunked"))
    {
        return Framing::Chunked;
    }
    match headers.get("content-length").and_then(|v| v.parse::<usize>().ok()) {
        Some(n) => Framing::Length(n),
        None => Framing::Eof,
    }
}

/// Reads the body on a background task so the reply's stream yields
/// fragments as they arrive instead of after the fact.
fn spawn_body_pump(reader: BufReader<Box<dyn Conn>>, framing: Framing) -> BodyStream {
    let (tx, rx) = mpsc::channel::<Result<Vec<u8>, TransportError>>(8);
    tokio::spawn(async move {
        let mut reader = reader;
        let result = match framing {
            Framing::Empty => Ok(()),
            Framing::Length(n) => pump_length(&mut reader, n, &tx).await,
            Framing::Chunked => pump_chunked(&mut reader, &tx).await,
            Framing::Eof => pump_until_close(&mut reader, &tx).await,
        };
        if let Err(err) = result {
            // Receiver may already be gone; nothing to do then
            let _ = tx.send(Err(err)).await;
        }
    });
    futures::stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|item| (item, rx))
    })
    .boxed()
}

async fn pump_length(
    reader: &mut BufReader<Box<dyn Conn>>,
    total: usize,
    tx: &mpsc::Sender<Result<Vec<u8>, TransportError>>,
) -> Result<(), TransportError> {
    let mut remaining = total;
    while remaining > 0 {
        let mut buf = vec![0u8; remaining.min(READ_CHUNK_SIZE)];
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            return Err(TransportError::MalformedResponse(
                "connection closed before end of body".into(),
            ));
        }
        buf.truncate(n);
        remaining -= n;
        if tx.send(Ok(buf)).await.is_err() {
            return Ok(());
        }
    }
    Ok(())
}

async fn pump_until_close(
    reader: &mut BufReader<Box<dyn Conn>>,
    tx: &mpsc::Sender<Result<Vec<u8>, TransportError>>,
) -> Result<(), TransportError> {
    loop {
        let mut buf = vec![0u8; READ_CHUNK_SIZE];
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            return Ok(());
        }
        buf.truncate(n);
        if tx.send(Ok(buf)).await.is_err() {
            return Ok(());
        }
    }
}

async fn pump_chunked(
    reader: &mut BufReader<Box<dyn Conn>>,
    tx: &mpsc::Sender<Result<Vec<u8>, TransportError>>,
) -> Result<(), TransportError> {
    loop {
        let mut size_line = String::new();
        if reader.read_line(&mut size_line).await? == 0 {
            return Err(TransportError::MalformedResponse(
                "connection closed inside chunked body".into(),
            ));
        }
        let size_text = size_line.trim_end().split(';').next().unwrap_or("").trim();
        let size = usize::from_str_radix(size_text, 16).map_err(|_| {
            TransportError::MalformedResponse(format!("bad chunk size: {:?}", size_text))
        })?;

        if size == 0 {
            // Trailer section, if any, ends with an empty line
            loop {
                let mut trailer = String::new();
                let n = reader.read_line(&mut trailer).await?;
                if n == 0 || trailer.trim_end().is_empty() {
                    return Ok(());
                }
            }
        }

        let mut chunk = vec![0u8; size];
        reader.read_exact(&mut chunk).await?;
        let mut crlf = [0u8; 2];
        reader.read_exact(&mut crlf).await?;
        if tx.send(Ok(chunk)).await.is_err() {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status_line() {
        assert_eq!(parse_status_line("HTTP/1.1 200 OK").unwrap(), 200);
        assert_eq!(parse_status_line("HTTP/1.1 302 Moved Temporarily").unwrap(), 302);
        assert_eq!(parse_status_line("HTTP/1.0 404 Not Found").unwrap(), 404);
        assert!(parse_status_line("garbage").is_err());
        assert!(parse_status_line("HTTP/1.1 abc OK").is_err());
    }

    #[test]
    fn test_framing_rules() {
        let mut headers = HeaderMap::new();
        headers.insert("content-length", "12");
        assert!(matches!(
            response_framing(Method::Get, 200, &headers),
            Framing::Length(12)
        ));
        // HEAD never carries a body, whatever the headers claim
        assert!(matches!(
            response_framing(Method::Head, 200, &headers),
            Framing::Empty
        ));
        assert!(matches!(
            response_framing(Method::Get, 204, &HeaderMap::new()),
            Framing::Empty
        ));

        let mut chunked = HeaderMap::new();
        chunked.insert("transfer-encoding", "chunked");
        assert!(matches!(
            response_framing(Method::Get, 200, &chunked),
            Framing::Chunked
        ));

        assert!(matches!(
            response_framing(Method::Get, 200, &HeaderMap::new()),
            Framing::Eof
        ));
    }

    #[tokio::test]
    async fn test_exchange_against_scripted_peer() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let n = socket.read(&mut buf).await.unwrap();
            let head = String::from_utf8_lossy(&buf[..n]).to_string();
            socket
                .write_all(b"HTTP/1.1 200 OK\r\ncontent-type: text/plain\r\ncontent-length: 5\r\n\r\nhello")
                .await
                .unwrap();
            head
        });

        let transport = HttpTransport::new();
        let url = url::Url::parse(&format!("http://127.0.0.1:{}/greet?x=1", addr.port())).unwrap();
        let mut headers = HeaderMap::new();
        headers.insert("user-agent", "test");
        let reply = transport
            .open(TransportRequest {
                method: Method::Get,
                url,
                headers,
                body: None,
            })
            .await
            .unwrap();

        assert_eq!(reply.status, 200);
        assert_eq!(reply.headers.get("content-type"), Some("text/plain"));
        let mut body = Vec::new();
        let mut stream = reply.body;
        while let Some(chunk) = stream.next().await {
            body.extend_from_slice(&chunk.unwrap());
        }
        assert_eq!(body, b"hello");

        let head = server.await.unwrap();
        assert!(head.starts_with("GET /greet?x=1 HTTP/1.1\r\n"), "head was: {}", head);
        assert!(head.contains("user-agent: test\r\n"));
        assert!(head.contains("connection: close\r\n"));
    }

    #[tokio::test]
    async fn test_exchange_decodes_chunked_body() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let _ = socket.read(&mut buf).await.unwrap();
            socket
                .write_all(
                    b"HTTP/1.1 200 OK\r\ntransfer-encoding: chunked\r\n\r\n7\r\n{\"name\"\r\n8\r\n:\"tobi\"}\r\n0\r\n\r\n",
                )
                .await
                .unwrap();
        });

        let transport = HttpTransport::new();
        let url = url::Url::parse(&format!("http://127.0.0.1:{}/chunked", addr.port())).unwrap();
        let reply = transport
            .open(TransportRequest {
                method: Method::Get,
                url,
                headers: HeaderMap::new(),
                body: None,
            })
            .await
            .unwrap();

        let mut body = Vec::new();
        let mut stream = reply.body;
        while let Some(chunk) = stream.next().await {
            body.extend_from_slice(&chunk.unwrap());
        }
        assert_eq!(body, br#"{"name":"tobi"}"#);
    }

    #[tokio::test]
    async fn test_connect_failure_is_transport_error() {
        let transport = HttpTransport::new();
        // Port 1 on localhost is almost certainly closed
        let url = url::Url::parse("http://127.0.0.1:1/").unwrap();
        let err = transport
            .open(TransportRequest {
                method: Method::Get,
                url,
                headers: HeaderMap::new(),
                body: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Connect(_) | TransportError::Timeout));
    }

    #[tokio::test]
    async fn test_unsupported_scheme_rejected() {
        let transport = HttpTransport::new();
        let url = url::Url::parse("ftp://example.com/file").unwrap();
        let err = transport
            .open(TransportRequest {
                method: Method::Get,
                url,
                headers: HeaderMap::new(),
                body: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::UnsupportedScheme(_)));
    }
}
