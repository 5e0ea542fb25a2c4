//! WebSocket client helpers: build the authenticated upgrade request and
//! connect, optionally trusting a custom CA for `wss://`.

use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;

use anyhow::Context;
use futures_util::{Sink, SinkExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::handshake::client::Request;
use tokio_tungstenite::tungstenite::http::{header::AUTHORIZATION, HeaderValue};
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_tungstenite::{
    connect_async, connect_async_tls_with_config, Connector, MaybeTlsStream, WebSocketStream,
};
use url::Url;

use crate::types::{ClientMessage, ViewModel};

pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Attach the initial viewport as `cols`/`rows` and the key as a bearer header.
pub fn build_request(url: &str, key: &str, cols: u16, rows: u16) -> anyhow::Result<Request> {
    let mut u = Url::parse(url).with_context(|| format!("invalid agent url {url}"))?;
    match u.scheme() {
        "ws" | "wss" => {}
        other => anyhow::bail!("unsupported scheme {other}, expected ws:// or wss://"),
    }
    u.query_pairs_mut()
        .append_pair("cols", &cols.to_string())
        .append_pair("rows", &rows.to_string());

    let mut req = u.as_str().into_client_request()?;
    let bearer = HeaderValue::from_str(&format!("Bearer {}", key.trim()))
        .context("key contains characters not allowed in a header")?;
    req.headers_mut().insert(AUTHORIZATION, bearer);
    Ok(req)
}

pub async fn connect(req: Request, tls_ca: Option<&str>) -> anyhow::Result<WsStream> {
    let res = match tls_ca {
        Some(path) => {
            let config = tls_config(path)?;
            connect_async_tls_with_config(req, None, false, Some(Connector::Rustls(Arc::new(config))))
                .await
        }
        None => connect_async(req).await,
    };
    match res {
        Ok((ws, _)) => Ok(ws),
        Err(WsError::Http(resp)) if resp.status().as_u16() == 401 => {
            anyhow::bail!("agent refused the key (401 Unauthorized)")
        }
        Err(e) => Err(e).context("connecting to agent"),
    }
}

fn tls_config(ca_path: &str) -> anyhow::Result<rustls::ClientConfig> {
    let file = File::open(ca_path).with_context(|| format!("opening CA file {ca_path}"))?;
    let mut roots = rustls::RootCertStore::empty();
    for cert in rustls_pemfile::certs(&mut BufReader::new(file)) {
        roots.add(cert?)?;
    }
    if roots.is_empty() {
        anyhow::bail!("no certificates found in {ca_path}");
    }
    Ok(rustls::ClientConfig::builder()
        .with_root_certificates(roots)
        .with_no_client_auth())
}

pub async fn send<S>(sink: &mut S, msg: &ClientMessage) -> anyhow::Result<()>
where
    S: Sink<Message, Error = WsError> + Unpin,
{
    let js = serde_json::to_string(msg)?;
    sink.send(Message::Text(js)).await?;
    Ok(())
}

/// Decode a view frame; frames this client does not understand are skipped.
pub fn parse_view(text: &str) -> Option<ViewModel> {
    serde_json::from_str(text).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_carries_viewport_and_bearer() {
        let req = build_request("ws://10.0.0.5:23234/ws", " secret\n", 120, 40).unwrap();
        assert_eq!(req.uri().query(), Some("cols=120&rows=40"));
        assert_eq!(req.headers()[AUTHORIZATION], "Bearer secret");
    }

    #[test]
    fn non_ws_scheme_is_rejected() {
        assert!(build_request("http://host/ws", "k", 80, 24).is_err());
        assert!(build_request("not a url", "k", 80, 24).is_err());
    }

    #[test]
    fn junk_frames_are_skipped() {
        assert!(parse_view("{}").is_none());
        assert!(parse_view("hello").is_none());
    }
}
