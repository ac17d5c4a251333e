//! Minimal local HTTP stub standing in for the analytics endpoint.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

const BULLISH_BODY: &str = r#"{"adx":40.0,"macd":5.0,"rsi":60.0,"momentum":1.5,"ema5":105.0,"ema10":104.0,"ema20":103.0,"ema50":102.0,"ema100":101.0,"ema200":100.0,"vwma":99.0,"close":100.0,"win_signals":60,"loss_signals":40}"#;

/// Serve a strong-trend snapshot for every symbol, and HTTP 500 for any
/// request whose query mentions `FAIL`. Returns the stub's base URL.
pub(crate) async fn spawn_stub() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(async move {
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                loop {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => {
                            request.extend_from_slice(&buf[..n]);
                            if request.windows(4).any(|w| w == b"\r\n\r\n") {
                                break;
                            }
                        }
                    }
                }

                let request = String::from_utf8_lossy(&request);
                let response = if request.contains("FAIL") {
                    "HTTP/1.1 500 Internal Server Error\r\ncontent-length: 0\r\nconnection: close\r\n\r\n"
                        .to_string()
                } else {
                    format!(
                        "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                        BULLISH_BODY.len(),
                        BULLISH_BODY
                    )
                };
                let _ = socket.write_all(response.as_bytes()).await;
            });
        }
    });

    format!("http://{addr}/")
}
