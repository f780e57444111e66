// ============================================================================
// Outils de test : faux serveur de cotations
// ============================================================================
// Un TcpListener tokio local qui répond du JSON au format chart v8.
// Évite tout appel réseau réel dans les tests.
// ============================================================================

use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Corps JSON minimal au format chart v8
///
/// `price` est inséré tel quel : "185.2" (nombre) ou "\"185.2\"" (texte)
pub fn chart_body(symbol: &str, price: &str) -> String {
    format!(
        r#"{{"chart":{{"result":[{{"meta":{{"symbol":"{symbol}","shortName":"{symbol} Inc.","regularMarketPrice":{price},"currency":"USD"}},"timestamp":[1700000000],"indicators":{{"quote":[{{}}]}}}}],"error":null}}}}"#
    )
}

/// Lance un serveur HTTP local et retourne son URL de base
///
/// `respond` reçoit le chemin de la requête et retourne (status, body)
pub async fn spawn_quote_server<F>(respond: F) -> String
where
    F: Fn(&str) -> (u16, String) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let respond = Arc::new(respond);

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let respond = respond.clone();
            tokio::spawn(async move {
                let mut request = Vec::new();
                let mut chunk = [0u8; 1024];
                loop {
                    let n = socket.read(&mut chunk).await.unwrap_or(0);
                    if n == 0 {
                        break;
                    }
                    request.extend_from_slice(&chunk[..n]);
                    if request.windows(4).any(|w| w == b"\r\n\r\n") {
                        break;
                    }
                }

                let request = String::from_utf8_lossy(&request);
                let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();
                let (status, body) = respond(&path);

                let response = format!(
                    "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    if status == 200 { "OK" } else { "Error" },
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    format!("http://{}", addr)
}

/// Serveur qui accepte les connexions sans jamais répondre
pub async fn spawn_silent_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        // Les sockets restent ouvertes tant que le serveur tourne
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    format!("http://{}", addr)
}
