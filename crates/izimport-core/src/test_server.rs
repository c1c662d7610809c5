//! One-shot HTTP responder for exercising the network clients offline.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;

/// Serve `status` (e.g. `"500 Internal Server Error"`) with `body` to the
/// next `requests` connections. Returns the base URL to point a client at.
pub(crate) fn serve(status: &str, body: &str, requests: usize) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind local listener");
    let addr = listener.local_addr().expect("local address");
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );

    thread::spawn(move || {
        for stream in listener.incoming().take(requests) {
            let Ok(mut stream) = stream else { continue };
            let mut request = [0u8; 4096];
            let _ = stream.read(&mut request);
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.flush();
        }
    });

    format!("http://{addr}/")
}

/// A local address nothing listens on.
pub(crate) const REFUSED_URL: &str = "http://127.0.0.1:1/";
