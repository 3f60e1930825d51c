// Canned HTTP responses for exercising the real client.
#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};

pub struct Canned {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl Canned {
    pub fn json(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: "application/json",
            body: body.as_bytes().to_vec(),
        }
    }

    pub fn png(body: Vec<u8>) -> Self {
        Self {
            status: 200,
            content_type: "image/png",
            body,
        }
    }
}

/// Serve `responses` in order, one per connection. The handle yields the
/// request lines that were received.
pub fn serve(responses: Vec<Canned>) -> (String, JoinHandle<Vec<String>>) {
    serve_with(|_| responses)
}

/// Like [`serve`], for bodies that need to link back to the server itself.
pub fn serve_with<F>(make: F) -> (String, JoinHandle<Vec<String>>)
where
    F: FnOnce(&str) -> Vec<Canned>,
{
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let responses = make(&base);

    let handle = thread::spawn(move || {
        let mut seen = Vec::new();
        for canned in responses {
            let (mut stream, _) = listener.accept().unwrap();

            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let request = String::from_utf8_lossy(&request).to_string();
            seen.push(request.lines().next().unwrap_or_default().to_string());

            let head = format!(
                "HTTP/1.1 {} Canned\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                canned.status,
                canned.content_type,
                canned.body.len()
            );
            stream.write_all(head.as_bytes()).unwrap();
            stream.write_all(&canned.body).unwrap();
            stream.flush().unwrap();
        }
        seen
    });

    (base, handle)
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([10, 20, 30])));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}
