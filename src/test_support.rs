//! One-shot HTTP responder standing in for the provider and the template host.

use std::{
    io::{Read, Write},
    net::TcpListener,
    thread::{self, JoinHandle},
};

pub struct Request {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Request {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

pub struct Responder {
    pub url: String,
    handle: JoinHandle<Option<Request>>,
}

impl Responder {
    /// Answers the first connection with `status` and `body`, then stops listening.
    pub fn start(status: u16, body: &str) -> Self {
        Self::start_raw(&format!(
            "HTTP/1.1 {} Test\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        ))
    }

    /// Writes `response` as-is, which allows malformed or truncated replies.
    pub fn start_raw(response: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let response = response.to_string();

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().ok()?;
            let request = read_request(&mut stream);

            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();

            Some(request)
        });

        Self { url, handle }
    }

    /// The request the responder received. Blocks until it has answered.
    pub fn request(self) -> Request {
        self.handle
            .join()
            .unwrap()
            .expect("responder never received a request")
    }
}

fn read_request(stream: &mut impl Read) -> Request {
    let mut header_buf = Vec::new();
    let mut byte = [0u8; 1];
    while !header_buf.ends_with(b"\r\n\r\n") {
        if stream.read(&mut byte).unwrap() == 0 {
            break;
        }
        header_buf.push(byte[0]);
    }

    let mut parsed_headers = [httparse::EMPTY_HEADER; 64];
    let mut req = httparse::Request::new(&mut parsed_headers);
    req.parse(&header_buf).unwrap();

    let headers: Vec<(String, String)> = req
        .headers
        .iter()
        .map(|h| {
            (
                h.name.to_string(),
                String::from_utf8_lossy(h.value).to_string(),
            )
        })
        .collect();
    let content_length = headers
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case("Content-Length"))
        .and_then(|(_, v)| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    let mut body = vec![0u8; content_length];
    stream.read_exact(&mut body).unwrap();

    Request {
        method: req.method.unwrap_or("").to_string(),
        path: req.path.unwrap_or("/").to_string(),
        headers,
        body,
    }
}
