// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared helpers: a sandboxed `hc` invocation and a canned HTTP backend.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

use assert_cmd::Command;
use tempfile::TempDir;

/// `hc` with a private config dir and no inherited `HC_*` settings.
pub fn cli() -> Spec {
    let home = tempfile::tempdir().unwrap();
    let mut cmd = Command::cargo_bin("hc").unwrap();
    for key in [
        "HC_CONFIG",
        "HC_BASE_URL",
        "HC_PUSH_URL",
        "HC_AUTH_TOKEN",
        "HC_POLL_INTERVAL_MS",
        "HC_FAST_POLL_INTERVAL_MS",
        "HC_REQUEST_TIMEOUT_MS",
        "HC_LOG_DIR",
        "HC_LOG",
        "COLOR",
    ] {
        cmd.env_remove(key);
    }
    cmd.env("HOME", home.path()).env("XDG_CONFIG_HOME", home.path()).env("NO_COLOR", "1");
    Spec { cmd, _home: home }
}

pub struct Spec {
    cmd: Command,
    _home: TempDir,
}

impl Spec {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.cmd.env(key, value);
        self
    }

    /// Point at `backend` with a token.
    pub fn against(self, backend: &Backend) -> Self {
        let addr = backend.addr.clone();
        self.env("HC_BASE_URL", &addr).env("HC_AUTH_TOKEN", "secret")
    }

    fn run(mut self) -> Output {
        let out = self.cmd.output().unwrap();
        Output {
            stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
            code: out.status.code(),
        }
    }

    pub fn passes(self) -> Output {
        let out = self.run();
        assert_eq!(
            out.code,
            Some(0),
            "expected success\nstdout:\n{}\nstderr:\n{}",
            out.stdout,
            out.stderr
        );
        out
    }

    pub fn fails(self) -> Output {
        let out = self.run();
        assert_ne!(out.code, Some(0), "expected failure\nstdout:\n{}", out.stdout);
        out
    }
}

pub struct Output {
    pub stdout: String,
    pub stderr: String,
    pub code: Option<i32>,
}

impl Output {
    pub fn stdout_has(self, needle: &str) -> Self {
        assert!(self.stdout.contains(needle), "stdout lacks {needle:?}:\n{}", self.stdout);
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        assert!(self.stderr.contains(needle), "stderr lacks {needle:?}:\n{}", self.stderr);
        self
    }

    pub fn code_is(self, code: i32) -> Self {
        assert_eq!(self.code, Some(code), "stderr:\n{}", self.stderr);
        self
    }
}

/// One request as the backend saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seen {
    pub method: String,
    /// Path without the query string
    pub path: String,
    pub authorization: Option<String>,
}

type Route = (&'static str, &'static str, u16, String);

/// Minimal HTTP backend answering from a fixed route table.
pub struct Backend {
    pub addr: String,
    seen: Arc<Mutex<Vec<Seen>>>,
}

impl Backend {
    /// `routes` are `(method, path, status, body)`; unknown routes get 404.
    pub fn start(routes: Vec<Route>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&seen);
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { break };
                serve(stream, &routes, &log);
            }
        });
        Self { addr, seen }
    }

    pub fn seen(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }
}

fn serve(stream: TcpStream, routes: &[Route], log: &Mutex<Vec<Seen>>) {
    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    if reader.read_line(&mut request_line).is_err() {
        return;
    }
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let target = parts.next().unwrap_or_default();
    let path = target.split('?').next().unwrap_or_default().to_string();

    let mut authorization = None;
    let mut content_length = 0usize;
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).unwrap_or(0) == 0 || line == "\r\n" {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            let value = value.trim().to_string();
            match name.to_ascii_lowercase().as_str() {
                "authorization" => authorization = Some(value),
                "content-length" => content_length = value.parse().unwrap_or(0),
                _ => {}
            }
        }
    }
    let mut body = vec![0; content_length];
    let _ = reader.read_exact(&mut body);

    let (status, reply) = routes
        .iter()
        .find(|(m, p, _, _)| *m == method && *p == path)
        .map(|(_, _, status, body)| (*status, body.clone()))
        .unwrap_or((404, "not found".to_string()));
    log.lock().unwrap().push(Seen { method, path, authorization });

    let mut stream = reader.into_inner();
    let _ = write!(
        stream,
        "HTTP/1.1 {status} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{reply}",
        reply.len()
    );
}
