//! Access log lines for dispatched requests
//!
//! One line per request, written after the router has finalized the response.
//! The `logging.access_log_format` setting selects the layout; names other than
//! `common` and `json` give the combined layout.

use std::net::SocketAddr;
use std::time::Duration;

use chrono::{DateTime, Local};
use serde_json::json;

use crate::http::{version_str, Request, Response};

/// Line layout of the access log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessLogFormat {
    /// Common layout followed by quoted referer and user agent
    Combined,
    /// `peer - - [time] "request" status bytes`
    Common,
    /// One JSON object per line, including dispatch time
    Json,
}

impl AccessLogFormat {
    pub fn from_name(name: &str) -> Self {
        match name {
            "common" => Self::Common,
            "json" => Self::Json,
            _ => Self::Combined,
        }
    }
}

/// What the access log records about one dispatch
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    pub peer: String,
    pub time: DateTime<Local>,
    pub method: String,
    /// Path as received, before percent decoding
    pub path: String,
    pub query: Option<String>,
    pub http_version: &'static str,
    pub status: u16,
    pub content_type: String,
    pub body_bytes: usize,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
    pub dispatch_time: Duration,
}

impl AccessLogEntry {
    /// Capture a finished request/response pair, stamped with the current time
    pub fn record(peer: SocketAddr, req: &Request, resp: &Response, dispatch_time: Duration) -> Self {
        Self {
            peer: peer.ip().to_string(),
            time: Local::now(),
            method: req.method().to_string(),
            path: req.path().to_string(),
            query: req.uri().query().map(ToString::to_string),
            http_version: version_str(req.version()),
            status: resp.status().as_u16(),
            content_type: resp.content_type().to_string(),
            body_bytes: resp.content_length(),
            referer: req.header("referer").map(ToString::to_string),
            user_agent: req.header("user-agent").map(ToString::to_string),
            dispatch_time,
        }
    }

    pub fn format(&self, format: AccessLogFormat) -> String {
        match format {
            AccessLogFormat::Combined => format!(
                "{} \"{}\" \"{}\"",
                self.common_line(),
                self.referer.as_deref().unwrap_or("-"),
                self.user_agent.as_deref().unwrap_or("-"),
            ),
            AccessLogFormat::Common => self.common_line(),
            AccessLogFormat::Json => self.json_line(),
        }
    }

    fn target(&self) -> String {
        match &self.query {
            Some(query) => format!("{}?{query}", self.path),
            None => self.path.clone(),
        }
    }

    fn common_line(&self) -> String {
        format!(
            "{} - - [{}] \"{} {} {}\" {} {}",
            self.peer,
            self.time.format("%d/%b/%Y:%H:%M:%S %z"),
            self.method,
            self.target(),
            self.http_version,
            self.status,
            self.body_bytes,
        )
    }

    fn json_line(&self) -> String {
        json!({
            "peer": self.peer,
            "time": self.time.to_rfc3339(),
            "method": self.method,
            "path": self.path,
            "query": self.query,
            "version": self.http_version,
            "status": self.status,
            "content_type": self.content_type,
            "bytes": self.body_bytes,
            "referer": self.referer,
            "user_agent": self.user_agent,
            "dispatch_us": u64::try_from(self.dispatch_time.as_micros()).unwrap_or(u64::MAX),
        })
        .to_string()
    }
}
