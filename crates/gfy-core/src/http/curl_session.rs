//! libcurl-backed [`HttpSession`].

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;
use std::str;
use std::time::Duration;

use super::parse::parse_headers;
use super::{HttpMethod, HttpSession, Request, Response};
use crate::error::{Error, Result};

/// Timeouts and identity applied to every request of a [`CurlSession`].
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub connect_timeout: Duration,
    pub timeout: Duration,
    pub user_agent: Option<String>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(15),
            timeout: Duration::from_secs(30),
            user_agent: None,
        }
    }
}

/// Blocking session using one `curl::easy::Easy` handle per request.
///
/// Follows redirects. Runs in the current thread.
#[derive(Debug, Clone, Default)]
pub struct CurlSession {
    options: SessionOptions,
}

impl CurlSession {
    pub fn new(options: SessionOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    fn prepare(&self, request: &Request) -> std::result::Result<curl::easy::Easy, curl::Error> {
        let mut easy = curl::easy::Easy::new();
        easy.url(&request.url)?;
        match request.method {
            HttpMethod::Get => easy.get(true)?,
            HttpMethod::Head => easy.nobody(true)?,
            HttpMethod::Post => {
                easy.post(true)?;
                easy.post_fields_copy(request.body.as_deref().unwrap_or_default())?;
            }
        }
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.connect_timeout(self.options.connect_timeout)?;
        easy.timeout(self.options.timeout)?;
        if let Some(ua) = &self.options.user_agent {
            easy.useragent(ua)?;
        }

        // Build curl list for custom headers (e.g. "Name: value").
        if !request.headers.is_empty() {
            let mut list = curl::easy::List::new();
            for (k, v) in &request.headers {
                list.append(&format!("{}: {}", k.trim(), v.trim()))?;
            }
            easy.http_headers(list)?;
        }
        Ok(easy)
    }

    fn perform(&self, request: &Request) -> std::result::Result<Response, curl::Error> {
        let mut header_lines: Vec<String> = Vec::new();
        let mut body: Vec<u8> = Vec::new();

        let mut easy = self.prepare(request)?;
        {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    header_lines.push(s.trim_end().to_string());
                }
                true
            })?;
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let status = easy.response_code()?;
        Ok(Response {
            status,
            headers: parse_headers(&header_lines),
            body,
        })
    }

    /// Streams a GET response body into `path`, returning the number of bytes written.
    ///
    /// The file is created (or truncated) before the transfer starts and removed
    /// again on any error. Responses of 400 and above fail before a body byte is
    /// written; every non-2xx status is reported as [`Error::Fetch`].
    pub fn download_to(&self, url: &str, path: &Path) -> Result<u64> {
        let mut file = File::create(path)?;
        let result = self.stream_into(url, &mut file);
        if result.is_err() {
            drop(file);
            if let Err(e) = fs::remove_file(path) {
                tracing::warn!("could not remove {}: {}", path.display(), e);
            }
        }
        result
    }

    fn stream_into(&self, url: &str, file: &mut File) -> Result<u64> {
        let request = Request::get(url);
        let mut written = 0u64;
        let mut write_err: Option<io::Error> = None;

        let mut easy = self
            .prepare(&request)
            .map_err(|e| transport(&request, e))?;
        // Downloads can take far longer than an API call.
        easy.timeout(Duration::ZERO)
            .map_err(|e| transport(&request, e))?;
        easy.low_speed_limit(1024)
            .map_err(|e| transport(&request, e))?;
        easy.low_speed_time(Duration::from_secs(60))
            .map_err(|e| transport(&request, e))?;
        easy.fail_on_error(true)
            .map_err(|e| transport(&request, e))?;

        let performed = {
            let mut transfer = easy.transfer();
            transfer
                .write_function(|data| match file.write_all(data) {
                    Ok(()) => {
                        written += data.len() as u64;
                        Ok(data.len())
                    }
                    Err(e) => {
                        tracing::warn!("download write failed: {}", e);
                        write_err = Some(e);
                        Ok(0) // abort transfer
                    }
                })
                .map_err(|e| transport(&request, e))?;
            transfer.perform()
        };

        if let Some(e) = write_err {
            return Err(Error::Io(e));
        }
        let code = easy.response_code().unwrap_or(0);
        if let Err(e) = performed {
            if code >= 400 {
                return Err(fetch_status(url, code));
            }
            return Err(transport(&request, e));
        }
        if !(200..300).contains(&code) {
            return Err(fetch_status(url, code));
        }
        file.flush()?;
        Ok(written)
    }
}

impl HttpSession for CurlSession {
    fn send(&self, request: &Request) -> Result<Response> {
        tracing::debug!(method = %request.method, url = %request.url, "sending request");
        let response = self
            .perform(request)
            .map_err(|e| transport(request, e))?;
        tracing::debug!(status = response.status, url = %request.url, "received response");
        Ok(response)
    }
}

fn fetch_status(url: &str, code: u32) -> Error {
    Error::Fetch(format!("GET {} returned HTTP {}", url, code))
}

fn transport(request: &Request, e: curl::Error) -> Error {
    Error::Transport {
        method: request.method.as_str(),
        url: request.url.clone(),
        message: e.to_string(),
    }
}
