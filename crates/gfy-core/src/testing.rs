//! Scripted [`HttpSession`] for unit tests.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::http::{HttpMethod, HttpSession, Request, Response};

/// Answers requests from a table keyed by (method, url) and records every request.
///
/// Requests without a scripted answer fail with a transport error, which is
/// what an unreachable host looks like to the strategies.
#[derive(Default)]
pub(crate) struct FakeSession {
    routes: HashMap<(HttpMethod, String), Vec<Response>>,
    sent: RefCell<Vec<Request>>,
    served: RefCell<HashMap<(HttpMethod, String), usize>>,
}

impl FakeSession {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Scripts a response; repeated calls for the same route are served in order,
    /// the last one repeating.
    pub(crate) fn route(mut self, method: HttpMethod, url: &str, response: Response) -> Self {
        self.routes
            .entry((method, url.to_string()))
            .or_default()
            .push(response);
        self
    }

    pub(crate) fn requests(&self) -> Vec<Request> {
        self.sent.borrow().clone()
    }

    pub(crate) fn count(&self, method: HttpMethod, url: &str) -> usize {
        self.sent
            .borrow()
            .iter()
            .filter(|r| r.method == method && r.url == url)
            .count()
    }
}

impl HttpSession for FakeSession {
    fn send(&self, request: &Request) -> Result<Response> {
        self.sent.borrow_mut().push(request.clone());
        let key = (request.method, request.url.clone());
        let Some(responses) = self.routes.get(&key) else {
            return Err(Error::Transport {
                method: request.method.as_str(),
                url: request.url.clone(),
                message: "no route".to_string(),
            });
        };
        let mut served = self.served.borrow_mut();
        let n = served.entry(key).or_insert(0);
        let response = responses[(*n).min(responses.len() - 1)].clone();
        *n += 1;
        Ok(response)
    }
}
