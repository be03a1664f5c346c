use std::time::Duration;

use log::debug;
use thiserror::Error;

/// Echo services queried in order until one yields an address.
pub const ECHO_ENDPOINTS: &[&str] = &[
    "http://ifconfig.me/ip",
    "http://ipecho.net/plain",
    "http://myexternalip.com/raw",
];

/// Timeout applied to each echo-endpoint request.
const ECHO_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("every IP echo endpoint failed; cannot determine the public address")]
    Exhausted,
}

/// Determines the public IPv4 address by querying `endpoints` in order.
///
/// Each endpoint gets exactly one attempt with a short timeout; the first response body that
/// contains a dotted-quad substring wins and later endpoints are never contacted. The list order
/// is fixed, never randomized. Exhausting the list is fatal to the caller's run.
pub async fn resolve(client: &reqwest::Client, endpoints: &[&str]) -> Result<String, ResolveError> {
    for url in endpoints {
        let response = match client.get(*url).timeout(ECHO_TIMEOUT).send().await {
            Ok(response) => response,
            Err(err) => {
                debug!("echo endpoint {url} unreachable: {err}");
                continue;
            },
        };

        if !response.status().is_success() {
            debug!("echo endpoint {url} answered {}", response.status());
            continue;
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => {
                debug!("echo endpoint {url} body unreadable: {err}");
                continue;
            },
        };

        match first_dotted_quad(&body) {
            Some(ip) => {
                debug!("echo endpoint {url} reports {ip}");
                return Ok(ip.to_owned());
            },
            // A reachable endpoint whose body holds no address counts as a failed endpoint too.
            None => debug!("echo endpoint {url} returned no address in {body:?}"),
        }
    }

    Err(ResolveError::Exhausted)
}

/// Extracts the first dotted-quad-shaped substring (`d+.d+.d+.d+`) from `text`.
///
/// Octet ranges are intentionally not validated: the extracted string is compared verbatim
/// against provider-held values, so tightening the match here would change which records get
/// rewritten.
pub fn first_dotted_quad(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    let mut start = 0;

    while start < bytes.len() {
        if !bytes[start].is_ascii_digit() {
            start += 1;
            continue;
        }

        if let Some(end) = quad_end(bytes, start) {
            return Some(&text[start..end]);
        }

        // No match from here; skip the rest of this digit run before rescanning.
        start = digit_run_end(bytes, start);
    }

    None
}

/// End of a `d+(.d+){3}` match starting at `start`, if there is one.
fn quad_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut end = digit_run_end(bytes, start);
    for _ in 0..3 {
        if bytes.get(end) != Some(&b'.') {
            return None;
        }
        let run = digit_run_end(bytes, end + 1);
        if run == end + 1 {
            return None;
        }
        end = run;
    }
    Some(end)
}

fn digit_run_end(bytes: &[u8], start: usize) -> usize {
    let mut i = start;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    i
}
