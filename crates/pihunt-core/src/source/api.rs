//! The pi.delivery web API: 50 trillion hex digits, a thousand at a time.

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::source::DigitSource;

const API_URL: &str = "https://api.pi.delivery/v1/pi";

/// Documented maximum digits per request.
const PAGE_DIGITS: usize = 1000;

const TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Deserialize)]
struct DigitsResponse {
    content: String,
}

fn agent() -> ureq::Agent {
    let config = ureq::Agent::config_builder()
        .timeout_global(Some(TIMEOUT))
        .build();
    config.into()
}

fn fetch_page(agent: &ureq::Agent, start: u64, digits: usize) -> Result<String> {
    let url = format!("{API_URL}?start={start}&numberOfDigits={digits}&radix=16");
    let mut resp = agent.get(&url).call()?;
    let page: DigitsResponse = resp.body_mut().read_json()?;
    Ok(page.content)
}

/// Unbounded digit source backed by the web API. Position 1 is the first
/// fractional digit, so the stream begins exactly where a file source
/// does after its "3." prefix.
pub struct ApiSource {
    agent: ureq::Agent,
    next_start: u64,
}

impl ApiSource {
    pub fn new() -> Self {
        Self {
            agent: agent(),
            next_start: 1,
        }
    }
}

impl Default for ApiSource {
    fn default() -> Self {
        Self::new()
    }
}

impl DigitSource for ApiSource {
    fn next_batch(&mut self) -> Result<Option<Vec<u8>>> {
        let content = fetch_page(&self.agent, self.next_start, PAGE_DIGITS)?;
        if content.is_empty() {
            warn!(
                "digit service returned an empty page at position {}; treating as exhausted",
                self.next_start
            );
            return Ok(None);
        }
        // Advance by what actually came back; a short page must not skip
        // digits.
        self.next_start += content.len() as u64;
        debug!("fetched {} digits, next start {}", content.len(), self.next_start);
        Ok(Some(content.into_bytes()))
    }
}

/// Fetch exactly `count` digits starting at the 1-indexed position
/// `start`, paging as needed.
pub fn fetch_digits(start: u64, count: usize) -> Result<String> {
    let agent = agent();
    let mut result = String::with_capacity(count);
    let mut position = start;
    while result.len() < count {
        let wanted = (count - result.len()).min(PAGE_DIGITS);
        let content = fetch_page(&agent, position, wanted)?;
        if content.is_empty() {
            return Err(Error::Api(format!(
                "no digits returned at position {position}"
            )));
        }
        position += content.len() as u64;
        result.push_str(&content);
    }
    result.truncate(count);
    Ok(result)
}
