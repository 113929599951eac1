use std::sync::Mutex;
use std::time::{Duration, Instant};

use lazy_static::lazy_static;
use log::debug;

// headers required according to https://scryfall.com/docs/api/
const USER_AGENT: &str = "cardsheet/0.1";
const ACCEPT: &str = "*/*";
const SCRYFALL_COOLDOWN: Duration = Duration::from_millis(100);

// the lock is only held to compute when the next call may go out
lazy_static! {
    static ref NEXT_SCRYFALL_CALL: Mutex<Instant> = Mutex::new(Instant::now());
}

pub struct ScryfallClient {
    client: reqwest::blocking::Client,
}

impl ScryfallClient {
    pub fn new() -> ScryfallClient {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static(USER_AGENT),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static(ACCEPT),
        );
        ScryfallClient {
            client: reqwest::blocking::Client::builder()
                .default_headers(headers)
                .build()
                .unwrap(),
        }
    }

    /// Call the Scryfall API, sleeping first if the previous call was less
    /// than the cooldown ago.
    pub fn call(&self, uri: &str) -> Result<reqwest::blocking::Response, reqwest::Error> {
        let scheduled = {
            let mut next = NEXT_SCRYFALL_CALL.lock().unwrap();
            let at = (*next).max(Instant::now());
            *next = at + SCRYFALL_COOLDOWN;
            at
        };
        let wait = scheduled.saturating_duration_since(Instant::now());
        if !wait.is_zero() {
            std::thread::sleep(wait);
        }
        debug!("calling scryfall API: {}", uri);
        self.client.get(uri).send()
    }
}

impl Default for ScryfallClient {
    fn default() -> Self {
        Self::new()
    }
}
