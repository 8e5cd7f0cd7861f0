//! Test utilities for adoption-scraper
//!
//! A scripted [`PageFetcher`] plus HTML builders for listing pages, so the
//! crawler and fetcher can be exercised without the network.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::infrastructure::{FetchError, FetchedPage, PageFetcher};

#[derive(Debug, Clone)]
enum Scripted {
    Page { status: u16, body: String },
    TransportError,
}

#[derive(Debug, Default)]
struct FakeState {
    responses: HashMap<String, Scripted>,
    requests: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

/// Scripted fetcher. Unknown URLs answer 404. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct FakeFetcher {
    state: Arc<FakeState>,
    delay: Option<Duration>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    fn script(mut self, url: &str, response: Scripted) -> Self {
        Arc::get_mut(&mut self.state)
            .expect("script responses before cloning the fetcher")
            .responses
            .insert(url.to_string(), response);
        self
    }

    pub fn with_page(self, url: &str, status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        self.script(url, Scripted::Page { status, body })
    }

    pub fn with_transport_error(self, url: &str) -> Self {
        self.script(url, Scripted::TransportError)
    }

    /// Hold every request open for `delay` before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// URLs requested so far, in request order
    pub fn requests(&self) -> Vec<String> {
        self.state.requests.lock().unwrap().clone()
    }

    /// Highest number of requests that were awaiting a response at once
    pub fn max_in_flight(&self) -> usize {
        self.state.max_in_flight.load(Ordering::SeqCst)
    }
}

/// A real `reqwest` error, produced without touching the network
pub fn transport_error(url: &str) -> FetchError {
    let source = reqwest::Client::new()
        .get("not a url")
        .build()
        .expect_err("relative URL must be rejected");
    FetchError::Transport {
        url: url.to_string(),
        source,
    }
}

#[async_trait]
impl PageFetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        self.state.requests.lock().unwrap().push(url.to_string());

        let now = self.state.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.state.in_flight.fetch_sub(1, Ordering::SeqCst);

        match self.state.responses.get(url) {
            Some(Scripted::Page { status, body }) => Ok(FetchedPage::new(url, *status, body.clone())),
            Some(Scripted::TransportError) => Err(transport_error(url)),
            None => Ok(FetchedPage::new(url, 404, "")),
        }
    }
}

/// One listing card with every field present; `href` may be relative
pub fn listing_card_html(pet_id: &str, href: &str, name: &str) -> String {
    format!(
        r#"<div class="animalCard">
             <a class="animalCard__link" href="{href}">
               <img class="animalCard__photo" data-src="https://dogcat.com.ua/img/{pet_id}.jpg">
             </a>
             <h5>{name}</h5>
             <p>Хлопчик, 1 місяць</p>
             <button onclick="setPopupData({pet_id}, '{name}')">Adopt</button>
           </div>"#
    )
}

/// A listing page holding `cards` and an optional enabled next link
pub fn listing_page_html(cards: &[String], next_href: Option<&str>) -> String {
    let next = next_href.map_or_else(
        || r#"<a class="next disabled">&raquo;</a>"#.to_string(),
        |href| format!(r#"<a class="next" href="{href}">&raquo;</a>"#),
    );
    format!(
        "<html><body><div class=\"cards\">{}</div><nav>{}</nav></body></html>",
        cards.concat(),
        next
    )
}

/// A profile page with the detail container
pub fn profile_page_html(name: &str) -> String {
    format!(
        r#"<html><body><div class="adoptionProfilePage">
             <div class="profile-head"><h3>{name}</h3><p class="body-secondary">1 місяць, Хлопчик</p></div>
           </div></body></html>"#
    )
}
