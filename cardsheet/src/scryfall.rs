use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::decklist::DecklistEntry;
use crate::scryfall_client::ScryfallClient;

const SCRYFALL_SEARCH: &str = "https://api.scryfall.com/cards/search";

fn encode_card_name(name: &str) -> String {
    name.replace(' ', "+").replace("//", "")
}

#[derive(Serialize, Deserialize)]
pub struct ScryfallSearchAnswer {
    pub object: String,
    pub total_cards: i32,
    pub has_more: bool,
    pub next_page: Option<String>,
    pub data: Vec<serde_json::Map<String, serde_json::Value>>,
}

/// Search for all prints of a card by name, restricted to the entry's set
/// when one was given.
pub fn search_unique_prints(
    entry: &DecklistEntry,
    client: &ScryfallClient,
) -> Option<Vec<serde_json::Map<String, serde_json::Value>>> {
    let mut uri = format!("{}?q={}", SCRYFALL_SEARCH, encode_card_name(&entry.name));
    if let Some(set) = &entry.set {
        uri += &format!("+e%3A{}", set);
    }
    uri += "+unique%3Aprints";
    match client.call(&uri) {
        Ok(response) => match response.json::<ScryfallSearchAnswer>() {
            Ok(answer) => Some(answer.data),
            Err(deserialization_error) => {
                info!(
                    "error in deserializing scryfall search answer for {}: {}",
                    entry.name, deserialization_error
                );
                None
            }
        },
        Err(e) => {
            info!("error in scryfall search request for {}: {}", entry.name, e);
            None
        }
    }
}

/// Pick the first print in API order that passes the entry's optional
/// collector number and promo filters, and return its png image uris, one
/// per card face.
pub fn select_print_uris(
    entry: &DecklistEntry,
    prints: &[serde_json::Map<String, serde_json::Value>],
) -> Option<Vec<String>> {
    for print in prints {
        if let Some(wanted) = &entry.collector_number {
            if print.get("collector_number").and_then(|v| v.as_str()) != Some(wanted.as_str()) {
                continue;
            }
        }
        if entry.promo && print.get("promo").and_then(|v| v.as_bool()) != Some(true) {
            continue;
        }
        match face_png_uris(print) {
            Some(uris) => return Some(uris),
            None => {
                warn!(
                    "print of {} has no usable image uris: {:?}",
                    entry.name,
                    print.get("id")
                );
            }
        }
    }
    None
}

fn face_png_uris(print: &serde_json::Map<String, serde_json::Value>) -> Option<Vec<String>> {
    if let Some(uris) = print.get("image_uris") {
        return Some(vec![uris.get("png")?.as_str()?.to_string()]);
    }
    let faces = print.get("card_faces")?.as_array()?;
    let mut pngs = Vec::with_capacity(faces.len());
    for face in faces {
        pngs.push(face.get("image_uris")?.get("png")?.as_str()?.to_string());
    }
    Some(pngs)
}

/// Pending artwork downloads for one packing run.
///
/// The selected uris are collected here and handed to the image source by
/// value instead of accumulating in ambient state.
#[derive(Debug, Default)]
pub struct ImageRequests {
    uris: Vec<String>,
}

impl ImageRequests {
    pub fn new() -> ImageRequests {
        ImageRequests { uris: Vec::new() }
    }

    /// Queue the entry's selected print, once per requested copy. Returns
    /// false when no print passed the entry's filters.
    pub fn queue_entry(
        &mut self,
        entry: &DecklistEntry,
        prints: &[serde_json::Map<String, serde_json::Value>],
    ) -> bool {
        match select_print_uris(entry, prints) {
            Some(uris) => {
                for _ in 0..entry.multiple {
                    self.uris.extend(uris.iter().cloned());
                }
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.uris.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uris.is_empty()
    }

    pub fn into_uris(self) -> Vec<String> {
        self.uris
    }
}
