use thiserror::Error;

mod decklist;
pub use crate::decklist::{DecklistEntry, ParsedDecklistLine, parse_decklist, parse_line};

mod images;
pub use crate::images::{CardImageSource, fetch_image, folder_image_paths};

mod layout;
pub use crate::layout::{LayoutPlan, PageSetup};

mod scryfall;
pub use crate::scryfall::{
    ImageRequests, ScryfallSearchAnswer, search_unique_prints, select_print_uris,
};

mod scryfall_client;
pub use crate::scryfall_client::ScryfallClient;

mod sheet;
pub use crate::sheet::{SheetWriter, images_to_sheet};

pub const A4_SIZE_MM: (f64, f64) = (210.0, 297.0);
pub const CARD_SIZE_MM: (f64, f64) = (63.0, 89.0);
pub const CARD_SIZE_PX: (u32, u32) = (745, 1040);
pub const PAGE_LEFT_MARGIN_MM: f64 = 5.0;
pub const PAGE_TOP_MARGIN_MM: f64 = 5.0;
pub const CARD_SPACING_MM: f64 = 1.5;

#[derive(Debug, Error)]
pub enum Error {
    #[error("page canvas is empty ({width}x{height}px), check page size and margins")]
    EmptyCanvas { width: i64, height: i64 },
    #[error(
        "a {card_width}x{card_height}px card does not fit on a {canvas_width}x{canvas_height}px page canvas"
    )]
    CardTooLarge {
        card_width: u32,
        card_height: u32,
        canvas_width: u32,
        canvas_height: u32,
    },
    #[error("writing sheet failed: {0}")]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
