use std::path::PathBuf;

use clap::Parser;
use itertools::Itertools;
use log::{error, info, warn};

use cardsheet::{
    CardImageSource, ImageRequests, PageSetup, ScryfallClient, SheetWriter, folder_image_paths,
    images_to_sheet, parse_decklist, search_unique_prints,
};

/// Resolve a decklist against the Scryfall API and lay the card images out on
/// printable png sheets.
///
/// The decklist has one card per line in the format
/// AMOUNT NAME (SET) COLLECTOR_NUMBER, where amount, set and collector number
/// are optional and lines starting with // are skipped.
#[derive(Parser, Debug)]
struct Opts {
    /// decklist input filename
    decklist: PathBuf,
    /// directory the print sheets are written to
    #[arg(long, default_value = "mtgcardout")]
    out_dir: PathBuf,
    /// optional directory with additional card images appended to the run
    #[arg(long)]
    images_dir: Option<PathBuf>,
    /// physical page width in mm
    #[arg(long, default_value_t = cardsheet::A4_SIZE_MM.0)]
    page_width_mm: f64,
    /// physical page height in mm
    #[arg(long, default_value_t = cardsheet::A4_SIZE_MM.1)]
    page_height_mm: f64,
    /// physical card width in mm
    #[arg(long, default_value_t = cardsheet::CARD_SIZE_MM.0)]
    card_width_mm: f64,
    /// physical card height in mm
    #[arg(long, default_value_t = cardsheet::CARD_SIZE_MM.1)]
    card_height_mm: f64,
    /// card width in pixels; together with the physical card width this fixes
    /// the pixel density of the page
    #[arg(long, default_value_t = cardsheet::CARD_SIZE_PX.0)]
    card_width_px: u32,
    /// card height in pixels
    #[arg(long, default_value_t = cardsheet::CARD_SIZE_PX.1)]
    card_height_px: u32,
    /// left page margin in mm
    #[arg(long, default_value_t = cardsheet::PAGE_LEFT_MARGIN_MM)]
    left_margin_mm: f64,
    /// top page margin in mm
    #[arg(long, default_value_t = cardsheet::PAGE_TOP_MARGIN_MM)]
    top_margin_mm: f64,
    /// margin between neighboring cards in mm
    #[arg(long, default_value_t = cardsheet::CARD_SPACING_MM)]
    spacing_mm: f64,
    /// keep the edge margin inside the page canvas instead of cropping the
    /// canvas to the printable area
    #[arg(long)]
    include_edge_margin: bool,
}

fn main() {
    env_logger::init();
    let opts = Opts::parse();
    if let Err(e) = run(&opts) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(opts: &Opts) -> Result<(), cardsheet::Error> {
    let setup = PageSetup {
        page_mm: (opts.page_width_mm, opts.page_height_mm),
        card_mm: (opts.card_width_mm, opts.card_height_mm),
        card_px: (opts.card_width_px, opts.card_height_px),
        left_margin_mm: opts.left_margin_mm,
        top_margin_mm: opts.top_margin_mm,
        spacing_mm: opts.spacing_mm,
        include_edge_margin: opts.include_edge_margin,
    };
    let plan = setup.plan()?;
    info!(
        "{}x{} cards per sheet on a {}x{}px canvas",
        plan.cards_across, plan.cards_down, plan.canvas_width, plan.canvas_height
    );

    let decklist = std::fs::read_to_string(&opts.decklist)?;
    let client = ScryfallClient::new();
    let mut requests = ImageRequests::new();
    for line in parse_decklist(&decklist) {
        let Some(entry) = line.as_entry() else {
            continue;
        };
        match search_unique_prints(&entry, &client) {
            Some(prints) => {
                if !requests.queue_entry(&entry, &prints) {
                    warn!("no print of {} matched the requested filters", entry.name);
                }
            }
            None => warn!("scryfall search for {} failed", entry.name),
        }
    }

    let folder_images = match &opts.images_dir {
        Some(dir) => match folder_image_paths(dir) {
            Ok(paths) => paths,
            Err(e) => {
                warn!("could not read images from {}: {}", dir.display(), e);
                Vec::new()
            }
        },
        None => Vec::new(),
    };
    info!(
        "{} remote card images queued, {} local card images found",
        requests.len(),
        folder_images.len()
    );

    std::fs::create_dir_all(&opts.out_dir)?;
    let mut writer = SheetWriter::new(&opts.out_dir);
    let images = CardImageSource::new(requests.into_uris(), folder_images, setup.card_px, &client);
    let mut sheets = 0;
    for sheet in images.batching(|it| images_to_sheet(it, &plan)) {
        let path = writer.write(&sheet)?;
        info!("wrote {}", path.display());
        sheets += 1;
    }
    info!("done, {} sheets written", sheets);
    Ok(())
}
