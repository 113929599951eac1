use crate::Error;

/// Physical print setup: page and card sizes, margins, and whether the page
/// canvas spans the full page or only the printable area inside the margins.
///
/// The length-to-pixel conversion factor is fixed by the card reference size
/// (its width in mm and in pixels) and stays constant for a whole run.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSetup {
    pub page_mm: (f64, f64),
    pub card_mm: (f64, f64),
    pub card_px: (u32, u32),
    pub left_margin_mm: f64,
    pub top_margin_mm: f64,
    /// margin between neighboring cards
    pub spacing_mm: f64,
    /// when false, the canvas is the page reduced by twice the left/top
    /// margins, i.e. the edge margins live outside the canvas
    pub include_edge_margin: bool,
}

impl Default for PageSetup {
    fn default() -> Self {
        PageSetup {
            page_mm: crate::A4_SIZE_MM,
            card_mm: crate::CARD_SIZE_MM,
            card_px: crate::CARD_SIZE_PX,
            left_margin_mm: crate::PAGE_LEFT_MARGIN_MM,
            top_margin_mm: crate::PAGE_TOP_MARGIN_MM,
            spacing_mm: crate::CARD_SPACING_MM,
            include_edge_margin: false,
        }
    }
}

/// How cards are arranged on one sheet, derived once per run from a
/// [`PageSetup`]. All values are in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutPlan {
    pub cards_across: u32,
    pub cards_down: u32,
    pub left_offset: u32,
    pub top_offset: u32,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub card_width: u32,
    pub card_height: u32,
    pub spacing: u32,
}

impl LayoutPlan {
    pub fn cards_per_sheet(&self) -> u32 {
        self.cards_across * self.cards_down
    }

    /// Top left corner of the grid slot at (col, row).
    pub fn slot(&self, col: u32, row: u32) -> (i64, i64) {
        (
            (self.left_offset + col * (self.card_width + self.spacing)) as i64,
            (self.top_offset + row * (self.card_height + self.spacing)) as i64,
        )
    }
}

impl PageSetup {
    pub fn px_per_mm(&self) -> f64 {
        self.card_px.0 as f64 / self.card_mm.0
    }

    /// Compute the sheet layout: canvas size, how many cards fit across and
    /// down, and the offsets that center the grid. Errors when not even a
    /// single card fits, before anything is written.
    pub fn plan(&self) -> Result<LayoutPlan, Error> {
        let ppm = self.px_per_mm();
        let (page_w_mm, page_h_mm) = if self.include_edge_margin {
            self.page_mm
        } else {
            (
                self.page_mm.0 - 2.0 * self.left_margin_mm,
                self.page_mm.1 - 2.0 * self.top_margin_mm,
            )
        };
        let canvas_width = (page_w_mm * ppm).round() as i64;
        let canvas_height = (page_h_mm * ppm).round() as i64;
        if canvas_width <= 0 || canvas_height <= 0 {
            return Err(Error::EmptyCanvas {
                width: canvas_width,
                height: canvas_height,
            });
        }
        // round the spacing up, a printed sheet must never end up with less
        // margin between cards than configured
        let spacing = (self.spacing_mm * ppm).ceil() as i64;
        let card_width = self.card_px.0 as i64;
        let card_height = self.card_px.1 as i64;
        if card_width > canvas_width || card_height > canvas_height {
            return Err(Error::CardTooLarge {
                card_width: self.card_px.0,
                card_height: self.card_px.1,
                canvas_width: canvas_width as u32,
                canvas_height: canvas_height as u32,
            });
        }

        let (cards_across, slack_x) = fit_along(canvas_width, card_width, spacing);
        let (cards_down, slack_y) = fit_along(canvas_height, card_height, spacing);

        Ok(LayoutPlan {
            cards_across,
            cards_down,
            left_offset: (slack_x / 2) as u32,
            top_offset: (slack_y / 2) as u32,
            canvas_width: canvas_width as u32,
            canvas_height: canvas_height as u32,
            card_width: self.card_px.0,
            card_height: self.card_px.1,
            spacing: spacing as u32,
        })
    }
}

/// One card fits by precondition; keep subtracting (card + spacing) while the
/// remainder stays non-negative. Returns the count and the leftover slack.
fn fit_along(available: i64, card: i64, spacing: i64) -> (u32, i64) {
    let mut count = 1;
    let mut slack = available - card;
    loop {
        let next = slack - card - spacing;
        if next < 0 {
            return (count, slack);
        }
        slack = next;
        count += 1;
    }
}
