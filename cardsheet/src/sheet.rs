use std::path::{Path, PathBuf};

use image::imageops::overlay;
use image::{ImageFormat, Rgba, RgbaImage};
use log::debug;

use crate::Error;
use crate::layout::LayoutPlan;

const TRANSPARENT: Rgba<u8> = Rgba([255, 255, 255, 0]);

/// Compose the next sheet from the image stream.
///
/// Consumes up to `cards_across * cards_down` images and pastes them onto a
/// fresh transparent canvas, filling rows left to right and top to bottom.
/// The canvas is only allocated once the first image arrives, so a stream
/// that ends exactly on a full sheet does not produce a trailing empty one
/// and an empty stream produces no sheet at all.
pub fn images_to_sheet<I>(mut it: I, plan: &LayoutPlan) -> Option<RgbaImage>
where
    I: Iterator<Item = RgbaImage>,
{
    let mut col = 0;
    let mut row = 0;
    let mut composed: Option<RgbaImage> = None;

    loop {
        match it.next() {
            None => return composed,
            Some(im) => {
                let canvas = composed.get_or_insert_with(|| {
                    RgbaImage::from_pixel(plan.canvas_width, plan.canvas_height, TRANSPARENT)
                });
                let (x, y) = plan.slot(col, row);
                overlay(canvas, &im, x, y);
                col += 1;
                if col == plan.cards_across {
                    col = 0;
                    row += 1;
                }
                if row == plan.cards_down {
                    return composed;
                }
            }
        }
    }
}

/// Writes finished sheets as `print_sheetN.png` into one directory, probing
/// for a free name so that output of earlier runs is never overwritten.
pub struct SheetWriter {
    out_dir: PathBuf,
    next_index: u32,
}

impl SheetWriter {
    pub fn new<P: AsRef<Path>>(out_dir: P) -> SheetWriter {
        SheetWriter {
            out_dir: out_dir.as_ref().to_path_buf(),
            next_index: 1,
        }
    }

    /// Save the sheet under the next free `print_sheetN.png` name and return
    /// the path. A failed save is surfaced, not retried; sheets written
    /// earlier stay on disk.
    pub fn write(&mut self, sheet: &RgbaImage) -> Result<PathBuf, Error> {
        let mut path = self.candidate();
        while path.exists() {
            self.next_index += 1;
            path = self.candidate();
        }
        debug!("saving sheet to {}", path.display());
        sheet.save_with_format(&path, ImageFormat::Png)?;
        self.next_index += 1;
        Ok(path)
    }

    fn candidate(&self) -> PathBuf {
        self.out_dir
            .join(format!("print_sheet{}.png", self.next_index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    fn small_plan() -> LayoutPlan {
        LayoutPlan {
            cards_across: 2,
            cards_down: 2,
            left_offset: 3,
            top_offset: 4,
            canvas_width: 30,
            canvas_height: 40,
            card_width: 10,
            card_height: 14,
            spacing: 2,
        }
    }

    fn solid(plan: &LayoutPlan, rgba: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(plan.card_width, plan.card_height, Rgba(rgba))
    }

    #[test]
    fn empty_input_yields_no_sheet() {
        let plan = small_plan();
        assert!(images_to_sheet(std::iter::empty(), &plan).is_none());
    }

    #[test]
    fn single_image_fills_first_slot_only() {
        let plan = small_plan();
        let red = [255, 0, 0, 255];
        let sheet = images_to_sheet(vec![solid(&plan, red)].into_iter(), &plan).unwrap();
        assert_eq!(sheet.dimensions(), (plan.canvas_width, plan.canvas_height));
        let (x0, y0) = plan.slot(0, 0);
        assert_eq!(sheet.get_pixel(x0 as u32, y0 as u32).0, red);
        // the neighboring slot and the border stay transparent
        let (x1, y1) = plan.slot(1, 0);
        assert_eq!(sheet.get_pixel(x1 as u32, y1 as u32).0[3], 0);
        assert_eq!(sheet.get_pixel(0, 0).0[3], 0);
    }

    #[test]
    fn second_image_lands_right_of_the_first() {
        let plan = small_plan();
        let red = [255, 0, 0, 255];
        let green = [0, 255, 0, 255];
        let images = vec![solid(&plan, red), solid(&plan, green)];
        let sheet = images_to_sheet(images.into_iter(), &plan).unwrap();
        let expected_x = plan.left_offset + plan.card_width + plan.spacing;
        assert_eq!(plan.slot(1, 0), (expected_x as i64, plan.top_offset as i64));
        assert_eq!(sheet.get_pixel(expected_x, plan.top_offset).0, green);
    }

    #[test]
    fn full_grid_stops_consuming() {
        let plan = small_plan();
        let mut it = (0..5).map(|_| solid(&plan, [0, 0, 255, 255]));
        assert!(images_to_sheet(&mut it, &plan).is_some());
        // four slots per sheet, the fifth image must still be available
        assert_eq!(it.count(), 1);
    }

    #[test]
    fn five_images_make_two_sheets() {
        let plan = small_plan();
        let images = (0..5).map(|_| solid(&plan, [0, 0, 255, 255]));
        let sheets: Vec<RgbaImage> = images
            .batching(|it| images_to_sheet(it, &plan))
            .collect();
        assert_eq!(sheets.len(), 2);
        // the leftover sheet has one filled slot, the rest is transparent
        let last = &sheets[1];
        let (x0, y0) = plan.slot(0, 0);
        let (x1, y1) = plan.slot(1, 0);
        assert_eq!(last.get_pixel(x0 as u32, y0 as u32).0[3], 255);
        assert_eq!(last.get_pixel(x1 as u32, y1 as u32).0[3], 0);
    }

    #[test]
    fn exact_multiples_make_only_full_sheets() {
        let plan = small_plan();
        for k in 1..3 {
            let images = (0..4 * k).map(|_| solid(&plan, [9, 9, 9, 255]));
            let sheets: Vec<RgbaImage> = images
                .batching(|it| images_to_sheet(it, &plan))
                .collect();
            assert_eq!(sheets.len(), k);
            let (x, y) = plan.slot(1, 1);
            assert_eq!(sheets[k - 1].get_pixel(x as u32, y as u32).0[3], 255);
        }
    }

    #[test]
    fn writer_numbers_sheets_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = SheetWriter::new(dir.path());
        let sheet = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 0]));
        let first = writer.write(&sheet).unwrap();
        let second = writer.write(&sheet).unwrap();
        assert_eq!(first, dir.path().join("print_sheet1.png"));
        assert_eq!(second, dir.path().join("print_sheet2.png"));
    }

    #[test]
    fn writer_never_overwrites_earlier_runs() {
        let dir = tempfile::tempdir().unwrap();
        let existing = dir.path().join("print_sheet1.png");
        std::fs::write(&existing, b"from an earlier run").unwrap();

        let mut writer = SheetWriter::new(dir.path());
        let sheet = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 0]));
        let written = writer.write(&sheet).unwrap();

        assert_eq!(written, dir.path().join("print_sheet2.png"));
        assert_eq!(std::fs::read(&existing).unwrap(), b"from an earlier run");
    }
}
