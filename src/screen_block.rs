use std::iter::FusedIterator;
use std::num::NonZeroU32;

use crate::geometry::{ScreenBlock, ScreenPoint};

pub trait ScreenBlockExt {
    fn internal_points(&self) -> InternalPoints;
    fn tiles(&self, tile_size: NonZeroU32) -> Tiles;
}

impl ScreenBlockExt for ScreenBlock {
    /// Create an iterator over coordinates (x, y) pairs inside the block,
    /// in C order (x changes first, then y)
    fn internal_points(&self) -> InternalPoints {
        if self.is_empty() {
            InternalPoints::empty()
        } else {
            InternalPoints {
                min_x: self.min.x,
                max: self.max,

                cursor: self.min,
            }
        }
    }

    /// Create an iterator over square sub blocks in row major order.
    /// Tiles on the right and bottom edge are clipped to the block.
    fn tiles(&self, tile_size: NonZeroU32) -> Tiles {
        let tile_size = tile_size.get();
        let cursor = if self.is_empty() {
            // Start past the end
            ScreenPoint::new(self.min.x, self.max.y.max(self.min.y))
        } else {
            self.min
        };

        Tiles {
            block: self.clone(),
            tile_size,
            cursor,
        }
    }
}

#[derive(Copy, Clone, Debug)]
pub struct InternalPoints {
    min_x: u32,
    max: ScreenPoint,

    cursor: ScreenPoint,
}

impl InternalPoints {
    // Construct an iterator over internal points that returns no points
    fn empty() -> Self {
        InternalPoints {
            min_x: 1,
            max: ScreenPoint::origin(),

            cursor: ScreenPoint::origin(),
        }
    }
}

impl Iterator for InternalPoints {
    type Item = ScreenPoint;

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.len();
        (len, Some(len))
    }

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor.y >= self.max.y {
            return None;
        }

        let ret = self.cursor;

        debug_assert!(self.cursor.x < self.max.x);
        self.cursor.x += 1;
        if self.cursor.x >= self.max.x {
            self.cursor.x = self.min_x;
            self.cursor.y += 1;
        }

        Some(ret)
    }
}

impl ExactSizeIterator for InternalPoints {
    fn len(&self) -> usize {
        if self.cursor.y >= self.max.y {
            0
        } else {
            let whole_rows = ScreenBlock::new(
                ScreenPoint::new(self.min_x, self.cursor.y + 1),
                self.max,
            );
            let current_row = ScreenBlock::new(
                self.cursor,
                ScreenPoint::new(self.max.x, self.cursor.y + 1),
            );
            (whole_rows.area() + current_row.area()) as usize
        }
    }
}

impl FusedIterator for InternalPoints {}

/// Iterator over tiles of a block, row by row.
#[derive(Clone, Debug)]
pub struct Tiles {
    block: ScreenBlock,
    tile_size: u32,
    /// Top left corner of the next tile
    cursor: ScreenPoint,
}

impl Tiles {
    fn tiles_across(&self, from: u32, to: u32) -> usize {
        to.saturating_sub(from).div_ceil(self.tile_size) as usize
    }
}

impl Iterator for Tiles {
    type Item = ScreenBlock;

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.len();
        (len, Some(len))
    }

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor.y >= self.block.max.y {
            return None;
        }

        let min = self.cursor;
        let max = ScreenPoint::new(
            (min.x + self.tile_size).min(self.block.max.x),
            (min.y + self.tile_size).min(self.block.max.y),
        );

        self.cursor.x = max.x;
        if self.cursor.x >= self.block.max.x {
            self.cursor.x = self.block.min.x;
            self.cursor.y = max.y;
        }

        Some(ScreenBlock::new(min, max))
    }
}

impl ExactSizeIterator for Tiles {
    fn len(&self) -> usize {
        if self.cursor.y >= self.block.max.y {
            return 0;
        }

        let per_row = self.tiles_across(self.block.min.x, self.block.max.x);
        let current_row = self.tiles_across(self.cursor.x, self.block.max.x);
        let row_bottom = (self.cursor.y + self.tile_size).min(self.block.max.y);
        let remaining_rows = self.tiles_across(row_bottom, self.block.max.y);

        current_row + remaining_rows * per_row
    }
}

impl FusedIterator for Tiles {}
