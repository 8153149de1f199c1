//! The farm grid: a rectangle of plots, each empty or holding one crop.
//!
//! Every coordinate in `[0, width) x [0, height)` has an entry, and no
//! entry exists outside that range. The grid only ever grows; expansion
//! keeps every existing plot as it was.

use std::collections::BTreeMap;

use homestead_types::{Coord, CropKind, Timestamp};

use crate::catalog::CropCatalog;
use crate::crop::CropInstance;
use crate::error::FarmError;

/// Largest accepted width or height.
pub const MAX_DIMENSION: u32 = 1_024;

/// A rectangular grid of plots.
#[derive(Debug, Clone, PartialEq)]
pub struct FarmGrid {
    width: u32,
    height: u32,
    /// One entry per in-range coordinate, iterated column-major.
    plots: BTreeMap<Coord, Option<CropInstance>>,
}

impl FarmGrid {
    /// Create an empty grid.
    ///
    /// Returns [`FarmError::InvalidDimensions`] for a zero dimension or one
    /// above [`MAX_DIMENSION`].
    pub fn new(width: u32, height: u32) -> Result<Self, FarmError> {
        check_dimensions(width, height)?;
        let mut plots = BTreeMap::new();
        for x in 0..width {
            for y in 0..height {
                plots.insert(Coord::new(x, y), None);
            }
        }
        Ok(Self {
            width,
            height,
            plots,
        })
    }

    /// Rebuild a grid from explicit plot entries, as read from a save.
    ///
    /// The entries must cover exactly the cells of a `width` x `height`
    /// grid.
    pub fn from_plots(
        width: u32,
        height: u32,
        plots: BTreeMap<Coord, Option<CropInstance>>,
    ) -> Result<Self, FarmError> {
        check_dimensions(width, height)?;
        if let Some(coord) = plots
            .keys()
            .find(|c| c.x >= width || c.y >= height)
        {
            return Err(FarmError::PlotOutOfBounds {
                coord: *coord,
                width,
                height,
            });
        }
        // All keys are distinct and in range, so equal counts mean full cover.
        let expected = cell_count(width, height);
        let actual = u64::try_from(plots.len()).unwrap_or(u64::MAX);
        if actual != expected {
            return Err(FarmError::MissingPlots { expected, actual });
        }
        Ok(Self {
            width,
            height,
            plots,
        })
    }

    /// Grid width (number of columns).
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Grid height (number of rows).
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Whether `coord` lies inside the grid.
    pub const fn contains(&self, coord: Coord) -> bool {
        coord.x < self.width && coord.y < self.height
    }

    /// Place an already-built crop on an empty in-range plot.
    ///
    /// Returns `false`, leaving the grid untouched, if `coord` is out of
    /// bounds or the plot is occupied.
    pub fn plant(&mut self, coord: Coord, crop: CropInstance) -> bool {
        let Some(slot) = self.plots.get_mut(&coord) else {
            return false;
        };
        if slot.is_some() {
            return false;
        }
        tracing::debug!(%coord, kind = %crop.kind(), "Crop planted");
        *slot = Some(crop);
        true
    }

    /// Plant a new crop of `kind` at `coord`, planted at `now`.
    ///
    /// Invalid input (unknown kind, bad timestamp) is an error; an
    /// out-of-bounds or occupied plot is `Ok(false)`.
    pub fn plant_crop(
        &mut self,
        coord: Coord,
        kind: &CropKind,
        catalog: &CropCatalog,
        now: Timestamp,
    ) -> Result<bool, FarmError> {
        let crop = CropInstance::from_catalog(catalog, kind, now)?;
        Ok(self.plant(coord, crop))
    }

    /// Remove and return the crop at `coord`.
    ///
    /// Returns `None` for an out-of-bounds or empty plot, so harvesting the
    /// same plot twice yields `None` the second time.
    pub fn harvest(&mut self, coord: Coord) -> Option<CropInstance> {
        let crop = self.plots.get_mut(&coord)?.take()?;
        tracing::debug!(%coord, kind = %crop.kind(), "Crop removed from plot");
        Some(crop)
    }

    /// The crop at `coord`, if any.
    pub fn get(&self, coord: Coord) -> Option<&CropInstance> {
        self.plots.get(&coord)?.as_ref()
    }

    /// Every plot in scan order, empty ones included.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, Option<&CropInstance>)> {
        self.plots.iter().map(|(coord, crop)| (*coord, crop.as_ref()))
    }

    /// Every occupied plot in scan order.
    pub fn occupied(&self) -> impl Iterator<Item = (Coord, &CropInstance)> {
        self.plots
            .iter()
            .filter_map(|(coord, crop)| crop.as_ref().map(|c| (*coord, c)))
    }

    /// Crops that are ready at `now`, in scan order.
    pub fn ready_crops(&self, now: Timestamp) -> Vec<(Coord, &CropInstance)> {
        self.occupied().filter(|(_, crop)| crop.is_ready(now)).collect()
    }

    /// Number of occupied plots.
    pub fn occupied_count(&self) -> usize {
        self.plots.values().filter(|p| p.is_some()).count()
    }

    /// Number of plots (`width * height`).
    pub fn cell_count(&self) -> u64 {
        cell_count(self.width, self.height)
    }

    /// Grow the grid to `new_width` x `new_height`.
    ///
    /// Returns `false`, leaving the grid untouched, when:
    ///
    /// - either dimension would shrink,
    /// - neither dimension grows,
    /// - either dimension would exceed [`MAX_DIMENSION`]. Saves larger
    ///   than the cap are likewise rejected on load.
    ///
    /// On success every existing plot keeps its contents and the new cells
    /// start empty.
    pub fn expand(&mut self, new_width: u32, new_height: u32) -> bool {
        if new_width < self.width || new_height < self.height {
            return false;
        }
        if new_width == self.width && new_height == self.height {
            return false;
        }
        if check_dimensions(new_width, new_height).is_err() {
            return false;
        }
        for x in 0..new_width {
            for y in 0..new_height {
                self.plots.entry(Coord::new(x, y)).or_insert(None);
            }
        }
        tracing::debug!(
            from_width = self.width,
            from_height = self.height,
            to_width = new_width,
            to_height = new_height,
            "Farm expanded"
        );
        self.width = new_width;
        self.height = new_height;
        true
    }
}

const fn check_dimensions(width: u32, height: u32) -> Result<(), FarmError> {
    if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(FarmError::InvalidDimensions { width, height });
    }
    Ok(())
}

fn cell_count(width: u32, height: u32) -> u64 {
    u64::from(width).saturating_mul(u64::from(height))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
