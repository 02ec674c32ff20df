//! Changed-pixel predicate and motion regions.

use super::threshold::DifferenceThreshold;
use crate::extraction::IntensityFrame;

/// Per-pixel "changed" flags over a `width * height` frame, row-major.
#[derive(Clone, PartialEq, Eq)]
pub struct ChangeMask {
    flags: Vec<bool>,
    width: u32,
    height: u32,
    changed: usize,
}

/// Bounding box of one connected group of changed pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width of the bounding box.
    pub width: u32,
    /// Height of the bounding box.
    pub height: u32,
    /// Number of changed pixels in the group.
    pub area: usize,
}

impl ChangeMask {
    /// Builds a mask from raw flags. `flags.len()` must be `width * height`.
    pub fn from_flags(flags: Vec<bool>, width: u32, height: u32) -> Self {
        assert_eq!(
            flags.len(),
            (width as usize) * (height as usize),
            "mask length does not match dimensions"
        );
        let changed = flags.iter().filter(|&&f| f).count();
        Self {
            flags,
            width,
            height,
            changed,
        }
    }

    /// Classifies every pixel of `current` against `reference`.
    ///
    /// Both frames must have the same dimensions.
    pub fn difference(
        reference: &IntensityFrame,
        current: &IntensityFrame,
        threshold: DifferenceThreshold,
    ) -> Self {
        assert_eq!(reference.dimensions(), current.dimensions());
        let flags = reference
            .samples()
            .iter()
            .zip(current.samples())
            .map(|(&r, &c)| threshold.is_changed(r, c))
            .collect();
        Self::from_flags(flags, current.width(), current.height())
    }

    /// Returns true if pixel `index` (`y * width + x`) changed.
    #[inline]
    pub fn is_changed(&self, index: usize) -> bool {
        self.flags.get(index).copied().unwrap_or(false)
    }

    /// Number of changed pixels.
    #[inline]
    pub fn changed_count(&self) -> usize {
        self.changed
    }

    /// Number of pixels covered.
    #[inline]
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    /// Returns true for a zero-pixel mask.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Mask width and height.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Iterates the flags in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.flags.iter().copied()
    }

    /// Groups changed pixels into 8-connected regions.
    ///
    /// Regions with fewer than `min_area` pixels are dropped. No gap filling
    /// or morphological opening is applied beforehand, so a noisy mask yields
    /// many small regions.
    pub fn regions(&self, min_area: usize) -> Vec<Region> {
        let width = self.width as usize;
        let height = self.height as usize;
        let mut visited = vec![false; self.flags.len()];
        let mut regions = Vec::new();
        let mut to_fill = Vec::new();

        for start in 0..self.flags.len() {
            if !self.flags[start] || visited[start] {
                continue;
            }

            visited[start] = true;
            to_fill.push(start);

            let (mut min_x, mut min_y) = (usize::MAX, usize::MAX);
            let (mut max_x, mut max_y) = (0usize, 0usize);
            let mut area = 0;

            while let Some(i) = to_fill.pop() {
                let (x, y) = (i % width, i / width);
                area += 1;
                min_x = min_x.min(x);
                min_y = min_y.min(y);
                max_x = max_x.max(x);
                max_y = max_y.max(y);

                let neighbors = (-1isize..=1).flat_map(|ox| (-1isize..=1).map(move |oy| (ox, oy)));
                for (nx, ny) in neighbors
                    .map(|(ox, oy)| (x as isize + ox, y as isize + oy))
                    .filter(|&(nx, ny)| {
                        (0..width as isize).contains(&nx) && (0..height as isize).contains(&ny)
                    })
                {
                    let n = ny as usize * width + nx as usize;
                    if self.flags[n] && !visited[n] {
                        visited[n] = true;
                        to_fill.push(n);
                    }
                }
            }

            if area >= min_area {
                regions.push(Region {
                    x: min_x as u32,
                    y: min_y as u32,
                    width: (max_x - min_x + 1) as u32,
                    height: (max_y - min_y + 1) as u32,
                    area,
                });
            }
        }

        regions
    }
}

impl std::fmt::Debug for ChangeMask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeMask")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("changed", &self.changed)
            .finish()
    }
}
