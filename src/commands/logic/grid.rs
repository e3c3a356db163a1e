use anyhow::{bail, Context, Result};

use super::models::Coord;
use crate::error::{LogicError, LogicResult};

pub trait GridProvider {
    /// `(width, height)`: `x` ranges over `0..width`, `y` over `0..height`.
    fn dimensions(&self) -> (i32, i32);

    fn terrain_id(&self, coord: Coord) -> LogicResult<u32>;

    fn contains(&self, coord: Coord) -> bool {
        let (w, h) = self.dimensions();
        coord.x >= 0 && coord.x < w && coord.y >= 0 && coord.y < h
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MapGrid {
    width: i32,
    height: i32,
    cells: Vec<u32>,
}

impl MapGrid {
    pub fn from_rows(rows: Vec<Vec<u32>>) -> Result<Self> {
        let width = rows.len();
        let height = rows.first().map(|r| r.len()).unwrap_or(0);
        if width == 0 || height == 0 {
            bail!("map data is empty");
        }
        let mut cells = Vec::with_capacity(width * height);
        for (idx, row) in rows.into_iter().enumerate() {
            if row.len() != height {
                bail!("map row {} has {} tiles, expected {}", idx, row.len(), height);
            }
            cells.extend(row);
        }
        Ok(Self {
            width: i32::try_from(width).context("map too wide")?,
            height: i32::try_from(height).context("map too tall")?,
            cells,
        })
    }

    pub fn parse(text: &str) -> Result<Self> {
        let mut rows = Vec::new();
        for (idx, line) in text.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let row = trimmed
                .split_whitespace()
                .map(|t| t.parse::<u32>().with_context(|| format!("parse tile `{}` on line {}", t, idx + 1)))
                .collect::<Result<Vec<_>>>()?;
            rows.push(row);
        }
        Self::from_rows(rows)
    }
}

impl GridProvider for MapGrid {
    fn dimensions(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    fn terrain_id(&self, coord: Coord) -> LogicResult<u32> {
        if !self.contains(coord) {
            return Err(LogicError::OutOfBounds { coord, width: self.width, height: self.height });
        }
        Ok(self.cells[(coord.x * self.height + coord.y) as usize])
    }
}
