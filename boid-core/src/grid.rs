use alloc::vec::Vec;

use crate::boid::Boid;
use crate::config::{ConfigError, MAX_GRID_CELLS};
use crate::vector::Vector2D;

/// Uniform bucket index over the arena, rebuilt every frame.
///
/// Cells hold indices into the boid slice passed to [`SpatialGrid::rebuild`];
/// the grid never owns boids. Lookups clamp out-of-range coordinates onto the
/// border cells, so positions on or past the arena edge are still indexed.
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell_size: f32,
    columns: usize,
    rows: usize,
    cells: Vec<Vec<usize>>,
}

impl SpatialGrid {
    pub fn new(width: f32, height: f32, cell_size: f32) -> Result<Self, ConfigError> {
        let (columns, rows) = grid_dimensions(width, height, cell_size)?;
        log::debug!(
            "Spatial grid {}x{} cells of {} units",
            columns,
            rows,
            cell_size
        );

        Ok(Self {
            cell_size,
            columns,
            rows,
            cells: (0..columns * rows).map(|_| Vec::new()).collect(),
        })
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Column and row of the cell containing `position`, clamped to the grid
    pub fn cell_of(&self, position: Vector2D) -> (usize, usize) {
        (
            clamp_index(position.x / self.cell_size, self.columns),
            clamp_index(position.y / self.cell_size, self.rows),
        )
    }

    /// Boid indices bucketed into one cell
    pub fn cell(&self, column: usize, row: usize) -> &[usize] {
        &self.cells[row * self.columns + column]
    }

    /// Number of cells holding at least one boid
    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|cell| !cell.is_empty()).count()
    }

    /// Clears every cell then buckets each boid by its current position.
    pub fn rebuild(&mut self, boids: &[Boid]) {
        for cell in self.cells.iter_mut() {
            cell.clear();
        }

        for (index, boid) in boids.iter().enumerate() {
            let (column, row) = self.cell_of(boid.position);
            self.cells[row * self.columns + column].push(index);
        }
    }

    /// Indices of every boid in the 3x3 block of cells around `position`.
    ///
    /// Includes the boid at `position` itself if it is indexed; callers that
    /// need to exclude it must filter it out.
    pub fn query_neighborhood(
        &self,
        position: Vector2D,
    ) -> impl Iterator<Item = usize> + Clone + '_ {
        let (column, row) = self.cell_of(position);
        let columns = column.saturating_sub(1)..=(column + 1).min(self.columns - 1);
        let rows = row.saturating_sub(1)..=(row + 1).min(self.rows - 1);

        rows.flat_map(move |r| {
            columns
                .clone()
                .flat_map(move |c| self.cell(c, r).iter().copied())
        })
    }
}

/// Columns and rows covering a `width` x `height` arena, capped at
/// [`MAX_GRID_CELLS`] cells in total.
pub fn grid_dimensions(
    width: f32,
    height: f32,
    cell_size: f32,
) -> Result<(usize, usize), ConfigError> {
    if !(cell_size > 0.0 && cell_size.is_finite()) {
        return Err(ConfigError::CellSizeNotPositive(cell_size));
    }
    let columns = cell_count(width, cell_size);
    let rows = cell_count(height, cell_size);
    match columns.checked_mul(rows) {
        Some(cells) if cells <= MAX_GRID_CELLS => Ok((columns, rows)),
        _ => Err(ConfigError::TooManyCells { columns, rows }),
    }
}

fn cell_count(extent: f32, cell_size: f32) -> usize {
    let count = libm::ceilf(extent / cell_size);
    if count >= 1.0 {
        count as usize
    } else {
        1
    }
}

fn clamp_index(scaled: f32, len: usize) -> usize {
    // `as` saturates: NaN and negatives become 0
    let index = libm::floorf(scaled) as isize;
    index.clamp(0, len as isize - 1) as usize
}
