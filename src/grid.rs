use flock_common::Vec2;
use rayon::prelude::*;

/// Upper bound on grid cells per axis; cells grow beyond the query radius when
/// the point cloud is very wide compared to it.
const MAX_GRID_DIM: usize = 1024;

/// Uniform grid over a fixed point set for fixed-radius neighbor queries.
///
/// Points are bucketed with a counting sort: `cell_counts` per cell, prefix-summed
/// into `cell_starts`, and `cell_point_indices` holding point indices cell by cell.
/// Within a cell, indices stay in ascending order.
#[derive(Debug)]
pub struct SpatialGrid {
    origin: Vec2,
    cell_size: f32,
    inv_cell_size: f32,
    dim_x: usize,
    dim_y: usize,
    cell_counts: Vec<usize>,
    cell_starts: Vec<usize>,
    cell_point_indices: Vec<usize>,
}

impl SpatialGrid {
    /// Buckets `positions` into cells at least `radius` wide, so every point within
    /// `radius` of a query lies in the 3x3 block around the query's cell.
    pub fn build(positions: &[Vec2], radius: f32) -> Self {
        let (min, max) = bounds(positions);
        let extent_x = max.x - min.x;
        let extent_y = max.y - min.y;

        let mut cell_size = radius
            .max(extent_x / MAX_GRID_DIM as f32)
            .max(extent_y / MAX_GRID_DIM as f32);
        if cell_size.is_nan() || cell_size <= 0.0 {
            cell_size = 1.0; // zero radius over coincident points
        }
        let inv_cell_size = 1.0 / cell_size;
        let dim_x = ((extent_x * inv_cell_size).floor() as usize).saturating_add(1).min(MAX_GRID_DIM + 1);
        let dim_y = ((extent_y * inv_cell_size).floor() as usize).saturating_add(1).min(MAX_GRID_DIM + 1);
        let num_cells = dim_x * dim_y;

        let mut grid = Self {
            origin: min,
            cell_size,
            inv_cell_size,
            dim_x,
            dim_y,
            cell_counts: vec![0; num_cells],
            cell_starts: vec![0; num_cells],
            cell_point_indices: vec![0; positions.len()],
        };

        // Phase 1: Assign a cell to each point (Parallel).
        let point_cells: Vec<usize> = positions.par_iter().map(|&pos| grid.cell_index(pos)).collect();

        // Phase 2: Count points per cell (Serial).
        for &cell in &point_cells {
            grid.cell_counts[cell] += 1;
        }

        // Phase 3: Prefix sum for cell start offsets.
        let mut total = 0;
        for (start, &count) in grid.cell_starts.iter_mut().zip(grid.cell_counts.iter()) {
            *start = total;
            total += count;
        }

        // Phase 4: Scatter point indices; ascending point order keeps each cell sorted.
        let mut write_offsets = grid.cell_starts.clone();
        for (point_idx, &cell) in point_cells.iter().enumerate() {
            grid.cell_point_indices[write_offsets[cell]] = point_idx;
            write_offsets[cell] += 1;
        }

        grid
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn dims(&self) -> (usize, usize) {
        (self.dim_x, self.dim_y)
    }

    fn cell_coords(&self, pos: Vec2) -> (usize, usize) {
        let grid_x = ((pos.x - self.origin.x) * self.inv_cell_size).floor() as usize;
        let grid_y = ((pos.y - self.origin.y) * self.inv_cell_size).floor() as usize;
        // Clamp to grid dimensions to handle edge cases
        (grid_x.min(self.dim_x - 1), grid_y.min(self.dim_y - 1))
    }

    fn cell_index(&self, pos: Vec2) -> usize {
        let (x, y) = self.cell_coords(pos);
        y * self.dim_x + x
    }

    /// Calls `f` with the index of every point within `radius` (inclusive) of `pos`,
    /// the query point itself included when it belongs to the set.
    /// `radius` must not exceed the radius the grid was built with.
    pub fn for_each_within<F>(&self, pos: Vec2, radius: f32, positions: &[Vec2], mut f: F)
    where
        F: FnMut(usize),
    {
        let (center_x, center_y) = self.cell_coords(pos);
        let x_range = center_x.saturating_sub(1)..=(center_x + 1).min(self.dim_x - 1);
        let y_range = center_y.saturating_sub(1)..=(center_y + 1).min(self.dim_y - 1);

        for grid_y in y_range {
            for grid_x in x_range.clone() {
                let cell = grid_y * self.dim_x + grid_x;
                let start = self.cell_starts[cell];
                let end = start + self.cell_counts[cell];
                for &point_idx in &self.cell_point_indices[start..end] {
                    if pos.distance(positions[point_idx]) <= radius {
                        f(point_idx);
                    }
                }
            }
        }
    }
}

fn bounds(positions: &[Vec2]) -> (Vec2, Vec2) {
    if positions.is_empty() {
        return (Vec2::zero(), Vec2::zero());
    }
    positions.iter().fold(
        (Vec2::new(f32::INFINITY, f32::INFINITY), Vec2::new(f32::NEG_INFINITY, f32::NEG_INFINITY)),
        |(min, max), p| {
            (
                Vec2::new(min.x.min(p.x), min.y.min(p.y)),
                Vec2::new(max.x.max(p.x), max.y.max(p.y)),
            )
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn within(grid: &SpatialGrid, positions: &[Vec2], idx: usize, radius: f32) -> Vec<usize> {
        let mut found = Vec::new();
        grid.for_each_within(positions[idx], radius, positions, |j| found.push(j));
        found.sort_unstable();
        found
    }

    #[test]
    fn finds_points_across_cell_borders() {
        let positions = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(9.9, 0.0),
            Vec2::new(10.1, 0.0),
            Vec2::new(19.0, 19.0),
            Vec2::new(100.0, 100.0),
        ];
        let grid = SpatialGrid::build(&positions, 10.0);
        assert_eq!(within(&grid, &positions, 0, 10.0), vec![0, 1]);
        assert_eq!(within(&grid, &positions, 2, 10.0), vec![1, 2]);
        assert_eq!(within(&grid, &positions, 4, 10.0), vec![4]);
    }

    #[test]
    fn radius_is_inclusive() {
        let positions = vec![Vec2::new(0.0, 0.0), Vec2::new(3.0, 4.0)];
        let grid = SpatialGrid::build(&positions, 5.0);
        assert_eq!(within(&grid, &positions, 0, 5.0), vec![0, 1]);
    }

    #[test]
    fn zero_radius_and_empty_sets_are_handled() {
        let positions = vec![Vec2::new(2.0, 2.0), Vec2::new(2.0, 2.0), Vec2::new(3.0, 2.0)];
        let grid = SpatialGrid::build(&positions, 0.0);
        assert!(grid.cell_size() > 0.0);
        assert_eq!(within(&grid, &positions, 0, 0.0), vec![0, 1]);

        let empty = SpatialGrid::build(&[], 5.0);
        assert_eq!(empty.dims(), (1, 1));
    }

    #[test]
    fn wide_point_clouds_cap_the_grid() {
        let positions = vec![Vec2::new(0.0, 0.0), Vec2::new(1e7, 0.5)];
        let grid = SpatialGrid::build(&positions, 1.0);
        let (dim_x, dim_y) = grid.dims();
        assert!(dim_x <= MAX_GRID_DIM + 1);
        assert_eq!(dim_y, 1);
        assert_eq!(within(&grid, &positions, 1, 1.0), vec![1]);
    }
}
