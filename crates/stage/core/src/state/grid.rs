use std::ops::{Index, IndexMut};

use super::Position;

/// Fixed-size row-major two-dimensional storage addressed by [`Position`].
///
/// The same storage backs the stage's cells and its occupancy index, so both
/// always share dimensions. `Index`/`IndexMut` fail fast on out-of-bounds
/// positions; `get`/`get_mut` are the non-panicking forms.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid<T> {
    width: u32,
    height: u32,
    cells: Vec<T>,
}

impl<T: Clone> Grid<T> {
    pub fn new(width: u32, height: u32, fill: T) -> Self {
        let len = (width as usize) * (height as usize);
        Self {
            width,
            height,
            cells: vec![fill; len],
        }
    }
}

impl<T> Grid<T> {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && position.x < self.width as i32
            && position.y < self.height as i32
    }

    fn offset(&self, position: Position) -> Option<usize> {
        self.contains(position)
            .then(|| position.y as usize * self.width as usize + position.x as usize)
    }

    pub fn get(&self, position: Position) -> Option<&T> {
        self.offset(position).map(|offset| &self.cells[offset])
    }

    pub fn get_mut(&mut self, position: Position) -> Option<&mut T> {
        self.offset(position).map(|offset| &mut self.cells[offset])
    }

    /// Every position in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + use<T> {
        let (width, height) = (self.width as i32, self.height as i32);
        (0..height).flat_map(move |y| (0..width).map(move |x| Position::new(x, y)))
    }

    /// Positions excluding the outermost ring.
    pub fn interior(&self) -> impl Iterator<Item = Position> + use<T> {
        let (width, height) = (self.width as i32, self.height as i32);
        (1..height - 1).flat_map(move |y| (1..width - 1).map(move |x| Position::new(x, y)))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Position, &T)> {
        self.positions().zip(self.cells.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Position, &mut T)> {
        self.positions().zip(self.cells.iter_mut())
    }
}

impl<T> Index<Position> for Grid<T> {
    type Output = T;

    /// # Panics
    ///
    /// Panics if `position` lies outside the grid.
    fn index(&self, position: Position) -> &T {
        let (width, height) = (self.width, self.height);
        self.get(position).unwrap_or_else(|| {
            panic!("position {position} is outside the {width}x{height} grid")
        })
    }
}

impl<T> IndexMut<Position> for Grid<T> {
    /// # Panics
    ///
    /// Panics if `position` lies outside the grid.
    fn index_mut(&mut self, position: Position) -> &mut T {
        let (width, height) = (self.width, self.height);
        self.get_mut(position).unwrap_or_else(|| {
            panic!("position {position} is outside the {width}x{height} grid")
        })
    }
}
