use rand::Rng;

/// A cubic grid of cells playing a 3D variant of Conway's Game of Life.
///
/// Each cell carries an age: 0 means empty, anything greater is a live
/// cell that has survived that many generations. The renderer's caller
/// turns ages into sphere colors; this module knows nothing about
/// rendering. The grid wraps toroidally at its edges on all three axes.
#[derive(Clone, Debug)]
pub struct Life3D {
    size: usize,
    // Precomputed to speed up array indexing.
    size_squared: usize,
    filling: f64,
    cells: Vec<u32>,
}

impl Life3D {
    /// Creates an empty `size` x `size` x `size` grid. `filling` is the
    /// probability that `seed` makes any given cell live.
    pub fn new(size: usize, filling: f64) -> Life3D {
        Life3D {
            size,
            size_squared: size * size,
            filling,
            cells: vec![0; size * size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Randomly populates the grid with age-1 cells.
    pub fn seed<R: Rng>(&mut self, rng: &mut R) {
        for cell in self.cells.iter_mut() {
            *cell = if rng.gen::<f64>() < self.filling { 1 } else { 0 };
        }
    }

    fn index(&self, x: usize, y: usize, z: usize) -> usize {
        x * self.size_squared + y * self.size + z
    }

    /// The age of the cell at a grid position: 0 for an empty cell.
    pub fn age(&self, x: usize, y: usize, z: usize) -> u32 {
        self.cells[self.index(x, y, z)]
    }

    pub fn is_alive(&self, x: usize, y: usize, z: usize) -> bool {
        self.age(x, y, z) > 0
    }

    pub fn spawn(&mut self, x: usize, y: usize, z: usize) {
        let index = self.index(x, y, z);
        self.cells[index] = 1;
    }

    pub fn die(&mut self, x: usize, y: usize, z: usize) {
        let index = self.index(x, y, z);
        self.cells[index] = 0;
    }

    /// True when no live cell remains anywhere in the grid.
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|&cell| cell == 0)
    }

    fn wrap(&self, n: usize, delta: isize) -> usize {
        (n as isize + delta).rem_euclid(self.size as isize) as usize
    }

    /// Counts the live cells among the 26 surrounding positions,
    /// wrapping at the grid edges.
    pub fn neighbours(&self, x: usize, y: usize, z: usize) -> usize {
        let mut count = 0;

        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    if dx == 0 && dy == 0 && dz == 0 {
                        continue;
                    }

                    if self.is_alive(
                        self.wrap(x, dx),
                        self.wrap(y, dy),
                        self.wrap(z, dz),
                    ) {
                        count += 1;
                    }
                }
            }
        }

        count
    }

    /// Advances the whole grid by one generation.
    ///
    /// This is a good place to edit the game rules. At present a live
    /// cell ages by one and survives with 5 to 7 live neighbours; an
    /// empty cell spawns with exactly 4 or 5. Neighbour counts are taken
    /// against the previous generation.
    pub fn step(&mut self) {
        let mut counts = vec![0usize; self.cells.len()];
        for x in 0..self.size {
            for y in 0..self.size {
                for z in 0..self.size {
                    counts[self.index(x, y, z)] = self.neighbours(x, y, z);
                }
            }
        }

        for (cell, &n) in self.cells.iter_mut().zip(counts.iter()) {
            if *cell > 0 {
                if n >= 5 && n <= 7 {
                    *cell += 1;
                } else {
                    *cell = 0;
                }
            } else if n == 4 || n == 5 {
                *cell = 1;
            }
        }
    }
}

/* Tests */
