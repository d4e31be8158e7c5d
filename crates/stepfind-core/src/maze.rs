//! The maze: an immutable field of blocked and free cells.
//!
//! A [`Maze`] is built once, validated once, and never mutated. The three
//! constructors cover random generation from a wall probability, an
//! explicit wall mask, and an ASCII map (handy in tests and demos).

use std::fmt;

use rand::{Rng, RngExt};

use crate::Point;

/// Errors detected while constructing a [`Maze`].
///
/// Construction is the only fallible operation; queries on a built maze
/// never fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MazeError {
    /// A dimension was zero or negative.
    BadDimensions { width: i32, height: i32 },
    /// Start or end lies outside the maze rectangle.
    OutOfBounds(Point),
    /// Start and end coincide.
    StartIsEnd(Point),
    /// An explicit wall mask had the wrong length.
    BadMask { expected: usize, got: usize },
    /// An ASCII map could not be parsed.
    BadText(String),
}

impl fmt::Display for MazeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadDimensions { width, height } => {
                write!(f, "maze: dimensions must be positive, got {width}x{height}")
            }
            Self::OutOfBounds(p) => write!(f, "maze: endpoint {p} is out of bounds"),
            Self::StartIsEnd(p) => write!(f, "maze: start and end both at {p}"),
            Self::BadMask { expected, got } => {
                write!(f, "maze: wall mask has {got} cells, expected {expected}")
            }
            Self::BadText(msg) => write!(f, "maze: bad map text: {msg}"),
        }
    }
}

impl std::error::Error for MazeError {}

/// A rectangle of blocked ("wall") and free cells with a designated start
/// and end, both guaranteed in bounds, free, and distinct.
///
/// Walls are stored in a dense row-major vector, so [`wall`](Self::wall)
/// and [`contains`](Self::contains) are O(1).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Maze {
    width: i32,
    height: i32,
    walls: Vec<bool>,
    start: Point,
    end: Point,
}

impl Maze {
    /// Generate a maze where each cell is independently blocked with
    /// probability `wall_probability`. Start and end are forced free
    /// regardless of the dice.
    pub fn generate(
        width: i32,
        height: i32,
        start: Point,
        end: Point,
        wall_probability: f64,
        rng: &mut impl Rng,
    ) -> Result<Self, MazeError> {
        Self::check_config(width, height, start, end)?;
        let walls = (0..(width as usize * height as usize))
            .map(|_| rng.random::<f64>() < wall_probability)
            .collect();
        Ok(Self::with_walls(width, height, walls, start, end))
    }

    /// Build a maze from an explicit row-major wall mask (`true` = wall).
    ///
    /// The mask must hold exactly `width * height` cells. Start and end
    /// are forced free even if the mask blocks them.
    pub fn from_mask(
        width: i32,
        height: i32,
        start: Point,
        end: Point,
        mask: &[bool],
    ) -> Result<Self, MazeError> {
        Self::check_config(width, height, start, end)?;
        let expected = width as usize * height as usize;
        if mask.len() != expected {
            return Err(MazeError::BadMask {
                expected,
                got: mask.len(),
            });
        }
        Ok(Self::with_walls(width, height, mask.to_vec(), start, end))
    }

    /// Parse a maze from an ASCII map.
    ///
    /// Recognized characters: `#` wall, `.` free, `@` start, `>` end.
    /// Lines must all have the same width, and the map must contain
    /// exactly one `@` and one `>`.
    ///
    /// ```
    /// use stepfind_core::Maze;
    ///
    /// let maze = Maze::from_text(
    ///     "@.#\n\
    ///      .#.\n\
    ///      ..>",
    /// )
    /// .unwrap();
    /// assert_eq!(maze.width(), 3);
    /// ```
    pub fn from_text(s: &str) -> Result<Self, MazeError> {
        let s = s.trim();
        let mut walls = Vec::new();
        let mut start = None;
        let mut end = None;
        let mut width = -1i32;
        let mut y = 0i32;

        for line in s.lines() {
            let mut x = 0i32;
            for ch in line.chars() {
                match ch {
                    '#' => walls.push(true),
                    '.' => walls.push(false),
                    '@' => {
                        if start.replace(Point::new(x, y)).is_some() {
                            return Err(MazeError::BadText("more than one '@'".into()));
                        }
                        walls.push(false);
                    }
                    '>' => {
                        if end.replace(Point::new(x, y)).is_some() {
                            return Err(MazeError::BadText("more than one '>'".into()));
                        }
                        walls.push(false);
                    }
                    _ => {
                        return Err(MazeError::BadText(format!(
                            "invalid character {ch:?} at ({x}, {y})"
                        )));
                    }
                }
                x += 1;
            }
            if width >= 0 && x != width {
                return Err(MazeError::BadText(format!(
                    "line {y} has width {x}, expected {width}"
                )));
            }
            width = x;
            y += 1;
        }

        let start = start.ok_or_else(|| MazeError::BadText("missing '@'".into()))?;
        let end = end.ok_or_else(|| MazeError::BadText("missing '>'".into()))?;
        Self::check_config(width, y, start, end)?;
        Ok(Self::with_walls(width, y, walls, start, end))
    }

    fn check_config(width: i32, height: i32, start: Point, end: Point) -> Result<(), MazeError> {
        if width <= 0 || height <= 0 {
            return Err(MazeError::BadDimensions { width, height });
        }
        let in_bounds = |p: Point| p.x >= 0 && p.x < width && p.y >= 0 && p.y < height;
        if !in_bounds(start) {
            return Err(MazeError::OutOfBounds(start));
        }
        if !in_bounds(end) {
            return Err(MazeError::OutOfBounds(end));
        }
        if start == end {
            return Err(MazeError::StartIsEnd(start));
        }
        Ok(())
    }

    fn with_walls(width: i32, height: i32, mut walls: Vec<bool>, start: Point, end: Point) -> Self {
        // Endpoints are free by construction, whatever the source said.
        walls[(start.y * width + start.x) as usize] = false;
        walls[(end.y * width + end.x) as usize] = false;
        Self {
            width,
            height,
            walls,
            start,
            end,
        }
    }

    /// Width in cells.
    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Height in cells.
    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// The start position. Always in bounds and free.
    #[inline]
    pub fn start(&self) -> Point {
        self.start
    }

    /// The end position. Always in bounds, free, and distinct from start.
    #[inline]
    pub fn end(&self) -> Point {
        self.end
    }

    /// Whether `p` lies inside the maze rectangle.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= 0 && p.x < self.width && p.y >= 0 && p.y < self.height
    }

    /// Whether the cell at `p` is blocked. Points outside the rectangle
    /// count as walls.
    #[inline]
    pub fn wall(&self, p: Point) -> bool {
        if !self.contains(p) {
            return true;
        }
        self.walls[(p.y * self.width + p.x) as usize]
    }

    /// Whether `p` is an in-bounds, unblocked cell.
    #[inline]
    pub fn free(&self, p: Point) -> bool {
        !self.wall(p)
    }

    /// Number of free cells.
    pub fn free_count(&self) -> usize {
        self.walls.iter().filter(|&&w| !w).count()
    }
}
