//! Core types for stepfind: integer grid geometry and the maze field the
//! search operates on.
//!
//! A [`Maze`] is immutable after construction: a rectangle of blocked and
//! free cells plus a start and an end position, both guaranteed in bounds,
//! free, and distinct. All invalid configurations are rejected with a
//! [`MazeError`] at construction time, so downstream code never has to
//! handle a malformed maze.

mod geom;
mod maze;

pub use geom::Point;
pub use maze::{Maze, MazeError};
