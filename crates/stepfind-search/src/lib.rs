//! Step-by-step A* shortest-path search on 2D mazes.
//!
//! Unlike a batch pathfinder, the [`Searcher`] advances one node expansion
//! per [`step`](Searcher::step) call and exposes its intermediate state
//! (open set, closed set, best path so far) between calls, so a caller
//! such as a rendering loop can animate the search:
//!
//! ```
//! use stepfind_core::Maze;
//! use stepfind_search::{Movement, Searcher, Status};
//!
//! let maze = Maze::from_text(
//!     "@.#.\n\
//!      .#..\n\
//!      ...>",
//! )
//! .unwrap();
//! let start = maze.start();
//! let end = maze.end();
//! let mut searcher = Searcher::new(maze, Movement::Cardinal).unwrap();
//! loop {
//!     match searcher.step() {
//!         Status::Running => { /* draw open/closed/path */ }
//!         Status::Succeeded => break,
//!         Status::Exhausted => panic!("this maze has a path"),
//!     }
//! }
//! let path = searcher.path().unwrap();
//! assert_eq!(path.first(), Some(&end));
//! assert_eq!(path.last(), Some(&start));
//! ```
//!
//! The heuristic doubles as the step-cost function and is pluggable; the
//! defaults are [`manhattan`] for 4-way movement and [`euclidean`] for
//! 8-way movement, both admissible.

mod distance;
mod movement;
mod node;
mod searcher;

pub use distance::{chebyshev, euclidean, manhattan};
pub use movement::Movement;
pub use searcher::{Searcher, Status};
