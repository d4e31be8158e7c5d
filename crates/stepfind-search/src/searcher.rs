//! The incremental A* engine.

use stepfind_core::{Maze, MazeError, Point};

use crate::movement::Movement;
use crate::node::{Node, NodeId, NodeState};

/// Where the search stands after a [`Searcher::step`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Status {
    /// The open set is non-empty and the end has not been expanded yet.
    Running,
    /// The most recently expanded node is the end; `path()` holds a
    /// complete shortest path (under an admissible heuristic).
    Succeeded,
    /// The open set drained before reaching the end; no path exists.
    Exhausted,
}

impl Status {
    /// Whether the search has finished, successfully or not.
    #[inline]
    pub fn is_terminal(self) -> bool {
        self != Self::Running
    }
}

/// Incremental A* search over a [`Maze`].
///
/// The engine owns one search node per free cell, allocated up front in
/// an arena, and advances exactly one node expansion per [`step`](Self::step)
/// call. Between calls the open set, closed set, current node, and best
/// path so far can be read through the accessors; reads have no side
/// effects. Once a terminal [`Status`] is reached, further `step` calls
/// return it unchanged.
///
/// The injected distance function serves both as the heuristic against the
/// end and as the cost of a single move, so with the default functions a
/// diagonal step costs √2 and an orthogonal step costs 1.
pub struct Searcher {
    maze: Maze,
    heuristic: Box<dyn Fn(Point, Point) -> f64>,
    /// Node arena; all cross-node links are indexes into it.
    nodes: Vec<Node>,
    /// Dense row-major map from cell to arena index (`None` for walls).
    index: Vec<Option<NodeId>>,
    /// Discovery-ordered frontier. Kept as a plain vector: the minimum-f
    /// scan takes the first minimum it meets, which is the documented
    /// tie-break (lowest discovery index wins).
    open: Vec<NodeId>,
    /// Expansion-ordered finalized nodes.
    closed: Vec<NodeId>,
    current: Option<NodeId>,
    path: Option<Vec<Point>>,
    status: Status,
}

impl Searcher {
    /// Create an engine with the movement policy's default distance
    /// function ([`manhattan`](crate::manhattan) for cardinal movement,
    /// [`euclidean`](crate::euclidean) for diagonal).
    pub fn new(maze: Maze, movement: Movement) -> Result<Self, MazeError> {
        let distance = movement.default_distance();
        Self::with_heuristic(maze, movement, distance)
    }

    /// Create an engine with a caller-supplied distance function, used
    /// both as heuristic and as step cost.
    ///
    /// The function must be non-negative; it must also never overestimate
    /// the true remaining cost (be admissible) for the found path to be
    /// optimal. A non-admissible function still terminates, it just may
    /// return a longer path.
    pub fn with_heuristic(
        maze: Maze,
        movement: Movement,
        heuristic: impl Fn(Point, Point) -> f64 + 'static,
    ) -> Result<Self, MazeError> {
        for p in [maze.start(), maze.end()] {
            if !maze.contains(p) {
                return Err(MazeError::OutOfBounds(p));
            }
            if maze.wall(p) {
                return Err(MazeError::OutOfBounds(p));
            }
        }
        if maze.start() == maze.end() {
            return Err(MazeError::StartIsEnd(maze.start()));
        }

        // Build the arena: one node per free cell, row-major.
        let len = maze.width() as usize * maze.height() as usize;
        let mut nodes = Vec::new();
        let mut index = vec![None; len];
        for y in 0..maze.height() {
            for x in 0..maze.width() {
                let p = Point::new(x, y);
                if maze.free(p) {
                    index[(y * maze.width() + x) as usize] = Some(nodes.len());
                    nodes.push(Node::new(p));
                }
            }
        }

        // Link neighbor lists in offset order.
        for id in 0..nodes.len() {
            let p = nodes[id].pos;
            for &d in movement.offsets() {
                let np = p + d;
                if maze.free(np) {
                    let nid = index[(np.y * maze.width() + np.x) as usize]
                        .ok_or(MazeError::OutOfBounds(np))?;
                    nodes[id].neighbors.push(nid);
                }
            }
        }

        let start_id = index[(maze.start().y * maze.width() + maze.start().x) as usize]
            .ok_or(MazeError::OutOfBounds(maze.start()))?;
        nodes[start_id].g = 0.0;
        nodes[start_id].h = heuristic(maze.start(), maze.end());
        nodes[start_id].state = NodeState::Open;

        log::debug!(
            "searching {}x{} maze, {} free cells, {} -> {}",
            maze.width(),
            maze.height(),
            nodes.len(),
            maze.start(),
            maze.end()
        );

        Ok(Self {
            maze,
            heuristic: Box::new(heuristic),
            nodes,
            index,
            open: vec![start_id],
            closed: Vec::new(),
            current: None,
            path: None,
            status: Status::Running,
        })
    }

    /// Perform one node expansion and report where the search stands.
    ///
    /// Expands the open node with the lowest `f = g + h` (first discovered
    /// wins ties), finalizes it, relaxes its unclosed neighbors, and
    /// recomputes the best path so far. Returns [`Status::Succeeded`] when
    /// the expanded node is the end, [`Status::Exhausted`] when the open
    /// set was already empty, and [`Status::Running`] otherwise. After a
    /// terminal status this is a no-op returning that status.
    pub fn step(&mut self) -> Status {
        if self.status.is_terminal() {
            return self.status;
        }

        let Some(slot) = self.min_open() else {
            self.path = None;
            self.status = Status::Exhausted;
            log::debug!("open set drained before reaching {}", self.maze.end());
            return self.status;
        };

        // `Vec::remove` keeps the remaining frontier in discovery order.
        let id = self.open.remove(slot);
        self.nodes[id].state = NodeState::Closed;
        self.closed.push(id);
        self.current = Some(id);

        let pos = self.nodes[id].pos;
        let g = self.nodes[id].g;
        let end = self.maze.end();

        for k in 0..self.nodes[id].neighbors.len() {
            let nid = self.nodes[id].neighbors[k];
            let neighbor = &self.nodes[nid];
            if neighbor.state == NodeState::Closed {
                continue;
            }
            let npos = neighbor.pos;
            let new_g = g + (self.heuristic)(npos, pos);

            if neighbor.state == NodeState::Open {
                if new_g < neighbor.g {
                    self.nodes[nid].g = new_g;
                    self.nodes[nid].previous = Some(id);
                }
            } else {
                self.nodes[nid].g = new_g;
                self.nodes[nid].h = (self.heuristic)(npos, end);
                self.nodes[nid].previous = Some(id);
                self.nodes[nid].state = NodeState::Open;
                self.open.push(nid);
            }
        }

        self.path = Some(self.track_path(id));
        self.status = if pos == end {
            log::debug!("reached {} after {} expansions", end, self.closed.len());
            Status::Succeeded
        } else {
            Status::Running
        };
        self.status
    }

    /// Index into `open` of the node with minimal `f`, keeping the first
    /// minimum encountered.
    fn min_open(&self) -> Option<usize> {
        let mut slot = 0;
        for i in 1..self.open.len() {
            if self.nodes[self.open[i]].f() < self.nodes[self.open[slot]].f() {
                slot = i;
            }
        }
        (!self.open.is_empty()).then_some(slot)
    }

    /// Walk `previous` links back from `id`, yielding `[current, ..., start]`.
    fn track_path(&self, id: NodeId) -> Vec<Point> {
        let mut path = vec![self.nodes[id].pos];
        let mut curr = id;
        while let Some(prev) = self.nodes[curr].previous {
            path.push(self.nodes[prev].pos);
            curr = prev;
        }
        path
    }

    fn node_at(&self, p: Point) -> Option<NodeId> {
        if !self.maze.contains(p) {
            return None;
        }
        self.index[(p.y * self.maze.width() + p.x) as usize]
    }

    /// The maze being searched.
    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    /// Where the search stands; [`Status::Running`] before the first step.
    pub fn status(&self) -> Status {
        self.status
    }

    /// The most recently expanded position, or `None` before the first
    /// step.
    pub fn current(&self) -> Option<Point> {
        self.current.map(|id| self.nodes[id].pos)
    }

    /// The best path found so far, ordered from the current node back to
    /// the start. `None` before the first step and after [`Status::Exhausted`].
    pub fn path(&self) -> Option<&[Point]> {
        self.path.as_deref()
    }

    /// Positions discovered but not yet expanded, in discovery order.
    pub fn open_set(&self) -> impl Iterator<Item = Point> + '_ {
        self.open.iter().map(|&id| self.nodes[id].pos)
    }

    /// Positions already expanded, in expansion order.
    pub fn closed_set(&self) -> impl Iterator<Item = Point> + '_ {
        self.closed.iter().map(|&id| self.nodes[id].pos)
    }

    /// Cost of the best known path from the start to `p`, or `None` if
    /// `p` is a wall, out of bounds, or not yet discovered.
    pub fn cost(&self, p: Point) -> Option<f64> {
        let id = self.node_at(p)?;
        let node = &self.nodes[id];
        (node.state != NodeState::Unvisited).then_some(node.g)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::distance::{chebyshev, euclidean, manhattan};

    fn open_maze(width: i32, height: i32, start: Point, end: Point) -> Maze {
        let mask = vec![false; (width * height) as usize];
        Maze::from_mask(width, height, start, end, &mask).unwrap()
    }

    fn run_to_end(s: &mut Searcher) -> Status {
        let limit = s.maze().free_count();
        for _ in 0..limit {
            let status = s.step();
            if status.is_terminal() {
                return status;
            }
        }
        panic!("search did not terminate within {limit} expansions");
    }

    #[test]
    fn three_by_one_walkthrough() {
        let maze = open_maze(3, 1, Point::new(0, 0), Point::new(2, 0));
        let mut s = Searcher::new(maze, Movement::Cardinal).unwrap();

        assert_eq!(s.status(), Status::Running);
        assert_eq!(s.current(), None);
        assert_eq!(s.path(), None);
        assert_eq!(s.open_set().collect::<Vec<_>>(), vec![Point::new(0, 0)]);
        assert_eq!(s.closed_set().count(), 0);

        assert_eq!(s.step(), Status::Running);
        assert_eq!(s.current(), Some(Point::new(0, 0)));
        assert_eq!(s.open_set().collect::<Vec<_>>(), vec![Point::new(1, 0)]);
        assert_eq!(s.closed_set().collect::<Vec<_>>(), vec![Point::new(0, 0)]);
        assert_eq!(s.cost(Point::new(1, 0)), Some(1.0));
        assert_eq!(s.path(), Some(&[Point::new(0, 0)][..]));

        assert_eq!(s.step(), Status::Running);
        assert_eq!(s.current(), Some(Point::new(1, 0)));
        assert_eq!(s.cost(Point::new(2, 0)), Some(2.0));
        assert_eq!(s.path(), Some(&[Point::new(1, 0), Point::new(0, 0)][..]));

        assert_eq!(s.step(), Status::Succeeded);
        assert_eq!(
            s.path(),
            Some(&[Point::new(2, 0), Point::new(1, 0), Point::new(0, 0)][..])
        );

        // Terminal status is sticky and the state frozen.
        assert_eq!(s.step(), Status::Succeeded);
        assert_eq!(s.path().unwrap().len(), 3);
        assert_eq!(s.closed_set().count(), 3);
    }

    #[test]
    fn cardinal_path_length_is_manhattan_plus_one() {
        let pairs = [
            (Point::new(0, 0), Point::new(9, 7)),
            (Point::new(3, 6), Point::new(3, 0)),
            (Point::new(9, 0), Point::new(0, 7)),
            (Point::new(4, 4), Point::new(5, 4)),
        ];
        for (start, end) in pairs {
            let maze = open_maze(10, 8, start, end);
            let mut s = Searcher::new(maze, Movement::Cardinal).unwrap();
            assert_eq!(run_to_end(&mut s), Status::Succeeded);
            let want = manhattan(start, end) as usize + 1;
            assert_eq!(s.path().unwrap().len(), want, "{start} -> {end}");
        }
    }

    #[test]
    fn diagonal_path_length_is_chebyshev_plus_one() {
        let pairs = [
            (Point::new(0, 0), Point::new(9, 7)),
            (Point::new(2, 5), Point::new(8, 1)),
            (Point::new(9, 7), Point::new(0, 0)),
            (Point::new(1, 1), Point::new(2, 2)),
        ];
        for (start, end) in pairs {
            let maze = open_maze(10, 8, start, end);
            let mut s = Searcher::new(maze, Movement::Diagonal).unwrap();
            assert_eq!(run_to_end(&mut s), Status::Succeeded);
            let want = chebyshev(start, end) as usize + 1;
            assert_eq!(s.path().unwrap().len(), want, "{start} -> {end}");
        }
    }

    #[test]
    fn enclosed_end_exhausts_without_a_path() {
        let maze = Maze::from_text(
            "@....\n\
             .###.\n\
             .#>#.\n\
             .###.\n\
             .....",
        )
        .unwrap();
        let mut s = Searcher::new(maze, Movement::Cardinal).unwrap();
        assert_eq!(run_to_end(&mut s), Status::Exhausted);
        assert_eq!(s.path(), None);
        // Everything reachable was expanded; the ring interior was not.
        assert!(s.closed_set().all(|p| p != Point::new(2, 2)));
        assert_eq!(s.step(), Status::Exhausted);
    }

    #[test]
    fn sealed_start_exhausts_after_one_expansion() {
        let maze = Maze::from_text(
            "@#.\n\
             ##.\n\
             ..>",
        )
        .unwrap();
        let mut s = Searcher::new(maze, Movement::Cardinal).unwrap();
        assert_eq!(s.step(), Status::Running);
        assert_eq!(s.path(), Some(&[Point::new(0, 0)][..]));
        assert_eq!(s.step(), Status::Exhausted);
        assert_eq!(s.path(), None);
    }

    #[test]
    fn equal_f_ties_resolve_by_discovery_order() {
        // From (1, 1) toward (2, 2), the down and right neighbors share
        // f = 2; down is discovered first (offset order) and must win.
        let maze = open_maze(3, 3, Point::new(1, 1), Point::new(2, 2));
        let mut s = Searcher::new(maze, Movement::Cardinal).unwrap();
        assert_eq!(s.step(), Status::Running);
        assert_eq!(s.step(), Status::Running);
        assert_eq!(s.current(), Some(Point::new(1, 2)));
    }

    #[test]
    fn reads_are_idempotent_between_steps() {
        let maze = open_maze(6, 6, Point::new(0, 0), Point::new(5, 5));
        let mut s = Searcher::new(maze, Movement::Diagonal).unwrap();
        s.step();
        s.step();
        let open1: Vec<_> = s.open_set().collect();
        let closed1: Vec<_> = s.closed_set().collect();
        let path1 = s.path().map(<[Point]>::to_vec);
        let open2: Vec<_> = s.open_set().collect();
        let closed2: Vec<_> = s.closed_set().collect();
        let path2 = s.path().map(<[Point]>::to_vec);
        assert_eq!(open1, open2);
        assert_eq!(closed1, closed2);
        assert_eq!(path1, path2);
        assert_eq!(s.status(), Status::Running);
    }

    #[test]
    fn expanded_estimate_never_decreases_on_random_mazes() {
        // With a consistent heuristic (the metric itself), the f of
        // expanded nodes is non-decreasing. g alone is not monotone, but
        // it must grow strictly along the reconstructed path.
        for seed in 0..20u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let start = Point::new(0, 0);
            let end = Point::new(19, 14);
            let maze = Maze::generate(20, 15, start, end, 0.3, &mut rng).unwrap();
            let mut s = Searcher::new(maze, Movement::Diagonal).unwrap();

            let mut prev_f = 0.0f64;
            let status = loop {
                let status = s.step();
                if status == Status::Exhausted {
                    break status;
                }
                let p = s.current().unwrap();
                let f = s.cost(p).unwrap() + euclidean(p, end);
                assert!(f >= prev_f - 1e-9, "seed {seed}: f dropped {prev_f} -> {f}");
                prev_f = f;
                if status == Status::Succeeded {
                    break status;
                }
            };

            if status == Status::Succeeded {
                let path = s.path().unwrap();
                for pair in path.windows(2) {
                    assert!(s.cost(pair[0]).unwrap() > s.cost(pair[1]).unwrap());
                }
                assert_eq!(*path.last().unwrap(), start);
                assert_eq!(path[0], end);
            }
        }
    }

    #[test]
    fn terminates_within_free_cell_count() {
        for seed in 0..10u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let maze =
                Maze::generate(12, 12, Point::new(0, 0), Point::new(11, 11), 0.45, &mut rng)
                    .unwrap();
            let mut s = Searcher::new(maze, Movement::Cardinal).unwrap();
            // run_to_end panics if the bound is exceeded.
            run_to_end(&mut s);
        }
    }

    #[test]
    fn custom_heuristics_still_terminate() {
        let maze = open_maze(5, 5, Point::new(0, 0), Point::new(4, 4));
        let mut inflated =
            Searcher::with_heuristic(maze.clone(), Movement::Cardinal, |a, b| {
                2.0 * manhattan(a, b)
            })
            .unwrap();
        assert_eq!(run_to_end(&mut inflated), Status::Succeeded);

        // Zero distance degenerates every cost to 0 but must still finish.
        let mut zero = Searcher::with_heuristic(maze, Movement::Cardinal, |_, _| 0.0).unwrap();
        assert_eq!(run_to_end(&mut zero), Status::Succeeded);
    }

    #[test]
    fn cost_is_none_off_the_search() {
        let maze = Maze::from_text(
            "@#>\n\
             .#.",
        )
        .unwrap();
        let mut s = Searcher::new(maze, Movement::Cardinal).unwrap();
        s.step();
        assert_eq!(s.cost(Point::new(1, 0)), None, "wall");
        assert_eq!(s.cost(Point::new(5, 5)), None, "out of bounds");
        assert_eq!(s.cost(Point::new(2, 1)), None, "undiscovered");
        assert_eq!(s.cost(Point::new(0, 0)), Some(0.0));
    }

    #[test]
    fn cheaper_route_relaxes_open_node() {
        // 2x2 maze, start A = (0, 0), end D = (1, 1). The distance
        // function makes the step into D from B = (1, 0) cost 5 while
        // keeping B's estimate low, so D is first discovered at g = 6
        // through B and later improved to g = 2 through C = (0, 1).
        let weights = |a: Point, b: Point| -> f64 {
            match ((a.x, a.y), (b.x, b.y)) {
                ((1, 1), (1, 0)) => 5.0,
                ((1, 0), (1, 1)) => 0.1,
                _ => manhattan(a, b),
            }
        };
        let maze = open_maze(2, 2, Point::new(0, 0), Point::new(1, 1));
        let mut s = Searcher::with_heuristic(maze, Movement::Cardinal, weights).unwrap();

        assert_eq!(s.step(), Status::Running); // expands A
        assert_eq!(s.step(), Status::Running); // expands B, discovers D at 6
        assert_eq!(s.cost(Point::new(1, 1)), Some(6.0));
        assert_eq!(s.step(), Status::Running); // expands C, relaxes D to 2
        assert_eq!(s.cost(Point::new(1, 1)), Some(2.0));
        assert_eq!(s.step(), Status::Succeeded);
        assert_eq!(
            s.path(),
            Some(&[Point::new(1, 1), Point::new(0, 1), Point::new(0, 0)][..])
        );
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn status_round_trip() {
        for status in [Status::Running, Status::Succeeded, Status::Exhausted] {
            let json = serde_json::to_string(&status).unwrap();
            let back: Status = serde_json::from_str(&json).unwrap();
            assert_eq!(status, back);
        }
    }

    #[test]
    fn movement_round_trip() {
        for m in [Movement::Cardinal, Movement::Diagonal] {
            let json = serde_json::to_string(&m).unwrap();
            let back: Movement = serde_json::from_str(&json).unwrap();
            assert_eq!(m, back);
        }
    }
}
