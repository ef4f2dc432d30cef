use std::{
    cmp::Ordering,
    collections::BinaryHeap,
    fmt::{self, Display},
    ops::Index,
    rc::Rc,
};

use itertools::Itertools;
use smallvec::SmallVec;
use thiserror::Error;

const BLANK: u32 = 0;

// up, down, left, right
const DELTAS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("board dimension must be at least 2, got {0}")]
    TooSmall(usize),
    #[error("row {row} has {got} tiles, expected {expected}")]
    RaggedRow {
        row: usize,
        got: usize,
        expected: usize,
    },
    #[error("tile value {value} does not fit a {n}x{n} board")]
    OutOfRange { value: u32, n: usize },
    #[error("tile value {0} appears more than once")]
    Duplicate(u32),
    #[error("expected a number, got {0:?}")]
    BadToken(String),
    #[error("expected {expected} tile values, got {got}")]
    WrongCount { expected: usize, got: usize },
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Board {
    n: usize,
    tiles: Vec<u32>,
}

impl Board {
    pub fn new(rows: Vec<Vec<u32>>) -> Result<Board, BoardError> {
        let n = rows.len();
        if n < 2 {
            return Err(BoardError::TooSmall(n));
        }
        for (row, r) in rows.iter().enumerate() {
            if r.len() != n {
                return Err(BoardError::RaggedRow {
                    row,
                    got: r.len(),
                    expected: n,
                });
            }
        }

        let tiles: Vec<u32> = rows.into_iter().flatten().collect();

        // n*n values, all in range, none repeated: a permutation of 0..n*n,
        // so exactly one blank as well
        let mut seen = vec![false; n * n];
        for &value in &tiles {
            if value as usize >= n * n {
                return Err(BoardError::OutOfRange { value, n });
            }
            if seen[value as usize] {
                return Err(BoardError::Duplicate(value));
            }
            seen[value as usize] = true;
        }

        Ok(Board { n, tiles })
    }

    pub fn dimension(&self) -> usize {
        self.n
    }

    // number of tiles out of place, blank excluded
    pub fn hamming(&self) -> u32 {
        self.tiles
            .iter()
            .enumerate()
            .filter(|&(ix, &v)| v != BLANK && v as usize != ix + 1)
            .count() as u32
    }

    // total grid distance from each tile to its goal cell; admissible since
    // every tile must travel at least that far
    pub fn manhattan(&self) -> u32 {
        self.tiles
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v != BLANK)
            .map(|(ix, &v)| {
                let goal = v as usize - 1;
                let rows = (goal / self.n).abs_diff(ix / self.n);
                let cols = (goal % self.n).abs_diff(ix % self.n);
                (rows + cols) as u32
            })
            .sum()
    }

    pub fn is_goal(&self) -> bool {
        self.hamming() == 0
    }

    // the same board with the first two row-adjacent non-blank tiles swapped;
    // exactly one of a board and its twin is solvable
    pub fn twin(&self) -> Board {
        let ix = self
            .tiles
            .iter()
            .enumerate()
            .tuple_windows()
            .find(|&((ix, &a), (_, &b))| a != BLANK && b != BLANK && (ix + 1) % self.n != 0)
            .map(|((ix, _), _)| ix)
            .expect("a validated board has a row without the blank");

        let mut twin = self.clone();
        twin.tiles.swap(ix, ix + 1);
        twin
    }

    // boards one blank move away, in up, down, left, right order
    pub fn neighbors(&self) -> SmallVec<[Board; 4]> {
        let blank = self
            .tiles
            .iter()
            .position(|&v| v == BLANK)
            .expect("a validated board contains a blank");
        let (i, j) = ((blank / self.n) as i32, (blank % self.n) as i32);

        let mut out = SmallVec::new();
        for (di, dj) in DELTAS {
            let (ti, tj) = (i + di, j + dj);
            if ti < 0 || ti >= self.n as i32 || tj < 0 || tj >= self.n as i32 {
                continue;
            }

            let mut next = self.clone();
            next.tiles.swap(blank, ti as usize * self.n + tj as usize);
            out.push(next);
        }

        out
    }
}

impl Index<(usize, usize)> for Board {
    type Output = u32;
    fn index(&self, index: (usize, usize)) -> &Self::Output {
        &self.tiles[index.0 * self.n + index.1]
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = (self.n * self.n - 1).to_string().len();
        writeln!(f, "{}", self.n)?;
        for row in self.tiles.chunks(self.n) {
            writeln!(
                f,
                "{}",
                row.iter()
                    .format_with(" ", |v, f| f(&format_args!("{v:>width$}")))
            )?;
        }

        Ok(())
    }
}

// Format: a dimension n followed by n*n tile values, whitespace-separated.
pub fn parse_board(input: &str) -> Result<Board, BoardError> {
    fn number<T: std::str::FromStr>(token: &str) -> Result<T, BoardError> {
        token
            .parse()
            .map_err(|_| BoardError::BadToken(token.to_string()))
    }

    let mut tokens = input.split_whitespace();
    let n: usize = match tokens.next() {
        Some(token) => number(token)?,
        None => return Err(BoardError::WrongCount { expected: 1, got: 0 }),
    };
    if n < 2 {
        return Err(BoardError::TooSmall(n));
    }

    let values: Vec<u32> = tokens.map(number).try_collect()?;
    if values.len() != n * n {
        return Err(BoardError::WrongCount {
            expected: n * n,
            got: values.len(),
        });
    }

    Board::new(values.chunks(n).map(<[u32]>::to_vec).collect())
}

struct SearchNode {
    board: Board,
    moves: u32,
    priority: u32,
    predecessor: Option<Rc<SearchNode>>,
}

impl SearchNode {
    fn root(board: Board) -> Rc<SearchNode> {
        let priority = board.manhattan();
        Rc::new(SearchNode {
            board,
            moves: 0,
            priority,
            predecessor: None,
        })
    }

    fn child(board: Board, parent: &Rc<SearchNode>) -> Rc<SearchNode> {
        let moves = parent.moves + 1;
        let priority = moves + board.manhattan();
        Rc::new(SearchNode {
            board,
            moves,
            priority,
            predecessor: Some(Rc::clone(parent)),
        })
    }
}

impl PartialEq for SearchNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SearchNode {}

impl PartialOrd for SearchNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// reversed so that BinaryHeap pops the lowest priority first; ties go to
// the node with more moves behind it
impl Ord for SearchNode {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| self.moves.cmp(&other.moves))
    }
}

struct Frontier {
    queue: BinaryHeap<Rc<SearchNode>>,
    visited: usize,
    enqueued: usize,
}

impl Frontier {
    fn seeded(board: Board) -> Frontier {
        let mut queue = BinaryHeap::new();
        queue.push(SearchNode::root(board));
        Frontier {
            queue,
            visited: 0,
            enqueued: 1,
        }
    }

    // One round of best-first search: pop the most promising node and, unless
    // it is the goal, push a child for each neighbor. The neighbor equal to
    // the popped node's predecessor board would only undo the previous move
    // and is skipped.
    fn step(&mut self) -> Option<Rc<SearchNode>> {
        let node = self
            .queue
            .pop()
            .expect("every expansion pushes at least one node");
        self.visited += 1;

        if node.board.is_goal() {
            return Some(node);
        }

        for neighbor in node.board.neighbors() {
            if let Some(previous) = &node.predecessor {
                if neighbor == previous.board {
                    continue;
                }
            }
            self.queue.push(SearchNode::child(neighbor, &node));
            self.enqueued += 1;
        }

        None
    }
}

pub struct Solver {
    solution: Option<Vec<Board>>,
    visited: usize,
    enqueued: usize,
}

impl Solver {
    // Runs the search to completion: two frontiers in lockstep, one on the
    // board and one on its twin. The twin has opposite solvability, so
    // exactly one of the two reaches the goal, and reaching it first under
    // an admissible heuristic makes the path length minimal.
    pub fn new(initial: Board) -> Solver {
        let mut main = Frontier::seeded(initial.clone());
        let mut twin = Frontier::seeded(initial.twin());

        let solution = loop {
            if let Some(goal) = main.step() {
                break Some(unwind(&goal));
            }
            if twin.step().is_some() {
                break None;
            }
        };

        Solver {
            solution,
            visited: main.visited + twin.visited,
            enqueued: main.enqueued + twin.enqueued,
        }
    }

    pub fn is_solvable(&self) -> bool {
        self.solution.is_some()
    }

    // minimum number of moves, or -1 for an unsolvable board
    pub fn moves(&self) -> i32 {
        match &self.solution {
            Some(path) => path.len() as i32 - 1,
            None => -1,
        }
    }

    // boards along a shortest solution, initial board first
    pub fn solution(&self) -> Option<&[Board]> {
        self.solution.as_deref()
    }

    // (nodes dequeued, nodes enqueued) across both frontiers
    pub fn stats(&self) -> (usize, usize) {
        (self.visited, self.enqueued)
    }
}

fn unwind(goal: &Rc<SearchNode>) -> Vec<Board> {
    let mut path = Vec::with_capacity(goal.moves as usize + 1);
    let mut node = goal;
    loop {
        path.push(node.board.clone());
        match &node.predecessor {
            Some(parent) => node = parent,
            None => break,
        }
    }

    path.reverse();
    path
}
