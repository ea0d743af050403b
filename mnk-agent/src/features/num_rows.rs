use super::{FeatureExtractor, Owner, RunKey, RunLayout, ISOLATION_NAME};
use mnk_core::board::{Action, Board, Mark};

/// Line directions walked from every stone: right, down-right, down, down-left.
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 1), (1, 0), (1, -1)];

/// Counts open and blocked runs of every length for both players.
///
/// A run is counted once per direction, starting from its first stone in
/// row-major order. Runs that can never grow to the win length because they
/// are walled in on both sides are ignored.
#[derive(Debug, Clone)]
pub struct NumRowsFeatures {
    win_length: usize,
    layout: RunLayout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Run {
    mark: Mark,
    count: usize,
    span: usize,
    enemy_behind: bool,
}

impl NumRowsFeatures {
    pub fn new(win_length: usize) -> Self {
        Self {
            win_length,
            layout: RunLayout::new(win_length),
        }
    }

    pub fn layout(&self) -> &RunLayout {
        &self.layout
    }

    /// Adds one to the bucket of every candidate run on the board.
    fn count_runs(
        &self,
        board: &Board,
        occupied: &[(Action, Mark)],
        mover: Mark,
        buckets: &mut [u32],
    ) {
        let mut absorbed = vec![[false; DIRECTIONS.len()]; board.height() * board.width()];

        for &(action, mark) in occupied {
            for direction in 0..DIRECTIONS.len() {
                if absorbed[action.row * board.width() + action.col][direction] {
                    continue;
                }

                let run = self.scan(board, action, mark, direction, &mut absorbed);

                if run.span < self.win_length || run.count < 2 {
                    continue;
                }

                let key = RunKey {
                    owner: Owner::of(run.mark, mover),
                    length: run.count,
                    enemy_behind: run.enemy_behind && run.count != self.win_length,
                };

                // overlines longer than the win length have no bucket
                if let Some(index) = self.layout.index(key) {
                    buckets[index] += 1;
                }
            }
        }
    }

    /// Walks forward, then backward, from `origin` for at most `win_length`
    /// cells in total.
    fn scan(
        &self,
        board: &Board,
        origin: Action,
        mark: Mark,
        direction: usize,
        absorbed: &mut [[bool; DIRECTIONS.len()]],
    ) -> Run {
        let k = self.win_length;
        let (d_row, d_col) = DIRECTIONS[direction];
        let mut run = Run {
            mark,
            count: 1,
            span: 1,
            enemy_behind: false,
        };
        // no empty cell between the last stone of the run and the scan head
        let mut live = true;

        let (mut row, mut col) = (origin.row as isize, origin.col as isize);
        for _ in 0..k {
            row += d_row;
            col += d_col;

            let Some(next) = board.get_signed(row, col) else {
                run.enemy_behind |= live;
                break;
            };

            if next == mark {
                run.count += 1;
                absorbed[row as usize * board.width() + col as usize][direction] = true;
                live = true;
            } else if !next.is_empty() {
                run.enemy_behind |= live;
                break;
            } else {
                live = false;
            }

            run.span += 1;
            if run.span == k {
                break;
            }
        }

        let (mut row, mut col) = (origin.row as isize, origin.col as isize);
        for step in 0..k {
            row -= d_row;
            col -= d_col;

            let Some(next) = board.get_signed(row, col) else {
                run.enemy_behind |= live;
                break;
            };

            if next == mark {
                run.count += 1;
                absorbed[row as usize * board.width() + col as usize][direction] = true;
            } else if !next.is_empty() {
                run.enemy_behind |= step == 0;
                break;
            }

            run.span += 1;
            if run.span >= k {
                break;
            }
        }

        run
    }
}

/// True when no two stones are within Euclidean distance 2, i.e. no two
/// stones touch, diagonals included.
pub(super) fn is_isolated(occupied: &[(Action, Mark)]) -> bool {
    occupied.iter().enumerate().all(|(i, (a, _))| {
        occupied[i + 1..]
            .iter()
            .all(|(b, _)| a.row.abs_diff(b.row) > 1 || a.col.abs_diff(b.col) > 1)
    })
}

impl FeatureExtractor for NumRowsFeatures {
    fn win_length(&self) -> usize {
        self.win_length
    }

    fn features_count(&self) -> usize {
        self.layout.len() + 1
    }

    fn feature_names(&self) -> Vec<String> {
        self.layout
            .keys()
            .iter()
            .map(RunKey::to_string)
            .chain([ISOLATION_NAME.to_owned()])
            .collect()
    }

    fn features(&self, board: &Board, mover: Mark) -> Vec<u32> {
        let occupied = board.occupied();
        let isolation = self.layout.len();
        let mut features = vec![0; self.features_count()];

        if occupied.len() == 1 {
            features[isolation] = 1;
            return features;
        }

        self.count_runs(board, &occupied, mover, &mut features[..isolation]);

        if features[..isolation].iter().all(|&count| count == 0) {
            features[isolation] = is_isolated(&occupied) as u32;
        }

        features
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_from(rows: &[&str]) -> Board {
        let mut board = Board::new(rows.len(), rows[0].len());

        for (r, line) in rows.iter().enumerate() {
            for (c, symbol) in line.chars().enumerate() {
                let mark = match symbol {
                    'X' => Mark::X,
                    'O' => Mark::O,
                    _ => Mark::Empty,
                };
                board.set(Action::new(r, c), mark);
            }
        }

        board
    }

    fn bucket(
        extractor: &NumRowsFeatures,
        owner: Owner,
        length: usize,
        enemy_behind: bool,
    ) -> usize {
        extractor
            .layout()
            .index(RunKey {
                owner,
                length,
                enemy_behind,
            })
            .unwrap()
    }

    /// Non-zero buckets as (name, count), for readable assertions.
    fn non_zero(extractor: &NumRowsFeatures, features: &[u32]) -> Vec<(String, u32)> {
        extractor
            .feature_names()
            .into_iter()
            .zip(features.iter().copied())
            .filter(|(_, count)| *count != 0)
            .collect()
    }

    #[test]
    fn test_features_count() {
        for k in [3, 4, 5] {
            let extractor = NumRowsFeatures::new(k);
            assert_eq!(extractor.features_count(), 2 * 2 * (k - 1) - 1);
            assert_eq!(extractor.feature_names().len(), extractor.features_count());

            let features = extractor.features(&Board::new(9, 9), Mark::X);
            assert_eq!(features.len(), extractor.features_count());
        }
    }

    #[test]
    fn test_single_stone_is_isolated() {
        let extractor = NumRowsFeatures::new(5);
        let board = board_from(&[".....", "..X..", "....."]);
        let features = extractor.features(&board, Mark::O);

        assert_eq!(features[extractor.layout().len()], 1);
        assert!(features[..extractor.layout().len()].iter().all(|&c| c == 0));
    }

    #[test]
    fn test_adjacent_stones_are_not_isolated() {
        let extractor = NumRowsFeatures::new(3);
        let board = board_from(&["......", "..XX..", "......", "......"]);
        let features = extractor.features(&board, Mark::X);

        assert_eq!(features[extractor.layout().len()], 0);
        assert_eq!(features[bucket(&extractor, Owner::Mine, 2, false)], 1);
    }

    #[test]
    fn test_distant_stones_are_isolated() {
        let extractor = NumRowsFeatures::new(5);
        let board = board_from(&["X......", ".......", "..O...X"]);
        let features = extractor.features(&board, Mark::X);

        assert_eq!(non_zero(&extractor, &features), vec![("isolated".to_owned(), 1)]);
    }

    #[test]
    fn test_open_and_blocked_runs() {
        let extractor = NumRowsFeatures::new(4);

        let open = board_from(&["........", "..XXX...", "........"]);
        assert_eq!(
            non_zero(&extractor, &extractor.features(&open, Mark::X)),
            vec![("mine/3/open".to_owned(), 1)]
        );

        let blocked = board_from(&["........", ".OXXX...", "........"]);
        assert_eq!(
            non_zero(&extractor, &extractor.features(&blocked, Mark::X)),
            vec![("mine/3/blocked".to_owned(), 1)]
        );

        let edge = board_from(&["........", ".....XXX", "........"]);
        assert_eq!(
            non_zero(&extractor, &extractor.features(&edge, Mark::O)),
            vec![("theirs/3/blocked".to_owned(), 1)]
        );
    }

    #[test]
    fn test_edge_behind_origin_blocks_only_a_live_chain() {
        let extractor = NumRowsFeatures::new(4);

        // the forward scan ends on an empty cell, so the chain is no longer
        // live when the backward scan meets the left edge
        let board = board_from(&["........", "XXX.....", "........"]);
        assert_eq!(
            non_zero(&extractor, &extractor.features(&board, Mark::O)),
            vec![("theirs/3/open".to_owned(), 1)]
        );
    }

    #[test]
    fn test_gapped_run_counts_stones_within_reach() {
        let extractor = NumRowsFeatures::new(5);
        let board = board_from(&["..........", "..XX.X....", ".........."]);

        assert_eq!(
            non_zero(&extractor, &extractor.features(&board, Mark::X)),
            vec![("mine/3/open".to_owned(), 1)]
        );
    }

    #[test]
    fn test_sandwiched_run_is_ignored() {
        let extractor = NumRowsFeatures::new(4);
        let board = board_from(&["OXXO", "....", "...."]);
        let features = extractor.features(&board, Mark::X);

        assert_eq!(features[bucket(&extractor, Owner::Mine, 2, false)], 0);
        assert_eq!(features[bucket(&extractor, Owner::Mine, 2, true)], 0);
    }

    #[test]
    fn test_completed_line_is_never_blocked() {
        let extractor = NumRowsFeatures::new(3);
        let board = board_from(&["OXXX.", ".....", "....."]);
        let features = extractor.features(&board, Mark::X);

        assert_eq!(features[bucket(&extractor, Owner::Mine, 3, false)], 1);
    }

    #[test]
    fn test_swapping_mover_swaps_owners() {
        let extractor = NumRowsFeatures::new(4);
        let board = board_from(&[
            "........",
            ".XXO....",
            "..XO....",
            "...XO...",
            "....O...",
            "........",
        ]);

        let as_x = extractor.features(&board, Mark::X);
        let as_o = extractor.features(&board, Mark::O);
        let half = extractor.layout().len() / 2;
        let isolation = extractor.layout().len();

        assert_eq!(as_x[..half], as_o[half..isolation]);
        assert_eq!(as_x[half..isolation], as_o[..half]);
        assert_eq!(as_x[isolation], as_o[isolation]);
        assert!(as_x[..isolation].iter().any(|&c| c != 0));
    }

    #[test]
    fn test_empty_board_is_isolated() {
        let extractor = NumRowsFeatures::new(3);
        let features = extractor.features(&Board::new(3, 3), Mark::X);

        assert_eq!(features[extractor.layout().len()], 1);
    }
}
