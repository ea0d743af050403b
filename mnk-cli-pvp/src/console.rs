use mnk_agent::{
    agent::{Agent, AgentError},
    view::View,
};
use mnk_core::{board::Action, state::GameState};
use std::{
    cell::RefCell,
    io::{BufRead, ErrorKind, Write},
    rc::Rc,
};
use tracing::warn;

/// Prints the side to move, or the result, followed by the board.
pub struct ConsoleView<W> {
    out: W,
}

impl<W: Write> ConsoleView<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    fn render(&mut self, state: &GameState) -> std::io::Result<()> {
        writeln!(self.out, "===========================")?;

        if !state.is_ended() {
            writeln!(self.out, "{}'s turn", state.mover())?;
        } else if state.winner().is_empty() {
            writeln!(self.out, "draw!")?;
        } else {
            writeln!(self.out, "{} wins!", state.winner())?;
        }

        writeln!(self.out, "{}", state.board())?;
        self.out.flush()
    }
}

impl<W: Write> View for ConsoleView<W> {
    fn update(&mut self, state: &GameState) {
        if let Err(err) = self.render(state) {
            warn!(%err, "failed to render board");
        }
    }
}

/// Reads moves from a person at the console until one is playable.
///
/// Both players of a human game read from the same input.
pub struct ConsoleHumanAgent<R, W> {
    input: Rc<RefCell<R>>,
    out: W,
}

impl<R: BufRead, W: Write> ConsoleHumanAgent<R, W> {
    pub fn new(input: Rc<RefCell<R>>, out: W) -> Self {
        Self { input, out }
    }

    fn read_position(&mut self, state: &GameState) -> Result<Action, AgentError> {
        let board = state.board();

        loop {
            writeln!(self.out)?;
            write!(
                self.out,
                "enter position to place stone for {} ({}): ",
                state.mover(),
                state.mover().symbol()
            )?;
            self.out.flush()?;

            let mut input = String::new();
            if self.input.borrow_mut().read_line(&mut input)? == 0 {
                return Err(std::io::Error::new(ErrorKind::UnexpectedEof, "input closed").into());
            }

            let action = match board.parse_index(&input) {
                Some(action) => action,
                None => {
                    writeln!(self.out, "invalid position")?;
                    continue;
                }
            };

            if board.get(action).is_some_and(|mark| !mark.is_empty()) {
                writeln!(
                    self.out,
                    "position {} is already occupied",
                    board.index_to_position(action).unwrap_or_default()
                )?;
                continue;
            }

            return Ok(action);
        }
    }
}

impl<R: BufRead, W: Write> Agent for ConsoleHumanAgent<R, W> {
    fn get_action(&mut self, state: &GameState) -> Result<Action, AgentError> {
        self.read_position(state)
    }

    fn win(&mut self, _state: &GameState) -> Result<(), AgentError> {
        Ok(())
    }

    fn loss(&mut self, _state: &GameState) -> Result<(), AgentError> {
        Ok(())
    }

    fn draw(&mut self, _state: &GameState) -> Result<(), AgentError> {
        Ok(())
    }

    fn learn_params(&self) -> String {
        "human".to_owned()
    }
}
