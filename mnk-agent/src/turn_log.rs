use csv::ReaderBuilder;
use mnk_core::board::{Action, Mark};
use serde::Deserialize;
use std::{
    fs::File,
    io::{BufWriter, Read, Write},
    path::Path,
};
use thiserror::Error;

pub const HEADER: &str = "game_no;turn;player;height;width;learn_params;row;column";

#[derive(Error, Debug)]
pub enum TurnLogError {
    #[error("turn log i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed turn log: {0}")]
    Csv(#[from] csv::Error),
}

/// Semicolon separated, fully quoted log with one line per turn.
///
/// The first six fields, each followed by `;`, are written and flushed
/// before the mover is asked for its action, so an aborted game leaves a
/// partial last line. Rows and columns are 0-based.
pub struct TurnLog {
    out: Box<dyn Write>,
}

impl TurnLog {
    pub fn new(mut out: Box<dyn Write>) -> Result<Self, TurnLogError> {
        writeln!(out, "{HEADER}")?;
        out.flush()?;

        Ok(Self { out })
    }

    pub fn create(path: impl AsRef<Path>) -> Result<Self, TurnLogError> {
        Self::new(Box::new(BufWriter::new(File::create(path)?)))
    }

    pub fn begin_turn(
        &mut self,
        game_no: usize,
        turn: usize,
        player: Mark,
        height: usize,
        width: usize,
        learn_params: &str,
    ) -> Result<(), TurnLogError> {
        let (game_no, turn) = (game_no.to_string(), turn.to_string());
        let (height, width) = (height.to_string(), width.to_string());
        let fields: [&str; 6] = [&game_no, &turn, player.name(), &height, &width, learn_params];

        for field in fields {
            write_field(&mut self.out, field)?;
            self.out.write_all(b";")?;
        }
        self.out.flush()?;

        Ok(())
    }

    pub fn end_turn(&mut self, action: Action) -> Result<(), TurnLogError> {
        write_field(&mut self.out, &action.row.to_string())?;
        self.out.write_all(b";")?;
        write_field(&mut self.out, &action.col.to_string())?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;

        Ok(())
    }
}

/// Quotes `field`, doubling any quote inside it.
fn write_field(out: &mut dyn Write, field: &str) -> std::io::Result<()> {
    write!(out, "\"{}\"", field.replace('"', "\"\""))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TurnRecord {
    pub game_no: usize,
    pub turn: usize,
    pub player: String,
    pub height: usize,
    pub width: usize,
    pub learn_params: String,
    /// Missing on the last line of an aborted game.
    pub row: Option<usize>,
    pub column: Option<usize>,
}

impl TurnRecord {
    pub fn mark(&self) -> Option<Mark> {
        Mark::from_name(&self.player)
    }

    pub fn action(&self) -> Option<Action> {
        Some(Action::new(self.row?, self.column?))
    }
}

pub fn read_turn_log(input: impl Read) -> Result<Vec<TurnRecord>, TurnLogError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_reader(input);

    let records = reader
        .deserialize()
        .collect::<Result<Vec<TurnRecord>, csv::Error>>()?;

    Ok(records)
}
