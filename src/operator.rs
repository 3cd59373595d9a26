//! The person (or script) choosing doors.

use crate::doors::DoorIndex;
use crate::error::{DealError, DealErrorKind};
use crate::resources::{DoorAction, HistoryItem};
use crate::snapshot::Snapshot;
use derive_getters::Getters;
use std::collections::VecDeque;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{debug, info, instrument};

/// The two player turns, in the order they are played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
pub enum Turn {
    /// Pick a door.
    #[strum(serialize = "selection")]
    Select,
    /// Open a door, switching or staying.
    #[strum(serialize = "reveal")]
    Open,
}

impl Turn {
    /// Door transition requested on this turn.
    pub fn action(self) -> DoorAction {
        match self {
            Turn::Select => DoorAction::Select,
            Turn::Open => DoorAction::Open,
        }
    }

    /// Prompt text, e.g. `Select a door (0, 1, or 2)... `.
    pub fn prompt(self, door_count: usize) -> String {
        let verb = match self {
            Turn::Select => "Select",
            Turn::Open => "Open",
        };
        format!("{} a door ({})... ", verb, choices_label(door_count))
    }
}

/// Lists valid indices the way a person would say them.
pub fn choices_label(door_count: usize) -> String {
    let indices: Vec<String> = (0..door_count).map(|i| i.to_string()).collect();
    match indices.as_slice() {
        [] => "none".to_string(),
        [only] => only.clone(),
        [first, second] => format!("{} or {}", first, second),
        [init @ .., last] => format!("{}, or {}", init.join(", "), last),
    }
}

/// What the operator answered to a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// A door index, not yet bounds-checked.
    Door(usize),
    /// The operator wants out.
    Quit,
}

/// Parses one line of operator input. `None` means "ask again".
pub fn parse_selection(line: &str) -> Option<Selection> {
    let line = line.trim();
    match line.to_ascii_lowercase().as_str() {
        "q" | "quit" | "exit" => Some(Selection::Quit),
        _ => line.parse::<usize>().ok().map(Selection::Door),
    }
}

/// Source of door choices and sink for game state.
#[async_trait::async_trait]
pub trait Operator: Send {
    /// Shows the state of the game between turns.
    fn show(&mut self, snapshot: &Snapshot) -> Result<(), DealError>;

    /// Asks for a door index for `turn`.
    async fn choose_door(&mut self, turn: Turn, doors: &DoorIndex)
    -> Result<Selection, DealError>;

    /// Tells the operator why their last answer was refused.
    fn reject(&mut self, error: &DealError) -> Result<(), DealError>;

    /// Shows the game's transition history.
    fn show_history(&mut self, history: &[HistoryItem]) -> Result<(), DealError>;
}

fn console_error(e: std::io::Error) -> DealError {
    DealError::new(DealErrorKind::Console {
        message: e.to_string(),
    })
}

/// Interactive operator reading lines from `input` and writing to `output`.
pub struct ConsoleOperator<R, W> {
    input: Lines<R>,
    output: W,
}

impl ConsoleOperator<BufReader<Stdin>, std::io::Stdout> {
    /// Operator on the process's stdin/stdout.
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), std::io::stdout())
    }
}

impl<R, W> ConsoleOperator<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    /// Creates a console operator over arbitrary streams.
    pub fn new(input: R, output: W) -> Self {
        Self {
            input: input.lines(),
            output,
        }
    }

    /// Gives back the output stream.
    pub fn into_output(self) -> W {
        self.output
    }
}

#[async_trait::async_trait]
impl<R, W> Operator for ConsoleOperator<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    fn show(&mut self, snapshot: &Snapshot) -> Result<(), DealError> {
        write!(self.output, "\n{}", snapshot).map_err(console_error)?;
        self.output.flush().map_err(console_error)
    }

    #[instrument(skip(self, doors), fields(doors = doors.len()))]
    async fn choose_door(
        &mut self,
        turn: Turn,
        doors: &DoorIndex,
    ) -> Result<Selection, DealError> {
        loop {
            write!(self.output, "{}", turn.prompt(doors.len())).map_err(console_error)?;
            self.output.flush().map_err(console_error)?;

            let Some(line) = self.input.next_line().await.map_err(console_error)? else {
                info!("Input closed");
                return Ok(Selection::Quit);
            };

            match parse_selection(&line) {
                Some(selection) => {
                    debug!(?selection, "Operator answered");
                    return Ok(selection);
                }
                None => {
                    writeln!(self.output, "'{}' is not a door number", line.trim())
                        .map_err(console_error)?;
                }
            }
        }
    }

    fn reject(&mut self, error: &DealError) -> Result<(), DealError> {
        writeln!(self.output, "{}", error.kind).map_err(console_error)?;
        self.output.flush().map_err(console_error)
    }

    fn show_history(&mut self, history: &[HistoryItem]) -> Result<(), DealError> {
        writeln!(self.output, "\nHistory:").map_err(console_error)?;
        for item in history {
            writeln!(self.output, "  {}", item).map_err(console_error)?;
        }
        self.output.flush().map_err(console_error)
    }
}

/// Operator answering from a fixed list of door indices.
///
/// Quits once the list runs out. Everything shown to it is kept for
/// inspection; with `echo` it is also printed to stdout.
#[derive(Debug, Clone, Default, Getters)]
pub struct ScriptedOperator {
    #[getter(skip)]
    choices: VecDeque<usize>,
    #[getter(skip)]
    echo: bool,
    /// Snapshots shown so far.
    shown: Vec<Snapshot>,
    /// Answers that were refused.
    rejected: Vec<DealError>,
    /// History shown at the end of the game, if any.
    history: Vec<HistoryItem>,
}

impl ScriptedOperator {
    /// Creates an operator that will answer `choices` in order.
    pub fn new(choices: impl IntoIterator<Item = usize>) -> Self {
        Self {
            choices: choices.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Also print everything to stdout.
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }
}

#[async_trait::async_trait]
impl Operator for ScriptedOperator {
    fn show(&mut self, snapshot: &Snapshot) -> Result<(), DealError> {
        if self.echo {
            println!("\n{}", snapshot);
        }
        self.shown.push(snapshot.clone());
        Ok(())
    }

    async fn choose_door(
        &mut self,
        turn: Turn,
        doors: &DoorIndex,
    ) -> Result<Selection, DealError> {
        let selection = match self.choices.pop_front() {
            Some(index) => Selection::Door(index),
            None => Selection::Quit,
        };
        if self.echo {
            match selection {
                Selection::Door(index) => println!("{}{}", turn.prompt(doors.len()), index),
                Selection::Quit => println!("{}q", turn.prompt(doors.len())),
            }
        }
        Ok(selection)
    }

    fn reject(&mut self, error: &DealError) -> Result<(), DealError> {
        if self.echo {
            println!("{}", error.kind);
        }
        self.rejected.push(error.clone());
        Ok(())
    }

    fn show_history(&mut self, history: &[HistoryItem]) -> Result<(), DealError> {
        if self.echo {
            println!("\nHistory:");
            for item in history {
                println!("  {}", item);
            }
        }
        self.history = history.to_vec();
        Ok(())
    }
}
