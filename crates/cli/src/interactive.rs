//! Prompt loop: read a city, compare it, repeat until `exit`.

use anyhow::Result;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Config, Editor, Helper};

use citycmp_client::Transport;
use citycmp_core::Error;

use crate::app::App;

const PROMPT: &str = "city> ";

/// Tab completion over the state's city names.
struct CityHelper {
    names: Vec<String>,
}

impl Completer for CityHelper {
    type Candidate = Pair;

    fn complete(&self, line: &str, pos: usize, _ctx: &rustyline::Context<'_>) -> rustyline::Result<(usize, Vec<Pair>)> {
        let prefix = line[..pos].trim_start().to_lowercase();
        if prefix.is_empty() {
            return Ok((pos, Vec::new()));
        }
        let start = line.len() - line.trim_start().len();
        let matches = self
            .names
            .iter()
            .filter(|name| name.starts_with(&prefix))
            .map(|name| Pair { display: name.clone(), replacement: name.clone() })
            .collect();
        Ok((start, matches))
    }
}

impl Hinter for CityHelper {
    type Hint = String;
}

impl Highlighter for CityHelper {}
impl Validator for CityHelper {}
impl Helper for CityHelper {}

/// What a prompt line asks for.
#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Skip,
    Exit,
    Compare(&'a str),
}

fn parse_line(line: &str) -> Command<'_> {
    let line = line.trim();
    if line.is_empty() {
        Command::Skip
    } else if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
        Command::Exit
    } else {
        Command::Compare(line)
    }
}

/// Input mistakes re-prompt; anything else ends the session.
fn is_retryable(err: &anyhow::Error) -> bool {
    matches!(err.downcast_ref::<Error>(), Some(Error::InvalidInput(_) | Error::InvalidCity(_)))
}

/// Run the prompt loop until `exit` or end of input.
pub async fn run<T: Transport>(app: &mut App<T>) -> Result<()> {
    let config = Config::builder().auto_add_history(true).history_ignore_space(true).build();
    let mut rl: Editor<CityHelper, DefaultHistory> = Editor::with_config(config)?;
    rl.set_helper(Some(CityHelper { names: app.known_cities().map(str::to_string).collect() }));

    eprintln!("Compare a {} city against {}. Type `exit` to quit.", app.state(), app.reference_city());

    loop {
        match rl.readline(PROMPT) {
            Ok(line) => match parse_line(&line) {
                Command::Skip => continue,
                Command::Exit => break,
                Command::Compare(city) => match app.compare(city).await {
                    Ok(report) => println!("{report}"),
                    Err(e) if is_retryable(&e) => eprintln!("{e}"),
                    Err(e) => return Err(e),
                },
            },
            Err(ReadlineError::Interrupted) => eprintln!("(Ctrl+C) Type `exit` to quit."),
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}
