//! Line-based input controller for the interactive session.

use tokio::task::JoinHandle;
use weather_core::{Intent, WeatherApp};

/// One line typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Type into the search field and press Enter.
    Search(String),
    /// Enter on an empty line.
    Blank,
    /// Submit the query left over from a failed search.
    Retry,
    Location,
    ToggleUnit,
    Help,
    Quit,
    Unknown(String),
}

impl Input {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();

        if line.is_empty() {
            return Input::Blank;
        }

        if line == "?" {
            return Input::Help;
        }

        match line.strip_prefix(':') {
            Some(cmd) => match cmd.trim().to_lowercase().as_str() {
                "loc" | "location" | "here" => Input::Location,
                "unit" | "units" | "u" => Input::ToggleUnit,
                "retry" | "r" => Input::Retry,
                "help" | "h" => Input::Help,
                "quit" | "q" | "exit" => Input::Quit,
                other => Input::Unknown(other.to_string()),
            },
            None => Input::Search(line.to_string()),
        }
    }

    /// Intents this input sends to the app, in order.
    pub fn intents(&self) -> Vec<Intent> {
        match self {
            Input::Search(text) => {
                vec![Intent::QueryChanged(text.clone()), Intent::SearchSubmitted]
            }
            Input::Retry => vec![Intent::SearchSubmitted],
            Input::Location => vec![Intent::LocationRequested],
            Input::ToggleUnit => vec![Intent::UnitToggled],
            Input::Blank | Input::Help | Input::Quit | Input::Unknown(_) => Vec::new(),
        }
    }

    /// Dispatch every intent and collect the tasks that were started.
    pub fn send_to(&self, app: &WeatherApp) -> Vec<JoinHandle<()>> {
        self.intents().into_iter().filter_map(|intent| app.dispatch(intent)).collect()
    }
}

pub const HELP: &str = "\
Type a city name and press Enter to search.
  :loc    weather for your location
  :unit   switch between metric and imperial
  :retry  repeat a search that failed to reach the server
  :help   show this help
  :quit   exit (Ctrl-D works too)";
