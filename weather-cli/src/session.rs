//! Interactive session and one-shot rendering.

use std::io::Write;

use anyhow::{Context, Result, anyhow};
use chrono::Local;
use tokio::io::{AsyncBufReadExt, BufReader};
use weather_core::{ViewState, WeatherApp, view};

use crate::input::{HELP, Input};

/// Run until `:quit` or end of input. Redraws on every state change.
pub async fn run(app: WeatherApp) -> Result<()> {
    let mut state = app.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{HELP}\n");
    app.mount();

    loop {
        tokio::select! {
            changed = state.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = state.borrow_and_update().clone();
                draw(&snapshot)?;
            }
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read from stdin")? else {
                    break;
                };

                match Input::parse(&line) {
                    Input::Quit => break,
                    Input::Help => println!("{HELP}"),
                    Input::Unknown(cmd) => println!("Unknown command ':{cmd}'. Type :help for help."),
                    input => {
                        input.send_to(&app);
                    }
                }
            }
        }
    }

    Ok(())
}

/// Fetch once (by city, or by location when `city` is `None`) and print the result.
pub async fn show(app: WeatherApp, city: Option<String>) -> Result<()> {
    let task = match city {
        Some(city) => app.search(city).context("City name must not be empty")?,
        None => app.use_my_location(),
    };
    task.await.context("Weather task failed")?;

    let snapshot = app.snapshot();
    if let Some(error) = snapshot.error {
        return Err(anyhow!(error));
    }

    print!("{}", view::render(&snapshot, &Local));
    Ok(())
}

fn draw(state: &ViewState) -> Result<()> {
    let mut out = std::io::stdout().lock();

    writeln!(out, "\n[{}]", state.unit)?;
    write!(out, "{}", view::render(state, &Local))?;
    write!(out, "> ")?;
    out.flush().context("Failed to flush stdout")
}
