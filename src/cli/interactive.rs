//! Event loop for the interactive session
//!
//! Three producers feed one queue: the terminal input thread (form, then
//! keys), the spinner ticker, and one task per rate fetch. The loop consumes
//! events in arrival order and is the only owner of the `Session`.

use super::form::{FormController, KeySource};
use super::session::{Command, Effect, Event, Phase, Session};
use super::ui;
use crate::core::config::FormDefaults;
use crate::core::{RateCache, resolve_rates};
use anyhow::{Context, Result, bail};
use console::Term;
use indicatif::ProgressBar;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::{debug, info};

const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Draws the session whenever it asks for a render.
pub trait Screen {
    fn draw(&mut self, session: &Session) -> Result<()>;
}

pub struct TermScreen {
    term: Term,
    spinner: Option<ProgressBar>,
}

impl TermScreen {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
            spinner: None,
        }
    }
}

impl Default for TermScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen for TermScreen {
    fn draw(&mut self, session: &Session) -> Result<()> {
        match session.phase() {
            Phase::Loading => {
                if self.spinner.is_none() {
                    self.term.clear_screen()?;
                    self.term.write_line(&format!("\n{}\n", ui::title()))?;
                    self.spinner = Some(ui::new_spinner("Loading currency rates..."));
                }
                if let Some(pb) = &self.spinner {
                    pb.tick();
                }
            }
            Phase::Displaying => {
                if let Some(pb) = self.spinner.take() {
                    pb.finish_and_clear();
                }
                self.term.clear_screen()?;
                self.term.write_line(&session.view())?;
            }
            Phase::CollectingInput | Phase::Terminated => {}
        }
        Ok(())
    }
}

/// Runs the form and then forwards key commands until quit or input closes.
///
/// Uses a plain thread: blocking terminal reads must not hold up runtime
/// shutdown once the session ends.
pub fn spawn_input<I>(mut input: I, defaults: FormDefaults, tx: UnboundedSender<Event>) -> Result<()>
where
    I: FormController + KeySource + 'static,
{
    std::thread::Builder::new()
        .name("terminal-input".to_string())
        .spawn(move || {
            match input.collect(&defaults) {
                Ok(request) => {
                    if tx.send(Event::FormCompleted(request)).is_err() {
                        return;
                    }
                }
                Err(e) => {
                    let _ = tx.send(Event::FormFailed(format!("{e:#}")));
                    return;
                }
            }

            while let Some(command) = input.next_command() {
                if tx.send(Event::Key(command)).is_err() || command == Command::Quit {
                    return;
                }
            }
            let _ = tx.send(Event::InputClosed);
        })
        .context("Failed to start terminal input thread")?;
    Ok(())
}

fn spawn_ticker(tx: UnboundedSender<Event>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(TICK_INTERVAL);
        loop {
            interval.tick().await;
            if tx.send(Event::Tick).is_err() {
                break;
            }
        }
    });
}

fn spawn_fetch(cache: Arc<RateCache>, episode: u64, tx: UnboundedSender<Event>) {
    tokio::spawn(async move {
        let resolution = resolve_rates(&cache).await;
        debug!(episode, source = ?resolution.source, "Rates resolved");
        // The loop may already be gone after quit.
        let _ = tx.send(Event::RatesResolved {
            episode,
            resolution,
        });
    });
}

/// Consumes events until the session ends.
pub async fn event_loop(
    session: &mut Session,
    cache: Arc<RateCache>,
    tx: UnboundedSender<Event>,
    mut rx: UnboundedReceiver<Event>,
    screen: &mut dyn Screen,
) -> Result<()> {
    let mut pending = session.start();

    loop {
        for effect in pending.drain(..) {
            match effect {
                Effect::FetchRates { episode } => spawn_fetch(Arc::clone(&cache), episode, tx.clone()),
                Effect::Render => screen.draw(session)?,
                Effect::Exit => {
                    info!("Session ended");
                    return Ok(());
                }
                Effect::Fail(reason) => bail!("Form could not be completed: {reason}"),
            }
        }

        let event = rx.recv().await.unwrap_or(Event::InputClosed);
        pending = session.handle(event);
    }
}

/// Runs the interactive converter on the attached terminal.
pub async fn run<I>(cache: Arc<RateCache>, input: I, defaults: FormDefaults) -> Result<()>
where
    I: FormController + KeySource + 'static,
{
    if !Term::stdout().is_term() {
        bail!("Interactive mode needs a terminal; use `fxtui convert` instead");
    }

    let (tx, rx) = unbounded_channel();
    let mut session = Session::new();
    let mut screen = TermScreen::new();

    spawn_input(input, defaults, tx.clone())?;
    spawn_ticker(tx.clone());

    event_loop(&mut session, cache, tx, rx, &mut screen).await
}
