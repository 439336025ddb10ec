//! Interactive session state machine
//!
//! Transitions are pure: `handle` mutates the session and returns the effects
//! the event loop must carry out. Every rate fetch is tagged with the episode
//! that requested it so late results from an earlier episode are dropped.

use super::ui::{self, StyleType};
use crate::core::{
    ConversionError, ConversionRequest, ConversionResult, RateResolution, RateSource, convert,
};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Restart,
    Quit,
}

#[derive(Debug)]
pub enum Event {
    FormCompleted(ConversionRequest),
    FormFailed(String),
    /// Terminal input ended without an explicit quit.
    InputClosed,
    RatesResolved {
        episode: u64,
        resolution: RateResolution,
    },
    Tick,
    Key(Command),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchRates { episode: u64 },
    Render,
    Exit,
    Fail(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    CollectingInput,
    Loading,
    Displaying,
    Terminated,
}

pub struct Session {
    phase: Phase,
    episode: u64,
    request: Option<ConversionRequest>,
    resolution: Option<RateResolution>,
    // Rates that arrived before the form was submitted.
    early: Option<RateResolution>,
    outcome: Option<Result<ConversionResult, ConversionError>>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            phase: Phase::CollectingInput,
            episode: 1,
            request: None,
            resolution: None,
            early: None,
            outcome: None,
        }
    }

    /// The first fetch starts right away and races the form.
    pub fn start(&self) -> Vec<Effect> {
        vec![Effect::FetchRates {
            episode: self.episode,
        }]
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn episode(&self) -> u64 {
        self.episode
    }

    pub fn outcome(&self) -> Option<&Result<ConversionResult, ConversionError>> {
        self.outcome.as_ref()
    }

    pub fn handle(&mut self, event: Event) -> Vec<Effect> {
        match (self.phase, event) {
            (Phase::Terminated, _) => vec![],

            (_, Event::Key(Command::Quit) | Event::InputClosed) => {
                self.phase = Phase::Terminated;
                vec![Effect::Exit]
            }

            (Phase::CollectingInput, Event::FormFailed(reason)) => {
                self.phase = Phase::Terminated;
                vec![Effect::Fail(reason)]
            }

            (Phase::CollectingInput, Event::FormCompleted(request)) => {
                self.request = Some(request);
                match self.early.take() {
                    Some(resolution) => self.display(resolution),
                    None => self.phase = Phase::Loading,
                }
                vec![Effect::Render]
            }

            (_, Event::RatesResolved { episode, .. }) if episode != self.episode => {
                debug!(episode, current = self.episode, "Dropping stale rates");
                vec![]
            }

            (Phase::CollectingInput, Event::RatesResolved { resolution, .. }) => {
                self.early = Some(resolution);
                vec![]
            }

            (Phase::Loading, Event::RatesResolved { resolution, .. }) => {
                self.display(resolution);
                vec![Effect::Render]
            }

            (Phase::Loading, Event::Tick) => vec![Effect::Render],

            (Phase::Displaying, Event::Key(Command::Restart)) => {
                self.episode += 1;
                self.outcome = None;
                self.phase = Phase::Loading;
                debug!(episode = self.episode, "Restarting conversion");
                vec![
                    Effect::FetchRates {
                        episode: self.episode,
                    },
                    Effect::Render,
                ]
            }

            _ => vec![],
        }
    }

    fn display(&mut self, resolution: RateResolution) {
        self.outcome = self
            .request
            .as_ref()
            .map(|request| convert(&resolution.table, request));
        self.resolution = Some(resolution);
        self.phase = Phase::Displaying;
    }

    /// Text for the result screen.
    pub fn view(&self) -> String {
        let mut s = format!("\n{}\n\n", ui::title());

        if let Some(resolution) = &self.resolution {
            if let Some(error) = &resolution.error {
                s += &ui::style_text(&format!("Error: {error}"), StyleType::Error);
                s += "\nUsing fallback rates.\n\n";
            } else if let (RateSource::Live, Some(as_of)) =
                (resolution.source, resolution.table.as_of())
            {
                s += &ui::style_text(
                    &format!("Rates as of {}", as_of.format("%Y-%m-%d %H:%M UTC")),
                    StyleType::Subtle,
                );
                s += "\n\n";
            }
        }

        match &self.outcome {
            Some(Ok(result)) => s += &format!("  {}", ui::style_text(&result.to_string(), StyleType::Result)),
            Some(Err(e)) => s += &ui::style_text(&format!("Error: {e}"), StyleType::Error),
            None => {}
        }

        s += "\n\n";
        s += &ui::style_text(
            "Press 'r' to convert again or 'q' to quit",
            StyleType::Subtle,
        );
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{RateTable, fallback};
    use std::sync::Arc;

    fn request(amount: f64, from: &str, to: &str) -> ConversionRequest {
        ConversionRequest {
            amount,
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    fn live(entries: &[(&str, f64)]) -> RateResolution {
        RateResolution {
            table: Arc::new(RateTable::new("USD", entries.iter().copied(), None).unwrap()),
            source: RateSource::Live,
            error: None,
        }
    }

    fn fallback_after(error: &str) -> RateResolution {
        RateResolution {
            table: Arc::new(fallback::rates()),
            source: RateSource::Fallback,
            error: Some(error.to_string()),
        }
    }

    fn plain(text: &str) -> String {
        console::strip_ansi_codes(text).to_string()
    }

    fn converted(session: &Session) -> String {
        match session.outcome() {
            Some(Ok(result)) => result.to_string(),
            other => panic!("expected a result, got {other:?}"),
        }
    }

    #[test]
    fn test_start_fetches_first_episode() {
        let session = Session::new();
        assert_eq!(session.phase(), Phase::CollectingInput);
        assert_eq!(session.start(), vec![Effect::FetchRates { episode: 1 }]);
    }

    #[test]
    fn test_form_then_rates() {
        let mut session = Session::new();
        assert_eq!(
            session.handle(Event::FormCompleted(request(10.0, "USD", "EUR"))),
            vec![Effect::Render]
        );
        assert_eq!(session.phase(), Phase::Loading);

        assert_eq!(session.handle(Event::Tick), vec![Effect::Render]);

        let effects = session.handle(Event::RatesResolved {
            episode: 1,
            resolution: live(&[("USD", 1.0), ("EUR", 0.92)]),
        });
        assert_eq!(effects, vec![Effect::Render]);
        assert_eq!(session.phase(), Phase::Displaying);
        assert_eq!(converted(&session), "10.00 USD = 9.20 EUR");
    }

    #[test]
    fn test_rates_before_form_are_used_on_submit() {
        let mut session = Session::new();
        assert!(
            session
                .handle(Event::RatesResolved {
                    episode: 1,
                    resolution: live(&[("USD", 1.0), ("EUR", 0.92)]),
                })
                .is_empty()
        );
        assert_eq!(session.phase(), Phase::CollectingInput);

        session.handle(Event::FormCompleted(request(10.0, "USD", "EUR")));
        assert_eq!(session.phase(), Phase::Displaying);
        assert_eq!(converted(&session), "10.00 USD = 9.20 EUR");
    }

    #[test]
    fn test_fallback_result_with_error_banner() {
        let mut session = Session::new();
        session.handle(Event::FormCompleted(request(1.0, "CAD", "USD")));
        session.handle(Event::RatesResolved {
            episode: 1,
            resolution: fallback_after("rate provider returned status 500"),
        });

        assert_eq!(converted(&session), "1.00 CAD = 0.71 USD");
        let view = plain(&session.view());
        assert!(view.contains("Error: rate provider returned status 500"));
        assert!(view.contains("Using fallback rates."));
        assert!(view.contains("1.00 CAD = 0.71 USD"));
    }

    #[test]
    fn test_unknown_currency_shows_no_number() {
        let mut session = Session::new();
        session.handle(Event::FormCompleted(request(3.0, "XYZ", "USD")));
        session.handle(Event::RatesResolved {
            episode: 1,
            resolution: live(&[("USD", 1.0), ("EUR", 0.92)]),
        });

        assert_eq!(
            session.outcome(),
            Some(&Err(ConversionError::UnknownCurrency("XYZ".to_string())))
        );
        let view = plain(&session.view());
        assert!(view.contains("Error: unknown currency: XYZ"));
        assert!(!view.contains(" = "));
    }

    #[test]
    fn test_restart_ignores_stale_resolution() {
        let mut session = Session::new();
        session.handle(Event::FormCompleted(request(10.0, "USD", "EUR")));
        session.handle(Event::RatesResolved {
            episode: 1,
            resolution: live(&[("USD", 1.0), ("EUR", 0.92)]),
        });

        let effects = session.handle(Event::Key(Command::Restart));
        assert_eq!(
            effects,
            vec![Effect::FetchRates { episode: 2 }, Effect::Render]
        );
        assert_eq!(session.phase(), Phase::Loading);
        assert!(session.outcome().is_none());

        // A duplicate result from the first episode arrives late.
        assert!(
            session
                .handle(Event::RatesResolved {
                    episode: 1,
                    resolution: live(&[("USD", 1.0), ("EUR", 0.5)]),
                })
                .is_empty()
        );
        assert_eq!(session.phase(), Phase::Loading);

        session.handle(Event::RatesResolved {
            episode: 2,
            resolution: live(&[("USD", 1.0), ("EUR", 0.95)]),
        });
        assert_eq!(session.phase(), Phase::Displaying);
        assert_eq!(converted(&session), "10.00 USD = 9.50 EUR");
    }

    #[test]
    fn test_restart_only_applies_while_displaying() {
        let mut session = Session::new();
        assert!(session.handle(Event::Key(Command::Restart)).is_empty());
        session.handle(Event::FormCompleted(request(1.0, "USD", "USD")));
        assert!(session.handle(Event::Key(Command::Restart)).is_empty());
        assert_eq!(session.episode(), 1);
    }

    #[test]
    fn test_ticks_outside_loading_do_nothing() {
        let mut session = Session::new();
        assert!(session.handle(Event::Tick).is_empty());
        session.handle(Event::FormCompleted(request(1.0, "USD", "CAD")));
        session.handle(Event::RatesResolved {
            episode: 1,
            resolution: live(&[("USD", 1.0), ("CAD", 1.4)]),
        });
        assert!(session.handle(Event::Tick).is_empty());
    }

    #[test]
    fn test_quit_from_any_phase() {
        for setup in [0, 1, 2] {
            let mut session = Session::new();
            if setup >= 1 {
                session.handle(Event::FormCompleted(request(1.0, "USD", "CAD")));
            }
            if setup >= 2 {
                session.handle(Event::RatesResolved {
                    episode: 1,
                    resolution: live(&[("USD", 1.0), ("CAD", 1.4)]),
                });
            }
            assert_eq!(session.handle(Event::Key(Command::Quit)), vec![Effect::Exit]);
            assert_eq!(session.phase(), Phase::Terminated);
            assert!(session.handle(Event::Tick).is_empty());
        }
    }

    #[test]
    fn test_input_closed_ends_session() {
        let mut session = Session::new();
        session.handle(Event::FormCompleted(request(1.0, "USD", "CAD")));
        session.handle(Event::RatesResolved {
            episode: 1,
            resolution: live(&[("USD", 1.0), ("CAD", 1.4)]),
        });
        assert_eq!(session.handle(Event::InputClosed), vec![Effect::Exit]);
        assert_eq!(session.phase(), Phase::Terminated);
    }

    #[test]
    fn test_form_failure_terminates() {
        let mut session = Session::new();
        assert_eq!(
            session.handle(Event::FormFailed("form aborted".to_string())),
            vec![Effect::Fail("form aborted".to_string())]
        );
        assert_eq!(session.phase(), Phase::Terminated);
    }
}
