use std::io::{self, IsTerminal};
use std::process::ExitCode;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use chrono::Utc;
use engine_logging::{engine_info, engine_warn};
use netident_core::{classify, update, AppState, Effect, Field, Msg, SessionPhase};

use crate::cli::Cli;
use crate::clipboard::RealClipboard;
use crate::config;
use crate::effects::EffectRunner;
use crate::render::{render, TerminalReport};

const POLL_INTERVAL: Duration = Duration::from_millis(75);
/// Slack on top of the per-lookup timeout before giving up on stragglers.
const SETTLE_GRACE: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Reported,
    Blocked,
}

impl Outcome {
    pub fn exit_code(self) -> ExitCode {
        match self {
            Outcome::Reported => ExitCode::SUCCESS,
            Outcome::Blocked => ExitCode::from(2),
        }
    }
}

pub fn run(cli: Cli) -> anyhow::Result<Outcome> {
    engine_logging::initialize(cli.log, cli.log_level());
    engine_info!("netident {} starting", env!("CARGO_PKG_VERSION"));

    let config = config::load(cli.config.as_deref()).context("failed to load configuration")?;
    let user_agent = cli.user_agent.clone().unwrap_or_default();
    let verdict = classify(&user_agent, &config.compat);
    engine_info!("Compatibility verdict: {:?}", verdict);

    let report = TerminalReport::new(!cli.json && io::stdout().is_terminal());
    let (state, effects) = update(AppState::new(), Msg::Started { verdict });

    if state.phase() == SessionPhase::Blocked {
        let mut session = Session::blocked(state, report);
        session.present_final(cli.json)?;
        return Ok(Outcome::Blocked);
    }

    let client_hints = config::read_client_hints(cli.client_hints.as_deref());
    let engine_config = config.engine_config(&user_agent, client_hints, cli.timeout_ms);
    let settle_budget = engine_config.fetch.timeout + SETTLE_GRACE;
    let runner = EffectRunner::new(engine_config, Box::new(RealClipboard::new()))
        .context("failed to start lookup engine")?;

    let mut session = Session {
        state,
        runner: Some(runner),
        report,
    };
    session.run_effects(effects)?;
    session.redraw_if_dirty()?;
    session.wait_until_settled(settle_budget)?;

    if let Some(field) = cli.copy {
        session.copy(field)?;
    }
    session.present_final(cli.json)?;
    session.wait_for_acknowledgment()?;
    Ok(Outcome::Reported)
}

struct Session {
    state: AppState,
    runner: Option<EffectRunner>,
    report: TerminalReport,
}

impl Session {
    fn blocked(state: AppState, report: TerminalReport) -> Self {
        Self {
            state,
            runner: None,
            report,
        }
    }

    fn dispatch(&mut self, msg: Msg) -> io::Result<()> {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.run_effects(effects)?;
        self.redraw_if_dirty()
    }

    fn run_effects(&mut self, effects: Vec<Effect>) -> io::Result<()> {
        let Some(runner) = self.runner.as_mut() else {
            return Ok(());
        };
        let follow_up = runner.enqueue(effects, now_ms());
        for msg in follow_up {
            self.dispatch(msg)?;
        }
        Ok(())
    }

    fn redraw_if_dirty(&mut self) -> io::Result<()> {
        if self.state.consume_dirty() && self.report.is_live() {
            self.report.draw(&render(&self.state.view()))?;
        }
        Ok(())
    }

    fn wait_until_settled(&mut self, budget: Duration) -> io::Result<()> {
        let deadline = Instant::now() + budget;
        while !self.state.all_settled() {
            if Instant::now() >= deadline {
                engine_warn!("Gave up waiting for lookups after {:?}", budget);
                break;
            }
            let next = self
                .runner
                .as_ref()
                .and_then(|runner| runner.next_msg(POLL_INTERVAL));
            if let Some(msg) = next {
                self.dispatch(msg)?;
            }
        }
        Ok(())
    }

    fn copy(&mut self, field: Field) -> io::Result<()> {
        let copyable = self
            .state
            .view()
            .field(field)
            .is_some_and(|view| view.copy_value.is_some());
        if !copyable {
            engine_warn!("{} has no value to copy", field);
            eprintln!("netident: {field} has no value to copy");
        }
        self.dispatch(Msg::CopyClicked { field })
    }

    /// Keeps ticking until every "copied" acknowledgment has reverted.
    fn wait_for_acknowledgment(&mut self) -> io::Result<()> {
        while self.state.has_pending_acknowledgment() {
            thread::sleep(POLL_INTERVAL);
            self.dispatch(Msg::Tick { now_ms: now_ms() })?;
        }
        Ok(())
    }

    /// Prints the finished report when it was not drawn live.
    fn present_final(&mut self, json: bool) -> anyhow::Result<()> {
        let view = self.state.view();
        if json {
            let text = serde_json::to_string_pretty(&view).context("failed to encode report")?;
            println!("{text}");
        } else if self.report.is_live() {
            self.redraw_if_dirty()?;
        } else {
            self.report.draw(&render(&view))?;
        }
        Ok(())
    }
}

fn now_ms() -> u64 {
    u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0)
}
