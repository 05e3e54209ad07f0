//! Round countdown: a one-second local tick reconciled against the server's
//! turn status every few seconds.
//!
//! When the round runs out, a player whose move is pending has the `#board`
//! form submitted for them; everyone else reloads once the grace period has
//! passed so the next turn is rendered.

use std::cell::RefCell;
use std::rc::Rc;

use serde::Deserialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, HtmlElement, HtmlFormElement};

use crate::config::BoardConfig;
use crate::error::Result;
use crate::{dom, net};

pub const ROUND_SECONDS: f64 = 180.0;
pub const RELOAD_GRACE_SECONDS: f64 = 5.0;
pub const UNPAUSE_DELAY_SECONDS: f64 = 5.0;

const RED_BELOW: f64 = 60.0;
const YELLOW_BELOW: f64 = 120.0;

const DISPLAY_ID: &str = "round-timer";
const FORM_ID: &str = "board";
const PAUSE_BUTTON_ID: &str = "pause-toggle";
const PAUSED_CLASS: &str = "time-paused";

// --- TIME BANDS ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeBand {
    Green,
    Yellow,
    Red,
}

impl TimeBand {
    pub const ALL: [TimeBand; 3] = [TimeBand::Green, TimeBand::Yellow, TimeBand::Red];

    pub fn for_seconds(seconds: f64) -> TimeBand {
        if seconds < RED_BELOW {
            TimeBand::Red
        } else if seconds < YELLOW_BELOW {
            TimeBand::Yellow
        } else {
            TimeBand::Green
        }
    }

    pub fn class_name(self) -> &'static str {
        match self {
            TimeBand::Green => "time-green",
            TimeBand::Yellow => "time-yellow",
            TimeBand::Red => "time-red",
        }
    }
}

/// `mm:ss`, clamped at zero.
pub fn format_clock(seconds: f64) -> String {
    let total = if seconds.is_finite() { seconds.max(0.0).floor() as u64 } else { 0 };
    format!("{:02}:{:02}", total / 60, total % 60)
}

// --- SERVER STATUS ---

/// Body of the turn status endpoint. Older servers only send `turn` and
/// `start`; newer ones report the clock as well.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnStatus {
    pub turn: u32,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub seconds_left: Option<f64>,
    #[serde(default)]
    pub is_paused: Option<bool>,
    #[serde(default)]
    pub is_starting: Option<bool>,
    #[serde(default)]
    pub starting_delay: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PauseStatus {
    pub paused: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Reload,
    Sync,
}

/// A new turn, or a turn that has not started yet from our clock's point of
/// view, means the rendered board is stale.
pub fn poll_outcome(status: &TurnStatus, current_turn: u32, turn_start_ms: Option<f64>, now_ms: f64) -> PollOutcome {
    let not_started = turn_start_ms.map_or(false, |start| start > now_ms);
    if status.turn != current_turn || not_started {
        PollOutcome::Reload
    } else {
        PollOutcome::Sync
    }
}

// --- COUNTDOWN STATE ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    None,
    Submit,
    Reload,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CountdownState {
    pub turn: u32,
    pub seconds_left: f64,
    pub paused: bool,
    pub starting_delay: f64,
    last_tick_ms: Option<f64>,
    fired: bool,
}

impl CountdownState {
    pub fn new(turn: u32, seconds_left: f64, paused: bool) -> CountdownState {
        CountdownState { turn, seconds_left, paused, starting_delay: 0.0, last_tick_ms: None, fired: false }
    }

    pub fn from_config(config: &BoardConfig, now_ms: f64) -> CountdownState {
        let seconds_left = config
            .seconds_left
            .or_else(|| config.round_end.map(|end| (end - now_ms) / 1000.0))
            .unwrap_or(ROUND_SECONDS);
        let mut state = CountdownState::new(config.turn, seconds_left, config.is_paused);
        state.restart_clock(now_ms);
        state
    }

    pub fn is_starting(&self) -> bool {
        self.starting_delay > 0.0
    }

    pub fn tick(&mut self, elapsed: f64) {
        if self.paused {
            return;
        }
        let delay = elapsed.min(self.starting_delay).max(0.0);
        self.starting_delay -= delay;
        self.seconds_left -= elapsed - delay;
    }

    /// Measures from the wall clock, since throttled tabs fire the interval
    /// far less often than asked.
    pub fn advance_to(&mut self, now_ms: f64) {
        let elapsed = self
            .last_tick_ms
            .map_or(0.0, |last| ((now_ms - last) / 1000.0).max(0.0));
        self.last_tick_ms = Some(now_ms);
        self.tick(elapsed);
    }

    /// Time spent stopped does not count once the tick resumes.
    pub fn restart_clock(&mut self, now_ms: f64) {
        self.last_tick_ms = Some(now_ms);
    }

    /// Adopts whatever part of the clock the server reported. While the round
    /// is starting the server's seconds-left already includes the remaining
    /// delay.
    pub fn reconcile(&mut self, status: &TurnStatus) {
        if let Some(paused) = status.is_paused {
            self.paused = paused;
        }
        match status.is_starting {
            Some(true) => self.starting_delay = status.starting_delay.unwrap_or(0.0).max(0.0),
            Some(false) => self.starting_delay = 0.0,
            None => {}
        }
        if let Some(seconds) = status.seconds_left {
            self.seconds_left = seconds - self.starting_delay;
        }
    }

    pub fn set_paused(&mut self, paused: bool) {
        if self.paused && !paused {
            self.starting_delay = UNPAUSE_DELAY_SECONDS;
        } else if paused {
            self.starting_delay = 0.0;
        }
        self.paused = paused;
    }

    /// Decides what to do once time runs out. Fires at most once.
    pub fn check_expiry(&mut self, waiting_for_move: bool) -> Expiry {
        if self.fired || self.paused || self.is_starting() {
            return Expiry::None;
        }
        let expiry = if waiting_for_move {
            if self.seconds_left <= 0.0 { Expiry::Submit } else { Expiry::None }
        } else if self.seconds_left <= -RELOAD_GRACE_SECONDS {
            Expiry::Reload
        } else {
            Expiry::None
        };
        self.fired = expiry != Expiry::None;
        expiry
    }

    pub fn label(&self) -> String {
        if self.is_starting() {
            format!("Starting in {}", self.starting_delay.ceil() as u64)
        } else {
            format_clock(self.seconds_left)
        }
    }

    pub fn band(&self) -> TimeBand {
        TimeBand::for_seconds(self.seconds_left)
    }
}

// --- PAGE WIRING ---

struct Countdown {
    state: CountdownState,
    waiting_for_move: bool,
    tick_ms: i32,
    display: Option<HtmlElement>,
    form: Option<HtmlFormElement>,
    pause_button: Option<HtmlElement>,
    on_tick: Option<js_sys::Function>,
    interval: Option<i32>,
}

impl Countdown {
    fn tick(&mut self) -> Result<()> {
        self.state.advance_to(js_sys::Date::now());
        self.render()?;
        self.fire_expiry()
    }

    fn render(&self) -> Result<()> {
        if let Some(display) = &self.display {
            display.set_text_content(Some(&self.state.label()));
            let classes = display.class_list();
            let band = self.state.band();
            for other in TimeBand::ALL.iter().filter(|b| **b != band) {
                classes.remove_1(other.class_name())?;
            }
            classes.add_1(band.class_name())?;
            classes.toggle_with_force(PAUSED_CLASS, self.state.paused)?;
        }
        if let Some(button) = &self.pause_button {
            button.set_text_content(Some(if self.state.paused { "Resume" } else { "Pause" }));
        }
        Ok(())
    }

    fn fire_expiry(&mut self) -> Result<()> {
        match self.state.check_expiry(self.waiting_for_move) {
            Expiry::Submit => match &self.form {
                Some(form) => {
                    crate::log(&format!("Turn {} over, submitting moves", self.state.turn));
                    form.submit()?;
                }
                None => crate::warn("Round over but #board is missing"),
            },
            Expiry::Reload => dom::window()?.location().reload()?,
            Expiry::None => {}
        }
        Ok(())
    }

    /// Runs the tick interval only while the game is unpaused.
    fn sync_interval(&mut self) -> Result<()> {
        let window = dom::window()?;
        if self.state.paused {
            if let Some(handle) = self.interval.take() {
                window.clear_interval_with_handle(handle);
            }
        } else if self.interval.is_none() {
            if let Some(callback) = &self.on_tick {
                self.state.restart_clock(js_sys::Date::now());
                let handle = window.set_interval_with_callback_and_timeout_and_arguments_0(callback, self.tick_ms)?;
                self.interval = Some(handle);
            }
        }
        Ok(())
    }
}

pub fn install(document: &Document, config: &BoardConfig) -> Result<()> {
    let pause_button: Option<HtmlElement> = if config.is_owner && config.pause_url.is_some() {
        dom::optional_by_id(document, PAUSE_BUTTON_ID)?
    } else {
        None
    };

    let countdown = Rc::new(RefCell::new(Countdown {
        state: CountdownState::from_config(config, js_sys::Date::now()),
        waiting_for_move: config.waiting_for_move,
        tick_ms: config.tick_ms,
        display: dom::optional_by_id(document, DISPLAY_ID)?,
        form: dom::optional_by_id(document, FORM_ID)?,
        pause_button: pause_button.clone(),
        on_tick: None,
        interval: None,
    }));

    let ticker = countdown.clone();
    let on_tick = Closure::<dyn FnMut()>::new(move || {
        if let Err(err) = ticker.borrow_mut().tick() {
            crate::log_error(&format!("Countdown tick failed: {}", err));
        }
    });
    countdown.borrow_mut().on_tick = Some(on_tick.as_ref().unchecked_ref::<js_sys::Function>().clone());
    on_tick.forget();

    {
        let mut countdown = countdown.borrow_mut();
        countdown.render()?;
        countdown.fire_expiry()?;
        countdown.sync_interval()?;
    }

    if let Some(url) = &config.turn_start_url {
        start_polling(countdown.clone(), url.clone(), config.turn, config.poll_ms)?;
    }
    if let (Some(button), Some(url)) = (pause_button, &config.pause_url) {
        install_pause_toggle(countdown, &button, url.clone())?;
    }
    Ok(())
}

fn start_polling(countdown: Rc<RefCell<Countdown>>, url: String, turn: u32, poll_ms: i32) -> Result<()> {
    let poll = Closure::<dyn FnMut()>::new(move || {
        let countdown = countdown.clone();
        let url = url.clone();
        spawn_local(async move {
            if let Err(err) = poll_turn(&countdown, &url, turn).await {
                crate::warn(&format!("Turn status poll failed: {}", err));
            }
        });
    });
    dom::window()?.set_interval_with_callback_and_timeout_and_arguments_0(poll.as_ref().unchecked_ref(), poll_ms)?;
    poll.forget();
    Ok(())
}

async fn poll_turn(countdown: &Rc<RefCell<Countdown>>, url: &str, turn: u32) -> Result<()> {
    let status: TurnStatus = net::get_json(url).await?;
    let turn_start = status
        .start
        .as_deref()
        .map(js_sys::Date::parse)
        .filter(|ms| !ms.is_nan());

    match poll_outcome(&status, turn, turn_start, js_sys::Date::now()) {
        PollOutcome::Reload => dom::window()?.location().reload()?,
        PollOutcome::Sync => {
            let mut countdown = countdown.borrow_mut();
            countdown.state.reconcile(&status);
            countdown.sync_interval()?;
            countdown.render()?;
        }
    }
    Ok(())
}

fn install_pause_toggle(countdown: Rc<RefCell<Countdown>>, button: &HtmlElement, url: String) -> Result<()> {
    dom::listen(button, "click", move |event| {
        event.prevent_default();
        let countdown = countdown.clone();
        let url = url.clone();
        spawn_local(async move {
            if let Err(err) = toggle_pause(&countdown, &url).await {
                crate::log_error(&format!("Pause toggle failed: {}", err));
            }
        });
        Ok(())
    })
}

async fn toggle_pause(countdown: &Rc<RefCell<Countdown>>, url: &str) -> Result<()> {
    let status: PauseStatus = net::post_json(url).await?;
    let mut countdown = countdown.borrow_mut();
    countdown.state.set_paused(status.paused);
    countdown.sync_interval()?;
    countdown.render()
}
