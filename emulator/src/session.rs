use std::cell::Cell;
use std::fmt;
use std::mem;
use std::rc::Rc;
use std::time::Duration;

use eventline_core::{
    Button, EventSource, Eventline, IntervalTimer32, Level, ManualClock, Millis, PinDriver, PinId,
    PinTiming, Tag, Tick, Timer32, TimerError, Toggle,
};
use winnow::ascii::{alpha1, dec_uint, space1};
use winnow::combinator::{alt, opt, preceded};
use winnow::error::ContextError;
use winnow::prelude::*;

const BUTTON_PIN: PinId = PinId(2);
const TOGGLE_PIN: PinId = PinId(3);

const BUTTON_TAG: Tag = 0;
const TOGGLE_TAG: Tag = 1;
const TIMER_TAG: Tag = 2;
const INTERVAL_TAG: Tag = 3;

pub const HELP_TOPICS: &[(&str, &str)] = &[
    ("press", "press                          - pull the button line low"),
    ("release", "release                        - let the button line float high"),
    ("flip", "flip                           - move the toggle switch"),
    (
        "bounce",
        "bounce <button|toggle> <n>     - wiggle a line n times, 1 ms apart, then settle",
    ),
    ("wait", "wait <ms>                      - advance the clock, polling as it goes"),
    ("timer", "timer <ms>|cancel              - arm or cancel the one-shot timer"),
    ("every", "every <ms>|cancel              - arm or cancel the interval timer"),
    ("repeat", "repeat on|off                  - repeat long presses while held"),
    ("set", "set debounce|hold|repeat <ms>  - change pin thresholds"),
    ("clock", "clock <ms>                     - jump the clock without polling"),
    ("status", "status                         - show inputs, timers and thresholds"),
    ("help", "help [topic]                   - show help for a command"),
];

/// Startup parameters taken from the command line.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SessionOptions {
    /// Clock step between polls during `wait`. Never zero.
    pub poll_ms: Millis,
    pub timing: PinTiming,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            poll_ms: 1,
            timing: PinTiming::DEFAULT,
        }
    }
}

/// Errors reported back to the operator.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SessionError {
    /// The line did not match any command.
    Syntax(String),
    /// A timer refused to start.
    Timer(TimerError),
}

impl From<TimerError> for SessionError {
    fn from(error: TimerError) -> Self {
        Self::Timer(error)
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Syntax(line) => write!(f, "ERR syntax `{line}` (try `help`)"),
            SessionError::Timer(error) => write!(f, "ERR timer {error}"),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Input {
    Button,
    Toggle,
}

impl fmt::Display for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Input::Button => "button",
            Input::Toggle => "toggle",
        })
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Setting {
    Debounce,
    Hold,
    Repeat,
}

/// One parsed operator line.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Command {
    Press,
    Release,
    Flip,
    Bounce { input: Input, wiggles: u32 },
    Wait(Millis),
    /// `None` cancels.
    Timer(Option<Millis>),
    /// `None` cancels.
    Every(Option<Millis>),
    Repeat(bool),
    Set(Setting, u16),
    Clock(Millis),
    Status,
    Help(Option<String>),
}

impl Command {
    /// Parses a single line, ignoring case and surrounding whitespace.
    pub fn parse(line: &str) -> Result<Self, SessionError> {
        let lowered = line.trim().to_ascii_lowercase();
        command
            .parse(lowered.as_str())
            .map_err(|_| SessionError::Syntax(line.trim().to_string()))
    }
}

fn command(input: &mut &str) -> Result<Command, ContextError> {
    alt((
        "press".value(Command::Press),
        "release".value(Command::Release),
        "flip".value(Command::Flip),
        preceded(("bounce", space1), bounce),
        preceded(("wait", space1), millis).map(Command::Wait),
        preceded(("timer", space1), millis_or_cancel).map(Command::Timer),
        preceded(("every", space1), millis_or_cancel).map(Command::Every),
        preceded(("repeat", space1), on_off).map(Command::Repeat),
        preceded(("set", space1), setting),
        preceded(("clock", space1), millis).map(Command::Clock),
        "status".value(Command::Status),
        preceded("help", opt(preceded(space1, alpha1)))
            .map(|topic: Option<&str>| Command::Help(topic.map(str::to_string))),
    ))
    .parse_next(input)
}

fn millis(input: &mut &str) -> Result<Millis, ContextError> {
    dec_uint.parse_next(input)
}

fn threshold(input: &mut &str) -> Result<u16, ContextError> {
    dec_uint.parse_next(input)
}

fn millis_or_cancel(input: &mut &str) -> Result<Option<Millis>, ContextError> {
    alt(("cancel".value(None), millis.map(Some))).parse_next(input)
}

fn on_off(input: &mut &str) -> Result<bool, ContextError> {
    alt(("on".value(true), "off".value(false))).parse_next(input)
}

fn bounce(input: &mut &str) -> Result<Command, ContextError> {
    let target = alt(("button".value(Input::Button), "toggle".value(Input::Toggle)))
        .parse_next(input)?;
    space1.parse_next(input)?;
    let wiggles = dec_uint.parse_next(input)?;
    Ok(Command::Bounce {
        input: target,
        wiggles,
    })
}

fn setting(input: &mut &str) -> Result<Command, ContextError> {
    let which = alt((
        "debounce".value(Setting::Debounce),
        "hold".value(Setting::Hold),
        "repeat".value(Setting::Repeat),
    ))
    .parse_next(input)?;
    space1.parse_next(input)?;
    let value = threshold.parse_next(input)?;
    Ok(Command::Set(which, value))
}

/// Callback context: collects timestamped transcript lines.
#[derive(Debug, Default)]
pub struct Transcript {
    now: Millis,
    lines: Vec<String>,
}

impl Transcript {
    fn note(&mut self, message: impl fmt::Display) {
        self.lines.push(format!("[t={}ms] {message}", self.now));
    }

    fn take(&mut self) -> Vec<String> {
        mem::take(&mut self.lines)
    }
}

/// Simulated input line shared between the session and a pin driver.
#[derive(Clone, Debug)]
struct Wire(Rc<Cell<Level>>);

impl Wire {
    fn idle() -> Self {
        Self(Rc::new(Cell::new(Level::High)))
    }

    fn get(&self) -> Level {
        self.0.get()
    }

    fn set(&self, level: Level) {
        self.0.set(level);
    }
}

impl PinDriver for Wire {
    fn read(&mut self, _pin: PinId) -> Level {
        self.0.get()
    }
}

fn button_pressed(_tag: Tag, log: &mut Transcript) {
    log.note("button pressed");
}

fn button_released(_tag: Tag, log: &mut Transcript) {
    log.note("button released");
}

fn button_long_press(_tag: Tag, log: &mut Transcript) {
    log.note("button long press");
}

fn toggle_on(_tag: Tag, log: &mut Transcript) {
    log.note("toggle on");
}

fn toggle_off(_tag: Tag, log: &mut Transcript) {
    log.note("toggle off");
}

fn toggle_flipped(_tag: Tag, log: &mut Transcript) {
    log.note("toggle flipped");
}

fn timer_expired(_tag: Tag, log: &mut Transcript) {
    log.note("timer expired");
}

fn interval_fired(_tag: Tag, log: &mut Transcript) {
    log.note("interval fired");
}

/// Everything wired to the simulated board, polled in declaration order.
struct Bench {
    button: Button<Wire, Transcript>,
    toggle: Toggle<Wire, Transcript>,
    timer: Timer32<Transcript>,
    interval: IntervalTimer32<Transcript>,
}

impl Bench {
    fn new(button: Wire, toggle: Wire) -> Self {
        let mut press = Button::new(BUTTON_PIN, BUTTON_TAG, button);
        press.on_pressed = Some(button_pressed);
        press.on_released = Some(button_released);
        press.on_long_press = Some(button_long_press);

        let mut switch = Toggle::new(TOGGLE_PIN, TOGGLE_TAG, toggle);
        switch.on_activate = Some(toggle_on);
        switch.on_deactivate = Some(toggle_off);
        switch.on_flip = Some(toggle_flipped);

        Self {
            button: press,
            toggle: switch,
            timer: Timer32::new(TIMER_TAG).with_on_expire(timer_expired),
            interval: IntervalTimer32::new(INTERVAL_TAG).with_on_expire(interval_fired),
        }
    }
}

impl EventSource<Transcript> for Bench {
    fn setup(&mut self) {
        EventSource::<Transcript>::setup(&mut self.button);
        EventSource::<Transcript>::setup(&mut self.toggle);
    }

    fn poll(&mut self, tick: Tick, context: &mut Transcript) {
        self.button.poll(tick, context);
        self.toggle.poll(tick, context);
        self.timer.poll(tick, context);
        self.interval.poll(tick, context);
    }
}

/// Interactive bench: a button, a toggle switch and two timers on a fake clock.
pub struct Session {
    line: Eventline<ManualClock, Bench, Transcript>,
    transcript: Transcript,
    button: Wire,
    toggle: Wire,
    poll_ms: Millis,
    repeat: bool,
}

impl Session {
    pub fn new(options: SessionOptions) -> Self {
        let button = Wire::idle();
        let toggle = Wire::idle();
        let bench = Bench::new(button.clone(), toggle.clone());
        let mut line = Eventline::with_timing(ManualClock::new(0), bench, options.timing);
        line.begin();

        Self {
            line,
            transcript: Transcript::default(),
            button,
            toggle,
            poll_ms: options.poll_ms.max(1),
            repeat: false,
        }
    }

    /// Current fake clock reading.
    pub fn now(&self) -> Millis {
        self.line.now()
    }

    /// Runs one operator line and returns the lines to print.
    pub fn handle_command(&mut self, line: &str) -> Vec<String> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Vec::new();
        }

        let outcome = Command::parse(trimmed).and_then(|command| self.execute(command));
        let mut lines = self.transcript.take();
        match outcome {
            Ok(Some(reply)) => lines.push(reply),
            Ok(None) => {}
            Err(error) => lines.push(error.to_string()),
        }
        lines
    }

    fn execute(&mut self, command: Command) -> Result<Option<String>, SessionError> {
        let reply = match command {
            Command::Press => self.drive(Input::Button, Level::Low),
            Command::Release => self.drive(Input::Button, Level::High),
            Command::Flip => {
                let level = self.toggle.get().toggled();
                self.drive(Input::Toggle, level)
            }
            Command::Bounce { input, wiggles } => self.bounce(input, wiggles),
            Command::Wait(millis) => {
                self.advance(millis);
                format!("OK t={}ms", self.now())
            }
            Command::Timer(Some(millis)) => {
                let now = self.now();
                self.line
                    .sources_mut()
                    .timer
                    .start(now, Duration::from_millis(millis.into()))?;
                format!("OK timer due at t={}ms", now.wrapping_add(millis))
            }
            Command::Timer(None) => {
                self.line.sources_mut().timer.cancel();
                "OK timer cancelled".to_string()
            }
            Command::Every(Some(millis)) => {
                let now = self.now();
                let interval = &mut self.line.sources_mut().interval;
                interval.start(now, Duration::from_millis(millis.into()))?;
                format!(
                    "OK interval every {millis}ms, next at t={}ms",
                    interval.next_due().unwrap_or(now)
                )
            }
            Command::Every(None) => {
                self.line.sources_mut().interval.cancel();
                "OK interval cancelled".to_string()
            }
            Command::Repeat(enabled) => {
                self.repeat = enabled;
                self.line.sources_mut().button.enable_repeat(enabled);
                format!("OK repeat {}", if enabled { "on" } else { "off" })
            }
            Command::Set(which, millis) => {
                match which {
                    Setting::Debounce => self.line.set_debounce_ms(millis),
                    Setting::Hold => self.line.set_long_hold_ms(millis),
                    Setting::Repeat => self.line.set_repeat_ms(millis),
                }
                format_timing(self.line.timing())
            }
            Command::Clock(millis) => {
                self.line.clock().set(millis);
                format!("OK t={millis}ms")
            }
            Command::Status => self.status().join("\n"),
            Command::Help(topic) => help(topic.as_deref()).join("\n"),
        };
        Ok(Some(reply))
    }

    fn wire(&self, input: Input) -> &Wire {
        match input {
            Input::Button => &self.button,
            Input::Toggle => &self.toggle,
        }
    }

    fn drive(&mut self, input: Input, level: Level) -> String {
        self.wire(input).set(level);
        self.poll();
        format!("OK {input} line {}", level_name(level))
    }

    fn bounce(&mut self, input: Input, wiggles: u32) -> String {
        let wire = self.wire(input).clone();
        let settled = wire.get().toggled();
        for _ in 0..wiggles {
            wire.set(wire.get().toggled());
            self.poll();
            self.line.clock().advance(1);
        }
        if wire.get() != settled {
            wire.set(settled);
            self.poll();
        }
        format!(
            "OK {input} bounced {wiggles} times, settled {}",
            level_name(settled)
        )
    }

    fn advance(&mut self, millis: Millis) {
        let mut left = millis;
        while left > 0 {
            let step = left.min(self.poll_ms);
            self.line.clock().advance(step);
            left -= step;
            self.poll();
        }
    }

    fn poll(&mut self) {
        self.transcript.now = self.line.now();
        self.line.poll(&mut self.transcript);
    }

    fn status(&self) -> Vec<String> {
        let now = self.now();
        let bench = self.line.sources();
        let button = match (bench.button.is_pressed(), bench.button.is_long_pressed()) {
            (true, true) => "pressed (long)",
            (true, false) => "pressed",
            (false, _) => "released",
        };
        let timer = bench.timer.remaining(now).map_or_else(
            || "idle".to_string(),
            |left| format!("due in {}ms", left.as_millis()),
        );
        let interval = bench.interval.next_due().map_or_else(
            || "idle".to_string(),
            |next| {
                format!(
                    "every {}ms, next at t={next}ms",
                    bench.interval.period().as_millis()
                )
            },
        );

        vec![
            format!("clock: t={now}ms poll={}ms", self.poll_ms),
            format_timing(self.line.timing()),
            format!(
                "button: {button} repeat={}",
                if self.repeat { "on" } else { "off" }
            ),
            format!(
                "toggle: {}",
                if bench.toggle.is_activated() { "on" } else { "off" }
            ),
            format!("timer: {timer}"),
            format!("interval: {interval}"),
        ]
    }
}

fn level_name(level: Level) -> &'static str {
    match level {
        Level::Low => "low",
        Level::High => "high",
    }
}

fn format_timing(timing: PinTiming) -> String {
    format!(
        "timing: debounce={}ms hold={}ms repeat={}ms",
        timing.debounce_ms, timing.long_hold_ms, timing.repeat_ms
    )
}

fn help(topic: Option<&str>) -> Vec<String> {
    let mut lines = Vec::new();
    match topic {
        Some(target) => {
            if let Some((_, detail)) = HELP_TOPICS.iter().find(|(name, _)| *name == target) {
                lines.push((*detail).to_string());
            } else {
                lines.push(format!("No help available for `{target}`."));
                let topics: Vec<&str> = HELP_TOPICS.iter().map(|(name, _)| *name).collect();
                lines.push(format!("Available topics: {}", topics.join(", ")));
            }
        }
        None => {
            lines.push("Available commands:".to_string());
            for (_, detail) in HELP_TOPICS {
                lines.push(format!("  {detail}"));
            }
            lines.push("Type `help <topic>` for a specific command.".to_string());
        }
    }
    lines
}
