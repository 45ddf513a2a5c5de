use cortex_m::interrupt;
use cortex_m::register::primask;
use critical_section::{self, RawRestoreState};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_futures::select::{Either, select};
use embassy_stm32 as hal;
use embassy_stm32::gpio::{Input, Level, Output, Pull, Speed};
use embassy_time::{Instant, Ticker, Timer};
use eventline_core::{FnClock, HalInput, Millis};

use crate::config;
use crate::indicator::{Indicator, LedSignal};
use crate::panel::Panel;
use crate::status;

critical_section::set_impl!(InterruptCriticalSection);

struct InterruptCriticalSection;

unsafe impl critical_section::Impl for InterruptCriticalSection {
    unsafe fn acquire() -> RawRestoreState {
        let primask = primask::read();
        interrupt::disable();
        primask.is_active()
    }

    unsafe fn release(restore_state: RawRestoreState) {
        if restore_state {
            unsafe {
                interrupt::enable();
            }
        }
    }
}

type BoardClock = FnClock<fn() -> Millis>;
type BoardPanel = Panel<BoardClock, HalInput<Input<'static>>>;

static LED: LedSignal = LedSignal::new();

/// Low 32 bits of the embassy tick counter in milliseconds.
#[allow(clippy::cast_possible_truncation)]
fn uptime_millis() -> Millis {
    Instant::now().as_millis() as Millis
}

#[embassy_executor::main]
pub async fn main(spawner: Spawner) {
    let config = hal::Config::default();
    let hal::Peripherals { PA6, PB2, PB3, .. } = hal::init(config);

    let button = HalInput::new(Input::new(PB2, Pull::Up));
    let toggle = HalInput::new(Input::new(PB3, Pull::Up));
    let led = Output::new(PA6, Level::Low, Speed::Low);

    let clock: BoardClock = FnClock(uptime_millis);
    let panel = Panel::new(clock, button, toggle);
    defmt::info!(
        "panel: polling every {=u64} ms, timing {}",
        config::POLL_PERIOD.as_millis(),
        config::PANEL_TIMING
    );

    spawner
        .spawn(poll_task(panel))
        .expect("failed to spawn panel poll task");
    spawner
        .spawn(indicator_task(led))
        .expect("failed to spawn indicator task");

    core::future::pending::<()>().await;
}

#[embassy_executor::task]
async fn poll_task(mut panel: BoardPanel) -> ! {
    let mut ticker = Ticker::every(config::POLL_PERIOD);
    loop {
        match panel.tick() {
            Ok(Some(command)) => LED.signal(command),
            Ok(None) => {}
            Err(error) => defmt::warn!("panel: timer refused to start: {}", error),
        }
        ticker.next().await;
    }
}

#[embassy_executor::task]
async fn indicator_task(mut led: Output<'static>) -> ! {
    let mut indicator = Indicator::default();
    loop {
        match select(LED.wait(), Timer::after(config::STATUS_PERIOD)).await {
            Either::First(command) => {
                if indicator.apply(command) {
                    led.set_high();
                } else {
                    led.set_low();
                }
                defmt::debug!("indicator: {} -> lit={=bool}", command, indicator.is_lit());
            }
            Either::Second(()) => {
                defmt::info!("status: {}", status::snapshot());
            }
        }
    }
}
