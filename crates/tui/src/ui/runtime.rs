//! Runtime: terminal lifecycle and the single event loop.
//!
//! - A dedicated OS thread blocks on `crossterm::event::read()` and forwards
//!   events over a channel, so terminal reads never stall the async loop.
//! - The loop selects over input, panel events from the session, finished
//!   background commands, a ticker and Ctrl+C.
//! - Ticking is fast (100 ms) while something is executing or a toast is on
//!   screen and slow (1 s) otherwise.
//! - On exit the session is torn down, cancelling in-flight panel calls.

use std::{io::Stdout, sync::Arc, time::Duration};

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures_util::{StreamExt, stream::FuturesUnordered};
use ratatui::{Terminal, prelude::CrosstermBackend};
use seodeck_engine::Session;
use tokio::{
    signal,
    sync::{broadcast, mpsc},
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tracing::{debug, warn};

use crate::{
    app::{App, Effect, Msg},
    cmd,
    ui::main_component::MainView,
};

const FAST_TICK: Duration = Duration::from_millis(100);
const IDLE_TICK: Duration = Duration::from_secs(1);

/// Spawn the input thread. It exits when the receiver is dropped.
fn spawn_input_thread() -> mpsc::Receiver<Event> {
    let (sender, receiver) = mpsc::channel(256);
    std::thread::spawn(move || {
        loop {
            match event::read() {
                Ok(event) => {
                    if sender.blocking_send(event).is_err() {
                        break;
                    }
                }
                Err(error) => {
                    warn!(%error, "failed to read terminal event");
                    break;
                }
            }
        }
    });
    receiver
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn dispatch(app: &App, effects: Vec<Effect>, pending: &mut FuturesUnordered<JoinHandle<Msg>>) {
    if effects.is_empty() {
        return;
    }
    let commands = cmd::from_effects(app, effects);
    pending.extend(cmd::spawn_cmds(&app.session, commands));
}

/// Set up the terminal, run the loop until the user quits, then restore the
/// terminal and tear the session down.
pub async fn run_app(session: Arc<Session>) -> Result<()> {
    let mut input = spawn_input_thread();
    let mut panel_events = session.subscribe();
    let mut app = App::new(Arc::clone(&session));
    let mut main_view = MainView::default();
    let mut pending: FuturesUnordered<JoinHandle<Msg>> = FuturesUnordered::new();

    let mut terminal = setup_terminal()?;
    let outcome = async {
        dispatch(&app, vec![Effect::RefreshDashboard], &mut pending);

        let mut current_interval = IDLE_TICK;
        let mut ticker = time::interval(current_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        terminal.draw(|frame| main_view.render(frame, &mut app))?;

        while !app.should_quit {
            let target_interval = if app.executing || !app.toasts.is_empty() { FAST_TICK } else { IDLE_TICK };
            if target_interval != current_interval {
                current_interval = target_interval;
                ticker = time::interval(current_interval);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            }

            let effects = tokio::select! {
                maybe_event = input.recv() => match maybe_event {
                    Some(Event::Key(key)) if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) => break,
                    Some(Event::Key(key)) => main_view.handle_key_events(&mut app, key),
                    Some(_) => Vec::new(),
                    None => break,
                },
                event = panel_events.recv() => match event {
                    Ok(event) => app.update(Msg::Panel(event)),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        debug!(skipped, "panel event receiver lagged");
                        vec![Effect::RefreshDashboard]
                    }
                    Err(broadcast::error::RecvError::Closed) => Vec::new(),
                },
                Some(joined) = pending.next(), if !pending.is_empty() => match joined {
                    Ok(msg) => app.update(msg),
                    Err(error) => {
                        warn!(%error, "background command failed");
                        Vec::new()
                    }
                },
                _ = ticker.tick() => app.update(Msg::Tick),
                _ = signal::ctrl_c() => break,
            };

            dispatch(&app, effects, &mut pending);
            terminal.draw(|frame| main_view.render(frame, &mut app))?;
        }
        anyhow::Ok(())
    }
    .await;

    session.teardown();
    cleanup_terminal(&mut terminal)?;
    outcome
}
