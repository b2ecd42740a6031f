//! Tokio event loop around an [`ActivationController`].
//!
//! Input arrives on an unbounded channel, binding changes on the store's
//! `watch` channel, and timer deadlines become `sleep_until` futures. The
//! loop is single-task, so all controller mutation stays on one thread.

use std::{future, time::Instant};

use menu_config::Bindings;
use tokio::{
    sync::{mpsc::UnboundedReceiver, watch},
    time::{self, Instant as TokioInstant},
};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::{controller::ActivationController, events::InputEvent, host::Host};

/// Run until `shutdown` fires or the input channel closes.
///
/// The overlay is hidden on exit and the controller is handed back.
pub async fn run<H: Host>(
    mut controller: ActivationController<H>,
    mut input: UnboundedReceiver<InputEvent>,
    mut bindings: watch::Receiver<Bindings>,
    shutdown: CancellationToken,
) -> ActivationController<H> {
    let mut bindings_open = true;
    loop {
        let deadline = controller.next_deadline();
        tokio::select! {
            biased;
            _ = shutdown.cancelled() => {
                debug!("driver_shutdown");
                break;
            }
            changed = bindings.changed(), if bindings_open => match changed {
                Ok(()) => {
                    let next = bindings.borrow_and_update().clone();
                    controller.set_bindings(&next);
                }
                Err(_) => {
                    debug!("bindings store dropped; keeping current table");
                    bindings_open = false;
                }
            },
            _ = sleep_until(deadline) => controller.poll_timers(),
            ev = input.recv() => match ev {
                Some(ev) => {
                    controller.handle(ev);
                    controller.poll_timers();
                }
                None => {
                    debug!("driver_input_closed");
                    break;
                }
            },
        }
    }
    controller.hide();
    controller
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(d) => time::sleep_until(TokioInstant::from_std(d)).await,
        None => future::pending().await,
    }
}
