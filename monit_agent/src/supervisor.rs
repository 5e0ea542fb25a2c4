//! Session supervisor: one independent task per admitted connection.
//! Each task owns its `Session`, its tick timer, and its event stream.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::info;

use crate::gatekeeper::Identity;
use crate::sampler::Sampler;
use crate::session::{Session, SessionEvent, Viewport};
use crate::view::ViewModel;

/// Why a session task stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    Quit,
    Disconnected,
    /// The transport stopped accepting views.
    ViewerGone,
}

pub struct Supervisor {
    sampler: Arc<Sampler>,
    tick: Duration,
    host: Arc<str>,
}

impl Supervisor {
    pub fn new(sampler: Arc<Sampler>, tick: Duration, host: impl Into<Arc<str>>) -> Self {
        Self {
            sampler,
            tick,
            host: host.into(),
        }
    }

    /// Start a session for an admitted connection. The latest view is
    /// published on `views`, replacing any the viewer has not read yet; a
    /// closed `events` channel counts as a disconnect.
    pub fn spawn(
        &self,
        identity: Identity,
        viewport: Viewport,
        events: mpsc::Receiver<SessionEvent>,
        views: watch::Sender<Option<ViewModel>>,
    ) -> SessionHandle {
        let session = Session::new(identity.clone(), viewport, self.sampler.process_limit());
        let sampler = Arc::clone(&self.sampler);
        let host = Arc::clone(&self.host);
        let tick = self.tick;
        let who = identity.clone();
        let task = tokio::spawn(async move {
            let end = drive(session, sampler, tick, &host, events, views).await;
            info!(identity = %who, reason = ?end, "session ended");
            end
        });
        SessionHandle { identity, task }
    }
}

/// Owns the task; dropping it tears the session down, discarding any tick
/// still in flight.
pub struct SessionHandle {
    identity: Identity,
    task: JoinHandle<SessionEnd>,
}

impl SessionHandle {
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the session to stop on its own.
    pub async fn join(mut self) -> Option<SessionEnd> {
        (&mut self.task).await.ok()
    }

    pub fn abort(&self) {
        self.task.abort();
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        if !self.task.is_finished() {
            self.task.abort();
            info!(identity = %self.identity, "session torn down");
        }
    }
}

/// The per-session loop. Events are handled one at a time; a tick runs to
/// completion before the next event is read. Publishing a view never waits
/// on the viewer.
pub async fn drive(
    mut session: Session,
    sampler: Arc<Sampler>,
    tick: Duration,
    host: &str,
    mut events: mpsc::Receiver<SessionEvent>,
    views: watch::Sender<Option<ViewModel>>,
) -> SessionEnd {
    // Empty dashboard right away; the first sample follows on the first tick.
    if views.send(Some(session.view(host))).is_err() {
        return SessionEnd::ViewerGone;
    }

    let mut ticker = interval(tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        let changed = tokio::select! {
            _ = ticker.tick() => {
                session.tick(&sampler).await;
                true
            }
            ev = events.recv() => match ev {
                None | Some(SessionEvent::Disconnected) => return SessionEnd::Disconnected,
                Some(SessionEvent::Resized(vp)) => session.resize(vp),
                Some(SessionEvent::KeyPressed(key)) => session.press(key),
            },
        };
        if session.is_terminated() {
            return SessionEnd::Quit;
        }
        if changed && views.send(Some(session.view(host))).is_err() {
            return SessionEnd::ViewerGone;
        }
    }
}
