use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use tokio::sync::{broadcast, mpsc, oneshot};

use super::classifier::EventClassifier;
use super::events::RawEvent;
use super::store::ActionSink;
use crate::config::RecorderConfig;
use crate::models::Action;

/// Millisecond wall clock shared by the recorder task and its timers.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> u64;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        chrono::Utc::now().timestamp_millis().max(0) as u64
    }
}

enum Command {
    Start {
        url: Option<String>,
        done: oneshot::Sender<()>,
    },
    Stop {
        done: oneshot::Sender<()>,
    },
    Event(Box<RawEvent>),
    Append {
        action: Box<Action>,
        done: oneshot::Sender<bool>,
    },
}

/// Handle to the background task that owns the classifier.
///
/// Raw events go in through an unbounded channel so capture never waits on
/// classification. Recorded actions are delivered to the sink and, once
/// accepted, broadcast to live subscribers.
pub struct Recorder {
    commands: mpsc::UnboundedSender<Command>,
    action_sender: broadcast::Sender<Action>,
}

impl Recorder {
    /// Spawn the recorder task. Must be called inside a Tokio runtime.
    pub fn spawn(
        config: RecorderConfig,
        sink: Arc<dyn ActionSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (action_tx, _) = broadcast::channel(256);

        let classifier = EventClassifier::new(config);
        tokio::spawn(run(
            command_rx,
            classifier,
            sink,
            action_tx.clone(),
            clock,
        ));

        Self {
            commands: command_tx,
            action_sender: action_tx,
        }
    }

    /// Switch to recording. Resolves once the initial navigate has been delivered.
    pub async fn start(&self, url: Option<String>) -> Result<()> {
        let (done, ack) = oneshot::channel();
        self.send(Command::Start { url, done })?;
        ack.await.map_err(|_| anyhow!("recorder task exited"))
    }

    /// Switch to idle. Events queued before the stop are classified and
    /// delivered before this resolves.
    pub async fn stop(&self) -> Result<()> {
        let (done, ack) = oneshot::channel();
        self.send(Command::Stop { done })?;
        ack.await.map_err(|_| anyhow!("recorder task exited"))
    }

    /// Queue one raw event. Never blocks.
    pub fn submit(&self, event: RawEvent) -> Result<()> {
        self.send(Command::Event(Box::new(event)))
    }

    /// Queue a ready-made action behind the events already submitted.
    /// Resolves to `false` when the recorder is idle and the action was ignored.
    pub async fn append(&self, action: Action) -> Result<bool> {
        let (done, ack) = oneshot::channel();
        self.send(Command::Append {
            action: Box::new(action),
            done,
        })?;
        ack.await.map_err(|_| anyhow!("recorder task exited"))
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Action> {
        self.action_sender.subscribe()
    }

    fn send(&self, command: Command) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| anyhow!("recorder task is not running"))
    }
}

async fn run(
    mut commands: mpsc::UnboundedReceiver<Command>,
    mut classifier: EventClassifier,
    sink: Arc<dyn ActionSink>,
    action_sender: broadcast::Sender<Action>,
    clock: Arc<dyn Clock>,
) {
    tracing::debug!("Recorder task started");

    loop {
        let wait = classifier
            .next_deadline()
            .map(|deadline| Duration::from_millis(deadline.saturating_sub(clock.now_ms())));

        let mut ack = None;
        let mut append_ack = None;
        let recorded = tokio::select! {
            command = commands.recv() => match command {
                Some(Command::Start { url, done }) => {
                    ack = Some(done);
                    classifier.start(url.as_deref(), clock.now_ms())
                }
                Some(Command::Stop { done }) => {
                    ack = Some(done);
                    classifier.stop();
                    Vec::new()
                }
                Some(Command::Event(event)) => classifier.handle(*event),
                Some(Command::Append { action, done }) => {
                    let recorded = classifier.append(*action);
                    append_ack = Some((done, recorded.is_some()));
                    recorded.unwrap_or_default()
                }
                None => break,
            },
            _ = sleep_until_due(wait) => classifier.poll(clock.now_ms()),
        };

        for action in recorded {
            deliver(sink.as_ref(), &action_sender, action).await;
        }

        if let Some(done) = ack {
            let _ = done.send(());
        }
        if let Some((done, accepted)) = append_ack {
            let _ = done.send(accepted);
        }
    }

    tracing::debug!("Recorder task stopped");
}

async fn sleep_until_due(wait: Option<Duration>) {
    match wait {
        Some(duration) => tokio::time::sleep(duration).await,
        None => std::future::pending().await,
    }
}

/// Best effort: a failed delivery drops the action and recording continues.
async fn deliver(sink: &dyn ActionSink, action_sender: &broadcast::Sender<Action>, action: Action) {
    let action_type = action.action_type.clone();
    match sink.deliver(action.clone()).await {
        Ok(()) => {
            let _ = action_sender.send(action);
        }
        Err(e) => {
            tracing::warn!("Dropped {} action: {}", action_type, e);
        }
    }
}
