//! Session task
//!
//! Runs a [`SessionEngine`] on its own tokio task, fed through a bounded
//! frame channel. Records come back on a second bounded channel; callers
//! must keep reading them (or call [`SessionHandle::finish`]) so the task
//! does not stall on a full output channel.

use behavior::FrameInput;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::RunnerConfig;
use crate::engine::SessionEngine;
use crate::record::{FrameRecord, SessionReport};
use crate::EngineError;

/// Caller side of a running session
pub struct SessionHandle {
    session_id: Uuid,
    frames: mpsc::Sender<FrameInput>,
    records: mpsc::Receiver<FrameRecord>,
    task: JoinHandle<SessionReport>,
}

/// Move `engine` onto a tokio task and return its handle
pub fn spawn_session(engine: SessionEngine, config: &RunnerConfig) -> SessionHandle {
    let capacity = config.channel_capacity.max(1);
    let (frame_tx, frame_rx) = mpsc::channel(capacity);
    let (record_tx, record_rx) = mpsc::channel(capacity);
    let session_id = engine.session_id();

    let task = tokio::spawn(run_session(engine, frame_rx, record_tx));
    info!("Spawned session {} (capacity {})", session_id, capacity);

    SessionHandle {
        session_id,
        frames: frame_tx,
        records: record_rx,
        task,
    }
}

async fn run_session(
    mut engine: SessionEngine,
    mut frames: mpsc::Receiver<FrameInput>,
    records: mpsc::Sender<FrameRecord>,
) -> SessionReport {
    let mut deliver = true;

    while let Some(frame) = frames.recv().await {
        let record = engine.process_frame(&frame);
        if deliver && records.send(record).await.is_err() {
            warn!(
                "Record receiver for session {} dropped; continuing without output",
                engine.session_id()
            );
            deliver = false;
        }
    }

    debug!("Frame channel for session {} closed", engine.session_id());
    engine.report()
}

impl SessionHandle {
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Queue a frame, waiting while the channel is full.
    ///
    /// Frames whose faces were detected on a different frame size are
    /// rejected before they reach the session.
    pub async fn submit(&self, frame: FrameInput) -> Result<(), EngineError> {
        frame.validate()?;
        self.frames
            .send(frame)
            .await
            .map_err(|_| EngineError::SessionClosed)
    }

    /// Next record, or `None` once the session has ended
    pub async fn next_record(&mut self) -> Option<FrameRecord> {
        self.records.recv().await
    }

    /// Close the session.
    ///
    /// Every queued frame is processed before the report is built; the
    /// records not yet read are returned alongside it.
    pub async fn finish(self) -> Result<(Vec<FrameRecord>, SessionReport), EngineError> {
        let SessionHandle {
            session_id,
            frames,
            mut records,
            task,
        } = self;
        drop(frames);

        let mut remaining = Vec::new();
        while let Some(record) = records.recv().await {
            remaining.push(record);
        }

        match task.await {
            Ok(report) => {
                info!("Session {} finished", session_id);
                Ok((remaining, report))
            }
            Err(e) => {
                warn!("Session {} task failed: {}", session_id, e);
                Err(EngineError::TaskFailed(e.to_string()))
            }
        }
    }
}
