//! Emotion labelling capability

use std::fmt;

use crate::landmarks::LandmarkSet;

/// Emotion recognizer backing [`EmotionSource::Model`]
pub trait EmotionModel: Send {
    /// Dominant emotion for the frame, or `None` when nothing was recognized
    fn detect(&mut self, faces: &[LandmarkSet]) -> Option<String>;
}

/// Where per-frame emotion labels come from
pub enum EmotionSource {
    /// Always reports a fixed label
    Disabled { label: String },

    /// Runs a model every `refresh_every` frames and reuses the last label in between
    Model {
        model: Box<dyn EmotionModel>,
        refresh_every: u64,
        last_label: String,
        frames_seen: u64,
    },
}

impl EmotionSource {
    pub fn disabled(label: impl Into<String>) -> Self {
        EmotionSource::Disabled { label: label.into() }
    }

    /// `initial_label` is reported until the model recognizes something
    pub fn model(model: Box<dyn EmotionModel>, refresh_every: u64, initial_label: impl Into<String>) -> Self {
        EmotionSource::Model {
            model,
            refresh_every: refresh_every.max(1),
            last_label: initial_label.into(),
            frames_seen: 0,
        }
    }

    /// Label for the current frame, shared by every face in it
    pub fn label_frame(&mut self, faces: &[LandmarkSet]) -> String {
        match self {
            EmotionSource::Disabled { label } => label.clone(),
            EmotionSource::Model {
                model,
                refresh_every,
                last_label,
                frames_seen,
            } => {
                if *frames_seen % *refresh_every == 0 {
                    if let Some(label) = model.detect(faces).filter(|l| !l.is_empty()) {
                        *last_label = label;
                    }
                }
                *frames_seen += 1;
                last_label.clone()
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, EmotionSource::Model { .. })
    }
}

impl fmt::Debug for EmotionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmotionSource::Disabled { label } => f.debug_struct("Disabled").field("label", label).finish(),
            EmotionSource::Model {
                refresh_every,
                last_label,
                frames_seen,
                ..
            } => f
                .debug_struct("Model")
                .field("refresh_every", refresh_every)
                .field("last_label", last_label)
                .field("frames_seen", frames_seen)
                .finish(),
        }
    }
}
