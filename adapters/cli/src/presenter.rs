//! Presenter that records UI state and optionally prints text frames.

use anyhow::Error as AnyError;
use snake_arcade_core::{EndReason, RoundSnapshot};
use snake_arcade_rendering::{RenderingBackend, Scene};
use snake_arcade_session::{Overlay, Presenter, UiUpdate};
use tracing::debug;

/// Tracks what a UI surface would display and forwards frames to a backend.
#[derive(Debug)]
pub(crate) struct ConsolePresenter<B> {
    backend: Option<B>,
    frames: u64,
    score: u32,
    high_score: u32,
    time_remaining: Option<u32>,
    end_reason: Option<EndReason>,
    banner: Option<Overlay>,
    render_error: Option<AnyError>,
}

impl<B: RenderingBackend> ConsolePresenter<B> {
    /// Creates a presenter; `None` skips frame rendering.
    pub(crate) fn new(backend: Option<B>) -> Self {
        Self {
            backend,
            frames: 0,
            score: 0,
            high_score: 0,
            time_remaining: None,
            end_reason: None,
            banner: None,
            render_error: None,
        }
    }

    pub(crate) const fn frames(&self) -> u64 {
        self.frames
    }

    pub(crate) const fn score(&self) -> u32 {
        self.score
    }

    pub(crate) const fn high_score(&self) -> u32 {
        self.high_score
    }

    pub(crate) const fn time_remaining(&self) -> Option<u32> {
        self.time_remaining
    }

    pub(crate) const fn end_reason(&self) -> Option<EndReason> {
        self.end_reason
    }

    /// Terminal panel currently shown, if any.
    pub(crate) const fn banner(&self) -> Option<Overlay> {
        self.banner
    }

    /// First rendering failure, which stops further frame output.
    pub(crate) fn take_render_error(&mut self) -> Option<AnyError> {
        self.render_error.take()
    }
}

impl<B: RenderingBackend> Presenter for ConsolePresenter<B> {
    fn frame(&mut self, snapshot: &RoundSnapshot) {
        self.frames += 1;
        if self.render_error.is_some() {
            return;
        }
        let Some(backend) = self.backend.as_mut() else {
            return;
        };
        let result = Scene::from_snapshot(snapshot, Scene::DEFAULT_CELL_LENGTH)
            .map_err(AnyError::from)
            .and_then(|scene| backend.present(&scene));
        if let Err(error) = result {
            self.render_error = Some(error);
        }
    }

    fn ui(&mut self, update: UiUpdate) {
        debug!(?update, "ui update");
        match update {
            UiUpdate::Score(score) => self.score = score,
            UiUpdate::HighScore(score) => self.high_score = score,
            UiUpdate::TimeRemaining(seconds) => self.time_remaining = Some(seconds),
            UiUpdate::EndReason(reason) => self.end_reason = Some(reason),
            UiUpdate::Show(overlay @ (Overlay::GameOver | Overlay::Victory)) => {
                self.banner = Some(overlay);
            }
            UiUpdate::Hide(overlay) if self.banner == Some(overlay) => self.banner = None,
            UiUpdate::Show(Overlay::Timer | Overlay::Menu)
            | UiUpdate::Hide(_)
            | UiUpdate::MenuSelection(_) => {}
        }
    }
}
