// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Source unloading and restoration.
//!
//! Pausing a video does not free what it buffered. To release it, the sources
//! are stripped from the element, the element is reloaded with nothing to
//! load, and once it confirms its source list is empty the sources are put
//! back so a later play can fetch them again.

use alloc::string::String;
use alloc::vec::Vec;

use crate::media::{MediaElement, MediaGeneration};

#[derive(Debug)]
struct Stripped<S> {
    media: MediaGeneration,
    src: Option<String>,
    sources: Vec<S>,
    resume_at: f64,
}

/// Outcome of [`SourceUnloader::unload`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UnloadOutcome {
    /// Sources were stripped and `load()` was called; restoration waits for
    /// the emptied acknowledgment.
    AwaitingEmptied,
    /// The element had no sources, so there was nothing to release.
    NothingToUnload,
}

/// Holds the sources of at most one element while it is unloaded.
#[derive(Debug)]
pub struct SourceUnloader<S> {
    stripped: Option<Stripped<S>>,
}

impl<S> Default for SourceUnloader<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> SourceUnloader<S> {
    /// Create an idle unloader.
    pub const fn new() -> Self {
        Self { stripped: None }
    }

    /// Returns `true` while sources are held waiting for restoration.
    pub fn is_pending(&self) -> bool {
        self.stripped.is_some()
    }

    /// Strip `media`'s sources and reload it empty.
    ///
    /// `resume_at` is the position restored along with the sources. Any
    /// unload still pending for the same element is completed first so
    /// sources are never lost.
    pub fn unload<M>(
        &mut self,
        media: &mut M,
        generation: MediaGeneration,
        resume_at: f64,
    ) -> UnloadOutcome
    where
        M: MediaElement<Source = S>,
    {
        self.restore_now(media, generation);

        let src = media.take_src();
        let sources = media.take_sources();
        if src.is_none() && sources.is_empty() {
            return UnloadOutcome::NothingToUnload;
        }
        media.load();
        self.stripped = Some(Stripped {
            media: generation,
            src,
            sources,
            resume_at,
        });
        UnloadOutcome::AwaitingEmptied
    }

    /// Handle the emptied acknowledgment from the element of `generation`.
    ///
    /// Returns `true` if sources were restored. Acknowledgments for another
    /// element, or when nothing is pending, are ignored.
    pub fn on_emptied<M>(&mut self, media: &mut M, generation: MediaGeneration) -> bool
    where
        M: MediaElement<Source = S>,
    {
        self.restore_now(media, generation)
    }

    /// Restore immediately if sources of `generation` are held.
    ///
    /// Used when playback is wanted again before the acknowledgment arrived,
    /// and when the element is being detached.
    pub fn restore_now<M>(&mut self, media: &mut M, generation: MediaGeneration) -> bool
    where
        M: MediaElement<Source = S>,
    {
        if self.stripped.as_ref().is_none_or(|s| s.media != generation) {
            return false;
        }
        let Some(stripped) = self.stripped.take() else {
            return false;
        };
        if let Some(src) = stripped.src {
            media.set_src(src);
        }
        for source in stripped.sources {
            media.append_source(source);
        }
        media.set_current_time(stripped.resume_at);
        true
    }

    /// Drop held sources without restoring them anywhere.
    pub fn forget(&mut self) {
        self.stripped = None;
    }
}
