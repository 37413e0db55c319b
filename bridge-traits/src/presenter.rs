//! Presentation hooks.
//!
//! Rendering, artwork preloading and fade choreography belong to the host.
//! The core only sequences these calls around its state changes.

use async_trait::async_trait;

use crate::media::MediaDescriptor;

#[async_trait]
pub trait Presenter: Send + Sync {
    /// Show title, subtitle and artwork for the incoming media.
    async fn render_metadata(&self, _descriptor: &MediaDescriptor) {}

    /// Resolves once auxiliary assets (artwork, branding) are ready.
    async fn preload(&self, _descriptor: &MediaDescriptor) {}

    /// First half of a crossfade, before the state changes.
    async fn fade_out(&self) {}

    /// Second half of a crossfade, after the state changed.
    async fn fade_in(&self) {}
}

/// Presenter for headless hosts and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPresenter;

impl Presenter for NoopPresenter {}
