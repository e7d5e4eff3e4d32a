//! Form state and the download flow for the comment generator.

use std::path::PathBuf;
use std::time::Duration;

use crate::config::StickerConfig;
use crate::export::{
    BATCH_ARCHIVE_NAME, FileSaver, SINGLE_FILE_NAME, deliver_with_fallback, export_batch,
    export_single, to_data_url,
};
use crate::foundation::day::Clock;
use crate::foundation::error::StickerResult;
use crate::gate::promo::PromoCadence;
use crate::gate::usage::{AuthPrompt, PromptReason, UsageGate};
use crate::render::surface::Surface;
use crate::sticker::bulk::BulkQueue;
use crate::sticker::compositor::{AvatarPass, Compositor, DecodedAvatar};
use crate::sticker::spec::{
    AvatarSource, BulkCommentEntry, CommentRenderSpec, DEFAULT_BODY_TEXT, DEFAULT_USERNAME,
    Theme,
};
use crate::storage::KeyValueStore;

/// Signed-in user as reported by the auth status endpoint.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub username: Option<String>,
}

/// Body of an auth status response.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AuthCheck {
    pub authenticated: bool,
    #[serde(default)]
    pub user: Option<AuthUser>,
}

/// Source of the caller's authentication state.
pub trait AuthStatus {
    fn check(&mut self) -> StickerResult<AuthCheck>;
}

/// Auth status fixed at construction.
#[derive(Clone, Debug, Default)]
pub struct StaticAuth(pub AuthCheck);

impl StaticAuth {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn signed_in(user: AuthUser) -> Self {
        Self(AuthCheck {
            authenticated: true,
            user: Some(user),
        })
    }
}

impl AuthStatus for StaticAuth {
    fn check(&mut self) -> StickerResult<AuthCheck> {
        Ok(self.0.clone())
    }
}

/// What a download produces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExportMode {
    /// One PNG of the current form.
    #[default]
    Single,
    /// A ZIP of every queued entry.
    Bulk,
}

/// Result of [`StickerSession::download`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DownloadOutcome {
    Saved {
        path: PathBuf,
        /// Whether the promo prompt should accompany this download.
        show_promo: bool,
    },
    /// The daily limit was reached and the caller did not sign in.
    Denied,
    /// Export or delivery failed; nothing was counted.
    Failed(String),
}

/// Counts prompt outcomes so a successful sign-in can resume the download.
struct ResumablePrompt<'a> {
    inner: &'a mut dyn AuthPrompt,
    granted: bool,
}

impl AuthPrompt for ResumablePrompt<'_> {
    fn request(&mut self, reason: PromptReason) -> bool {
        let ok = self.inner.request(reason);
        self.granted |= ok;
        ok
    }
}

/// The comment generator: form fields, bulk list, render surface, and quota.
///
/// Every form mutation re-runs the frame pass synchronously. The avatar pass is left pending
/// until [`StickerSession::finish_avatar`] (or the caller's own decode and
/// [`StickerSession::apply_avatar`]), and exports always render completely.
pub struct StickerSession<S, C, F> {
    spec: CommentRenderSpec,
    bulk: BulkQueue,
    mode: ExportMode,
    surface: F,
    compositor: Compositor,
    pending_avatar: Option<AvatarPass>,
    gate: UsageGate<S, C>,
    promo: PromoCadence<S>,
    fallback: Option<Box<dyn FileSaver>>,
    tool_id: String,
    daily_limit: u32,
    settle: Duration,
}

impl<S, C, F> StickerSession<S, C, F>
where
    S: KeyValueStore + Clone,
    C: Clock,
    F: Surface,
{
    pub fn new(config: &StickerConfig, store: S, clock: C, surface: F) -> Self {
        let spec = CommentRenderSpec {
            theme: config.theme,
            style: config.style,
            canvas: config.canvas(),
            ..CommentRenderSpec::default()
        };
        let mut session = Self {
            spec,
            bulk: BulkQueue::new(),
            mode: ExportMode::Single,
            surface,
            compositor: Compositor::new(),
            pending_avatar: None,
            gate: UsageGate::new(store.clone(), clock),
            promo: PromoCadence::new(store),
            fallback: None,
            tool_id: config.tool_id.clone(),
            daily_limit: config.daily_limit,
            settle: config.settle(),
        };
        session.refresh();
        session
    }

    /// Saver tried when the one passed to [`StickerSession::download`] fails.
    pub fn with_fallback_saver(mut self, saver: Box<dyn FileSaver>) -> Self {
        self.fallback = Some(saver);
        self
    }

    pub fn spec(&self) -> &CommentRenderSpec {
        &self.spec
    }

    pub fn bulk_entries(&self) -> &[BulkCommentEntry] {
        self.bulk.entries()
    }

    pub fn mode(&self) -> ExportMode {
        self.mode
    }

    pub fn surface(&self) -> &F {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut F {
        &mut self.surface
    }

    pub fn set_username(&mut self, username: impl Into<String>) {
        self.spec.username = username.into();
        self.refresh();
    }

    pub fn set_body_text(&mut self, body_text: impl Into<String>) {
        self.spec.body_text = body_text.into();
        self.refresh();
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.spec.theme = theme;
        self.refresh();
    }

    pub fn set_avatar(&mut self, avatar: AvatarSource) {
        self.spec.avatar = avatar;
        self.refresh();
    }

    pub fn set_viewport_width(&mut self, viewport_width: u32) {
        let canvas = self.spec.style.canvas(viewport_width);
        if canvas != self.spec.canvas {
            self.spec.canvas = canvas;
            self.refresh();
        }
    }

    pub fn set_mode(&mut self, mode: ExportMode) {
        self.mode = mode;
    }

    /// Queue the current form values and reset the text fields.
    pub fn add_bulk_entry(&mut self) {
        self.bulk.push(BulkCommentEntry::new(
            std::mem::replace(&mut self.spec.username, DEFAULT_USERNAME.to_string()),
            std::mem::replace(&mut self.spec.body_text, DEFAULT_BODY_TEXT.to_string()),
        ));
        self.refresh();
    }

    pub fn remove_bulk_entry(&mut self, index: usize) -> StickerResult<BulkCommentEntry> {
        self.bulk.remove(index)
    }

    pub fn clear_bulk_entries(&mut self) {
        self.bulk.clear();
    }

    /// Restore the form to its defaults. Canvas, style, and the bulk list are kept.
    pub fn reset(&mut self) {
        self.spec = CommentRenderSpec {
            canvas: self.spec.canvas,
            style: self.spec.style,
            ..CommentRenderSpec::default()
        };
        self.refresh();
    }

    /// Take the avatar pass owed by the latest render, to decode elsewhere.
    pub fn take_avatar_pass(&mut self) -> Option<AvatarPass> {
        self.pending_avatar.take()
    }

    /// Draw an avatar decoded from [`StickerSession::take_avatar_pass`]. Stale ones are
    /// ignored.
    pub fn apply_avatar(&mut self, avatar: &DecodedAvatar) -> bool {
        self.compositor.apply_avatar(&mut self.surface, avatar)
    }

    /// Decode and draw the pending avatar on this thread.
    pub fn finish_avatar(&mut self) -> bool {
        match self.pending_avatar.take() {
            Some(pass) => {
                let decoded = pass.decode();
                self.apply_avatar(&decoded)
            }
            None => false,
        }
    }

    /// Current surface as a PNG data URL.
    pub fn preview_data_url(&mut self) -> Option<String> {
        to_data_url(&mut self.surface)
    }

    pub fn remaining_uses(&self) -> u32 {
        self.gate.remaining_uses(&self.tool_id, self.daily_limit)
    }

    /// Gate, export, deliver, then count the download.
    ///
    /// An auth status error counts as signed out. When the quota is used up `prompt` is
    /// asked to sign the user in; if it succeeds the download goes ahead unmetered.
    #[tracing::instrument(skip_all, fields(tool_id = %self.tool_id, mode = ?self.mode))]
    pub fn download(
        &mut self,
        auth: &mut dyn AuthStatus,
        prompt: &mut dyn AuthPrompt,
        saver: &mut dyn FileSaver,
    ) -> DownloadOutcome {
        let mut authenticated = match auth.check() {
            Ok(check) => check.authenticated,
            Err(err) => {
                tracing::warn!(error = %err, "auth status check failed; treating as signed out");
                false
            }
        };

        let mut resumable = ResumablePrompt {
            inner: prompt,
            granted: false,
        };
        let allowed = self.gate.check_usage_limit(
            &self.tool_id,
            self.daily_limit,
            authenticated,
            &mut resumable,
        );
        if !allowed {
            if !resumable.granted {
                return DownloadOutcome::Denied;
            }
            tracing::info!("signed in from limit prompt; resuming download");
            authenticated = true;
        }

        let (name, bytes) = match self.export() {
            Ok(out) => out,
            Err(err) => {
                tracing::warn!(error = %err, "export failed");
                return DownloadOutcome::Failed(err.to_string());
            }
        };

        let fallback = self
            .fallback
            .as_mut()
            .map(|f| &mut **f as &mut dyn FileSaver);
        let path = match deliver_with_fallback(saver, fallback, name, &bytes) {
            Ok(path) => path,
            Err(err) => {
                tracing::warn!(error = %err, "download delivery failed");
                return DownloadOutcome::Failed(err.to_string());
            }
        };

        let show_promo = self.promo.should_show();
        self.promo.record_download();
        if !authenticated {
            self.gate.increment_usage(&self.tool_id);
        }
        tracing::info!(path = %path.display(), show_promo, "download saved");

        DownloadOutcome::Saved { path, show_promo }
    }

    /// Opt out of the promo prompt.
    pub fn dont_show_promo_again(&self) {
        self.promo.dont_show_again();
    }

    fn export(&mut self) -> StickerResult<(&'static str, Vec<u8>)> {
        if self.mode == ExportMode::Bulk && !self.bulk.is_empty() {
            let zip = export_batch(
                &mut self.compositor,
                &mut self.surface,
                &self.spec,
                self.bulk.entries(),
                self.settle,
            )?;
            // Leave the preview showing the form, not the last batch entry.
            self.refresh();
            Ok((BATCH_ARCHIVE_NAME, zip))
        } else {
            let png = export_single(&mut self.compositor, &mut self.surface, &self.spec)?;
            self.pending_avatar = None;
            Ok((SINGLE_FILE_NAME, png))
        }
    }

    fn refresh(&mut self) {
        self.pending_avatar = self.compositor.render(&self.spec, &mut self.surface);
    }
}

#[cfg(test)]
#[path = "../tests/unit/session.rs"]
mod tests;
