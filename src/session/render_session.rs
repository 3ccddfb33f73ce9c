use crate::driver::progress::ProgressDriver;
use crate::driver::stepper::QueueDriver;
use crate::driver::tick::TickDriver;
use crate::driver::{DriverStats, ScrollPosition, SpreadDriver};
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{FrameIndex, Millis, Viewport};
use crate::foundation::error::{VeilError, VeilResult};
use crate::render::backend::{BackendKind, FrameRGBA, RenderSurface, create_surface};
use crate::render::delta::TileDelta;
use crate::session::config::RevealConfig;
use crate::session::snapshot::RevealSnapshot;

/// Spread variant driving a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Set-based frontier advanced once per scroll tick, with border synchronization.
    #[default]
    Set,
    /// Queue-based propagation on the frame clock while scrolling.
    Queue,
    /// Random tile claims tracking the scroll progress.
    Progress,
}

/// Options controlling how a [`RevealSession`] is built and played.
#[derive(Clone, Debug)]
pub struct RevealSessionOpts {
    /// Spread variant.
    pub variant: Variant,
    /// Surface kind created by [`RevealSession::mount`].
    pub backend: BackendKind,
    /// Simulated time between playback ticks.
    pub frame_ms: u64,
    /// Simulated scroll distance per playback tick.
    pub scroll_step_px: u32,
}

impl Default for RevealSessionOpts {
    fn default() -> Self {
        Self {
            variant: Variant::Set,
            backend: BackendKind::Cpu,
            frame_ms: 16,
            scroll_step_px: 24,
        }
    }
}

/// Playback statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlaybackStats {
    /// Frames pushed into the sink.
    pub frames: u64,
    /// Deltas applied to the surface during playback.
    pub deltas: u64,
    /// Driver counters after the last tick.
    pub driver: DriverStats,
}

/// One reveal effect bound to a page.
///
/// The session owns its driver and, while mounted, its render surface. Host events arriving
/// while nothing is mounted are skipped. [`RevealSession::teardown`] consumes the session, so no
/// event can reach it afterwards.
pub struct RevealSession {
    cfg: RevealConfig,
    opts: RevealSessionOpts,
    driver: Box<dyn SpreadDriver>,
    surface: Option<Box<dyn RenderSurface>>,
    scroll_offset: u32,
}

impl RevealSession {
    /// Build an unmounted session.
    pub fn new(
        cfg: RevealConfig,
        viewport: Viewport,
        opts: RevealSessionOpts,
    ) -> VeilResult<Self> {
        let driver: Box<dyn SpreadDriver> = match opts.variant {
            Variant::Set => Box::new(TickDriver::new(&cfg, viewport)?),
            Variant::Queue => Box::new(QueueDriver::new(&cfg, viewport)?),
            Variant::Progress => Box::new(ProgressDriver::new(&cfg, viewport)?),
        };
        Ok(Self {
            cfg,
            opts,
            driver,
            surface: None,
            scroll_offset: 0,
        })
    }

    /// Configuration the session was built with.
    pub fn config(&self) -> &RevealConfig {
        &self.cfg
    }

    /// Spread variant.
    pub fn variant(&self) -> Variant {
        self.opts.variant
    }

    /// Read-only view of the driver.
    pub fn driver(&self) -> &dyn SpreadDriver {
        self.driver.as_ref()
    }

    /// Driver counters.
    pub fn stats(&self) -> DriverStats {
        self.driver.stats()
    }

    /// Return `true` while a surface is mounted.
    pub fn is_mounted(&self) -> bool {
        self.surface.is_some()
    }

    /// Create the configured surface, seed the driver and paint the seeds.
    pub fn mount(&mut self) -> VeilResult<()> {
        let surface = create_surface(
            self.opts.backend,
            self.driver.viewport(),
            self.cfg.colors,
        )?;
        self.mount_with(surface)
    }

    /// Mount a caller-provided surface, seed the driver and paint the seeds.
    pub fn mount_with(&mut self, surface: Box<dyn RenderSurface>) -> VeilResult<()> {
        self.surface = Some(surface);
        self.scroll_offset = 0;
        let deltas = self.driver.seed();
        tracing::debug!(
            variant = ?self.opts.variant,
            seeds = deltas.len(),
            "mounted reveal surface"
        );
        self.apply(&deltas)?;
        Ok(())
    }

    /// Detach the surface; later events are skipped until the next mount.
    pub fn unmount(&mut self) -> Option<Box<dyn RenderSurface>> {
        tracing::debug!("unmounted reveal surface");
        self.surface.take()
    }

    /// Forward a scroll tick. Returns the number of deltas applied.
    pub fn on_scroll(
        &mut self,
        now: Millis,
        position: Option<ScrollPosition>,
    ) -> VeilResult<usize> {
        if !self.is_mounted() {
            tracing::debug!(at_ms = now.0, "scroll with no surface mounted, skipping");
            return Ok(0);
        }
        let deltas = self.driver.on_scroll(now, position);
        self.apply(&deltas)
    }

    /// Forward a frame-clock tick. Returns the number of deltas applied.
    pub fn frame(&mut self, now: Millis) -> VeilResult<usize> {
        if !self.is_mounted() {
            return Ok(0);
        }
        let deltas = self.driver.frame(now);
        self.apply(&deltas)
    }

    /// Adopt new surface dimensions: resize the surface, discard spread state and re-seed.
    ///
    /// While unmounted only the driver adopts the dimensions; the next mount sizes its surface
    /// from them.
    pub fn on_resize(&mut self, viewport: Viewport) -> VeilResult<usize> {
        if let Some(surface) = self.surface.as_mut() {
            surface.resize(viewport)?;
        } else {
            tracing::debug!(
                width = viewport.width,
                height = viewport.document_height,
                "resize with no surface mounted, recording dimensions only"
            );
        }
        self.scroll_offset = 0;
        let deltas = self.driver.on_resize(viewport);
        self.apply(&deltas)
    }

    /// Compose the current surface into a frame.
    pub fn render(&mut self) -> VeilResult<FrameRGBA> {
        self.surface
            .as_mut()
            .ok_or_else(|| VeilError::validation("render requires a mounted surface"))?
            .render()
    }

    /// Simulate `ticks` scroll ticks and push one composed frame per tick into `sink`.
    ///
    /// Each tick scrolls down by `scroll_step_px`, delivers the scroll event, then runs one
    /// frame-clock step at the same timestamp.
    #[tracing::instrument(level = "debug", skip(self, sink))]
    pub fn play(&mut self, ticks: u64, sink: &mut dyn FrameSink) -> VeilResult<PlaybackStats> {
        if !self.is_mounted() {
            return Err(VeilError::validation("play requires a mounted surface"));
        }
        let viewport = self.driver.viewport();
        sink.begin(SinkConfig {
            width: viewport.width,
            height: viewport.document_height,
            frames: ticks,
        })?;

        let mut stats = PlaybackStats::default();
        for i in 0..ticks {
            let now = Millis(i.saturating_mul(self.opts.frame_ms));
            let position = self.advance_scroll();
            stats.deltas += self.on_scroll(now, Some(position))? as u64;
            stats.deltas += self.frame(now)? as u64;
            let frame = self.render()?;
            sink.push_frame(FrameIndex(i), &frame)?;
            stats.frames += 1;
        }
        sink.end()?;
        stats.driver = self.driver.stats();
        tracing::debug!(
            frames = stats.frames,
            deltas = stats.deltas,
            infected = stats.driver.infected,
            terminated = stats.driver.terminated,
            "playback finished"
        );
        Ok(stats)
    }

    /// Export the spread state.
    pub fn snapshot(&self) -> RevealSnapshot {
        RevealSnapshot::capture(
            self.opts.variant,
            self.driver.tile_size(),
            self.driver.viewport(),
            &self.driver.state(),
        )
    }

    /// Replace the spread state with `snapshot` and repaint the mounted surface, if any.
    pub fn restore(&mut self, snapshot: &RevealSnapshot) -> VeilResult<()> {
        if snapshot.variant != self.opts.variant {
            return Err(VeilError::validation(format!(
                "snapshot variant {:?} does not match session variant {:?}",
                snapshot.variant, self.opts.variant
            )));
        }
        if snapshot.tile_size != self.driver.tile_size() {
            return Err(VeilError::validation(format!(
                "snapshot tile size {} does not match {}",
                snapshot.tile_size,
                self.driver.tile_size()
            )));
        }
        if snapshot.viewport != self.driver.viewport() {
            return Err(VeilError::validation(
                "snapshot viewport does not match the session viewport",
            ));
        }
        let state = snapshot.restore()?;
        let deltas = self.driver.restore(state)?;
        if let Some(surface) = self.surface.as_mut() {
            surface.resize(snapshot.viewport)?;
            self.apply(&deltas)?;
        }
        Ok(())
    }

    /// End the session, releasing the surface and all pending work.
    pub fn teardown(self) -> DriverStats {
        let stats = self.driver.stats();
        tracing::debug!(
            infected = stats.infected,
            mounted = self.surface.is_some(),
            "reveal session torn down"
        );
        stats
    }

    fn advance_scroll(&mut self) -> ScrollPosition {
        let viewport = self.driver.viewport();
        let max_offset = viewport
            .document_height
            .saturating_sub(viewport.viewport_height);
        self.scroll_offset = self
            .scroll_offset
            .saturating_add(self.opts.scroll_step_px)
            .min(max_offset);
        ScrollPosition {
            offset: self.scroll_offset,
            viewport_height: viewport.viewport_height,
            document_height: viewport.document_height,
        }
    }

    fn apply(&mut self, deltas: &[TileDelta]) -> VeilResult<usize> {
        let Some(surface) = self.surface.as_mut() else {
            return Ok(0);
        };
        surface.apply(deltas)?;
        Ok(deltas.len())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/render_session.rs"]
mod tests;
