use std::time::Instant;

use iced::{Point, Size};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{Config, Settings};
use crate::debounce::Debounce;
use crate::grid::{GridCache, GridPattern};
use crate::painter::Painter;
use crate::pointer::Pointer;
use crate::rain::{self, Raindrop, Raindrops, Repel};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Detached,
    /// Mounted without a usable drawing context; nothing is drawn or animated.
    Inert,
    Running,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct PendingResize {
    container: Size,
    viewport_width: f32,
}

/// A zero-area container has nothing to draw into.
pub fn drawable(size: Size) -> Option<Size> {
    if size.width > 0.0 && size.height > 0.0 {
        Some(size)
    } else {
        None
    }
}

pub struct RainGrid<R = StdRng> {
    config: Config,
    settings: Settings,
    lifecycle: Lifecycle,
    size: Size,
    drops: Raindrops,
    pointer: Pointer,
    grid: GridCache,
    resize: Debounce<PendingResize>,
    frames: u64,
    rng: R,
}

impl RainGrid<StdRng> {
    pub fn new(config: Config) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }
}

impl<R: Rng> RainGrid<R> {
    pub fn with_rng(config: Config, rng: R) -> Self {
        let resize = Debounce::new(config.resize_debounce());
        Self {
            settings: config.resolve(f32::INFINITY),
            config,
            lifecycle: Lifecycle::Detached,
            size: Size::ZERO,
            drops: Raindrops::new(),
            pointer: Pointer::default(),
            grid: GridCache::default(),
            resize,
            frames: 0,
            rng,
        }
    }

    /// Attaches to a container. `None` means the host could not provide a
    /// drawing context, which leaves the surface inert.
    pub fn mount(&mut self, container: Option<Size>, viewport_width: f32) {
        let container = match container {
            Some(container) => container,
            None => {
                tracing::debug!("no drawing context, background stays inert");
                self.lifecycle = Lifecycle::Inert;
                return;
            }
        };

        self.lifecycle = Lifecycle::Running;
        self.frames = 0;
        self.pointer = Pointer::default();
        self.apply_size(container, viewport_width);
        tracing::debug!(
            width = self.size.width,
            height = self.size.height,
            drops = self.drops.len(),
            max_depth = self.settings.max_depth,
            "background mounted"
        );
    }

    pub fn unmount(&mut self) {
        if self.lifecycle == Lifecycle::Detached {
            return;
        }
        self.resize.cancel();
        self.pointer.release();
        self.lifecycle = Lifecycle::Detached;
        tracing::debug!(frames = self.frames, "background unmounted");
    }

    fn apply_size(&mut self, container: Size, viewport_width: f32) {
        self.size = container;
        self.settings = self.config.resolve(viewport_width);
        self.grid.invalidate();
        self.drops = rain::populate(&mut self.rng, self.size, self.settings.particle_count);
    }

    /// Host-facing resize entry point. A container that lost its drawing
    /// area turns the surface inert; one that regains it re-mounts at once.
    pub fn container_resized(
        &mut self,
        now: Instant,
        container: Option<Size>,
        viewport_width: f32,
    ) {
        match (self.lifecycle, container) {
            (Lifecycle::Running, Some(container)) => {
                self.request_resize(now, container, viewport_width)
            }
            (Lifecycle::Running, None) => {
                self.resize.cancel();
                self.pointer.release();
                self.lifecycle = Lifecycle::Inert;
                tracing::debug!("container lost its drawing area, background inert");
            }
            (Lifecycle::Inert, Some(container)) => self.mount(Some(container), viewport_width),
            _ => {}
        }
    }

    pub fn request_resize(&mut self, now: Instant, container: Size, viewport_width: f32) {
        if !self.is_running() {
            return;
        }
        self.resize.schedule(
            now,
            PendingResize {
                container,
                viewport_width,
            },
        );
    }

    /// Applies a resize whose quiet period has elapsed. Returns whether one
    /// was applied.
    pub fn poll(&mut self, now: Instant) -> bool {
        if !self.is_running() {
            return false;
        }
        match self.resize.poll(now) {
            Some(pending) => {
                self.apply_size(pending.container, pending.viewport_width);
                tracing::debug!(
                    width = self.size.width,
                    height = self.size.height,
                    drops = self.drops.len(),
                    "background resized"
                );
                true
            }
            None => false,
        }
    }

    pub fn pointer_moved(&mut self, local: Point) {
        if self.is_running() {
            self.pointer.move_to(local);
        }
    }

    pub fn pointer_left(&mut self) {
        if self.is_running() {
            self.pointer.release();
        }
    }

    /// Follows the first active touch point. An empty touch list changes
    /// nothing.
    pub fn touch_moved(&mut self, touches: &[Point]) {
        if let Some(first) = touches.first() {
            self.pointer_moved(*first);
        }
    }

    pub fn touch_ended(&mut self) {
        self.pointer_left();
    }

    pub fn advance(&mut self) {
        if !self.is_running() {
            return;
        }

        let size = self.size;
        let max_depth = self.settings.max_depth;
        self.grid.get_or_generate(size, max_depth, &mut self.rng);

        let repel = self.repel();
        let pointer = self.pointer;
        for drop in self.drops.iter_mut() {
            drop.update(&pointer, repel, size, &mut self.rng);
        }
        self.frames += 1;
    }

    pub fn paint_background<P: Painter + ?Sized>(&self, painter: &mut P) {
        if !self.is_running() {
            return;
        }
        painter.fill_rect(Point::ORIGIN, self.size, self.settings.background_color);
        if let Some(pattern) = self.grid.get() {
            pattern.paint(painter, self.settings.grid_color);
        }
    }

    pub fn paint_rain<P: Painter + ?Sized>(&self, painter: &mut P) {
        if !self.is_running() {
            return;
        }
        for drop in &self.drops {
            drop.paint(painter, self.settings.rain_color);
        }
    }

    pub fn frame<P: Painter + ?Sized>(&mut self, painter: &mut P) {
        if !self.is_running() {
            return;
        }
        self.advance();
        self.paint_background(painter);
        self.paint_rain(painter);
    }

    fn repel(&self) -> Repel {
        Repel {
            radius: self.settings.repel_radius,
            strength: self.settings.repel_strength,
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_running(&self) -> bool {
        self.lifecycle == Lifecycle::Running
    }

    pub fn has_pending_resize(&self) -> bool {
        self.resize.is_pending()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn drops(&self) -> &[Raindrop] {
        &self.drops
    }

    #[cfg(test)]
    pub fn drops_mut(&mut self) -> &mut [Raindrop] {
        &mut self.drops
    }

    pub fn pointer(&self) -> &Pointer {
        &self.pointer
    }

    pub fn grid(&self) -> Option<&GridPattern> {
        self.grid.get()
    }

    pub fn grid_generation(&self) -> u64 {
        self.grid.generation()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}
