use iced::{Color, Point, Size};
use rand::Rng;

use crate::color::with_opacity;
use crate::painter::{Painter, Pen};
use crate::pointer::Pointer;

pub const GRAVITY_BLEND: f32 = 0.1;
pub const FRICTION: f32 = 0.95;
pub const WRAP_MARGIN: f32 = 10.0;
pub const HEAD_DEPTH: f32 = 0.5;

#[derive(Clone, Debug, PartialEq)]
pub struct Raindrop {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub length: f32,
    pub width: f32,
    pub opacity: f32,
    depth: f32,
}

pub type Raindrops = Vec<Raindrop>;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Repel {
    pub radius: f32,
    pub strength: f32,
}

pub fn base_speed(depth: f32) -> f32 {
    2.0 + depth * 4.0
}

impl Raindrop {
    /// A drop with the given parallax depth (clamped to `[0, 1]`) at rest
    /// speed. Size, thickness and opacity all follow from depth.
    pub fn with_depth(depth: f32, x: f32, y: f32) -> Self {
        let depth = depth.max(0.0).min(1.0);
        Self {
            x,
            y,
            vx: 0.0,
            vy: base_speed(depth),
            length: 8.0 + depth * 15.0,
            width: 1.0 + depth * 1.5,
            opacity: 0.3 + depth * 0.4,
            depth,
        }
    }

    /// Spawns in the band one surface-height above the top edge, never on
    /// screen: the field pours in from above, staggered so drops don't arrive
    /// together.
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, size: Size) -> Self {
        let depth = rng.gen::<f32>();
        let x = rng.gen::<f32>() * size.width;
        let y = rng.gen::<f32>() * size.height - size.height;
        Self::with_depth(depth, x, y)
    }

    pub fn depth(&self) -> f32 {
        self.depth
    }

    pub fn base_speed(&self) -> f32 {
        base_speed(self.depth)
    }

    pub fn update<R: Rng + ?Sized>(
        &mut self,
        pointer: &Pointer,
        repel: Repel,
        size: Size,
        rng: &mut R,
    ) {
        let dx = self.x - pointer.position.x;
        let dy = self.y - pointer.position.y;
        let distance = (dx * dx + dy * dy).sqrt();

        if pointer.active && distance < repel.radius && distance > 0.0 {
            let force = (repel.radius - distance) / repel.radius * repel.strength;
            let angle = dy.atan2(dx);
            // sideways push dominates so drops flow around the pointer
            self.vx += angle.cos() * force * 2.0;
            self.vy += angle.sin() * force * 0.5;
        }

        let base = self.base_speed();
        self.vy += (base - self.vy) * GRAVITY_BLEND;
        self.vx *= FRICTION;

        self.x += self.vx;
        self.y += self.vy;

        if self.y > size.height + self.length {
            self.y = -self.length;
            self.x = rng.gen::<f32>() * size.width;
            self.vx = 0.0;
            self.vy = base;
        }

        if self.x < -WRAP_MARGIN {
            self.x = size.width + WRAP_MARGIN;
        } else if self.x > size.width + WRAP_MARGIN {
            self.x = -WRAP_MARGIN;
        }
    }

    pub fn paint<P: Painter + ?Sized>(&self, painter: &mut P, color: Color) {
        let color = with_opacity(color, self.opacity);
        painter.stroke_line(
            Point::new(self.x, self.y),
            Point::new(self.x, self.y + self.length),
            Pen::new(color, self.width).round(),
        );
        if self.depth > HEAD_DEPTH {
            painter.fill_circle(Point::new(self.x, self.y), self.width * 0.8, color);
        }
    }
}

pub fn populate<R: Rng + ?Sized>(rng: &mut R, size: Size, count: usize) -> Raindrops {
    (0..count).map(|_| Raindrop::spawn(rng, size)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::painter::recording::{Call, Recorder};
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const SIZE: Size = Size {
        width: 800.0,
        height: 600.0,
    };

    const REPEL: Repel = Repel {
        radius: 120.0,
        strength: 0.5,
    };

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn depth_drives_appearance() {
        let back = Raindrop::with_depth(0.0, 0.0, 0.0);
        let front = Raindrop::with_depth(1.0, 0.0, 0.0);
        assert_eq!(back.vy, 2.0);
        assert_eq!(front.vy, 6.0);
        assert_eq!(back.length, 8.0);
        assert_eq!(front.length, 23.0);
        assert_eq!(back.width, 1.0);
        assert_eq!(front.width, 2.5);
        assert!((back.opacity - 0.3).abs() < 1e-6);
        assert!((front.opacity - 0.7).abs() < 1e-6);
        assert_eq!(Raindrop::with_depth(3.0, 0.0, 0.0).depth(), 1.0);
    }

    #[test]
    fn spawn_starts_above_surface() {
        let mut rng = rng();
        for drop in populate(&mut rng, SIZE, 500) {
            assert!(drop.y >= -SIZE.height && drop.y < 0.0);
            assert!(drop.x >= 0.0 && drop.x < SIZE.width);
            assert_eq!(drop.vx, 0.0);
        }
    }

    #[test]
    fn recycles_past_bottom_edge() {
        let mut rng = rng();
        let mut drop = Raindrop::with_depth(0.5, 100.0, SIZE.height + 20.0);
        drop.vx = 3.0;
        drop.vy = 9.0;
        drop.update(&Pointer::default(), REPEL, SIZE, &mut rng);
        assert_eq!(drop.y, -drop.length);
        assert_eq!(drop.vx, 0.0);
        assert_eq!(drop.vy, 4.0);
        assert_eq!(drop.depth(), 0.5);
    }

    #[test]
    fn wraps_horizontally() {
        let mut rng = rng();
        let mut drop = Raindrop::with_depth(0.5, -10.5, 100.0);
        drop.update(&Pointer::default(), REPEL, SIZE, &mut rng);
        assert_eq!(drop.x, SIZE.width + WRAP_MARGIN);

        let mut drop = Raindrop::with_depth(0.5, SIZE.width + 10.5, 100.0);
        drop.update(&Pointer::default(), REPEL, SIZE, &mut rng);
        assert_eq!(drop.x, -WRAP_MARGIN);
    }

    #[test]
    fn no_force_at_zero_distance() {
        let mut rng = rng();
        let mut drop = Raindrop::with_depth(1.0, 200.0, 200.0);
        let pointer = Pointer {
            position: Point::new(200.0, 200.0),
            active: true,
        };
        drop.update(&pointer, REPEL, SIZE, &mut rng);
        assert_eq!(drop.vx, 0.0);
        assert_eq!(drop.vy, 6.0);
        assert!(drop.vx.is_finite() && drop.vy.is_finite());
    }

    #[test]
    fn repels_inside_radius_only() {
        let mut rng = rng();
        let pointer = Pointer {
            position: Point::new(400.0, 300.0),
            active: true,
        };

        let mut near = Raindrop::with_depth(1.0, 390.0, 300.0);
        near.update(&pointer, REPEL, SIZE, &mut rng);
        // pushed left, away from the pointer
        assert!(near.vx < 0.0);

        let mut far = Raindrop::with_depth(1.0, 200.0, 300.0);
        far.vx = 1.0;
        far.update(&pointer, REPEL, SIZE, &mut rng);
        assert!((far.vx - FRICTION).abs() < 1e-6);

        // an inactive pointer never pushes
        let mut idle = Raindrop::with_depth(1.0, 390.0, 300.0);
        let inactive = Pointer {
            active: false,
            ..pointer
        };
        idle.update(&inactive, REPEL, SIZE, &mut rng);
        assert_eq!(idle.vx, 0.0);
    }

    #[test]
    fn vertical_speed_relaxes_to_base() {
        let mut rng = rng();
        let mut drop = Raindrop::with_depth(0.25, 100.0, -1000.0);
        drop.vy = -5.0;
        for _ in 0..50 {
            drop.update(&Pointer::default(), REPEL, Size::new(800.0, 100_000.0), &mut rng);
        }
        assert!((drop.vy - drop.base_speed()).abs() < 0.05);
    }

    #[test]
    fn paints_streak_and_head() {
        let color = Color::from_rgba(1.0, 1.0, 1.0, 0.5);
        let mut recorder = Recorder::default();
        Raindrop::with_depth(0.2, 10.0, 10.0).paint(&mut recorder, color);
        assert_eq!(recorder.lines(), 1);
        assert_eq!(recorder.circles(), 0);

        let mut recorder = Recorder::default();
        let drop = Raindrop::with_depth(0.8, 10.0, 10.0);
        drop.paint(&mut recorder, color);
        assert_eq!(recorder.circles(), 1);
        match &recorder.calls[0] {
            Call::Line(from, to, pen) => {
                assert_eq!(*from, Point::new(10.0, 10.0));
                assert_eq!(to.y, 10.0 + drop.length);
                assert!(pen.round);
                assert!((pen.color.a - 0.5 * drop.opacity).abs() < 1e-6);
            }
            other => panic!("unexpected call {:?}", other),
        }
    }

    proptest! {
        #[test]
        fn stays_within_horizontal_bounds(
            seed in any::<u64>(),
            px in -50.0f32..850.0,
            py in -50.0f32..650.0,
            active in any::<bool>(),
            frames in 1usize..200,
        ) {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut drops = populate(&mut rng, SIZE, 20);
            let pointer = Pointer { position: Point::new(px, py), active };
            let depths: Vec<f32> = drops.iter().map(Raindrop::depth).collect();

            for _ in 0..frames {
                for drop in drops.iter_mut() {
                    drop.update(&pointer, REPEL, SIZE, &mut rng);
                    prop_assert!(drop.x >= -WRAP_MARGIN && drop.x <= SIZE.width + WRAP_MARGIN);
                    prop_assert!(drop.y <= SIZE.height + drop.length);
                    prop_assert!((0.0..=1.0).contains(&drop.depth()));
                }
            }

            let after: Vec<f32> = drops.iter().map(Raindrop::depth).collect();
            prop_assert_eq!(depths, after);
        }

        #[test]
        fn idle_friction_decays_geometrically(vx in -20.0f32..20.0) {
            let mut rng = StdRng::seed_from_u64(0);
            let mut drop = Raindrop::with_depth(0.5, 400.0, 0.0);
            drop.vx = vx;
            let mut last = vx.abs();
            for _ in 0..30 {
                drop.update(&Pointer::default(), REPEL, Size::new(800.0, 100_000.0), &mut rng);
                prop_assert!(drop.vx.abs() <= last);
                last = drop.vx.abs();
            }
        }
    }
}
