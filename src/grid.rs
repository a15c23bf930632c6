use iced::{Color, Point, Size};
use rand::Rng;

use crate::color::with_opacity;
use crate::painter::{Painter, Pen};

pub const MIN_CELL: f32 = 20.0;
pub const SKIP_PROBABILITY: f32 = 0.3;
pub const LINE_OPACITY: f32 = 0.1;
pub const LINE_WIDTH: f32 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cell {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub depth: u32,
}

impl Cell {
    pub fn mid(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    fn quadrants(&self) -> [Cell; 4] {
        let w = self.width / 2.0;
        let h = self.height / 2.0;
        let mid = self.mid();
        let depth = self.depth + 1;
        [
            Cell { x: self.x, y: self.y, width: w, height: h, depth },
            Cell { x: mid.x, y: self.y, width: w, height: h, depth },
            Cell { x: self.x, y: mid.y, width: w, height: h, depth },
            Cell { x: mid.x, y: mid.y, width: w, height: h, depth },
        ]
    }
}

/// One generated grid, valid for exactly one surface size.
#[derive(Clone, Debug, PartialEq)]
pub struct GridPattern {
    size: Size,
    cells: Vec<Cell>,
}

impl GridPattern {
    pub fn generate<R: Rng + ?Sized>(size: Size, max_depth: u32, rng: &mut R) -> Self {
        let mut cells = Vec::new();
        let root = Cell {
            x: 0.0,
            y: 0.0,
            width: size.width,
            height: size.height,
            depth: 0,
        };
        subdivide(root, max_depth, rng, &mut cells);
        Self { size, cells }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn paint<P: Painter + ?Sized>(&self, painter: &mut P, color: Color) {
        let pen = Pen::new(with_opacity(color, LINE_OPACITY), LINE_WIDTH);
        for cell in &self.cells {
            let mid = cell.mid();
            painter.stroke_rect(
                Point::new(cell.x, cell.y),
                Size::new(cell.width, cell.height),
                pen,
            );
            painter.stroke_line(
                Point::new(mid.x, cell.y),
                Point::new(mid.x, cell.y + cell.height),
                pen,
            );
            painter.stroke_line(
                Point::new(cell.x, mid.y),
                Point::new(cell.x + cell.width, mid.y),
                pen,
            );
        }
    }
}

fn subdivide<R: Rng + ?Sized>(cell: Cell, max_depth: u32, rng: &mut R, out: &mut Vec<Cell>) {
    if cell.depth > max_depth || cell.width < MIN_CELL || cell.height < MIN_CELL {
        return;
    }

    out.push(cell);

    // each quadrant subdivides with probability 0.7
    for quadrant in cell.quadrants().iter() {
        if rng.gen::<f32>() > SKIP_PROBABILITY {
            subdivide(*quadrant, max_depth, rng, out);
        }
    }
}

#[derive(Debug, Default)]
pub struct GridCache {
    pattern: Option<GridPattern>,
    generation: u64,
}

impl GridCache {
    pub fn get(&self) -> Option<&GridPattern> {
        self.pattern.as_ref()
    }

    #[cfg(test)]
    pub fn is_valid(&self) -> bool {
        self.pattern.is_some()
    }

    pub fn invalidate(&mut self) {
        self.pattern = None;
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn get_or_generate<R: Rng + ?Sized>(
        &mut self,
        size: Size,
        max_depth: u32,
        rng: &mut R,
    ) -> &GridPattern {
        if self.pattern.as_ref().map_or(false, |p| p.size != size) {
            self.pattern = None;
        }
        let generation = &mut self.generation;
        self.pattern.get_or_insert_with(|| {
            tracing::trace!(?size, max_depth, "regenerating grid");
            *generation += 1;
            GridPattern::generate(size, max_depth, rng)
        })
    }
}
