use iced::canvas::{Frame, LineCap, Path, Stroke};
use iced::{Color, Point, Size};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pen {
    pub color: Color,
    pub width: f32,
    pub round: bool,
}

impl Pen {
    pub fn new(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            round: false,
        }
    }

    pub fn round(self) -> Self {
        Self {
            round: true,
            ..self
        }
    }
}

pub trait Painter {
    fn fill_rect(&mut self, top_left: Point, size: Size, color: Color);
    fn stroke_rect(&mut self, top_left: Point, size: Size, pen: Pen);
    fn stroke_line(&mut self, from: Point, to: Point, pen: Pen);
    fn fill_circle(&mut self, center: Point, radius: f32, color: Color);
}

fn stroke(pen: Pen) -> Stroke {
    Stroke::default()
        .with_color(pen.color)
        .with_width(pen.width)
        .with_line_cap(if pen.round {
            LineCap::Round
        } else {
            LineCap::Butt
        })
}

impl Painter for Frame {
    fn fill_rect(&mut self, top_left: Point, size: Size, color: Color) {
        let rect = Path::rectangle(top_left, size);
        self.fill(&rect, color);
    }

    fn stroke_rect(&mut self, top_left: Point, size: Size, pen: Pen) {
        let rect = Path::rectangle(top_left, size);
        self.stroke(&rect, stroke(pen));
    }

    fn stroke_line(&mut self, from: Point, to: Point, pen: Pen) {
        let line = Path::new(|p| {
            p.move_to(from);
            p.line_to(to);
        });
        self.stroke(&line, stroke(pen));
    }

    fn fill_circle(&mut self, center: Point, radius: f32, color: Color) {
        let circle = Path::circle(center, radius);
        self.fill(&circle, color);
    }
}
