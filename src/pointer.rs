use iced::Point;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pointer {
    pub position: Point,
    pub active: bool,
}

impl Default for Pointer {
    fn default() -> Self {
        Self {
            position: Point::new(-1000.0, -1000.0),
            active: false,
        }
    }
}

impl Pointer {
    pub fn move_to(&mut self, position: Point) {
        self.position = position;
        self.active = true;
    }

    /// Deactivates but keeps the last position.
    pub fn release(&mut self) {
        self.active = false;
    }
}

/// Translates a window-space position into the surface whose top-left corner
/// sits at `origin`.
pub fn to_local(position: Point, origin: Point) -> Point {
    Point::new(position.x - origin.x, position.y - origin.y)
}

#[derive(Clone, Debug, Default)]
pub struct Touches {
    fingers: Vec<(u64, Point)>,
}

impl Touches {
    pub fn press(&mut self, id: u64, position: Point) {
        match self.fingers.iter_mut().find(|(f, _)| *f == id) {
            Some(finger) => finger.1 = position,
            None => self.fingers.push((id, position)),
        }
    }

    /// Moves of fingers that never went down are dropped.
    pub fn moved(&mut self, id: u64, position: Point) {
        if let Some(finger) = self.fingers.iter_mut().find(|(f, _)| *f == id) {
            finger.1 = position;
        }
    }

    pub fn lift(&mut self, id: u64) {
        self.fingers.retain(|(f, _)| *f != id);
    }

    pub fn clear(&mut self) {
        self.fingers.clear();
    }

    pub fn points(&self) -> Vec<Point> {
        self.fingers.iter().map(|(_, p)| *p).collect()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.fingers.is_empty()
    }
}
