use iced::{container, Background, Color};

/// Page backdrop behind the canvas; shows through while the background is
/// detached.
pub struct Container(pub Color);

impl container::StyleSheet for Container {
    fn style(&self) -> container::Style {
        container::Style {
            background: Some(Background::Color(self.0)),
            text_color: Some(Color::WHITE),
            ..container::Style::default()
        }
    }
}
