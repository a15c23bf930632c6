mod style;

use futures::prelude::*;
use std::time::{Duration, Instant};

use iced::canvas::{self, Cache, Canvas, Cursor, Event, Frame, Geometry};
use iced::time;
use iced::{
    Application, Clipboard, Color, Command, Container, Element, HorizontalAlignment, Length,
    Point, Rectangle, Settings, Size, Subscription, VerticalAlignment,
};
use iced_native::{keyboard, mouse, touch, window};
use tracing_subscriber::EnvFilter;

use raingrid::config::{self, Config};
use raingrid::pointer::{to_local, Touches};
use raingrid::surface::drawable;
use raingrid::RainGrid;

const CONFIG_PATH: &str = "raingrid.json";
const FRAME_INTERVAL: Duration = Duration::from_millis(16);
const INITIAL_SIZE: (u32, u32) = (1024, 768);

#[derive(Clone, Debug)]
enum Message {
    Tick(Instant),
    ConfigLoaded(Config),
    EventOccurred(iced_native::Event),
}

struct Background {
    state: State,
    window_size: Size,
    attached: bool,
}

impl Background {
    fn attach(&mut self) {
        self.attached = true;
        self.state.touches.clear();
        self.state.surface.mount(drawable(self.window_size), self.window_size.width);
        self.state.cache.clear();
    }

    fn detach(&mut self) {
        self.attached = false;
        self.state.surface.unmount();
        self.state.cache.clear();
    }

    fn tick(&mut self, now: Instant) {
        let state = &mut self.state;
        if state.surface.poll(now) {
            state.cache.clear();
        }

        let start = Instant::now();
        state.surface.advance();
        state.last_advance_duration = start.elapsed();

        if state.surface.grid_generation() != state.drawn_generation {
            state.drawn_generation = state.surface.grid_generation();
            state.cache.clear();
        }
    }

    fn window_resized(&mut self, width: u32, height: u32) {
        self.window_size = Size::new(width as f32, height as f32);
        if !self.attached {
            return;
        }

        self.state.surface.container_resized(
            Instant::now(),
            drawable(self.window_size),
            self.window_size.width,
        );
    }

    fn key_pressed(&mut self, key_code: keyboard::KeyCode) {
        match key_code {
            keyboard::KeyCode::Space => {
                if self.attached {
                    self.detach();
                } else {
                    self.attach();
                }
            }
            keyboard::KeyCode::D => {
                self.state.show_stats = !self.state.show_stats;
            }
            _ => {}
        }
    }
}

fn load_config() -> impl Future<Output = Message> {
    config::load_or_default(CONFIG_PATH).map(Message::ConfigLoaded)
}

impl Application for Background {
    type Executor = iced::executor::Default;
    type Message = Message;
    type Flags = ();

    fn new(_flags: Self::Flags) -> (Self, Command<Message>) {
        (
            Self {
                state: State::new(Config::default()),
                window_size: Size::new(INITIAL_SIZE.0 as f32, INITIAL_SIZE.1 as f32),
                attached: false,
            },
            Command::perform(load_config(), |message| message),
        )
    }

    fn title(&self) -> String {
        match &self.state.surface.config().class_name {
            Some(class_name) => format!("RainGrid - {}", class_name),
            None => String::from("RainGrid"),
        }
    }

    fn subscription(&self) -> Subscription<Message> {
        let events = iced_native::subscription::events().map(Message::EventOccurred);
        if self.state.surface.is_running() {
            Subscription::batch(vec![
                events,
                time::every(FRAME_INTERVAL).map(Message::Tick),
            ])
        } else {
            events
        }
    }

    fn update(&mut self, message: Self::Message, _clipboard: &mut Clipboard) -> Command<Message> {
        match message {
            Message::Tick(now) => self.tick(now),
            Message::ConfigLoaded(config) => {
                self.state = State::new(config);
                self.attach();
            }
            Message::EventOccurred(event) => match event {
                iced_native::Event::Window(window::Event::Resized { width, height }) => {
                    self.window_resized(width, height);
                }
                iced_native::Event::Keyboard(keyboard::Event::KeyPressed { key_code, .. }) => {
                    self.key_pressed(key_code);
                }
                _ => {}
            },
        }
        Command::none()
    }

    fn view(&mut self) -> Element<Message> {
        let page = self.state.surface.settings().background_color;

        let content: Element<Message> = if self.attached {
            Canvas::new(&mut self.state)
                .width(Length::Fill)
                .height(Length::Fill)
                .into()
        } else {
            iced::Space::new(Length::Fill, Length::Fill).into()
        };

        Container::new(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .style(style::Container(page))
            .into()
    }
}

struct State {
    surface: RainGrid,
    touches: Touches,
    cache: Cache,
    drawn_generation: u64,
    show_stats: bool,
    last_advance_duration: Duration,
}

impl State {
    fn new(config: Config) -> Self {
        Self {
            surface: RainGrid::new(config),
            touches: Touches::default(),
            cache: Cache::default(),
            drawn_generation: 0,
            show_stats: false,
            last_advance_duration: Duration::default(),
        }
    }
}

impl canvas::Program<Message> for State {
    fn update(
        &mut self,
        event: Event,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> (canvas::event::Status, Option<Message>) {
        let origin = Point::new(bounds.x, bounds.y);

        match event {
            Event::Mouse(mouse::Event::CursorMoved { .. }) => {
                match cursor.position_in(&bounds) {
                    Some(position) => self.surface.pointer_moved(position),
                    None => self.surface.pointer_left(),
                }
            }
            Event::Mouse(mouse::Event::CursorLeft) => self.surface.pointer_left(),
            Event::Touch(touch::Event::FingerPressed { id, position }) => {
                self.touches.press(id.0, to_local(position, origin));
                self.surface.touch_moved(&self.touches.points());
            }
            Event::Touch(touch::Event::FingerMoved { id, position }) => {
                self.touches.moved(id.0, to_local(position, origin));
                self.surface.touch_moved(&self.touches.points());
            }
            Event::Touch(touch::Event::FingerLifted { id, .. })
            | Event::Touch(touch::Event::FingerLost { id, .. }) => {
                self.touches.lift(id.0);
                self.surface.touch_ended();
            }
            _ => return (canvas::event::Status::Ignored, None),
        }

        (canvas::event::Status::Captured, None)
    }

    fn draw(&self, bounds: Rectangle, _cursor: Cursor) -> Vec<Geometry> {
        let background = self
            .cache
            .draw(bounds.size(), |frame| self.surface.paint_background(frame));

        let rain = {
            let mut frame = Frame::new(bounds.size());
            self.surface.paint_rain(&mut frame);
            frame.into_geometry()
        };

        let overlay = {
            let mut frame = Frame::new(bounds.size());

            if let Some(headline) = &self.surface.config().headline {
                frame.fill_text(canvas::Text {
                    content: headline.clone(),
                    color: Color::WHITE,
                    size: 48.0,
                    position: Point::new(frame.width() / 2.0, frame.height() / 2.0),
                    horizontal_alignment: HorizontalAlignment::Center,
                    vertical_alignment: VerticalAlignment::Center,
                    ..Default::default()
                });
            }

            if self.show_stats {
                frame.fill_text(canvas::Text {
                    content: format! {
                        "frames = {}\nlast_advance_duration = {:?}\nDrop count: {}\nGrid generation: {}",
                        self.surface.frames(),
                        self.last_advance_duration,
                        self.surface.drops().len(),
                        self.surface.grid_generation(),
                    },
                    color: Color::WHITE,
                    size: 14.0,
                    position: Point::new(frame.width(), frame.height()),
                    horizontal_alignment: HorizontalAlignment::Right,
                    vertical_alignment: VerticalAlignment::Bottom,
                    ..Default::default()
                });
            }

            frame.into_geometry()
        };

        vec![background, rain, overlay]
    }
}

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    Background::run(Settings {
        antialiasing: true,
        window: iced::window::Settings {
            size: INITIAL_SIZE,
            ..iced::window::Settings::default()
        },
        ..Settings::default()
    })
}
