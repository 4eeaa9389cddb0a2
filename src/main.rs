use iced::widget::{column, container, text, Canvas};
use iced::{keyboard, Element, Length, Size, Subscription, Task, Theme};
use std::path::PathBuf;
use std::time::{Duration, Instant};

mod config;
mod error;
mod gallery;
mod navigator;
mod pile;
mod ui;
mod viewer;

use config::Config;
use error::Error;
use navigator::Direction;
use pile::{Pile, ThumbImage};
use viewer::geometry::Placement;
use viewer::{Phase, Photo, Viewer};

/// Height reserved for the status line under the gallery surface.
const STATUS_BAR_HEIGHT: f32 = 32.0;

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// Background folder scan finished.
    FolderScanned(Result<Vec<PathBuf>, Error>),
    /// A thumbnail finished loading.
    ThumbnailLoaded(usize, Result<ThumbImage, Error>),
    /// A full-size photo load finished; tagged with its generation so
    /// stale results can be dropped.
    PhotoLoaded(u64, Result<Photo, Error>),
    /// User clicked a thumbnail in the pile.
    ThumbnailPressed(usize),
    /// The thumbnail under the cursor changed.
    ThumbnailHovered(Option<usize>),
    /// User clicked outside the open photo.
    BackdropPressed,
    /// Next/prev request from a hotspot or an arrow key.
    Navigate(Direction),
    /// Animation clock.
    Tick(Instant),
    /// The window changed size; overlay fits and pile layout follow it.
    WindowResized(Size),
}

/// Main application state
struct Photopile {
    config: Config,
    pile: Pile,
    viewer: Viewer,
    /// Last known window size; the gallery surface is this minus the
    /// status bar.
    window: Size,
    /// Status message to display to the user
    status: String,
}

impl Photopile {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        // Gallery folder: first CLI argument, or a native picker.
        let folder = std::env::args().nth(1).map(PathBuf::from).or_else(|| {
            rfd::FileDialog::new()
                .set_title("Select a Folder of Photos")
                .pick_folder()
        });

        // Malformed configuration is a programming error: fail fast.
        let config = match &folder {
            Some(folder) => Config::load(folder).expect("Failed to read photopile.json"),
            None => Config::default(),
        };
        config.validate().expect("Invalid photopile configuration");

        let viewer = Viewer::new(&config);
        let pile = Pile::new(Vec::new(), &config);

        let (status, task) = match folder {
            Some(folder) => {
                println!("🎨 Photopile starting in {}", folder.display());
                (
                    format!("Scanning {}…", folder.display()),
                    Task::perform(gallery::scan_folder(folder), Message::FolderScanned),
                )
            }
            None => ("No gallery folder selected.".to_string(), Task::none()),
        };

        (
            Photopile {
                config,
                pile,
                viewer,
                window: Size::new(1100.0, 800.0),
                status,
            },
            task,
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::FolderScanned(Ok(sources)) => {
                if sources.is_empty() {
                    self.status = "No images found in the selected folder.".to_string();
                    return Task::none();
                }

                self.status = format!("Loading {} thumbnails…", sources.len());
                self.pile = Pile::new(sources, &self.config);

                let box_size = self.config.thumb_size;
                let loads = (0..self.pile.len()).map(|index| {
                    let path = self.pile.path(index).to_path_buf();
                    Task::perform(
                        gallery::loader::load_thumbnail(path, box_size),
                        move |result| Message::ThumbnailLoaded(index, result),
                    )
                });
                Task::batch(loads)
            }
            Message::FolderScanned(Err(error)) => {
                eprintln!("⚠️  Gallery scan failed: {error}");
                self.status = format!("Gallery scan failed: {error}");
                Task::none()
            }
            Message::ThumbnailLoaded(index, Ok(image)) => {
                self.pile.set_image(index, image);
                let loaded = self.pile.loaded_count();
                self.status = if loaded == self.pile.len() {
                    format!("{} photos. Click one to pick it up.", self.pile.len())
                } else {
                    format!("Loading thumbnails… {loaded}/{}", self.pile.len())
                };
                Task::none()
            }
            Message::ThumbnailLoaded(index, Err(error)) => {
                eprintln!(
                    "⚠️  Thumbnail failed for {}: {error}",
                    self.pile.path(index).display()
                );
                Task::none()
            }
            Message::ThumbnailPressed(index) => self.request_pickup(index),
            Message::ThumbnailHovered(hovered) => {
                self.pile.set_hovered(hovered);
                Task::none()
            }
            Message::BackdropPressed => {
                // Only an open photo reacts to outside clicks.
                if self.viewer.phase() == Phase::Open {
                    if let Some(active) = self.pile.active() {
                        let target = self.thumb_placement(active);
                        self.viewer.begin_close(target, Instant::now());
                    }
                }
                Task::none()
            }
            Message::Navigate(direction) => {
                match navigator::target(self.pile.active(), self.pile.len(), direction) {
                    Some(index) => self.request_pickup(index),
                    None => Task::none(),
                }
            }
            Message::PhotoLoaded(generation, Ok(photo)) => {
                let accepted = self.viewer.photo_loaded(
                    generation,
                    photo,
                    self.surface_size(),
                    Instant::now(),
                );
                if !accepted {
                    println!("⏭️  Dropped stale photo load (generation {generation})");
                }
                Task::none()
            }
            Message::PhotoLoaded(generation, Err(error)) => {
                if self.viewer.abort_opening(generation) {
                    self.pile.clear_active();
                    eprintln!("⚠️  Photo load failed: {error}");
                    self.status = format!("Could not open photo: {error}");
                }
                Task::none()
            }
            Message::Tick(now) => {
                if let Some(viewer::Event::Closed { pending }) = self.viewer.tick(now) {
                    self.pile.clear_active();
                    if let Some(index) = pending {
                        return self.request_pickup(index);
                    }
                }
                Task::none()
            }
            Message::WindowResized(size) => {
                self.window = size;
                Task::none()
            }
        }
    }

    /// Route a pickup request through the viewer state machine.
    ///
    /// From `Closed` the pickup starts immediately; otherwise it is queued
    /// and the close sequence runs to completion first.
    fn request_pickup(&mut self, index: usize) -> Task<Message> {
        if index >= self.pile.len() || self.pile.is_active(index) {
            return Task::none();
        }
        let now = Instant::now();

        match self.viewer.phase() {
            Phase::Closed => {
                self.pile.set_active(index);
                self.pile.set_hovered(None);
                let origin = self.thumb_placement(index);
                let generation = self.viewer.begin_open(index, origin, now);
                let path = self.pile.path(index).to_path_buf();
                Task::perform(gallery::loader::load_photo(path), move |result| {
                    Message::PhotoLoaded(generation, result)
                })
            }
            Phase::Open | Phase::Opening => {
                self.viewer.queue_pickup(index);
                if let Some(active) = self.pile.active() {
                    let target = self.thumb_placement(active);
                    self.viewer.begin_close(target, now);
                }
                Task::none()
            }
            Phase::Closing => {
                self.viewer.queue_pickup(index);
                Task::none()
            }
        }
    }

    /// Current on-screen placement of a thumbnail.
    fn thumb_placement(&self, index: usize) -> Placement {
        self.pile.layout(self.surface_size())[index]
    }

    fn surface_size(&self) -> Size {
        Size::new(
            self.window.width.max(1.0),
            (self.window.height - STATUS_BAR_HEIGHT).max(1.0),
        )
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let surface = Canvas::new(ui::Surface {
            pile: &self.pile,
            viewer: &self.viewer,
            config: &self.config,
        })
        .width(Length::Fill)
        .height(Length::Fill);

        column![
            surface,
            container(text(&self.status).size(13))
                .padding(8)
                .height(STATUS_BAR_HEIGHT)
                .width(Length::Fill),
        ]
        .into()
    }

    fn subscription(&self) -> Subscription<Message> {
        let keys = keyboard::on_key_press(|key, _modifiers| match key {
            keyboard::Key::Named(keyboard::key::Named::ArrowRight) => {
                Some(Message::Navigate(Direction::Next))
            }
            keyboard::Key::Named(keyboard::key::Named::ArrowLeft) => {
                Some(Message::Navigate(Direction::Prev))
            }
            _ => None,
        });

        let resizes = iced::event::listen_with(|event, _status, _window| match event {
            iced::Event::Window(iced::window::Event::Resized(size)) => {
                Some(Message::WindowResized(size))
            }
            _ => None,
        });

        // Animations advance on a 16 ms clock, but only while something
        // is actually moving.
        let ticks = if self.viewer.is_animating() {
            iced::time::every(Duration::from_millis(16)).map(Message::Tick)
        } else {
            Subscription::none()
        };

        Subscription::batch([keys, resizes, ticks])
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn main() -> iced::Result {
    iced::application("Photopile", Photopile::update, Photopile::view)
        .subscription(Photopile::subscription)
        .theme(Photopile::theme)
        .window_size(Size::new(1100.0, 800.0))
        .centered()
        .run_with(Photopile::new)
}
