//! Seekable timeline bar.
//!
//! Custom widget painting three layers inside a pill-shaped clip: the
//! full-width track, the buffered fill over it, and the progress fill
//! on top. A primary-button press maps the pointer x to a fraction of
//! the track and asks the player service to seek there.
//!
//! The widget holds no playback state of its own; the control bar
//! pushes fractions and palette colors into it.

use gtk4::prelude::*;
use gtk4::subclass::prelude::*;
use gtk4::{gdk, glib, graphene, gsk};

use vibeplayer_core::seek;
use vibeplayer_core::theme::{Rgba, TimelineColors};

use crate::services::player::PlayerService;
use crate::styles::timeline;

fn to_gdk(color: Rgba) -> gdk::RGBA {
    gdk::RGBA::new(
        color.r as f32,
        color.g as f32,
        color.b as f32,
        color.a as f32,
    )
}

mod imp {
    use super::*;
    use std::cell::Cell;

    use vibeplayer_core::ThemePalette;

    pub struct TimelineBar {
        pub colors: Cell<TimelineColors>,
        pub progress_fraction: Cell<f64>,
        pub buffered_fraction: Cell<f64>,
    }

    impl Default for TimelineBar {
        fn default() -> Self {
            Self {
                colors: Cell::new(ThemePalette::default().timeline_colors()),
                progress_fraction: Cell::new(0.0),
                buffered_fraction: Cell::new(0.0),
            }
        }
    }

    #[glib::object_subclass]
    impl ObjectSubclass for TimelineBar {
        const NAME: &'static str = "VibeplayerTimelineBar";
        type Type = super::TimelineBar;
        type ParentType = gtk4::Widget;

        fn class_init(klass: &mut Self::Class) {
            klass.set_css_name(timeline::BAR);
        }
    }

    impl ObjectImpl for TimelineBar {}

    impl WidgetImpl for TimelineBar {
        fn snapshot(&self, snapshot: &gtk4::Snapshot) {
            let widget = self.obj();
            let width = widget.width() as f32;
            let height = widget.height() as f32;
            if width <= 0.0 || height <= 0.0 {
                return;
            }

            let colors = self.colors.get();
            let full = graphene::Rect::new(0.0, 0.0, width, height);

            snapshot.push_rounded_clip(&gsk::RoundedRect::from_rect(full, height / 2.0));
            snapshot.append_color(&to_gdk(colors.track), &full);

            let buffered = self.buffered_fraction.get().clamp(0.0, 1.0) as f32;
            if buffered > 0.0 {
                let rect = graphene::Rect::new(0.0, 0.0, width * buffered, height);
                snapshot.append_color(&to_gdk(colors.buffer), &rect);
            }

            let progress = self.progress_fraction.get().clamp(0.0, 1.0) as f32;
            if progress > 0.0 {
                let rect = graphene::Rect::new(0.0, 0.0, width * progress, height);
                snapshot.append_color(&to_gdk(colors.progress), &rect);
            }

            snapshot.pop();
        }
    }
}

glib::wrapper! {
    pub struct TimelineBar(ObjectSubclass<imp::TimelineBar>)
        @extends gtk4::Widget,
        @implements gtk4::Accessible, gtk4::Buildable, gtk4::ConstraintTarget;
}

impl TimelineBar {
    pub fn new() -> Self {
        let obj: Self = glib::Object::builder().build();
        obj.set_hexpand(true);
        obj.set_valign(gtk4::Align::Center);

        let click = gtk4::GestureClick::new();
        {
            let widget = obj.clone();
            click.connect_pressed(move |gesture, n_press, x, _y| {
                if n_press == 1 && gesture.current_button() == 1 {
                    widget.seek_to_pointer(x);
                }
            });
        }
        obj.add_controller(click);

        obj
    }

    /// Map a widget-local pointer x to a duration fraction and seek.
    fn seek_to_pointer(&self, pointer_x: f64) {
        let width = self.width() as f64;
        let Some(fraction) = seek::pointer_fraction(pointer_x, 0.0, width) else {
            return;
        };
        PlayerService::global().seek_to_fraction(fraction);
    }

    /// Update the painted fractions. Cheap to call on every snapshot;
    /// only repaints when a value actually moved.
    pub fn set_fractions(&self, progress: f64, buffered: f64) {
        let imp = self.imp();
        if imp.progress_fraction.get() != progress || imp.buffered_fraction.get() != buffered {
            imp.progress_fraction.set(progress);
            imp.buffered_fraction.set(buffered);
            self.queue_draw();
        }
    }

    /// Swap the paint colors, typically after a theme reload.
    pub fn set_colors(&self, colors: TimelineColors) {
        if self.imp().colors.get() != colors {
            self.imp().colors.set(colors);
            self.queue_draw();
        }
    }
}

impl Default for TimelineBar {
    fn default() -> Self {
        Self::new()
    }
}
