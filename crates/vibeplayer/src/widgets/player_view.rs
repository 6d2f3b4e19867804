//! Main player surface.
//!
//! An [`Overlay`] stacks the video picture, a buffering spinner, an
//! error banner, and the sliding control bar. The controls stay pinned
//! open whenever playback is paused, waiting, or errored; during normal
//! playback they only appear while the pointer is over the view.

use std::cell::Cell;
use std::rc::Rc;

use gtk4::prelude::*;
use gtk4::{
    Box as GtkBox, Image, Label, Orientation, Overlay, Picture, Revealer, RevealerTransitionType,
    Spinner,
};

use crate::services::callbacks::CallbackId;
use crate::services::player::{PlayerService, PlayerSnapshot};
use crate::styles::{banner, class, color, controls};
use crate::widgets::controls::ControlsBar;

pub struct PlayerView {
    container: Overlay,
    player_callback_id: CallbackId,
    // Keeps the control bar's own subscriptions alive with the view.
    _controls: ControlsBar,
}

struct ViewRefs {
    spinner: Spinner,
    error_banner: GtkBox,
    error_label: Label,
    revealer: Revealer,
    hovering: Cell<bool>,
    pinned: Cell<bool>,
}

impl ViewRefs {
    fn apply_snapshot(&self, snapshot: &PlayerSnapshot) {
        let state = &snapshot.playback;

        self.spinner.set_visible(state.is_waiting);
        self.spinner.set_spinning(state.is_waiting);

        match &snapshot.error {
            Some(message) => {
                self.error_label.set_text(message);
                self.error_banner.set_visible(true);
            }
            None => self.error_banner.set_visible(false),
        }

        self.pinned
            .set(!state.is_playing || state.is_waiting || snapshot.error.is_some());
        self.sync_reveal();
    }

    fn sync_reveal(&self) {
        self.revealer
            .set_reveal_child(self.pinned.get() || self.hovering.get());
    }
}

impl PlayerView {
    pub fn new() -> Self {
        let container = Overlay::new();
        container.add_css_class(class::PLAYER_VIEW);

        let picture = match PlayerService::global().paintable() {
            Some(paintable) => Picture::for_paintable(&paintable),
            None => Picture::new(),
        };
        picture.set_hexpand(true);
        picture.set_vexpand(true);
        picture.set_content_fit(gtk4::ContentFit::Contain);
        picture.add_css_class(class::PLAYER_VIDEO);
        container.set_child(Some(&picture));

        let spinner = Spinner::new();
        spinner.set_halign(gtk4::Align::Center);
        spinner.set_valign(gtk4::Align::Center);
        spinner.set_size_request(48, 48);
        spinner.add_css_class(class::PLAYER_SPINNER);
        spinner.set_visible(false);
        container.add_overlay(&spinner);

        let error_banner = GtkBox::new(Orientation::Horizontal, 8);
        error_banner.set_halign(gtk4::Align::Center);
        error_banner.set_valign(gtk4::Align::Start);
        error_banner.add_css_class(banner::ERROR);
        error_banner.set_visible(false);

        let error_icon = Image::from_icon_name(banner::ICON_ERROR);
        error_icon.add_css_class(color::ERROR);
        error_icon.add_css_class(banner::ERROR_ICON);
        error_banner.append(&error_icon);

        let error_label = Label::new(None);
        error_label.set_wrap(true);
        error_label.set_xalign(0.0);
        error_label.add_css_class(color::PRIMARY);
        error_label.add_css_class(banner::ERROR_LABEL);
        error_banner.append(&error_label);
        container.add_overlay(&error_banner);

        let controls = ControlsBar::new();
        let revealer = Revealer::new();
        revealer.set_transition_type(RevealerTransitionType::SlideUp);
        revealer.set_valign(gtk4::Align::End);
        revealer.set_reveal_child(false);
        revealer.add_css_class(controls::REVEAL);
        revealer.set_child(Some(controls.widget()));
        container.add_overlay(&revealer);

        let refs = Rc::new(ViewRefs {
            spinner,
            error_banner,
            error_label,
            revealer,
            hovering: Cell::new(false),
            pinned: Cell::new(true),
        });

        refs.apply_snapshot(&PlayerService::global().snapshot());

        let motion = gtk4::EventControllerMotion::new();
        {
            let refs = refs.clone();
            motion.connect_enter(move |_controller, _x, _y| {
                refs.hovering.set(true);
                refs.sync_reveal();
            });
        }
        {
            let refs = refs.clone();
            motion.connect_leave(move |_controller| {
                refs.hovering.set(false);
                refs.sync_reveal();
            });
        }
        container.add_controller(motion);

        let player_callback_id = PlayerService::global().connect({
            let refs = refs.clone();
            move |snapshot| {
                refs.apply_snapshot(snapshot);
            }
        });

        Self {
            container,
            player_callback_id,
            _controls: controls,
        }
    }

    pub fn widget(&self) -> &Overlay {
        &self.container
    }
}

impl Drop for PlayerView {
    fn drop(&mut self) {
        PlayerService::global().disconnect(self.player_callback_id);
    }
}
