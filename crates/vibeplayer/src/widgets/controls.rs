//! Playback control bar.
//!
//! One horizontal strip: play/pause button, elapsed time, the timeline,
//! the duration, and the rate selector. The bar subscribes to player
//! snapshots and repaints its children from each one; it never computes
//! playback state itself.

use std::rc::Rc;

use gtk4::prelude::*;
use gtk4::{Box as GtkBox, Button, Image, Label, Orientation};

use vibeplayer_core::playback::format_rate;
use vibeplayer_core::timecode::format_timecode;

use crate::services::callbacks::CallbackId;
use crate::services::config_manager::ConfigManager;
use crate::services::player::{PlayerService, PlayerSnapshot};
use crate::styles::{button, color, controls};
use crate::widgets::rate_menu::show_rate_menu;
use crate::widgets::timeline::TimelineBar;

pub struct ControlsBar {
    container: GtkBox,
    player_callback_id: CallbackId,
    theme_callback_id: CallbackId,
}

/// Owned widget references for the snapshot callback.
struct ControlsRefs {
    play_icon: Image,
    position_label: Label,
    duration_label: Label,
    rate_label: Label,
    timeline: TimelineBar,
}

impl ControlsRefs {
    fn apply_snapshot(&self, snapshot: &PlayerSnapshot) {
        let state = &snapshot.playback;

        let icon = if state.is_playing {
            controls::ICON_PAUSE
        } else {
            controls::ICON_PLAY
        };
        self.play_icon.set_icon_name(Some(icon));

        self.position_label
            .set_text(&format_timecode(state.position_us));
        self.duration_label
            .set_text(&format_timecode(state.duration_us));
        self.rate_label.set_text(&format_rate(state.playback_rate));

        let buffered_fraction = if state.duration_us > 0 {
            (snapshot.buffered_us as f64 / state.duration_us as f64).clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.timeline
            .set_fractions(state.progress_fraction(), buffered_fraction);
    }
}

impl ControlsBar {
    pub fn new() -> Self {
        let sizes = ConfigManager::global().theme_sizes();

        let container = GtkBox::new(Orientation::Horizontal, sizes.control_spacing as i32);
        container.add_css_class(controls::BAR);

        let play_icon = Image::from_icon_name(controls::ICON_PLAY);
        let play_btn = Button::new();
        play_btn.set_has_frame(false);
        play_btn.set_valign(gtk4::Align::Center);
        play_btn.set_child(Some(&play_icon));
        play_btn.add_css_class(button::RESET);
        play_btn.add_css_class(controls::BUTTON);
        play_btn.add_css_class(controls::PLAY_BUTTON);
        play_btn.set_tooltip_text(Some("Play/Pause"));
        play_btn.connect_clicked(|_| {
            PlayerService::global().toggle_play_pause();
        });
        container.append(&play_btn);

        let position_label = Label::new(Some("0:00"));
        position_label.add_css_class(color::PRIMARY);
        position_label.add_css_class(controls::POSITION);
        container.append(&position_label);

        let timeline = TimelineBar::new();
        container.append(&timeline);

        let duration_label = Label::new(Some("0:00"));
        duration_label.add_css_class(color::MUTED);
        duration_label.add_css_class(controls::DURATION);
        container.append(&duration_label);

        let rate_label = Label::new(Some(&format_rate(1.0)));
        rate_label.add_css_class(color::PRIMARY);
        rate_label.add_css_class(controls::RATE_LABEL);
        let rate_btn = Button::new();
        rate_btn.set_has_frame(false);
        rate_btn.set_valign(gtk4::Align::Center);
        rate_btn.set_child(Some(&rate_label));
        rate_btn.add_css_class(button::RESET);
        rate_btn.add_css_class(controls::BUTTON);
        rate_btn.add_css_class(controls::RATE_BUTTON);
        rate_btn.set_tooltip_text(Some("Playback speed"));
        rate_btn.connect_clicked(|btn| {
            show_rate_menu(btn);
        });
        container.append(&rate_btn);

        let refs = Rc::new(ControlsRefs {
            play_icon,
            position_label,
            duration_label,
            rate_label,
            timeline: timeline.clone(),
        });

        // Paint the initial state; everything after arrives via callback.
        refs.apply_snapshot(&PlayerService::global().snapshot());
        timeline.set_colors(ConfigManager::global().theme_palette().timeline_colors());

        let player_callback_id = PlayerService::global().connect({
            let refs = refs.clone();
            move |snapshot| {
                refs.apply_snapshot(snapshot);
            }
        });

        let theme_callback_id = ConfigManager::global().on_theme_change(move |palette| {
            timeline.set_colors(palette.timeline_colors());
        });

        Self {
            container,
            player_callback_id,
            theme_callback_id,
        }
    }

    pub fn widget(&self) -> &GtkBox {
        &self.container
    }
}

impl Drop for ControlsBar {
    fn drop(&mut self) {
        PlayerService::global().disconnect(self.player_callback_id);
        ConfigManager::global().disconnect_theme_callback(self.theme_callback_id);
    }
}
