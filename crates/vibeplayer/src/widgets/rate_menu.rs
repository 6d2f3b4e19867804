//! Playback rate selector menu.
//!
//! Built fresh on every open so the check mark always sits on the rate
//! the session currently reports. The popover parents itself to the
//! rate button and unparents on close.

use gtk4::prelude::*;
use gtk4::{Box as GtkBox, Button, Image, Label, Orientation, Popover, PositionType};

use vibeplayer_core::playback::{PLAYBACK_RATES, format_rate};

use crate::services::player::PlayerService;
use crate::styles::{color, rate};

/// Show the rate menu anchored above the given button.
pub fn show_rate_menu(parent: &Button) {
    let current_rate = PlayerService::global().snapshot().playback.playback_rate;

    let popover = Popover::new();
    popover.set_has_arrow(false);
    popover.set_autohide(true);
    popover.set_position(PositionType::Top);
    popover.add_css_class(rate::MENU);

    let content = GtkBox::new(Orientation::Vertical, 2);
    content.add_css_class(rate::MENU_CONTENT);

    let title = Label::new(Some("Playback Speed"));
    title.set_xalign(0.0);
    title.add_css_class(color::MUTED);
    title.add_css_class(rate::MENU_TITLE);
    content.append(&title);

    for option in PLAYBACK_RATES {
        let btn = create_rate_menu_item(option, option == current_rate);
        btn.connect_clicked({
            let popover = popover.clone();
            move |_| {
                PlayerService::global().set_playback_rate(option);
                popover.popdown();
            }
        });
        content.append(&btn);
    }

    popover.set_child(Some(&content));
    popover.set_parent(parent);
    popover.popup();

    // Unparent popover when closed
    popover.connect_closed(|p| {
        p.unparent();
    });
}

/// Create one selectable rate row.
fn create_rate_menu_item(rate_value: f64, is_active: bool) -> Button {
    let btn = Button::new();
    btn.set_has_frame(false);
    btn.add_css_class(rate::MENU_ITEM);

    let hbox = GtkBox::new(Orientation::Horizontal, 8);

    if is_active {
        let check = Image::from_icon_name(rate::ICON_CHECK);
        check.add_css_class(color::ACCENT);
        check.add_css_class(rate::MENU_CHECK);
        hbox.append(&check);
    } else {
        // Spacer keeps the labels aligned with the checked row
        let spacer = Label::new(None);
        spacer.set_width_request(16);
        hbox.append(&spacer);
    }

    let label = Label::new(Some(&format_rate(rate_value)));
    label.set_xalign(0.0);
    label.set_hexpand(true);
    label.add_css_class(color::PRIMARY);
    label.add_css_class(rate::MENU_LABEL);
    hbox.append(&label);

    btn.set_child(Some(&hbox));
    btn
}
