//! NSStatusBar backend. One status item, one dropdown menu, one modal
//! settings panel. Menu actions are routed through a registered handler class
//! into the surface event channel; everything here must run on the main
//! thread.

use std::cell::RefCell;
use std::sync::Once;

use anyhow::{anyhow, Context, Result};
use objc2::rc::Retained;
use objc2::runtime::{AnyClass, AnyObject, ClassBuilder, Sel};
use objc2::{class, msg_send, sel, AnyThread, MainThreadMarker};
use objc2_app_kit::{
    NSAlert, NSAlertFirstButtonReturn, NSColor, NSFont, NSImage, NSMenu, NSMenuItem, NSStatusBar,
    NSStatusItem, NSTextField,
};
use objc2_foundation::{
    ns_string, NSMutableAttributedString, NSPoint, NSRange, NSRect, NSSize, NSString,
};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::{
    progress::ProgressSnapshot,
    schedule::{Schedule, ScheduleUpdate},
};

use super::{glyph, settings_text, StatusSurface, SurfaceEvent};

/// Fixed width of the status bar slot; the 18 px glyph sits centered in it.
const STATUS_ITEM_LENGTH: f64 = 30.0;

const SETTINGS_TAG: isize = 1;
const QUIT_TAG: isize = 2;
/// Info items carry this tag so the handler ignores them.
const INFO_TAG: isize = -1;

thread_local! {
    static EVENT_SENDER: RefCell<Option<mpsc::Sender<SurfaceEvent>>> =
        const { RefCell::new(None) };
}

unsafe extern "C" fn menu_action_triggered(
    _this: *const AnyObject,
    _sel: Sel,
    sender: *const AnyObject,
) {
    if sender.is_null() {
        return;
    }
    let tag: isize = msg_send![sender, tag];
    let event = match tag {
        SETTINGS_TAG => SurfaceEvent::SettingsRequested,
        QUIT_TAG => SurfaceEvent::QuitRequested,
        _ => return,
    };
    EVENT_SENDER.with(|cell| {
        if let Some(sender) = cell.borrow().as_ref() {
            // Menu tracking runs on the same thread as the refresh loop, so
            // the send wakes it right away.
            let _ = sender.try_send(event);
        }
    });
}

static REGISTER_HANDLER: Once = Once::new();
static mut HANDLER_INSTANCE: *const AnyObject = std::ptr::null();

fn ensure_menu_handler() -> *const AnyObject {
    REGISTER_HANDLER.call_once(|| unsafe {
        let superclass = AnyClass::get(c"NSObject").unwrap();
        let mut builder = ClassBuilder::new(c"DayringMenuHandler", superclass).unwrap();
        builder.add_method(
            sel!(menuActionTriggered:),
            menu_action_triggered as unsafe extern "C" fn(*const AnyObject, Sel, *const AnyObject),
        );
        let cls = builder.register();
        let instance: *const AnyObject = msg_send![cls, new];
        HANDLER_INSTANCE = instance;
    });
    unsafe { HANDLER_INSTANCE }
}

pub struct MacosSurface {
    mtm: MainThreadMarker,
    item: Option<Retained<NSStatusItem>>,
    detail_item: Option<Retained<NSMenuItem>>,
}

impl MacosSurface {
    pub fn new(events: mpsc::Sender<SurfaceEvent>) -> Result<Self> {
        let mtm = MainThreadMarker::new()
            .context("the status bar can only be driven from the main thread")?;
        ensure_menu_handler();
        EVENT_SENDER.with(|cell| *cell.borrow_mut() = Some(events));
        Ok(Self {
            mtm,
            item: None,
            detail_item: None,
        })
    }

    fn build_menu(&mut self) -> Retained<NSMenu> {
        let mtm = self.mtm;
        unsafe {
            let menu = NSMenu::new(mtm);
            menu.setAutoenablesItems(false);

            let detail = make_info_item(mtm);
            menu.addItem(&detail);
            self.detail_item = Some(detail);

            menu.addItem(&NSMenuItem::separatorItem(mtm));

            let settings = make_action_item("Settings…", SETTINGS_TAG, ",", mtm);
            menu.addItem(&settings);

            let more = NSMenuItem::new(mtm);
            more.setTitle(&NSString::from_str("More"));
            more.setEnabled(false);
            menu.addItem(&more);

            menu.addItem(&NSMenuItem::separatorItem(mtm));

            let quit = make_action_item("Quit Dayring", QUIT_TAG, "q", mtm);
            menu.addItem(&quit);

            menu
        }
    }
}

impl StatusSurface for MacosSurface {
    fn install(&mut self) -> Result<()> {
        if self.item.is_some() {
            return Ok(());
        }
        let status_bar = NSStatusBar::systemStatusBar();
        let item = status_bar.statusItemWithLength(STATUS_ITEM_LENGTH);
        let menu = self.build_menu();
        item.setMenu(Some(&menu));
        self.item = Some(item);
        debug!("Installed the status item");
        Ok(())
    }

    fn render(&mut self, snapshot: &ProgressSnapshot) -> Result<()> {
        let mtm = self.mtm;
        let item = self
            .item
            .as_ref()
            .ok_or_else(|| anyhow!("render before install"))?;

        if let Some(button) = item.button(mtm) {
            unsafe {
                let image = ring_image(snapshot.fraction);
                // setImage replaces the previous image wholesale
                let _: () = msg_send![&button, setImage: &*image];
            }
        }

        if let Some(detail) = self.detail_item.as_ref() {
            set_detail_title(
                detail,
                &format!("{}%", snapshot.percent()),
                &snapshot.remaining_label,
            );
        }
        Ok(())
    }

    fn open_settings(&mut self, current: &Schedule) -> Result<Option<ScheduleUpdate>> {
        let mtm = self.mtm;
        unsafe {
            let alert = NSAlert::new(mtm);
            alert.setMessageText(ns_string!("Work hours"));
            alert.setInformativeText(ns_string!(
                "One range for the whole day, or morning and afternoon separated by a comma."
            ));
            let _ = alert.addButtonWithTitle(ns_string!("Save"));
            let _ = alert.addButtonWithTitle(ns_string!("Cancel"));

            let field = NSTextField::new(mtm);
            let frame = NSRect::new(NSPoint::new(0.0, 0.0), NSSize::new(220.0, 24.0));
            let _: () = msg_send![&field, setFrame: frame];
            field.setStringValue(&NSString::from_str(&settings_text::format_schedule(
                current,
            )));
            let _: () = msg_send![&alert, setAccessoryView: &*field];

            if alert.runModal() != NSAlertFirstButtonReturn {
                return Ok(None);
            }

            let text = field.stringValue().to_string();
            match settings_text::parse_update(&text) {
                Ok(update) => Ok(Some(update)),
                Err(e) => {
                    warn!("Ignoring unparseable work hours {text:?}: {e}");
                    Ok(None)
                }
            }
        }
    }

    fn dispose(&mut self) {
        if let Some(item) = self.item.take() {
            NSStatusBar::systemStatusBar().removeStatusItem(&item);
        }
        self.detail_item = None;
        EVENT_SENDER.with(|cell| *cell.borrow_mut() = None);
    }
}

unsafe fn make_action_item(
    title: &str,
    tag: isize,
    key_equivalent: &str,
    mtm: MainThreadMarker,
) -> Retained<NSMenuItem> {
    let item = NSMenuItem::new(mtm);
    item.setTitle(&NSString::from_str(title));
    item.setEnabled(true);
    item.setTag(tag);
    item.setAction(Some(sel!(menuActionTriggered:)));
    let _: () = msg_send![&item, setKeyEquivalent: &*NSString::from_str(key_equivalent)];
    let handler = ensure_menu_handler();
    let _: () = msg_send![&item, setTarget: handler];
    item
}

/// Non-interactive menu item holding the two-line progress detail. Enabled so
/// it is not grayed out; the handler ignores its tag.
unsafe fn make_info_item(mtm: MainThreadMarker) -> Retained<NSMenuItem> {
    let item = NSMenuItem::new(mtm);
    item.setEnabled(true);
    item.setTag(INFO_TAG);
    item.setAction(Some(sel!(menuActionTriggered:)));
    let handler = ensure_menu_handler();
    let _: () = msg_send![&item, setTarget: handler];
    item
}

/// Percentage on the first line, remaining time on the second, label colors
/// from the system so both menu appearances work.
fn set_detail_title(item: &NSMenuItem, percent_line: &str, label_line: &str) {
    unsafe {
        let text = format!("{percent_line}\n{label_line}");
        let ns_text = NSString::from_str(&text);
        let attr_str =
            NSMutableAttributedString::initWithString(NSMutableAttributedString::alloc(), &ns_text);
        let full_len = ns_text.len();
        let percent_len = NSString::from_str(percent_line).len();

        let font_key = ns_string!("NSFont");
        let percent_font = NSFont::boldSystemFontOfSize(14.0);
        attr_str.addAttribute_value_range(font_key, &percent_font, NSRange::new(0, percent_len));
        let label_font = NSFont::menuFontOfSize(13.0);
        attr_str.addAttribute_value_range(
            font_key,
            &label_font,
            NSRange::new(percent_len + 1, full_len - percent_len - 1),
        );

        let color_key = ns_string!("NSColor");
        let percent_color = NSColor::labelColor();
        attr_str.addAttribute_value_range(color_key, &percent_color, NSRange::new(0, percent_len));
        let label_color = NSColor::secondaryLabelColor();
        attr_str.addAttribute_value_range(
            color_key,
            &label_color,
            NSRange::new(percent_len + 1, full_len - percent_len - 1),
        );

        let _: () = msg_send![item, setAttributedTitle: &*attr_str];
    }
}

/// Wraps the rasterized ring into an NSImage for the status bar button.
unsafe fn ring_image(fraction: f64) -> Retained<NSImage> {
    let rgba = glyph::render_ring(fraction, glyph::ICON_SIZE);
    let side = glyph::ICON_SIZE as isize;

    let rep: *mut AnyObject = msg_send![class!(NSBitmapImageRep), alloc];
    let planes: *const *const u8 = std::ptr::null();
    let rep: *mut AnyObject = msg_send![
        rep,
        initWithBitmapDataPlanes: planes,
        pixelsWide: side,
        pixelsHigh: side,
        bitsPerSample: 8isize,
        samplesPerPixel: 4isize,
        hasAlpha: true,
        isPlanar: false,
        colorSpaceName: ns_string!("NSDeviceRGBColorSpace"),
        bytesPerRow: side * 4,
        bitsPerPixel: 32isize,
    ];
    let data: *mut u8 = msg_send![rep, bitmapData];
    std::ptr::copy_nonoverlapping(rgba.as_ptr(), data, rgba.len());

    let size = NSSize::new(glyph::ICON_SIZE as f64, glyph::ICON_SIZE as f64);
    let image = NSImage::initWithSize(NSImage::alloc(), size);
    let _: () = msg_send![&image, addRepresentation: rep];
    // the image retains the rep; drop our +1 so redraws don't accumulate reps
    let _: () = msg_send![rep, release];
    image
}
