//! Frame math for each anchor position.
//!
//! Every function here is pure: the same (size, screen, position) input
//! always yields the same frame. The controller uses them to place the
//! overlay off-screen before sliding in, to compute the resting frame, to
//! clamp user resizes and to detect dock occlusion.
//!
//! Frames are laid out inside the *placement area*: the full screen frame
//! with only the menu bar removed from the top. The dock is deliberately not
//! excluded, which is what makes dock conflicts possible for bottom and side
//! anchors.

use crate::config::QuickTerminalPosition;
use crate::geometry::{Point, Rect, ScreenInfo, Size};

/// Smallest width or height the overlay may be resized to.
pub const MIN_EXTENT: f64 = 80.0;

/// Where the window should be and how opaque it should be drawn there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub frame: Rect,
    pub alpha: f64,
}

/// Screen frame minus the menu bar strip at the top.
pub fn placement_area(screen: &ScreenInfo) -> Rect {
    let top = screen.visible_frame.min_y().max(screen.frame.min_y());
    Rect::new(
        screen.frame.min_x(),
        top,
        screen.frame.width(),
        (screen.frame.max_y() - top).max(0.0),
    )
}

fn clamp_extent(requested: f64, available: f64) -> f64 {
    let lower = MIN_EXTENT.min(available);
    if requested.is_nan() {
        return available;
    }
    requested.clamp(lower, available)
}

/// Clamp a requested window size to what the anchor allows on `screen`.
///
/// Top/bottom overlays always span the full width and may only change
/// height; left/right overlays span the full height and may only change
/// width; a centered overlay may change both within the screen.
pub fn restrict_frame_size(
    requested: Size,
    screen: &ScreenInfo,
    position: QuickTerminalPosition,
) -> Size {
    let area = placement_area(screen);
    match position {
        QuickTerminalPosition::Top | QuickTerminalPosition::Bottom => Size::new(
            area.width(),
            clamp_extent(requested.height, area.height()),
        ),
        QuickTerminalPosition::Left | QuickTerminalPosition::Right => Size::new(
            clamp_extent(requested.width, area.width()),
            area.height(),
        ),
        QuickTerminalPosition::Center => Size::new(
            clamp_extent(requested.width, area.width()),
            clamp_extent(requested.height, area.height()),
        ),
    }
}

/// Initial window size when the overlay window is first loaded.
///
/// `fraction` is the share of the screen along the anchor axis; a centered
/// overlay uses twice the fraction on both axes (capped at the full screen).
pub fn loaded_size(
    position: QuickTerminalPosition,
    fraction: f64,
    screen: &ScreenInfo,
) -> Size {
    let area = placement_area(screen);
    let requested = match position {
        QuickTerminalPosition::Top | QuickTerminalPosition::Bottom => {
            Size::new(area.width(), area.height() * fraction)
        }
        QuickTerminalPosition::Left | QuickTerminalPosition::Right => {
            Size::new(area.width() * fraction, area.height())
        }
        QuickTerminalPosition::Center => {
            let share = (fraction * 2.0).min(1.0);
            Size::new(area.width() * share, area.height() * share)
        }
    };
    restrict_frame_size(requested, screen, position)
}

/// Resting on-screen frame for a window of `size`.
pub fn final_frame(position: QuickTerminalPosition, size: Size, screen: &ScreenInfo) -> Rect {
    let area = placement_area(screen);
    let size = restrict_frame_size(size, screen, position);
    let origin = match position {
        QuickTerminalPosition::Top => Point::new(area.min_x(), area.min_y()),
        QuickTerminalPosition::Bottom => Point::new(area.min_x(), area.max_y() - size.height),
        QuickTerminalPosition::Left => Point::new(area.min_x(), area.min_y()),
        QuickTerminalPosition::Right => Point::new(area.max_x() - size.width, area.min_y()),
        QuickTerminalPosition::Center => Point::new(
            area.min_x() + (area.width() - size.width) / 2.0,
            area.min_y() + (area.height() - size.height) / 2.0,
        ),
    };
    Rect::from_origin_size(origin, size)
}

/// Frame the overlay starts from when sliding in (and returns to when
/// sliding out): just past the anchor edge of the full screen frame.
///
/// A centered overlay does not slide; it stays in place and fades.
pub fn initial_placement(
    position: QuickTerminalPosition,
    size: Size,
    screen: &ScreenInfo,
) -> Placement {
    let target = final_frame(position, size, screen);
    let s = screen.frame;
    let origin = match position {
        QuickTerminalPosition::Top => Point::new(target.min_x(), s.min_y() - target.height()),
        QuickTerminalPosition::Bottom => Point::new(target.min_x(), s.max_y()),
        QuickTerminalPosition::Left => Point::new(s.min_x() - target.width(), target.min_y()),
        QuickTerminalPosition::Right => Point::new(s.max_x(), target.min_y()),
        QuickTerminalPosition::Center => {
            return Placement {
                frame: target,
                alpha: 0.0,
            };
        }
    };
    Placement {
        frame: Rect::from_origin_size(origin, target.size),
        alpha: 1.0,
    }
}

/// Resting placement (fully opaque window at its final frame).
pub fn final_placement(
    position: QuickTerminalPosition,
    size: Size,
    screen: &ScreenInfo,
) -> Placement {
    Placement {
        frame: final_frame(position, size, screen),
        alpha: 1.0,
    }
}

/// True when the overlay's resting frame would overlap the dock.
///
/// `dock_area` is the region the dock reserves on `screen`, or `None` when
/// the dock is hidden or lives on another screen.
pub fn conflicts_with_dock(
    position: QuickTerminalPosition,
    size: Size,
    screen: &ScreenInfo,
    dock_area: Option<Rect>,
) -> bool {
    let Some(dock) = dock_area else {
        return false;
    };
    final_frame(position, size, screen).intersects(&dock)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MENU_BAR: f64 = 25.0;
    const DOCK: f64 = 70.0;

    /// 1440x900 screen with a menu bar and a bottom dock
    fn screen() -> ScreenInfo {
        ScreenInfo {
            frame: Rect::new(0.0, 0.0, 1440.0, 900.0),
            visible_frame: Rect::new(0.0, MENU_BAR, 1440.0, 900.0 - MENU_BAR - DOCK),
        }
    }

    fn bottom_dock() -> Option<Rect> {
        Some(Rect::new(200.0, 900.0 - DOCK, 1040.0, DOCK))
    }

    #[test]
    fn top_spans_width_and_clamps_height() {
        let s = screen();
        let size = restrict_frame_size(Size::new(300.0, 5000.0), &s, QuickTerminalPosition::Top);
        assert_eq!(size, Size::new(1440.0, 900.0 - MENU_BAR));

        let size = restrict_frame_size(Size::new(300.0, 10.0), &s, QuickTerminalPosition::Bottom);
        assert_eq!(size, Size::new(1440.0, MIN_EXTENT));
    }

    #[test]
    fn sides_span_height_and_clamp_width() {
        let s = screen();
        let size = restrict_frame_size(Size::new(9000.0, 10.0), &s, QuickTerminalPosition::Left);
        assert_eq!(size, Size::new(1440.0, 900.0 - MENU_BAR));

        let size = restrict_frame_size(Size::new(400.0, 10.0), &s, QuickTerminalPosition::Right);
        assert_eq!(size, Size::new(400.0, 900.0 - MENU_BAR));
    }

    #[test]
    fn center_clamps_both_axes() {
        let s = screen();
        let size =
            restrict_frame_size(Size::new(5000.0, 1.0), &s, QuickTerminalPosition::Center);
        assert_eq!(size, Size::new(1440.0, MIN_EXTENT));
    }

    #[test]
    fn restrict_is_deterministic() {
        let s = screen();
        let requested = Size::new(777.7, 333.3);
        for position in QuickTerminalPosition::all() {
            assert_eq!(
                restrict_frame_size(requested, &s, *position),
                restrict_frame_size(requested, &s, *position)
            );
        }
    }

    #[test]
    fn nan_request_takes_full_extent() {
        let s = screen();
        let size =
            restrict_frame_size(Size::new(f64::NAN, f64::NAN), &s, QuickTerminalPosition::Center);
        assert_eq!(size, Size::new(1440.0, 900.0 - MENU_BAR));
    }

    #[test]
    fn final_frames_hug_their_edge() {
        let s = screen();
        let size = Size::new(400.0, 200.0);

        let top = final_frame(QuickTerminalPosition::Top, size, &s);
        assert_eq!(top, Rect::new(0.0, MENU_BAR, 1440.0, 200.0));

        let bottom = final_frame(QuickTerminalPosition::Bottom, size, &s);
        assert_eq!(bottom.max_y(), 900.0);

        let left = final_frame(QuickTerminalPosition::Left, size, &s);
        assert_eq!(left, Rect::new(0.0, MENU_BAR, 400.0, 900.0 - MENU_BAR));

        let right = final_frame(QuickTerminalPosition::Right, size, &s);
        assert_eq!(right.max_x(), 1440.0);

        let center = final_frame(QuickTerminalPosition::Center, size, &s);
        assert_eq!(center.origin.x, (1440.0 - 400.0) / 2.0);
    }

    #[test]
    fn initial_placement_is_off_screen() {
        let s = screen();
        let size = Size::new(400.0, 200.0);

        let top = initial_placement(QuickTerminalPosition::Top, size, &s);
        assert_eq!(top.frame.max_y(), 0.0);

        let bottom = initial_placement(QuickTerminalPosition::Bottom, size, &s);
        assert_eq!(bottom.frame.min_y(), 900.0);

        let left = initial_placement(QuickTerminalPosition::Left, size, &s);
        assert_eq!(left.frame.max_x(), 0.0);

        let right = initial_placement(QuickTerminalPosition::Right, size, &s);
        assert_eq!(right.frame.min_x(), 1440.0);

        for p in [top, bottom, left, right] {
            assert!(!p.frame.intersects(&s.frame));
            assert_eq!(p.alpha, 1.0);
        }
    }

    #[test]
    fn center_fades_in_place() {
        let s = screen();
        let size = Size::new(400.0, 200.0);
        let initial = initial_placement(QuickTerminalPosition::Center, size, &s);
        let resting = final_placement(QuickTerminalPosition::Center, size, &s);
        assert_eq!(initial.frame, resting.frame);
        assert_eq!(initial.alpha, 0.0);
        assert_eq!(resting.alpha, 1.0);
    }

    #[test]
    fn dock_conflicts() {
        let s = screen();
        let size = Size::new(400.0, 200.0);
        assert!(!conflicts_with_dock(QuickTerminalPosition::Top, size, &s, bottom_dock()));
        assert!(conflicts_with_dock(QuickTerminalPosition::Bottom, size, &s, bottom_dock()));
        assert!(conflicts_with_dock(QuickTerminalPosition::Left, size, &s, bottom_dock()));
        assert!(conflicts_with_dock(QuickTerminalPosition::Right, size, &s, bottom_dock()));
        assert!(!conflicts_with_dock(QuickTerminalPosition::Center, size, &s, bottom_dock()));
        assert!(!conflicts_with_dock(QuickTerminalPosition::Bottom, size, &s, None));
    }

    #[test]
    fn loaded_sizes_use_fraction() {
        let s = screen();
        let area_h = 900.0 - MENU_BAR;
        assert_eq!(
            loaded_size(QuickTerminalPosition::Top, 0.25, &s),
            Size::new(1440.0, area_h * 0.25)
        );
        assert_eq!(
            loaded_size(QuickTerminalPosition::Left, 0.25, &s),
            Size::new(360.0, area_h)
        );
        assert_eq!(
            loaded_size(QuickTerminalPosition::Center, 0.25, &s),
            Size::new(720.0, area_h * 0.5)
        );
        assert_eq!(
            loaded_size(QuickTerminalPosition::Center, 0.75, &s),
            Size::new(1440.0, area_h)
        );
    }
}
