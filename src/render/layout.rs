use kurbo::Rect;

use crate::scene::model::BlockLayout;

/// Placement of a block inside `container`.
///
/// `layout` is in percent of the container; `None` (or a layout with non-finite values) fills
/// the whole container.
pub fn block_rect(layout: Option<&BlockLayout>, container: Rect) -> Rect {
    let Some(l) = layout.filter(|l| [l.x, l.y, l.w, l.h].iter().all(|v| v.is_finite())) else {
        return container;
    };
    let w = container.width();
    let h = container.height();
    let x0 = container.x0 + w * l.x / 100.0;
    let y0 = container.y0 + h * l.y / 100.0;
    Rect::new(
        x0,
        y0,
        x0 + w * l.w.max(0.0) / 100.0,
        y0 + h * l.h.max(0.0) / 100.0,
    )
}

/// Stable ascending paint order by `key`; equal keys keep their input order.
pub fn paint_order<T>(items: &[T], key: impl Fn(&T) -> i32) -> Vec<&T> {
    let mut ordered: Vec<&T> = items.iter().collect();
    ordered.sort_by_key(|item| key(item));
    ordered
}

#[cfg(test)]
#[path = "../../tests/unit/render/layout.rs"]
mod tests;
