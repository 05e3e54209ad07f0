//! SVG arrows drawn between board elements.
//!
//! Each `<line data-from="a" data-to="b">` inside an overlay `<svg>` is
//! stretched from the edge of `#a` to just short of the edge of `#b`.

use web_sys::{Document, DomRect, Element};

use crate::dom;
use crate::error::Result;

pub const ARROW_SELECTOR: &str = "svg line[data-from][data-to]";
/// Room left for the arrow head before the target's edge.
pub const ARROW_GAP: f64 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Rect {
        Rect { x, y, width, height }
    }

    pub fn center(&self) -> Point {
        Point { x: self.x + self.width / 2.0, y: self.y + self.height / 2.0 }
    }

    /// Same rectangle in coordinates whose origin is `origin`'s top left.
    pub fn relative_to(&self, origin: &Rect) -> Rect {
        Rect::new(self.x - origin.x, self.y - origin.y, self.width, self.height)
    }

    /// Where the ray from the centre toward `toward` leaves the rectangle.
    pub fn boundary_toward(&self, toward: Point) -> Point {
        let c = self.center();
        let dx = toward.x - c.x;
        let dy = toward.y - c.y;
        let sx = if dx != 0.0 { (self.width / 2.0) / dx.abs() } else { f64::INFINITY };
        let sy = if dy != 0.0 { (self.height / 2.0) / dy.abs() } else { f64::INFINITY };
        let scale = sx.min(sy).min(1.0);
        Point { x: c.x + dx * scale, y: c.y + dy * scale }
    }
}

impl From<&DomRect> for Rect {
    fn from(r: &DomRect) -> Rect {
        Rect::new(r.left(), r.top(), r.width(), r.height())
    }
}

impl Segment {
    pub fn length(&self) -> f64 {
        ((self.to.x - self.from.x).powi(2) + (self.to.y - self.from.y).powi(2)).sqrt()
    }
}

pub fn arrow_between(from: Rect, to: Rect, gap: f64) -> Option<Segment> {
    let (a, b) = (from.center(), to.center());
    if a == b {
        return None;
    }
    let start = from.boundary_toward(b);
    let end = to.boundary_toward(a);
    let segment = Segment { from: start, to: end };
    let length = segment.length();
    if length <= gap {
        return Some(segment);
    }
    let keep = (length - gap) / length;
    Some(Segment {
        from: start,
        to: Point {
            x: start.x + (end.x - start.x) * keep,
            y: start.y + (end.y - start.y) * keep,
        },
    })
}

fn place_arrow(document: &Document, line: &Element) -> Result<()> {
    let (Some(from_id), Some(to_id)) = (line.get_attribute("data-from"), line.get_attribute("data-to")) else {
        return Ok(());
    };
    let (Some(from), Some(to), Some(svg)) = (
        document.get_element_by_id(&from_id),
        document.get_element_by_id(&to_id),
        line.closest("svg")?,
    ) else {
        return Ok(());
    };

    let origin = Rect::from(&svg.get_bounding_client_rect());
    let from = Rect::from(&from.get_bounding_client_rect()).relative_to(&origin);
    let to = Rect::from(&to.get_bounding_client_rect()).relative_to(&origin);
    match arrow_between(from, to, ARROW_GAP) {
        Some(segment) => {
            line.set_attribute("x1", &segment.from.x.to_string())?;
            line.set_attribute("y1", &segment.from.y.to_string())?;
            line.set_attribute("x2", &segment.to.x.to_string())?;
            line.set_attribute("y2", &segment.to.y.to_string())?;
            line.remove_attribute("visibility")?;
        }
        None => line.set_attribute("visibility", "hidden")?,
    }
    Ok(())
}

pub fn place_arrows(document: &Document) -> Result<()> {
    for line in dom::query_all::<Element>(document, ARROW_SELECTOR)? {
        place_arrow(document, &line)?;
    }
    Ok(())
}

pub fn install(document: &Document) -> Result<()> {
    place_arrows(document)?;
    let window = dom::window()?;
    let doc = document.clone();
    dom::listen(&window, "resize", move |_| place_arrows(&doc))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    #[test]
    fn boundary_is_on_the_facing_edge() {
        let r = Rect::new(0.0, 0.0, 20.0, 10.0);
        assert!(close(r.boundary_toward(Point { x: 100.0, y: 5.0 }), Point { x: 20.0, y: 5.0 }));
        assert!(close(r.boundary_toward(Point { x: 10.0, y: -50.0 }), Point { x: 10.0, y: 0.0 }));
        assert!(close(r.boundary_toward(Point { x: 30.0, y: 15.0 }), Point { x: 20.0, y: 10.0 }));
        assert!(close(r.boundary_toward(r.center()), r.center()));
    }

    #[test]
    fn points_inside_are_not_overshot() {
        let r = Rect::new(0.0, 0.0, 20.0, 20.0);
        assert!(close(r.boundary_toward(Point { x: 12.0, y: 10.0 }), Point { x: 12.0, y: 10.0 }));
    }

    #[test]
    fn arrow_runs_edge_to_edge_minus_gap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(50.0, 0.0, 10.0, 10.0);
        let arrow = arrow_between(a, b, 4.0).unwrap();
        assert!(close(arrow.from, Point { x: 10.0, y: 5.0 }));
        assert!(close(arrow.to, Point { x: 46.0, y: 5.0 }));

        let back = arrow_between(b, a, 0.0).unwrap();
        assert!(close(back.from, Point { x: 50.0, y: 5.0 }));
        assert!(close(back.to, Point { x: 10.0, y: 5.0 }));
    }

    #[test]
    fn short_arrows_keep_their_length() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(12.0, 0.0, 10.0, 10.0);
        let arrow = arrow_between(a, b, 6.0).unwrap();
        assert!((arrow.length() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn stacked_elements_get_no_arrow() {
        let a = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert_eq!(arrow_between(a, a, ARROW_GAP), None);
    }

    #[test]
    fn rects_translate_into_svg_space() {
        let svg = Rect::new(100.0, 40.0, 500.0, 500.0);
        let el = Rect::new(130.0, 90.0, 10.0, 10.0);
        assert_eq!(el.relative_to(&svg), Rect::new(30.0, 50.0, 10.0, 10.0));
    }
}
