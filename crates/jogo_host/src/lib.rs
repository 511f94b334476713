use jogo::{Color, Turtle};
use kurbo::{Line, Point, Rect, Shape, Vec2};
use svg::node::element::{path::Data, Path};
use svg::Document;

// Length of the turtle marker, from tail to nose.
const MARKER_SIZE: f64 = 10.0;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CanvasConfig {
    /// Space left around the drawing on every side.
    pub margin: f64,
    pub stroke_width: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        CanvasConfig {
            margin: 10.0,
            stroke_width: 1.0,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Stroke {
    pub line: Line,
    pub color: Color,
}

/// A turtle that keeps the lines it draws, in turtle coordinates (y pointing up).
#[derive(Clone, Debug)]
pub struct Canvas {
    pos: Point,
    // Degrees clockwise from north, always in [0, 360).
    heading: i32,
    pen_down: bool,
    visible: bool,
    color: Color,
    strokes: Vec<Stroke>,
}

impl Default for Canvas {
    fn default() -> Self {
        Canvas {
            pos: Point::ORIGIN,
            heading: 0,
            pen_down: true,
            visible: true,
            color: Color::Black,
            strokes: Vec::new(),
        }
    }
}

impl Canvas {
    pub fn new() -> Self {
        Canvas::default()
    }

    pub fn position(&self) -> Point {
        self.pos
    }

    pub fn heading(&self) -> i32 {
        self.heading
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    fn direction(&self) -> Vec2 {
        let radians = f64::from(self.heading).to_radians();
        Vec2::new(radians.sin(), radians.cos())
    }

    fn turn(&mut self, degrees: i32) {
        self.heading = (self.heading + degrees.rem_euclid(360)).rem_euclid(360);
    }

    fn advance(&mut self, dist: f64) {
        let start = self.pos;
        self.pos += self.direction() * dist;
        log::trace!("move {start:?} -> {:?}", self.pos);
        if self.pen_down {
            self.strokes.push(Stroke {
                line: Line::new(start, self.pos),
                color: self.color,
            });
        }
    }

    // The nose and the two back corners of the marker.
    fn marker(&self) -> [Point; 3] {
        let dir = self.direction();
        let side = Vec2::new(dir.y, -dir.x) * (MARKER_SIZE / 3.0);
        let tail = self.pos - dir * (MARKER_SIZE / 3.0);
        [
            self.pos + dir * (MARKER_SIZE * 2.0 / 3.0),
            tail + side,
            tail - side,
        ]
    }

    /// The smallest rectangle containing every stroke, the turtle, and its marker if shown.
    pub fn bounds(&self) -> Rect {
        let mut rect = Rect::from_points(self.pos, self.pos);
        for stroke in &self.strokes {
            rect = rect.union(stroke.line.bounding_box());
        }
        if self.visible {
            for p in self.marker() {
                rect = rect.union_pt(p);
            }
        }
        rect
    }

    pub fn to_svg(&self, config: &CanvasConfig) -> Document {
        // SVG has y pointing down, so every point gets its y flipped on the way out.
        let flip = |p: Point| (p.x, -p.y);
        let bounds = self.bounds().inflate(config.margin, config.margin);

        let mut document = Document::new()
            .set(
                "viewBox",
                (bounds.x0, -bounds.y1, bounds.width(), bounds.height()),
            )
            .set("width", bounds.width())
            .set("height", bounds.height());

        for stroke in &self.strokes {
            let data = Data::new()
                .move_to(flip(stroke.line.p0))
                .line_to(flip(stroke.line.p1));
            let path = Path::new()
                .set("fill", "none")
                .set("stroke", stroke.color.name())
                .set("stroke-width", config.stroke_width)
                .set("stroke-linecap", "round")
                .set("d", data);
            document = document.add(path);
        }

        if self.visible {
            let [nose, left, right] = self.marker();
            let data = Data::new()
                .move_to(flip(nose))
                .line_to(flip(left))
                .line_to(flip(right))
                .close();
            let path = Path::new()
                .set("fill", self.color.name())
                .set("stroke", "none")
                .set("d", data);
            document = document.add(path);
        }

        document
    }

    pub fn save(
        &self,
        path: impl AsRef<std::path::Path>,
        config: &CanvasConfig,
    ) -> anyhow::Result<()> {
        svg::save(path, &self.to_svg(config))?;
        Ok(())
    }
}

impl Turtle for Canvas {
    fn clear(&mut self) {
        self.strokes.clear();
    }

    fn hide(&mut self) {
        self.visible = false;
    }

    fn show(&mut self) {
        self.visible = true;
    }

    fn pen_up(&mut self) {
        self.pen_down = false;
    }

    fn pen_down(&mut self) {
        self.pen_down = true;
    }

    fn set_pen_color(&mut self, color: Color) {
        self.color = color;
    }

    fn turn_left(&mut self, degrees: i32) {
        self.turn(-degrees.rem_euclid(360));
    }

    fn turn_right(&mut self, degrees: i32) {
        self.turn(degrees);
    }

    fn move_back(&mut self, units: i32) {
        self.advance(-f64::from(units));
    }

    fn move_forward(&mut self, units: i32) {
        self.advance(f64::from(units));
    }

    fn teleport(&mut self, x: i32, y: i32) {
        self.pos = Point::new(f64::from(x), f64::from(y));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point, b: Point) -> bool {
        (a - b).hypot() < 1e-9
    }

    #[test]
    fn square() {
        let mut canvas = Canvas::new();
        jogo::run(&mut canvas, "repeat 4 [fd 10 rt 90]").unwrap();
        assert_eq!(canvas.strokes().len(), 4);
        assert!(close(canvas.strokes()[0].line.p1, Point::new(0.0, 10.0)));
        assert!(close(canvas.strokes()[1].line.p1, Point::new(10.0, 10.0)));
        assert!(close(canvas.strokes()[2].line.p1, Point::new(10.0, 0.0)));
        assert!(close(canvas.position(), Point::ORIGIN));
        assert_eq!(canvas.heading(), 0);
    }

    #[test]
    fn heading_wraps() {
        let mut canvas = Canvas::new();
        canvas.turn_left(90);
        assert_eq!(canvas.heading(), 270);
        canvas.turn_right(450);
        assert_eq!(canvas.heading(), 0);
        canvas.turn_right(-30);
        assert_eq!(canvas.heading(), 330);
        canvas.turn_left(i32::MIN);
        assert!((0..360).contains(&canvas.heading()));
    }

    #[test]
    fn pen_and_teleport() {
        let mut canvas = Canvas::new();
        jogo::run(&mut canvas, "pu fd 10 pd bk 5 setpc 4 rt 90 fd 5 home").unwrap();
        assert_eq!(canvas.strokes().len(), 2);
        assert_eq!(canvas.strokes()[0].color, Color::Black);
        assert!(close(canvas.strokes()[0].line.p0, Point::new(0.0, 10.0)));
        assert!(close(canvas.strokes()[0].line.p1, Point::new(0.0, 5.0)));
        assert_eq!(canvas.strokes()[1].color, Color::Red);
        // `home` moves without drawing and keeps the heading.
        assert!(close(canvas.position(), Point::ORIGIN));
        assert_eq!(canvas.heading(), 90);

        jogo::run(&mut canvas, "cg ht").unwrap();
        assert!(canvas.strokes().is_empty());
        assert!(!canvas.is_visible());
    }

    #[test]
    fn svg_output() {
        let mut canvas = Canvas::new();
        jogo::run(&mut canvas, "setc 2 fd 20 ht").unwrap();
        let config = CanvasConfig {
            margin: 5.0,
            stroke_width: 2.0,
        };
        let bounds = canvas.bounds();
        assert!(close(Point::new(bounds.x0, bounds.y0), Point::ORIGIN));
        assert!(close(Point::new(bounds.x1, bounds.y1), Point::new(0.0, 20.0)));

        let text = canvas.to_svg(&config).to_string();
        assert!(text.contains("stroke=\"green\""));
        assert!(text.contains("stroke-width=\"2\""));
        assert!(text.contains("viewBox=\"-5 -25 10 30\""));
        assert!(!text.contains("fill=\"green\""));

        canvas.show();
        assert!(canvas.to_svg(&config).to_string().contains("fill=\"green\""));
    }
}
