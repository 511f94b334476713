use std::fmt;

/// The drawing surface that built-in procedures act on.
pub trait Turtle {
    fn clear(&mut self);
    fn hide(&mut self);
    fn show(&mut self);
    fn pen_up(&mut self);
    fn pen_down(&mut self);
    fn set_pen_color(&mut self, color: Color);
    fn turn_left(&mut self, degrees: i32);
    fn turn_right(&mut self, degrees: i32);
    fn move_back(&mut self, units: i32);
    fn move_forward(&mut self, units: i32);
    /// Moves the turtle without drawing anything.
    fn teleport(&mut self, x: i32, y: i32);
}

/// The fixed pen palette, in index order.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Color {
    Black,
    Blue,
    Green,
    Cyan,
    Red,
    Magenta,
    Yellow,
    White,
    Brown,
    Tan,
    ForestGreen,
    Aqua,
    Salmon,
    Violet,
    Orange,
    Grey,
}

impl Color {
    pub const ALL: [Color; 16] = [
        Color::Black,
        Color::Blue,
        Color::Green,
        Color::Cyan,
        Color::Red,
        Color::Magenta,
        Color::Yellow,
        Color::White,
        Color::Brown,
        Color::Tan,
        Color::ForestGreen,
        Color::Aqua,
        Color::Salmon,
        Color::Violet,
        Color::Orange,
        Color::Grey,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// The CSS name of this color.
    pub fn name(self) -> &'static str {
        match self {
            Color::Black => "black",
            Color::Blue => "blue",
            Color::Green => "green",
            Color::Cyan => "cyan",
            Color::Red => "red",
            Color::Magenta => "magenta",
            Color::Yellow => "yellow",
            Color::White => "white",
            Color::Brown => "brown",
            Color::Tan => "tan",
            Color::ForestGreen => "forestgreen",
            Color::Aqua => "aqua",
            Color::Salmon => "salmon",
            Color::Violet => "violet",
            Color::Orange => "orange",
            Color::Grey => "grey",
        }
    }
}

impl TryFrom<i32> for Color {
    type Error = ();

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        let idx = usize::try_from(value).map_err(|_| ())?;
        Color::ALL.get(idx).copied().ok_or(())
    }
}

/// A single call on a [`Turtle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurtleCmd {
    Clear,
    Hide,
    Show,
    PenUp,
    PenDown,
    SetPenColor(Color),
    Left(i32),
    Right(i32),
    Back(i32),
    Forward(i32),
    Teleport(i32, i32),
}

impl fmt::Display for TurtleCmd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurtleCmd::Clear => f.write_str("clear"),
            TurtleCmd::Hide => f.write_str("hide"),
            TurtleCmd::Show => f.write_str("show"),
            TurtleCmd::PenUp => f.write_str("penup"),
            TurtleCmd::PenDown => f.write_str("pendown"),
            TurtleCmd::SetPenColor(c) => write!(f, "setpencolor {} ({})", c.index(), c.name()),
            TurtleCmd::Left(x) => write!(f, "left {x}"),
            TurtleCmd::Right(x) => write!(f, "right {x}"),
            TurtleCmd::Back(x) => write!(f, "back {x}"),
            TurtleCmd::Forward(x) => write!(f, "forward {x}"),
            TurtleCmd::Teleport(x, y) => write!(f, "teleport {x} {y}"),
        }
    }
}

/// Records every call, in order.
impl Turtle for Vec<TurtleCmd> {
    fn clear(&mut self) {
        self.push(TurtleCmd::Clear);
    }

    fn hide(&mut self) {
        self.push(TurtleCmd::Hide);
    }

    fn show(&mut self) {
        self.push(TurtleCmd::Show);
    }

    fn pen_up(&mut self) {
        self.push(TurtleCmd::PenUp);
    }

    fn pen_down(&mut self) {
        self.push(TurtleCmd::PenDown);
    }

    fn set_pen_color(&mut self, color: Color) {
        self.push(TurtleCmd::SetPenColor(color));
    }

    fn turn_left(&mut self, degrees: i32) {
        self.push(TurtleCmd::Left(degrees));
    }

    fn turn_right(&mut self, degrees: i32) {
        self.push(TurtleCmd::Right(degrees));
    }

    fn move_back(&mut self, units: i32) {
        self.push(TurtleCmd::Back(units));
    }

    fn move_forward(&mut self, units: i32) {
        self.push(TurtleCmd::Forward(units));
    }

    fn teleport(&mut self, x: i32, y: i32) {
        self.push(TurtleCmd::Teleport(x, y));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette() {
        assert_eq!(Color::try_from(0), Ok(Color::Black));
        assert_eq!(Color::try_from(10), Ok(Color::ForestGreen));
        assert_eq!(Color::try_from(15), Ok(Color::Grey));
        assert_eq!(Color::try_from(16), Err(()));
        assert_eq!(Color::try_from(-1), Err(()));
        for (i, c) in Color::ALL.iter().enumerate() {
            assert_eq!(c.index(), i);
        }
    }
}
