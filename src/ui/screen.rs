//! Screen contents for each phase.
//!
//! A [`Screen`] is the logical view; [`Screen::layout`] turns it into a
//! [`Frame`] of positioned text lines.  The frame is what a display port
//! draws after clearing its buffer, so the firmware and the host tests see
//! exactly the same text.

use core::fmt::Write;

use heapless::{String, Vec};

use crate::error::Error;
use crate::scenario::{ProcessId, Resources, PROCESS_COUNT};

/// Characters per line at the small text size on a 128 px wide panel.
pub const LINE_CAPACITY: usize = 21;

/// Maximum number of text lines in one frame.
pub const MAX_LINES: usize = 8;

/// Text size of one line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TextSize {
    /// 8 px rows.
    Small,
    /// 16 px rows.
    Large,
}

impl TextSize {
    /// Vertical advance of one line (px).
    pub const fn row_height(self) -> i32 {
        match self {
            TextSize::Small => 8,
            TextSize::Large => 16,
        }
    }
}

/// One positioned line of text. `(x, y)` is the top-left corner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Line {
    pub x: i32,
    pub y: i32,
    pub size: TextSize,
    pub text: String<LINE_CAPACITY>,
}

/// Everything drawn for one screen, on a cleared buffer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Frame {
    pub lines: Vec<Line, MAX_LINES>,
}

impl Frame {
    /// Text of every line, top to bottom.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|l| l.text.as_str())
    }

    /// `true` if any line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.texts().any(|t| t.contains(needle))
    }
}

/// Logical screens, one per phase plus the power-up banner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Screen {
    /// Title shown at power-up.
    Banner,
    /// Resource configuration.
    Choose { resources: Resources },
    /// Warm-up run, one process per step.
    RunOrder { step: u8 },
    /// Safe order to memorise.
    SafeSequence { order: [ProcessId; PROCESS_COUNT] },
    /// Replay of the safe order.
    Execute {
        order: [ProcessId; PROCESS_COUNT],
        next: ProcessId,
        selected: ProcessId,
    },
    /// All processes finished.
    Finished,
}

impl Screen {
    pub fn layout(&self) -> Result<Frame, Error> {
        let mut c = Cursor::new();
        match *self {
            Screen::Banner => {
                c.line(format_args!("Resource Allocation"))?;
                c.line(format_args!("System"))?;
                c.blank();
                c.line(format_args!("Banker's Algorithm"))?;
            }
            Screen::Choose { resources } => {
                c.line(format_args!("Choose Resources"))?;
                c.blank();
                c.line(format_args!("R1: {}", resources.r1.count()))?;
                c.line(format_args!("R2: {}", resources.r2.count()))?;
                c.blank();
                c.line(format_args!("Press OK to confirm"))?;
            }
            Screen::RunOrder { step } => {
                c.line(format_args!("Run Processes"))?;
                c.line(format_args!("(In Order)"))?;
                c.blank();
                c.size = TextSize::Large;
                c.line(format_args!("P{}", step))?;
                c.size = TextSize::Small;
                c.blank();
                c.line(format_args!("Press OK"))?;
            }
            Screen::SafeSequence { order: [a, b, c0] } => {
                c.line(format_args!("Safe Sequence:"))?;
                c.blank();
                c.size = TextSize::Large;
                c.line(format_args!("{}>{}>{}", a, b, c0))?;
            }
            Screen::Execute {
                order: [a, b, c0],
                next,
                selected,
            } => {
                c.line(format_args!("Safe Sequence:"))?;
                c.line(format_args!("{} > {} > {}", a, b, c0))?;
                c.blank();
                c.line(format_args!("Next: {}", next))?;
                c.blank();
                c.size = TextSize::Large;
                c.line(format_args!("Sel: {}", selected))?;
            }
            Screen::Finished => {
                c.size = TextSize::Large;
                c.at(35, 0).line(format_args!("Yay!"))?;
                c.at(10, 20).line(format_args!("Processes"))?;
                c.at(10, 40).line(format_args!("Finished!"))?;
            }
        }
        Ok(c.frame)
    }
}

/// Println-style text cursor.
struct Cursor {
    x: i32,
    y: i32,
    size: TextSize,
    frame: Frame,
}

impl Cursor {
    fn new() -> Self {
        Self {
            x: 0,
            y: 0,
            size: TextSize::Small,
            frame: Frame::default(),
        }
    }

    fn at(&mut self, x: i32, y: i32) -> &mut Self {
        self.x = x;
        self.y = y;
        self
    }

    fn blank(&mut self) {
        self.y += self.size.row_height();
    }

    fn line(&mut self, args: core::fmt::Arguments<'_>) -> Result<(), Error> {
        let mut text = String::new();
        text.write_fmt(args).map_err(|_| Error::BufferOverflow)?;
        self.frame
            .lines
            .push(Line {
                x: self.x,
                y: self.y,
                size: self.size,
                text,
            })
            .map_err(|_| Error::BufferOverflow)?;
        self.y += self.size.row_height();
        Ok(())
    }
}
