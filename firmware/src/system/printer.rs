//! Thermal receipt printer.
//!
//! The printer understands a subset of ESC/POS. Only the commands needed
//! for text, paper feed, justification and raster images are implemented.

use std::io::{self, Write};
use std::path::Path;

use rppal::uart::Uart;

use crate::error::{Error, Result};

const ESC: u8 = 27;
const DC2: u8 = 18;

/// Dots across the print head.
const MAX_WIDTH: u32 = 384;

/// Rows a single bitmap command can carry.
const MAX_BLOCK_ROWS: usize = 255;

// Heating and density settings tuned for the common 5-9V printer.
const HEAT_DOTS: u8 = 11;
const HEAT_TIME: u8 = 120;
const HEAT_INTERVAL: u8 = 40;
const PRINT_DENSITY: u8 = 10;
const PRINT_BREAK_TIME: u8 = 2;

/// Pixels darker than this are printed.
const BLACK_THRESHOLD: u8 = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Justification {
    Left,
    Center,
    Right,
}

impl Justification {
    fn code(self) -> u8 {
        match self {
            Self::Left => 0,
            Self::Center => 1,
            Self::Right => 2,
        }
    }
}

/// Operations the firmware needs from a printer.
pub trait Printer {
    /// Print text without ending the line.
    ///
    /// # Errors
    ///
    /// Fails with `Error::Printer` when the printer cannot be written to.
    fn print(&mut self, text: &str) -> Result<()>;

    /// # Errors
    ///
    /// Fails with `Error::Printer` when the printer cannot be written to.
    fn print_line(&mut self, text: &str) -> Result<()>;

    /// Print pending line and advance paper by given number of lines.
    ///
    /// # Errors
    ///
    /// Fails with `Error::Printer` when the printer cannot be written to.
    fn feed(&mut self, lines: u8) -> Result<()>;

    /// Set justification of the following lines.
    ///
    /// # Errors
    ///
    /// Fails with `Error::Printer` when the printer cannot be written to.
    fn set_justification(&mut self, justification: Justification) -> Result<()>;

    /// Print an image file.
    ///
    /// With `high_density`, the image is sent one row at a time, so the
    /// print head never runs ahead of the data. This is slower but keeps
    /// dark images from fading.
    ///
    /// # Errors
    ///
    /// Fails with `Error::Image` when the file cannot be loaded, nothing is
    /// printed then. Fails with `Error::Printer` on write failure.
    fn print_image(&mut self, path: &Path, high_density: bool) -> Result<()>;
}

/// Printer talking ESC/POS over a byte stream.
#[derive(Debug)]
pub struct ThermalPrinter<W> {
    link: W,
}

impl<W: Write> ThermalPrinter<W> {
    /// Wake the printer up and configure its print head.
    ///
    /// # Errors
    ///
    /// Fails with `Error::Printer` when the link cannot be written to.
    pub fn new(link: W) -> Result<Self> {
        let mut printer = Self { link };
        printer.begin()?;
        Ok(printer)
    }

    pub fn into_inner(self) -> W {
        self.link
    }

    fn begin(&mut self) -> Result<()> {
        self.write(&[0xFF])?;
        self.write(&[ESC, b'@'])?;
        self.write(&[ESC, b'7', HEAT_DOTS, HEAT_TIME, HEAT_INTERVAL])?;
        self.write(&[DC2, b'#', (PRINT_BREAK_TIME << 5) | PRINT_DENSITY])?;
        self.flush()
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.link.write_all(bytes).map_err(Error::Printer)
    }

    fn flush(&mut self) -> Result<()> {
        self.link.flush().map_err(Error::Printer)
    }
}

impl<W: Write> Printer for ThermalPrinter<W> {
    fn print(&mut self, text: &str) -> Result<()> {
        self.write(&fold_to_ascii(text))?;
        self.flush()
    }

    fn print_line(&mut self, text: &str) -> Result<()> {
        let mut bytes = fold_to_ascii(text);
        bytes.push(b'\n');
        self.write(&bytes)?;
        self.flush()
    }

    fn feed(&mut self, lines: u8) -> Result<()> {
        self.write(&[ESC, b'd', lines])?;
        self.flush()
    }

    fn set_justification(&mut self, justification: Justification) -> Result<()> {
        self.write(&[ESC, b'a', justification.code()])?;
        self.flush()
    }

    fn print_image(&mut self, path: &Path, high_density: bool) -> Result<()> {
        let bitmap = Bitmap::load(path)?;
        log::debug!(
            "Printing {}x{} bitmap from '{}'",
            bitmap.row_bytes * 8,
            bitmap.rows.len(),
            path.display()
        );

        let block_rows = if high_density { 1 } else { MAX_BLOCK_ROWS };
        for block in bitmap.rows.chunks(block_rows) {
            #[allow(clippy::cast_possible_truncation)]
            let header = [DC2, b'*', block.len() as u8, bitmap.row_bytes as u8];
            self.write(&header)?;
            for row in block {
                self.write(row)?;
            }
        }
        self.flush()
    }
}

/// Monochrome image packed eight dots per byte, most significant bit first.
#[derive(Debug, PartialEq, Eq)]
struct Bitmap {
    row_bytes: usize,
    rows: Vec<Vec<u8>>,
}

impl Bitmap {
    fn load(path: &Path) -> Result<Self> {
        let image = image::open(path)?.into_luma8();
        let width = image.width().min(MAX_WIDTH);
        let row_bytes = width.div_ceil(8) as usize;

        let rows = (0..image.height())
            .map(|y| {
                let mut row = vec![0; row_bytes];
                for x in 0..width {
                    if image.get_pixel(x, y).0[0] < BLACK_THRESHOLD {
                        row[(x / 8) as usize] |= 0x80 >> (x % 8);
                    }
                }
                row
            })
            .collect();

        Ok(Self { row_bytes, rows })
    }
}

// The printer's character set is plain ASCII.
fn fold_to_ascii(text: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\u{2018}' | '\u{2019}' | '\u{2032}' => bytes.push(b'\''),
            '\u{201C}' | '\u{201D}' | '\u{2033}' => bytes.push(b'"'),
            '\u{2013}' | '\u{2014}' | '\u{2212}' => bytes.push(b'-'),
            '\u{2026}' => bytes.extend_from_slice(b"..."),
            '\u{00A0}' => bytes.push(b' '),
            c if c.is_ascii() => bytes.push(c as u8),
            _ => bytes.push(b'?'),
        }
    }
    bytes
}

/// Serial port of the board as a byte stream.
pub struct SerialLink {
    uart: Uart,
}

impl SerialLink {
    /// # Errors
    ///
    /// Fails with `Error::Serial` when the port cannot be switched to
    /// blocking writes.
    pub fn new(mut uart: Uart) -> Result<Self> {
        uart.set_write_mode(true)?;
        Ok(Self { uart })
    }
}

impl Write for SerialLink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.uart.write(buf).map_err(io::Error::other)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.uart.drain().map_err(io::Error::other)
    }
}
