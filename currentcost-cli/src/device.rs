use std::{
    fs::File,
    io::{BufRead, BufReader, stdin},
    path::Path,
};

use crate::prelude::*;

/// Line-oriented reader over the meter output.
///
/// The meter writes one XML document per line. Serial noise may produce invalid UTF-8,
/// such bytes are replaced so that the parser rejects the frame instead of the reader failing.
pub struct FrameReader<R> {
    inner: R,
    buffer: Vec<u8>,
}

impl FrameReader<Box<dyn BufRead>> {
    /// Open the device node, or standard input when the path is `-`.
    ///
    /// The serial port itself must already be configured (for EnviR: 57600 8N1).
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn open(path: &Path) -> Result<Self> {
        let inner: Box<dyn BufRead> = if path == Path::new("-") {
            info!("reading frames from the standard input…");
            Box::new(stdin().lock())
        } else {
            info!("opening the device…");
            let file = File::open(path)
                .with_context(|| format!("failed to open `{}`", path.display()))?;
            Box::new(BufReader::new(file))
        };
        Ok(Self::new(inner))
    }
}

impl<R: BufRead> FrameReader<R> {
    pub const fn new(inner: R) -> Self {
        Self { inner, buffer: Vec::new() }
    }
}

impl<R: BufRead> Iterator for FrameReader<R> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buffer.clear();
        match self.inner.read_until(b'\n', &mut self.buffer) {
            Ok(0) => None,
            Ok(_) => Some(Ok(String::from_utf8_lossy(&self.buffer).trim().to_owned())),
            Err(error) => Some(Err(error).context("failed to read a line from the device")),
        }
    }
}
