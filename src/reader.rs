//! Where input lines come from.
//!
//! [`LineReader`] reads raw lines from any buffered stream, growing its buffer in fixed
//! increments. [`PlainSource`] puts a prompt in front of it, and [`EditorSource`] uses
//! an interactive line editor with history instead. The loop only sees the
//! [`LineSource`] trait.

use crate::error::ShellError;
use log::{debug, warn};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Number of bytes the line buffer grows by whenever it runs out of room.
pub const LINE_BUFSIZE: usize = 1024;

/// Source of input lines for the shell loop.
pub trait LineSource {
    /// Show `prompt` and read the next line as raw bytes, without its trailing newline.
    ///
    /// Returns `Ok(None)` once the input is exhausted.
    fn read_line(&mut self, prompt: &str, out: &mut dyn Write)
    -> Result<Option<Vec<u8>>, ShellError>;

    /// Called once when the loop has stopped.
    fn finish(&mut self) {}
}

impl<S: LineSource + ?Sized> LineSource for Box<S> {
    fn read_line(
        &mut self,
        prompt: &str,
        out: &mut dyn Write,
    ) -> Result<Option<Vec<u8>>, ShellError> {
        (**self).read_line(prompt, out)
    }

    fn finish(&mut self) {
        (**self).finish()
    }
}

/// Reads newline-terminated lines from a buffered stream.
pub struct LineReader<R> {
    inner: R,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Read one line and strip the `\n` that ends it.
    ///
    /// A last line that has no newline is still returned; the read after it reports
    /// end of input. Bytes are returned as they were read, whatever their encoding.
    pub fn read_line(&mut self) -> Result<Option<Vec<u8>>, ShellError> {
        let mut line: Vec<u8> = Vec::new();
        loop {
            let available = match self.inner.fill_buf() {
                Ok(buf) => buf,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(ShellError::Read(e)),
            };
            if available.is_empty() {
                if line.is_empty() {
                    return Ok(None);
                }
                break;
            }

            let newline = available.iter().position(|&b| b == b'\n');
            let chunk = match newline {
                Some(at) => &available[..at],
                None => available,
            };
            grow(&mut line, chunk.len())?;
            line.extend_from_slice(chunk);

            let consumed = newline.map_or(available.len(), |at| at + 1);
            self.inner.consume(consumed);
            if newline.is_some() {
                break;
            }
        }
        line.shrink_to_fit();
        Ok(Some(line))
    }
}

/// Make room for `additional` more bytes, in whole multiples of [`LINE_BUFSIZE`].
fn grow(buf: &mut Vec<u8>, additional: usize) -> Result<(), ShellError> {
    let needed = buf.len() + additional;
    if needed <= buf.capacity() {
        return Ok(());
    }
    let shortfall = needed - buf.capacity();
    let target = buf.capacity() + shortfall.div_ceil(LINE_BUFSIZE) * LINE_BUFSIZE;
    buf.try_reserve_exact(target - buf.len())
        .map_err(|source| ShellError::OutOfMemory {
            context: "reading a line",
            source,
        })
}

/// Prompts on the output stream and reads lines with a [`LineReader`].
///
/// Used for piped input and whenever line editing is turned off.
pub struct PlainSource<R> {
    reader: LineReader<R>,
}

impl<R: BufRead> PlainSource<R> {
    pub fn new(input: R) -> Self {
        Self {
            reader: LineReader::new(input),
        }
    }
}

impl<R: BufRead> LineSource for PlainSource<R> {
    fn read_line(
        &mut self,
        prompt: &str,
        out: &mut dyn Write,
    ) -> Result<Option<Vec<u8>>, ShellError> {
        out.write_all(prompt.as_bytes())
            .and_then(|()| out.flush())
            .map_err(ShellError::Write)?;
        self.reader.read_line()
    }
}

/// Interactive input through [`rustyline`], with history.
pub struct EditorSource {
    editor: DefaultEditor,
    history: Option<PathBuf>,
}

impl EditorSource {
    /// Create an editor, loading history from `history` when the file exists.
    pub fn new(history: Option<PathBuf>) -> Result<Self, ShellError> {
        let mut editor = DefaultEditor::new()?;
        if let Some(path) = &history {
            match editor.load_history(path) {
                Ok(()) => debug!("loaded history from {}", path.display()),
                Err(ReadlineError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => warn!("can't load history from {}: {}", path.display(), e),
            }
        }
        Ok(Self { editor, history })
    }
}

impl LineSource for EditorSource {
    fn read_line(
        &mut self,
        prompt: &str,
        _out: &mut dyn Write,
    ) -> Result<Option<Vec<u8>>, ShellError> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    if let Err(e) = self.editor.add_history_entry(line.as_str()) {
                        warn!("can't add history entry: {}", e);
                    }
                }
                Ok(Some(line.into_bytes()))
            }
            // Ctrl-D ends input; Ctrl-C ends the shell as the default SIGINT action would.
            Err(ReadlineError::Eof) | Err(ReadlineError::Interrupted) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn finish(&mut self) {
        if let Some(path) = &self.history {
            if let Err(e) = self.editor.save_history(path) {
                warn!("can't save history to {}: {}", path.display(), e);
            }
        }
    }
}
