//! Splitting an input line into tokens.

use crate::error::ShellError;
use std::ffi::OsString;

/// Bytes that separate tokens: space, tab, carriage return, newline and bell.
pub const TOKEN_DELIMITERS: &[u8] = b" \t\r\n\x07";

/// Number of slots the token list grows by whenever it runs out of room.
pub const TOKEN_BUFSIZE: usize = 64;

/// Ordered tokens of one input line.
///
/// Every token is a slice of the line it was split from, so the list cannot outlive
/// that line. No token is ever empty. The end of the list is the end of the slice.
/// Tokens are raw bytes: a line need not be UTF-8 to be run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenList<'a> {
    tokens: Vec<&'a [u8]>,
}

impl<'a> TokenList<'a> {
    /// The command name, if the line had any tokens at all.
    pub fn first(&self) -> Option<&'a [u8]> {
        self.tokens.first().copied()
    }

    pub fn as_slice(&self) -> &[&'a [u8]] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a [u8]> + '_ {
        self.tokens.iter().copied()
    }

    /// The tokens as an argument vector, byte for byte on Unix.
    pub fn to_argv(&self) -> Vec<OsString> {
        self.iter().map(to_os_string).collect()
    }
}

#[cfg(unix)]
fn to_os_string(token: &[u8]) -> OsString {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;
    OsStr::from_bytes(token).to_os_string()
}

#[cfg(not(unix))]
fn to_os_string(token: &[u8]) -> OsString {
    String::from_utf8_lossy(token).into_owned().into()
}

/// Splits `line` into its maximal runs of non-delimiter bytes.
///
/// A line made only of delimiters (or an empty one) yields an empty list. The list
/// grows in steps of [`TOKEN_BUFSIZE`]; failing to grow is reported as
/// [`ShellError::OutOfMemory`].
pub fn tokenize(line: &[u8]) -> Result<TokenList<'_>, ShellError> {
    let mut tokens: Vec<&[u8]> = Vec::new();
    for token in line
        .split(|b| TOKEN_DELIMITERS.contains(b))
        .filter(|t| !t.is_empty())
    {
        if tokens.len() == tokens.capacity() {
            tokens
                .try_reserve_exact(TOKEN_BUFSIZE)
                .map_err(|source| ShellError::OutOfMemory {
                    context: "splitting a line into tokens",
                    source,
                })?;
        }
        tokens.push(token);
    }
    log::trace!(
        "tokens: {:?}",
        tokens
            .iter()
            .map(|t| String::from_utf8_lossy(t))
            .collect::<Vec<_>>()
    );
    Ok(TokenList { tokens })
}
