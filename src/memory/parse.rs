//! Loads a plain-text object file into memory: one byte per non-blank line,
//! written as eight `0`/`1` characters, loaded sequentially from address 0.
//!
//! ```text
//! 10000010 # LDI R0,8
//! 00000000
//! 00001000
//! 01000111 # PRN R0
//! 00000000
//! 00000001 # HLT
//! ```

use std::borrow::Cow;
use std::path::Path;
use std::{error, fmt, fs, str::FromStr, str::Lines};

use color_eyre::eyre::{eyre, WrapErr};

use super::{Byte, Memory, Word};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    InvalidAddress { address: usize },
    InvalidNumber { radix: u32 },
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorKind::InvalidAddress { address } => {
                write!(f, "memory has no address `0x{:x}`", address)
            }
            ParseErrorKind::InvalidNumber { radix } => {
                write!(f, "failed to parse number with radix `{}`", radix)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    kind: ParseErrorKind,
    context: Option<Cow<'static, str>>,
    line_nr: usize,
}

impl ParseError {
    fn new<C, S>(kind: ParseErrorKind, context: C, line_nr: usize) -> Self
    where
        C: Into<Option<S>>,
        S: Into<Cow<'static, str>>,
    {
        Self {
            kind,
            context: context.into().map(|inner| inner.into()),
            line_nr,
        }
    }

    pub fn kind(&self) -> ParseErrorKind {
        self.kind
    }

    pub fn line_nr(&self) -> usize {
        self.line_nr
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(context) = &self.context {
            write!(
                f,
                "error [ln: {}]: {} - {}",
                self.line_nr, self.kind, context
            )
        } else {
            write!(f, "error [ln: {}]: {}", self.line_nr, self.kind)
        }
    }
}

impl error::Error for ParseError {}

pub type Result<T, E = ParseError> = std::result::Result<T, E>;

#[derive(Debug, Clone)]
pub struct Parser<'a, const S: usize> {
    lines: Lines<'a>,
    line_nr: usize,
    address: Word,
    memory: Memory<S>,
}

impl<'a, const S: usize> Parser<'a, S> {
    /// Creates a new parser for `data` which will try to populate `memory`.
    pub fn new(data: &'a str, memory: Memory<S>) -> Self {
        Self {
            lines: data.lines(),
            line_nr: 0,
            address: 0,
            memory,
        }
    }

    /// Consumes `self` and tries to parse all `self.data` into memory.
    ///
    /// # Errors
    ///
    /// All errors which may occur are collected and returned at the end.
    pub fn parse(mut self) -> Result<Memory<S>, Vec<ParseError>> {
        let mut errors = Vec::new();

        while let Some(res) = self.parse_next_line() {
            if let Err(err) = res {
                log::error!("{}", err);
                errors.push(err);
            }
        }

        if errors.is_empty() {
            Ok(self.memory)
        } else {
            Err(errors)
        }
    }

    /// Tries to parse the next line. The payload is everything before a `#`
    /// comment, trimmed; blank payloads are skipped.
    fn parse_next_line(&mut self) -> Option<Result<()>> {
        let line = self.lines.next()?;
        self.line_nr += 1;

        let payload = line.split('#').next().unwrap_or(line).trim();
        if payload.is_empty() {
            return Some(Ok(()));
        }

        let byte = match Byte::from_str_radix(payload, 2) {
            Ok(byte) => byte,
            Err(_) => {
                return Some(Err(ParseError::new(
                    ParseErrorKind::InvalidNumber { radix: 2 },
                    format!("`{}` is not a binary byte", payload),
                    self.line_nr,
                )))
            }
        };

        Some(self.write_byte(byte))
    }

    /// Writes `byte` into memory at the next program address, then advances
    /// the address by one.
    fn write_byte(&mut self, byte: Byte) -> Result<()> {
        if self.memory.write_byte(self.address, byte).is_err() {
            return Err(ParseError::new(
                ParseErrorKind::InvalidAddress {
                    address: self.address as usize,
                },
                "program does not fit in memory",
                self.line_nr,
            ));
        }

        self.address += 1;
        Ok(())
    }
}

impl<const S: usize> FromStr for Memory<S> {
    type Err = Vec<ParseError>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Parser::new(s, Memory::default()).parse()
    }
}

impl<const S: usize> Memory<S> {
    /// Reads and parses an object file, populating memory from address 0.
    pub fn from_file<P: AsRef<Path>>(path: P) -> color_eyre::eyre::Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read program `{}`", path.display()))?;

        data.parse().map_err(|errors: Vec<ParseError>| {
            eyre!(
                "{} error(s) while loading program `{}`",
                errors.len(),
                path.display()
            )
        })
    }
}
