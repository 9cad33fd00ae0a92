//! A parser for golden mapping files.
//!
//! A mapping file is line oriented: a class header line introduces a class,
//! and the indented lines following it describe that class's fields and
//! methods until the next header. Lines matching neither shape are not part
//! of the format and surface as [`ParseError`]s, which consumers are free to
//! skip.

use std::fmt;

use thiserror::Error;

/// Error when classifying a mapping line.
///
/// Since the mapping is parsed line by line, an error also carries the
/// offending line.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParseError<'s> {
    line: &'s str,
    message: &'static str,
}

impl<'s> ParseError<'s> {
    /// The offending line that caused the error.
    pub fn line(&self) -> &'s str {
        self.line
    }
}

/// Summary of a mapping file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MappingSummary {
    class_count: usize,
    field_count: usize,
    method_count: usize,
}

impl MappingSummary {
    fn new(mapping: &GoldenMapping<'_>) -> Self {
        let mut summary = MappingSummary::default();

        for record in mapping.iter() {
            match record {
                Ok(MappingRecord::Class { .. }) => summary.class_count += 1,
                Ok(MappingRecord::Field { .. }) => summary.field_count += 1,
                Ok(MappingRecord::Method { .. }) => summary.method_count += 1,
                Err(_) => {}
            }
        }

        summary
    }

    /// Returns the number of classes in the mapping file.
    pub fn class_count(&self) -> usize {
        self.class_count
    }

    /// Returns the number of field lines in the mapping file.
    pub fn field_count(&self) -> usize {
        self.field_count
    }

    /// Returns the number of method lines in the mapping file.
    pub fn method_count(&self) -> usize {
        self.method_count
    }
}

/// A golden mapping file.
#[derive(Clone, Copy, Default)]
pub struct GoldenMapping<'s> {
    source: &'s str,
}

impl fmt::Debug for GoldenMapping<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoldenMapping").finish()
    }
}

impl<'s> GoldenMapping<'s> {
    /// Create a new golden mapping over the given source text.
    pub fn new(source: &'s str) -> Self {
        Self { source }
    }

    /// Whether the source looks like a golden mapping file.
    ///
    /// # Examples
    ///
    /// ```
    /// use golden_retrace::GoldenMapping;
    ///
    /// let valid = GoldenMapping::new("a -> b:\n    int value -> a");
    /// assert!(valid.is_valid());
    ///
    /// let invalid = GoldenMapping::new(
    ///     "# looks like\na -> mapping:\n  but is(not) -> one\n",
    /// );
    /// assert!(!invalid.is_valid());
    /// ```
    pub fn is_valid(&self) -> bool {
        // In order to not parse the whole file, we look for a class header
        // followed by a member in the first 50 records, which is a good
        // heuristic.
        let mut has_class_line = false;
        for record in self.iter().take(50) {
            match record {
                Ok(MappingRecord::Class { .. }) => {
                    has_class_line = true;
                }
                Ok(MappingRecord::Field { .. }) | Ok(MappingRecord::Method { .. })
                    if has_class_line =>
                {
                    return true;
                }
                _ => {}
            }
        }
        false
    }

    /// Returns a summary of the file.
    pub fn summary(&self) -> MappingSummary {
        MappingSummary::new(self)
    }

    /// Create an iterator over the [`MappingRecord`]s of this file.
    pub fn iter(&self) -> MappingRecordIter<'s> {
        MappingRecordIter { slice: self.source }
    }
}

/// An iterator yielding [`MappingRecord`]s, created by [`GoldenMapping::iter`].
///
/// Empty lines are skipped; every other line yields either a record or a
/// [`ParseError`].
#[derive(Clone, Default)]
pub struct MappingRecordIter<'s> {
    slice: &'s str,
}

impl fmt::Debug for MappingRecordIter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MappingRecordIter").finish()
    }
}

impl<'s> Iterator for MappingRecordIter<'s> {
    type Item = Result<MappingRecord<'s>, ParseError<'s>>;
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.slice.is_empty() {
                return None;
            }

            let (line, rest) = split_line(self.slice);
            self.slice = rest;

            let line = line.trim_end_matches(['\r', '\n']);
            if !line.is_empty() {
                return Some(MappingRecord::try_parse(line));
            }
        }
    }
}

/// A single record of a golden mapping file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MappingRecord<'s> {
    /// A class header line.
    Class {
        /// Golden (original) fully-qualified name of the class.
        golden: &'s str,
        /// Obfuscated fully-qualified name of the class.
        obfuscated: &'s str,
    },
    /// A field line of the currently open class.
    Field {
        /// Declared type of the field, as written in the mapping file.
        ty: &'s str,
        /// Golden name of the field.
        golden: &'s str,
        /// Obfuscated name of the field.
        obfuscated: &'s str,
    },
    /// A method line of the currently open class.
    Method {
        /// Return type of the method.
        ty: &'s str,
        /// Golden name of the method.
        golden: &'s str,
        /// Obfuscated name of the method.
        obfuscated: &'s str,
        /// Raw parenthesized parameter list including the parentheses,
        /// e.g. `(int,java.lang.String)`. `None` when the list is absent.
        parameters: Option<&'s str>,
        /// Raw numeric line-range prefix, e.g. `11:15:`.
        line_range: &'s str,
    },
}

impl<'s> MappingRecord<'s> {
    /// Parses a single line of a golden mapping file.
    ///
    /// # Examples
    ///
    /// ```
    /// use golden_retrace::MappingRecord;
    ///
    /// // Class header
    /// let parsed = MappingRecord::try_parse("com.example.Original -> com.example.a:");
    /// assert_eq!(
    ///     parsed,
    ///     Ok(MappingRecord::Class {
    ///         golden: "com.example.Original",
    ///         obfuscated: "com.example.a",
    ///     })
    /// );
    ///
    /// // Field
    /// let parsed = MappingRecord::try_parse("    int value -> b");
    /// assert_eq!(
    ///     parsed,
    ///     Ok(MappingRecord::Field {
    ///         ty: "int",
    ///         golden: "value",
    ///         obfuscated: "b",
    ///     })
    /// );
    ///
    /// // Method, recognized by its line-range prefix
    /// let parsed = MappingRecord::try_parse("    11:15:void doThing(int) -> c");
    /// assert_eq!(
    ///     parsed,
    ///     Ok(MappingRecord::Method {
    ///         ty: "void",
    ///         golden: "doThing",
    ///         obfuscated: "c",
    ///         parameters: Some("(int)"),
    ///         line_range: "11:15:",
    ///     })
    /// );
    /// ```
    pub fn try_parse(line: &'s str) -> Result<Self, ParseError<'s>> {
        let line = line.trim_end_matches(['\r', '\n']);

        let record = match line.strip_prefix("    ") {
            Some(member) => parse_member(member),
            None => parse_class(line),
        };

        record.ok_or(ParseError {
            line,
            message: "line is not a valid mapping record",
        })
    }
}

/// Parses a class header line, `golden.Name -> obf.name:`.
fn parse_class(line: &str) -> Option<MappingRecord<'_>> {
    let (golden, rest) = scan_qualified(line)?;
    let rest = rest.strip_prefix(" -> ")?;
    let (obfuscated, rest) = scan_qualified(rest)?;
    let rest = rest.strip_prefix(':')?;

    rest.is_empty()
        .then_some(MappingRecord::Class { golden, obfuscated })
}

/// Parses a member line with the leading indentation already stripped.
fn parse_member(line: &str) -> Option<MappingRecord<'_>> {
    let (line_range, rest) = scan_line_range(line);
    let (ty, rest) = scan_qualified(rest)?;
    let rest = rest.strip_prefix(' ')?;
    let (golden, rest) = scan_member_name(rest)?;
    let (parameters, rest) = scan_parameters(rest)?;
    let rest = rest.strip_prefix(" -> ")?;
    let (obfuscated, rest) = scan_word(rest)?;

    rest.is_empty()
        .then(|| classify(line_range, ty, golden, parameters, obfuscated))
}

/// Classifies captured member tokens into a field or method record.
///
/// The line-range prefix is the sole discriminator: fields never carry one,
/// methods always do. The parameter list is not a signal; a range-less line
/// with a parameter list is still a field and the list is discarded.
fn classify<'s>(
    line_range: Option<&'s str>,
    ty: &'s str,
    golden: &'s str,
    parameters: Option<&'s str>,
    obfuscated: &'s str,
) -> MappingRecord<'s> {
    match line_range {
        Some(line_range) => MappingRecord::Method {
            ty,
            golden,
            obfuscated,
            parameters,
            line_range,
        },
        None => MappingRecord::Field {
            ty,
            golden,
            obfuscated,
        },
    }
}

fn is_word(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

/// Splits `input` at the first byte not matching the predicate.
///
/// All predicates used here match ASCII only, so the split is always on a
/// character boundary.
fn scan(input: &str, predicate: impl Fn(u8) -> bool) -> (&str, &str) {
    let end = input
        .bytes()
        .position(|byte| !predicate(byte))
        .unwrap_or(input.len());
    input.split_at(end)
}

/// Scans a non-empty dot-and-word-character sequence.
fn scan_qualified(input: &str) -> Option<(&str, &str)> {
    let (token, rest) = scan(input, |byte| is_word(byte) || byte == b'.');
    (!token.is_empty()).then_some((token, rest))
}

/// Scans a non-empty word-character sequence.
fn scan_word(input: &str) -> Option<(&str, &str)> {
    let (token, rest) = scan(input, is_word);
    (!token.is_empty()).then_some((token, rest))
}

/// Scans a member name: a letter followed by word characters.
fn scan_member_name(input: &str) -> Option<(&str, &str)> {
    if !input.bytes().next()?.is_ascii_alphabetic() {
        return None;
    }
    Some(scan(input, is_word))
}

/// Scans an optional numeric line-range prefix.
///
/// The run of digits and colons only counts as a range when it ends in a
/// colon; otherwise the digits belong to the type token and scanning restarts
/// from the original position.
fn scan_line_range(input: &str) -> (Option<&str>, &str) {
    let (run, rest) = scan(input, |byte| byte.is_ascii_digit() || byte == b':');
    if !run.is_empty() && run.ends_with(':') {
        (Some(run), rest)
    } else {
        (None, input)
    }
}

/// Scans an optional parenthesized parameter list, returned including the
/// parentheses. The list itself may be empty.
fn scan_parameters(input: &str) -> Option<(Option<&str>, &str)> {
    if !input.starts_with('(') {
        return Some((None, input));
    }

    let (inner, rest) = scan(&input[1..], |byte| {
        is_word(byte) || byte == b',' || byte == b'.'
    });
    let rest = rest.strip_prefix(')')?;
    let token = &input[..inner.len() + 2];

    Some((Some(token), rest))
}

fn split_line(input: &str) -> (&str, &str) {
    match input.find('\n') {
        Some(pos) => input.split_at(pos + 1),
        None => (input, ""),
    }
}
