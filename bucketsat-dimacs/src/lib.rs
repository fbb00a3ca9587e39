//! DIMACS CNF parser and writer for the bucketsat solver.
//!
//! The solver sizes its bucket array from the header, so unlike some other DIMACS readers, this
//! parser requires a `p cnf` header before the first clause and rejects literals of variables
//! beyond the declared variable count.

use std::{borrow::Borrow, io, mem::replace};

use bucketsat_formula::{CnfFormula, Lit, Var};

use anyhow::Error;
use thiserror::Error;

/// Possible errors while parsing a DIMACS CNF formula.
#[derive(Debug, Error)]
pub enum ParserError {
    #[error(
        "line {}: Unexpected character in DIMACS CNF input: '{}'",
        line,
        unexpected
    )]
    UnexpectedInput { line: usize, unexpected: char },
    #[error(
        "line {}: Literal index is too large: {}{}...",
        line,
        index,
        final_digit
    )]
    LiteralTooLarge {
        line: usize,
        index: usize,
        final_digit: usize,
    },
    #[error("line {}: Invalid header syntax: {}", line, header)]
    InvalidHeader { line: usize, header: String },
    #[error("line {}: Header declares {} variables, at most {} are supported", line, var_count, Var::max_count())]
    VarCountTooLarge { line: usize, var_count: usize },
    #[error("line {}: Missing 'p cnf' header before the first clause", line)]
    MissingHeader { line: usize },
    #[error(
        "line {}: Variable {} is outside of the {} variables declared in the header",
        line,
        var,
        var_count
    )]
    VarOutOfRange {
        line: usize,
        var: usize,
        var_count: usize,
    },
    #[error("line {}: Unterminated clause", line)]
    UnterminatedClause { line: usize },
    #[error(
        "Formula has {} clauses while the header specifies {} clauses",
        clause_count,
        header_clause_count
    )]
    ClauseCount {
        clause_count: usize,
        header_clause_count: usize,
    },
    #[error("Parser invoked after a previous error")]
    PreviousError,
}

/// Variable and clause count present in a DIMACS CNF header.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DimacsHeader {
    pub var_count: usize,
    pub clause_count: usize,
}

/// What the current line turned out to be.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum Line {
    /// Only whitespace seen so far.
    Start,
    Clause,
    Comment,
    Header,
    /// Everything after a `%` line is ignored. Some benchmark collections end their files this way.
    Trailer,
}

/// The token being read.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum Token {
    None,
    Minus,
    Number { value: usize, negative: bool },
}

/// Parser for DIMACS CNF files.
///
/// This parser can consume the input in chunks while also producing the parsed result in chunks.
pub struct DimacsParser {
    formula: CnfFormula,
    partial_clause: Vec<Lit>,
    header: Option<DimacsHeader>,

    line_number: usize,
    clause_count: usize,

    line: Line,
    token: Token,
    error: bool,

    header_line: Vec<u8>,
}

impl Default for DimacsParser {
    fn default() -> DimacsParser {
        DimacsParser::new()
    }
}

impl DimacsParser {
    /// Create a new DIMACS CNF parser.
    pub fn new() -> DimacsParser {
        DimacsParser {
            formula: CnfFormula::new(),
            partial_clause: vec![],
            header: None,

            line_number: 1,
            clause_count: 0,

            line: Line::Start,
            token: Token::None,
            error: false,

            header_line: vec![],
        }
    }

    /// Parse the given input and check the header.
    ///
    /// This parses the whole input into a single [`CnfFormula`]. Incremental parsing is possible
    /// using [`parse_incremental`](DimacsParser::parse_incremental) or the
    /// [`parse_chunk`](DimacsParser::parse_chunk) method.
    pub fn parse(input: impl io::Read) -> Result<CnfFormula, Error> {
        Ok(Self::parse_incremental(input, |_| Ok(()))?.take_formula())
    }

    /// Parse the given input incrementally and check the header.
    ///
    /// The callback is invoked repeatedly with a reference to the parser. The callback can process
    /// the formula incrementally by calling [`take_formula`](DimacsParser::take_formula) on the
    /// passed argument.
    pub fn parse_incremental(
        input: impl io::Read,
        mut callback: impl FnMut(&mut DimacsParser) -> Result<(), Error>,
    ) -> Result<DimacsParser, Error> {
        use io::BufRead;

        let mut buffer = io::BufReader::new(input);
        let mut parser = Self::new();

        loop {
            let data = buffer.fill_buf()?;
            if data.is_empty() {
                break;
            }
            parser.parse_chunk(data)?;
            let len = data.len();
            buffer.consume(len);

            callback(&mut parser)?;
        }
        parser.eof()?;
        callback(&mut parser)?;
        parser.check_header()?;

        Ok(parser)
    }

    /// Parse a chunk of input.
    ///
    /// After parsing the last chunk call the [`eof`](DimacsParser::eof) method.
    ///
    /// If this method returns an error, the parser is in an invalid state and cannot parse further
    /// chunks.
    pub fn parse_chunk(&mut self, chunk: &[u8]) -> Result<(), ParserError> {
        if self.error {
            return Err(ParserError::PreviousError);
        }
        for &byte in chunk.iter() {
            let is_newline = byte == b'\n' || byte == b'\r';
            match self.line {
                Line::Trailer => (),
                Line::Header if !is_newline => self.header_line.push(byte),
                Line::Comment if !is_newline => (),
                _ => {
                    if let Err(err) = self.parse_byte(byte) {
                        self.error = true;
                        return Err(err);
                    }
                }
            }
            if byte == b'\n' {
                self.line_number += 1;
            }
        }

        Ok(())
    }

    /// Finish parsing the input.
    ///
    /// This does not check whether the clause count of the header was correct, call
    /// [`check_header`](DimacsParser::check_header) for this.
    pub fn eof(&mut self) -> Result<(), ParserError> {
        if self.error {
            return Err(ParserError::PreviousError);
        }

        if self.line == Line::Header {
            self.parse_header_line()?;
        }

        if self.token == Token::Minus {
            return Err(ParserError::UnterminatedClause {
                line: self.line_number,
            });
        }

        self.finish_token(b'\n')?;

        if !self.partial_clause.is_empty() {
            return Err(ParserError::UnterminatedClause {
                line: self.line_number,
            });
        }

        if self.header.is_none() {
            return Err(ParserError::MissingHeader {
                line: self.line_number,
            });
        }

        Ok(())
    }

    /// Verifies that the number of clauses matches the header.
    pub fn check_header(&self) -> Result<(), ParserError> {
        match self.header {
            None => Err(ParserError::MissingHeader {
                line: self.line_number,
            }),
            Some(header) if header.clause_count != self.clause_count => {
                Err(ParserError::ClauseCount {
                    clause_count: self.clause_count,
                    header_clause_count: header.clause_count,
                })
            }
            Some(_) => Ok(()),
        }
    }

    /// Returns the subformula of everything parsed since the last call to this method.
    ///
    /// To parse the whole input into a single [`CnfFormula`], simply call this method once after
    /// calling [`eof`](DimacsParser::eof). For incremental parsing this method can be invoked after
    /// each call of [`parse_chunk`](DimacsParser::parse_chunk).
    ///
    /// The variable count of the returned formula is the variable count of the header.
    pub fn take_formula(&mut self) -> CnfFormula {
        let mut new_formula = CnfFormula::new();
        new_formula.set_var_count(self.formula.var_count());
        replace(&mut self.formula, new_formula)
    }

    /// Return the DIMACS CNF header data if already parsed.
    pub fn header(&self) -> Option<DimacsHeader> {
        self.header
    }

    /// Number of clauses parsed.
    pub fn clause_count(&self) -> usize {
        self.clause_count
    }

    /// Number of variables declared by the header.
    pub fn var_count(&self) -> usize {
        self.formula.var_count()
    }

    fn parse_byte(&mut self, byte: u8) -> Result<(), ParserError> {
        match byte {
            b'\n' | b'\r' => {
                self.finish_token(byte)?;
                if self.line == Line::Header {
                    self.parse_header_line()?;
                }
                self.line = Line::Start;
            }
            b' ' | b'\t' => self.finish_token(byte)?,
            b'0'..=b'9' => {
                let digit = (byte - b'0') as usize;
                let (index, negative) = match self.token {
                    Token::Number { value, negative } => (value, negative),
                    Token::Minus => (0, true),
                    Token::None => (0, false),
                };

                let value = index * 10 + digit;
                if value > Var::max_count() {
                    return Err(ParserError::LiteralTooLarge {
                        line: self.line_number,
                        index,
                        final_digit: digit,
                    });
                }

                self.token = Token::Number { value, negative };
                self.line = Line::Clause;
            }
            b'-' if self.token == Token::None => {
                self.token = Token::Minus;
                self.line = Line::Clause;
            }
            b'c' if self.line == Line::Start => self.line = Line::Comment,
            b'p' if self.line == Line::Start && self.header.is_none() => {
                self.line = Line::Header;
                self.header_line.push(b'p');
            }
            b'%' if self.line == Line::Start => self.line = Line::Trailer,
            _ => {
                return Err(ParserError::UnexpectedInput {
                    line: self.line_number,
                    unexpected: byte as char,
                })
            }
        }
        Ok(())
    }

    /// Finishes the current token, `byte` is the separator that ended it.
    fn finish_token(&mut self, byte: u8) -> Result<(), ParserError> {
        let (value, negative) = match replace(&mut self.token, Token::None) {
            Token::None => return Ok(()),
            Token::Minus => {
                return Err(ParserError::UnexpectedInput {
                    line: self.line_number,
                    unexpected: byte as char,
                })
            }
            Token::Number { value, negative } => (value, negative),
        };

        let header = match self.header {
            Some(header) => header,
            None => {
                return Err(ParserError::MissingHeader {
                    line: self.line_number,
                })
            }
        };

        if value == 0 {
            self.formula.add_clause(&self.partial_clause);
            self.partial_clause.clear();
            self.clause_count += 1;
        } else if value > header.var_count {
            return Err(ParserError::VarOutOfRange {
                line: self.line_number,
                var: value,
                var_count: header.var_count,
            });
        } else {
            self.partial_clause
                .push(Var::from_dimacs(value as isize).lit(!negative));
        }

        Ok(())
    }

    fn parse_header_line(&mut self) -> Result<(), ParserError> {
        let header_line = String::from_utf8_lossy(&self.header_line).into_owned();
        let line = self.line_number;
        let invalid = || ParserError::InvalidHeader {
            line,
            header: header_line.clone(),
        };

        let values: Vec<&str> = header_line.split_whitespace().collect();

        let (var_count, clause_count) = match values[..] {
            ["p", "cnf", var_count, clause_count] => (
                var_count.parse::<usize>().map_err(|_| invalid())?,
                clause_count.parse::<usize>().map_err(|_| invalid())?,
            ),
            _ => return Err(invalid()),
        };

        if var_count > Var::max_count() {
            return Err(ParserError::VarCountTooLarge { line, var_count });
        }

        self.header = Some(DimacsHeader {
            var_count,
            clause_count,
        });

        self.formula.set_var_count(var_count);
        self.line = Line::Start;

        Ok(())
    }
}

/// Write a DIMACS CNF header.
///
/// Can be used with [`write_dimacs_clauses`] to implement incremental writing.
pub fn write_dimacs_header(target: &mut impl io::Write, header: DimacsHeader) -> io::Result<()> {
    writeln!(
        target,
        "p cnf {var_count} {clause_count}",
        var_count = header.var_count,
        clause_count = header.clause_count
    )
}

/// Write an iterator of clauses as headerless DIMACS CNF.
///
/// Can be used with [`write_dimacs_header`] to implement incremental writing.
pub fn write_dimacs_clauses(
    target: &mut impl io::Write,
    clauses: impl IntoIterator<Item = impl IntoIterator<Item = impl Borrow<Lit>>>,
) -> io::Result<()> {
    for clause in clauses.into_iter() {
        for lit in clause.into_iter() {
            itoa::write(&mut *target, lit.borrow().to_dimacs())?;
            target.write_all(b" ")?;
        }
        target.write_all(b"0\n")?;
    }
    Ok(())
}

/// Write a formula as DIMACS CNF.
pub fn write_dimacs(target: &mut impl io::Write, formula: &CnfFormula) -> io::Result<()> {
    write_dimacs_header(
        &mut *target,
        DimacsHeader {
            var_count: formula.var_count(),
            clause_count: formula.len(),
        },
    )?;
    write_dimacs_clauses(&mut *target, formula.iter())
}
