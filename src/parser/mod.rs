//! Program text parser
//!
//! A program is an `#ip N` header naming the instruction pointer register,
//! followed by one `opcode a b c` instruction per line. Blank lines and `;`
//! comments are ignored.

use std::fmt;
use std::path::Path;

use crate::error::EngineError;
use crate::ir::{Instruction, Opcode, Program};

/// Parse error with location information
#[derive(Debug, Clone)]
pub struct ParseError {
    pub line_number: usize,
    pub column: Option<usize>,
    pub message: String,
    pub line_content: String,
}

impl ParseError {
    pub fn new(
        line_number: usize,
        message: impl Into<String>,
        line_content: impl Into<String>,
    ) -> Self {
        Self {
            line_number,
            column: None,
            message: message.into(),
            line_content: line_content.into(),
        }
    }

    pub fn with_column(mut self, column: usize) -> Self {
        self.column = Some(column);
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(col) = self.column {
            write!(
                f,
                "line {}, column {}: {}\n  | {}\n  | {}^",
                self.line_number,
                col,
                self.message,
                self.line_content,
                " ".repeat(col.saturating_sub(1))
            )
        } else {
            write!(
                f,
                "line {}: {}\n  | {}",
                self.line_number, self.message, self.line_content
            )
        }
    }
}

impl std::error::Error for ParseError {}

/// Result of parsing a single line
#[derive(Debug)]
pub enum LineResult {
    /// The `#ip N` directive
    IpDirective(usize),
    Instruction(Instruction),
    /// Blank or comment-only line
    Skip,
}

fn strip_comment(line: &str) -> &str {
    match line.find(';') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// 1-based column of `token` within `line`, for error markers
fn column_of(line: &str, token: &str) -> Option<usize> {
    line.find(token).map(|offset| offset + 1)
}

/// Parse an integer operand
pub fn parse_integer(s: &str) -> Result<i64, String> {
    s.parse::<i64>()
        .map_err(|e| format!("invalid integer '{}': {}", s, e))
}

/// Parse a single line, returning the error message and the offending token
fn parse_line_at(line: &str) -> Result<LineResult, (String, Option<&str>)> {
    let trimmed = strip_comment(line).trim();
    if trimmed.is_empty() {
        return Ok(LineResult::Skip);
    }

    if let Some(rest) = trimmed.strip_prefix("#ip") {
        let value = rest.trim();
        let register = value
            .parse::<usize>()
            .map_err(|_| (format!("invalid #ip register '{}'", value), Some(value)))?;
        return Ok(LineResult::IpDirective(register));
    }

    let tokens: Vec<&str> = trimmed.split_whitespace().collect();
    let mnemonic = tokens[0];
    let opcode: Opcode = mnemonic
        .parse()
        .map_err(|e: EngineError| (e.to_string(), Some(mnemonic)))?;

    if tokens.len() != 4 {
        return Err((
            format!(
                "{} expects 3 operands, found {}",
                opcode,
                tokens.len() - 1
            ),
            None,
        ));
    }

    let mut operands = [0i64; 3];
    for (slot, token) in operands.iter_mut().zip(&tokens[1..]) {
        *slot = parse_integer(token).map_err(|msg| (msg, Some(*token)))?;
    }

    let [a, b, c] = operands;
    Instruction::new(opcode, a, b, c)
        .map(LineResult::Instruction)
        .map_err(|e| (e.to_string(), None))
}

/// Parse a single line of program text
#[cfg(test)]
pub fn parse_line(line: &str) -> Result<LineResult, String> {
    parse_line_at(line).map_err(|(msg, _)| msg)
}

/// Parse a program file
pub fn parse_program_file(path: &Path) -> Result<Program, ParseError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        ParseError::new(
            0,
            format!("failed to read file: {}", e),
            path.display().to_string(),
        )
    })?;

    parse_program_string(&content, path.display().to_string())
}

/// Parse program text; `source_name` labels whole-file errors
pub fn parse_program_string(content: &str, source_name: String) -> Result<Program, ParseError> {
    let mut ip_register = None;
    let mut instructions = Vec::new();

    for (line_num, line) in content.lines().enumerate() {
        let line_number = line_num + 1;

        let result = parse_line_at(line).map_err(|(msg, token)| {
            let error = ParseError::new(line_number, msg, line);
            match token.and_then(|t| column_of(line, t)) {
                Some(col) => error.with_column(col),
                None => error,
            }
        })?;

        match result {
            LineResult::IpDirective(register) => {
                if ip_register.is_some() || !instructions.is_empty() {
                    return Err(ParseError::new(
                        line_number,
                        "#ip must appear once, before any instruction",
                        line,
                    ));
                }
                ip_register = Some(register);
            }
            LineResult::Instruction(instruction) => {
                if ip_register.is_none() {
                    return Err(ParseError::new(
                        line_number,
                        "missing #ip directive before first instruction",
                        line,
                    ));
                }
                instructions.push(instruction);
            }
            LineResult::Skip => {}
        }
    }

    let Some(ip_register) = ip_register else {
        return Err(ParseError::new(0, "missing #ip directive", source_name));
    };

    Program::new(ip_register, instructions)
        .map_err(|e| ParseError::new(0, e.to_string(), source_name))
}
