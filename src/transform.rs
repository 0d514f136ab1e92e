//! `transform` attribute parsing and translate-only decomposition.
//!
//! The normalizer only knows how to push pure translations into
//! coordinates. Every transform list is composed into a single affine
//! matrix and must decompose to a translation exactly (unit scale, zero
//! rotation, zero skew); anything else is rejected rather than
//! approximated.

use crate::error::SvgtrimError;

/// An accumulated pure translation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Translation {
    pub dx: f64,
    pub dy: f64,
}

impl Translation {
    pub const ZERO: Self = Self { dx: 0.0, dy: 0.0 };

    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    pub fn shifted(self, other: Translation) -> Self {
        Self {
            dx: self.dx + other.dx,
            dy: self.dy + other.dy,
        }
    }
}

/// A 2D affine matrix in SVG order: `matrix(a b c d e f)`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    e: f64,
    f: f64,
}

impl Matrix {
    const IDENTITY: Self = Self {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    fn translate(tx: f64, ty: f64) -> Self {
        Self {
            e: tx,
            f: ty,
            ..Self::IDENTITY
        }
    }

    /// `self * other`, i.e. `other` applies first.
    fn multiply(self, other: Matrix) -> Self {
        Self {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }

    /// Decompose to a translation, or report what else the matrix does.
    fn into_translation(self, source: &str) -> Result<Translation, SvgtrimError> {
        if self.a == 1.0 && self.b == 0.0 && self.c == 0.0 && self.d == 1.0 {
            Ok(Translation::new(self.e, self.f))
        } else {
            Err(SvgtrimError::UnsupportedTransform(source.to_string()))
        }
    }
}

/// Parse a `transform` attribute value and decompose it to a pure
/// translation. `None` or an empty value is a zero offset.
pub fn parse_translation(value: Option<&str>) -> Result<Translation, SvgtrimError> {
    let value = match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => return Ok(Translation::ZERO),
    };

    let mut parser = TransformParser::new(value);
    let matrix = parser.parse()?;
    matrix.into_translation(value)
}

struct TransformParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> TransformParser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn parse(&mut self) -> Result<Matrix, SvgtrimError> {
        let mut matrix = Matrix::IDENTITY;

        self.skip_whitespace_and_comma();
        while !self.is_eof() {
            let name = self.parse_name()?;
            let args = self.parse_args()?;
            matrix = matrix.multiply(self.build(&name, &args)?);
            self.skip_whitespace_and_comma();
        }

        Ok(matrix)
    }

    fn build(&self, name: &str, args: &[f64]) -> Result<Matrix, SvgtrimError> {
        let m = match (name, args.len()) {
            ("translate", 1) => Matrix::translate(args[0], 0.0),
            ("translate", 2) => Matrix::translate(args[0], args[1]),
            ("matrix", 6) => Matrix {
                a: args[0],
                b: args[1],
                c: args[2],
                d: args[3],
                e: args[4],
                f: args[5],
            },
            ("scale", 1) => Matrix {
                a: args[0],
                d: args[0],
                ..Matrix::IDENTITY
            },
            ("scale", 2) => Matrix {
                a: args[0],
                d: args[1],
                ..Matrix::IDENTITY
            },
            ("rotate", 1) | ("rotate", 3) => {
                let (sin, cos) = args[0].to_radians().sin_cos();
                let rot = Matrix {
                    a: cos,
                    b: sin,
                    c: -sin,
                    d: cos,
                    ..Matrix::IDENTITY
                };
                if args.len() == 3 {
                    Matrix::translate(args[1], args[2])
                        .multiply(rot)
                        .multiply(Matrix::translate(-args[1], -args[2]))
                } else {
                    rot
                }
            }
            ("skewX", 1) => Matrix {
                c: args[0].to_radians().tan(),
                ..Matrix::IDENTITY
            },
            ("skewY", 1) => Matrix {
                b: args[0].to_radians().tan(),
                ..Matrix::IDENTITY
            },
            _ => {
                return Err(SvgtrimError::InvalidSvg(format!(
                    "bad transform function: {}({} args)",
                    name,
                    args.len()
                )))
            }
        };
        Ok(m)
    }

    fn parse_name(&mut self) -> Result<String, SvgtrimError> {
        let start = self.pos;
        while self
            .peek()
            .map(|c| c.is_ascii_alphabetic())
            .unwrap_or(false)
        {
            self.next();
        }
        if self.pos == start {
            return Err(SvgtrimError::InvalidSvg(format!(
                "expected transform function in: {}",
                self.input
            )));
        }
        Ok(self.input[start..self.pos].to_string())
    }

    fn parse_args(&mut self) -> Result<Vec<f64>, SvgtrimError> {
        self.skip_whitespace();
        if self.next() != Some('(') {
            return Err(SvgtrimError::InvalidSvg(format!(
                "expected '(' in transform: {}",
                self.input
            )));
        }

        let mut args = Vec::new();
        loop {
            self.skip_whitespace_and_comma();
            match self.peek() {
                Some(')') => {
                    self.next();
                    break;
                }
                Some(_) => args.push(self.parse_number()?),
                None => {
                    return Err(SvgtrimError::InvalidSvg(format!(
                        "unclosed transform: {}",
                        self.input
                    )))
                }
            }
        }

        Ok(args)
    }

    fn parse_number(&mut self) -> Result<f64, SvgtrimError> {
        let start = self.pos;

        if self.peek() == Some('-') || self.peek() == Some('+') {
            self.next();
        }
        while self.peek().map(|c| c.is_ascii_digit()).unwrap_or(false) {
            self.next();
        }
        if self.peek() == Some('.') {
            self.next();
            while self.peek().map(|c| c.is_ascii_digit()).unwrap_or(false) {
                self.next();
            }
        }
        if self.peek() == Some('e') || self.peek() == Some('E') {
            self.next();
            if self.peek() == Some('-') || self.peek() == Some('+') {
                self.next();
            }
            while self.peek().map(|c| c.is_ascii_digit()).unwrap_or(false) {
                self.next();
            }
        }

        let s = &self.input[start..self.pos];
        s.parse()
            .map_err(|_| SvgtrimError::InvalidSvg(format!("bad number in transform: {}", s)))
    }

    fn skip_whitespace(&mut self) {
        while self
            .peek()
            .map(|c| c.is_ascii_whitespace())
            .unwrap_or(false)
        {
            self.next();
        }
    }

    fn skip_whitespace_and_comma(&mut self) {
        self.skip_whitespace();
        if self.peek() == Some(',') {
            self.next();
        }
        self.skip_whitespace();
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn next(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }
}
