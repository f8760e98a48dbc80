//! Formatted program output
//!
//! `printf` calls are routed to a [`Sink`], which renders the format template
//! against the evaluated arguments and delivers the text somewhere:
//!
//! - [`CaptureSink`]: Accumulates output in memory (tests, embedding)
//! - [`WriterSink`]: Writes through to any [`io::Write`] (stdout in the CLI)
//!
//! # Format Specifiers
//!
//! [`format_printf`] supports `%d`, `%i`, `%f`, `%c` and `%%`, with optional
//! `-` and `0` flags, a field width and a precision (`%.2f`, `%5d`, `%-3c`).
//! Escape sequences are decoded by the lexer, so the template is taken
//! literally. Templates and output are bytes; [`CaptureSink::output`] gives a
//! lossy text view.

use crate::memory::value::Value;
use std::borrow::Cow;
use std::io;
use std::iter::Peekable;
use thiserror::Error;

/// Digits after the point for `%f` without an explicit precision
pub const DEFAULT_FLOAT_PRECISION: usize = 6;

/// Largest field width or precision a conversion may request
pub const MAX_FIELD_WIDTH: usize = 4096;

#[derive(Debug, Error)]
pub enum SinkError {
    /// The template and arguments do not fit together
    #[error("{0}")]
    Format(String),

    #[error("write failed: {0}")]
    Io(#[from] io::Error),
}

/// Destination for formatted output
pub trait Sink {
    fn write(&mut self, format: &[u8], values: &[Value]) -> Result<(), SinkError>;
}

impl<S: Sink + ?Sized> Sink for &mut S {
    fn write(&mut self, format: &[u8], values: &[Value]) -> Result<(), SinkError> {
        (**self).write(format, values)
    }
}

/// In-memory sink
#[derive(Debug, Clone, Default)]
pub struct CaptureSink {
    output: Vec<u8>,
}

impl CaptureSink {
    pub fn new() -> Self {
        CaptureSink::default()
    }

    /// Raw bytes written so far
    pub fn bytes(&self) -> &[u8] {
        &self.output
    }

    /// Everything written so far, with invalid UTF-8 replaced
    pub fn output(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.output)
    }

    /// Output split into lines, without a trailing empty line
    pub fn lines(&self) -> Vec<String> {
        self.output().lines().map(str::to_string).collect()
    }

    pub fn clear(&mut self) {
        self.output.clear();
    }

    pub fn take(&mut self) -> String {
        match String::from_utf8(std::mem::take(&mut self.output)) {
            Ok(text) => text,
            Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
        }
    }
}

impl Sink for CaptureSink {
    fn write(&mut self, format: &[u8], values: &[Value]) -> Result<(), SinkError> {
        let bytes = format_printf(format, values)?;
        self.output.extend_from_slice(&bytes);
        Ok(())
    }
}

/// Sink writing through to an [`io::Write`]
#[derive(Debug)]
pub struct WriterSink<W: io::Write> {
    writer: W,
}

impl<W: io::Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        WriterSink { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: io::Write> Sink for WriterSink<W> {
    fn write(&mut self, format: &[u8], values: &[Value]) -> Result<(), SinkError> {
        let bytes = format_printf(format, values)?;
        self.writer.write_all(&bytes)?;
        self.writer.flush()?;
        Ok(())
    }
}

/// One parsed `%` conversion
#[derive(Debug, Default)]
struct Spec {
    left_align: bool,
    zero_pad: bool,
    width: usize,
    precision: Option<usize>,
}

impl Spec {
    fn pad(&self, body: Vec<u8>) -> Vec<u8> {
        if body.len() >= self.width {
            return body;
        }
        let fill = self.width - body.len();
        let mut padded = Vec::with_capacity(self.width);

        if self.left_align {
            padded.extend_from_slice(&body);
            padded.resize(self.width, b' ');
        } else if self.zero_pad {
            // Zeros go after the sign
            let digits = match body.split_first() {
                Some((b'-', digits)) => {
                    padded.push(b'-');
                    digits
                }
                _ => &body[..],
            };
            padded.resize(padded.len() + fill, b'0');
            padded.extend_from_slice(digits);
        } else {
            padded.resize(fill, b' ');
            padded.extend_from_slice(&body);
        }
        padded
    }
}

/// Render a printf template against its arguments
///
/// Output is bytes: `%c` and `\xNN` escapes above 0x7F come out as a
/// single byte each.
pub fn format_printf(format: &[u8], values: &[Value]) -> Result<Vec<u8>, SinkError> {
    let mut output = Vec::with_capacity(format.len());
    let mut bytes = format.iter().copied().peekable();
    let mut args = values.iter();

    while let Some(byte) = bytes.next() {
        if byte != b'%' {
            output.push(byte);
            continue;
        }

        let mut spec = Spec::default();
        while let Some(&flag) = bytes.peek() {
            match flag {
                b'-' => spec.left_align = true,
                b'0' => spec.zero_pad = true,
                _ => break,
            }
            bytes.next();
        }

        spec.width = read_count(&mut bytes, "width")?;

        if bytes.peek() == Some(&b'.') {
            bytes.next();
            spec.precision = Some(read_count(&mut bytes, "precision")?);
        }

        let Some(conversion) = bytes.next().map(char::from) else {
            // A lone trailing '%' is printed as is
            output.push(b'%');
            break;
        };

        if conversion == '%' {
            output.push(b'%');
            continue;
        }

        let arg = args.next().ok_or_else(|| {
            SinkError::Format(format!(
                "Not enough arguments for format specifier %{}",
                conversion
            ))
        })?;

        let body = match conversion {
            'd' | 'i' => format_integer(arg, &spec, conversion)?.into_bytes(),
            'f' => format_float(arg, &spec)?.into_bytes(),
            'c' => vec![format_char(arg)?],
            _ => {
                return Err(SinkError::Format(format!(
                    "Unsupported format specifier: %{}",
                    conversion.escape_default()
                )))
            }
        };

        output.extend_from_slice(&spec.pad(body));
    }

    Ok(output)
}

/// Decimal width or precision, capped at [`MAX_FIELD_WIDTH`]
fn read_count(
    bytes: &mut Peekable<impl Iterator<Item = u8>>,
    what: &str,
) -> Result<usize, SinkError> {
    let mut count: usize = 0;
    while let Some(digit) = bytes.next_if(u8::is_ascii_digit) {
        count = count
            .checked_mul(10)
            .and_then(|n| n.checked_add(usize::from(digit - b'0')))
            .filter(|&n| n <= MAX_FIELD_WIDTH)
            .ok_or_else(|| {
                SinkError::Format(format!(
                    "Field {} exceeds the limit of {}",
                    what, MAX_FIELD_WIDTH
                ))
            })?;
    }
    Ok(count)
}

fn format_integer(arg: &Value, spec: &Spec, conversion: char) -> Result<String, SinkError> {
    let n = match arg {
        Value::Int(n) => *n,
        Value::Char(c) => i64::from(*c),
        other => return Err(mismatch(conversion, "int", other)),
    };

    Ok(match spec.precision {
        Some(digits) if n < 0 => format!("-{:0>digits$}", n.unsigned_abs()),
        Some(digits) => format!("{:0>digits$}", n),
        None => n.to_string(),
    })
}

fn format_float(arg: &Value, spec: &Spec) -> Result<String, SinkError> {
    let x = match arg {
        Value::Float(x) => f64::from(*x),
        Value::Int(n) => *n as f64,
        Value::Char(c) => f64::from(*c),
        other => return Err(mismatch('f', "float", other)),
    };

    if x.is_nan() {
        return Ok("nan".to_string());
    }
    if x.is_infinite() {
        return Ok(if x < 0.0 { "-inf" } else { "inf" }.to_string());
    }

    let precision = spec.precision.unwrap_or(DEFAULT_FLOAT_PRECISION);
    Ok(format!("{:.*}", precision, x))
}

fn format_char(arg: &Value) -> Result<u8, SinkError> {
    match arg {
        Value::Char(c) => Ok(*c as u8),
        Value::Int(n) => Ok(*n as u8),
        other => Err(mismatch('c', "char or int", other)),
    }
}

fn mismatch(conversion: char, expected: &str, found: &Value) -> SinkError {
    SinkError::Format(format!(
        "%{} expects {}, got {}",
        conversion,
        expected,
        found.type_of()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(format: &str, values: &[Value]) -> String {
        String::from_utf8(format_printf(format.as_bytes(), values).unwrap()).unwrap()
    }

    #[test]
    fn test_integer_and_literal_text() {
        assert_eq!(fmt("Sum: %d\n", &[Value::Int(15)]), "Sum: 15\n");
        assert_eq!(
            fmt("Results: %d, %i, %d\n", &[Value::Int(42), Value::Int(50), Value::Char(15)]),
            "Results: 42, 50, 15\n"
        );
    }

    #[test]
    fn test_float_precision() {
        assert_eq!(fmt("%.2f", &[Value::Float(25.5)]), "25.50");
        assert_eq!(fmt("%.2f", &[Value::Float(110.0)]), "110.00");
        assert_eq!(fmt("%f", &[Value::Float(1.5)]), "1.500000");
        assert_eq!(fmt("%.0f", &[Value::Int(3)]), "3");
    }

    #[test]
    fn test_width_and_flags() {
        assert_eq!(fmt("[%5d]", &[Value::Int(42)]), "[   42]");
        assert_eq!(fmt("[%-5d]", &[Value::Int(42)]), "[42   ]");
        assert_eq!(fmt("[%05d]", &[Value::Int(-42)]), "[-0042]");
        assert_eq!(fmt("[%8.3f]", &[Value::Float(3.25)]), "[   3.250]");
    }

    #[test]
    fn test_char_and_percent() {
        assert_eq!(fmt("%c%c", &[Value::Char(b'o' as i8), Value::Int(107)]), "ok");
        assert_eq!(fmt("100%%", &[]), "100%");
    }

    #[test]
    fn test_special_floats() {
        assert_eq!(fmt("%f", &[Value::Float(f32::INFINITY)]), "inf");
        assert_eq!(fmt("%f", &[Value::Float(f32::NAN)]), "nan");
    }

    #[test]
    fn test_missing_argument() {
        let err = format_printf(b"%d and %d", &[Value::Int(1)]).unwrap_err();
        assert!(err.to_string().contains("Not enough arguments"));
    }

    #[test]
    fn test_mismatched_specifier() {
        let err = format_printf(b"%d", &[Value::Float(1.0)]).unwrap_err();
        assert_eq!(err.to_string(), "%d expects int, got float");
    }

    #[test]
    fn test_unsupported_specifier() {
        assert!(format_printf(b"%s", &[Value::Int(1)]).is_err());
    }

    #[test]
    fn test_capture_sink_accumulates() {
        let mut sink = CaptureSink::new();
        sink.write(b"a=%d\n", &[Value::Int(1)]).unwrap();
        sink.write(b"b=%d\n", &[Value::Int(2)]).unwrap();
        assert_eq!(sink.output(), "a=1\nb=2\n");
        assert_eq!(sink.lines(), vec!["a=1", "b=2"]);
    }

    #[test]
    fn test_writer_sink() {
        let mut sink = WriterSink::new(Vec::new());
        sink.write(b"%c\n", &[Value::Char(b'x' as i8)]).unwrap();
        assert_eq!(sink.into_inner(), b"x\n");
    }

    #[test]
    fn test_high_bytes_stay_single() {
        let bytes = format_printf(b"%c|\xC8|%-3c|", &[Value::Int(200), Value::Char(-1)]).unwrap();
        assert_eq!(bytes, vec![200, b'|', 0xC8, b'|', 0xFF, b' ', b' ', b'|']);

        let mut sink = WriterSink::new(Vec::new());
        sink.write(b"%c", &[Value::Int(200)]).unwrap();
        assert_eq!(sink.into_inner(), vec![200]);
    }

    #[test]
    fn test_capture_sink_lossy_view() {
        let mut sink = CaptureSink::new();
        sink.write(b"a%cb", &[Value::Int(200)]).unwrap();
        assert_eq!(sink.bytes(), &[b'a', 200, b'b']);
        assert_eq!(sink.output(), "a\u{FFFD}b");
        assert_eq!(sink.take(), "a\u{FFFD}b");
        assert!(sink.bytes().is_empty());
    }

    #[test]
    fn test_oversized_field_rejected() {
        for format in [
            &b"%99999999999999999999d"[..],
            &b"%999999999999d"[..],
            &b"%.99999f"[..],
            &b"%.18446744073709551617d"[..],
        ] {
            let err = format_printf(format, &[Value::Int(1)]).unwrap_err();
            assert!(matches!(err, SinkError::Format(_)), "{:?}", err);
            assert!(err.to_string().contains("exceeds the limit"));
        }

        assert_eq!(fmt("%4096d", &[Value::Int(7)]).len(), MAX_FIELD_WIDTH);
    }
}
