#![no_main]
use std::{
    cell::RefCell,
    io::{self, Read},
    rc::Rc,
};

use arbitrary::Arbitrary;
use jsondispatch::{DispatchError, Dispatcher, HandlerError, JsonHandler, ParserOptions};
use libfuzzer_sys::fuzz_target;
use serde_json::{Map, Value};

/// Paths that show up in most small documents.
const PATHS: &[&str] = &["[", "{", "[[", "[{", "{[", "{{", "{a[", "{a{", "[{a["];

#[derive(Debug, Arbitrary)]
enum Document {
    Raw(Vec<u8>),
    Value(ArbitraryValue),
}

#[derive(Debug, Arbitrary)]
struct Case {
    allow_unicode_whitespace: bool,
    allow_multiple_json_values: bool,
    max_depth: Option<u8>,
    chunk: u8,
    document: Document,
}

#[derive(Debug)]
struct ArbitraryValue(Value);

impl<'a> Arbitrary<'a> for ArbitraryValue {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let value = match u.choose_index(21)? {
            0 => Value::Null,
            1 => Value::Bool(u.arbitrary()?),
            2 => {
                let n: f64 = u.arbitrary()?;
                Value::Number(
                    serde_json::Number::from_f64(n).ok_or(arbitrary::Error::IncorrectFormat)?,
                )
            }
            3..=10 => Value::String(u.arbitrary()?),
            11..=15 => {
                let elems: Vec<ArbitraryValue> = u.arbitrary()?;
                Value::Array(elems.into_iter().map(|v| v.0).collect())
            }
            16..=20 => {
                // keys drawn from a tiny alphabet so registered paths get hit
                let members: Vec<(bool, ArbitraryValue)> = u.arbitrary()?;
                Value::Object(Map::from_iter(
                    members
                        .into_iter()
                        .map(|(a, v)| (if a { "a" } else { "b" }.to_string(), v.0)),
                ))
            }
            _ => Err(arbitrary::Error::IncorrectFormat)?,
        };
        Ok(ArbitraryValue(value))
    }
}

/// Hands out the input `chunk` bytes at a time.
struct Chunked<'a> {
    data: &'a [u8],
    chunk: usize,
}

impl Read for Chunked<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.chunk.min(buf.len()).min(self.data.len());
        buf[..n].copy_from_slice(&self.data[..n]);
        self.data = &self.data[n..];
        Ok(n)
    }
}

/// Tracks begin/end nesting for one path.
struct Balance {
    open: Rc<RefCell<isize>>,
}

impl JsonHandler for Balance {
    fn begin(&mut self) -> Result<(), HandlerError> {
        *self.open.borrow_mut() += 1;
        Ok(())
    }

    fn end(&mut self) -> Result<(), HandlerError> {
        let mut open = self.open.borrow_mut();
        *open -= 1;
        assert!(*open >= 0, "end without begin");
        Ok(())
    }

    fn value(&mut self, _: Option<&str>, _: Option<&str>) -> Result<(), HandlerError> {
        Ok(())
    }
}

fn dispatch(case: Case) {
    let (bytes, well_formed) = match case.document {
        Document::Raw(bytes) => (bytes, false),
        Document::Value(value) => match serde_json::to_vec(&value.0) {
            Ok(bytes) => (bytes, true),
            Err(_) => return,
        },
    };

    let options = ParserOptions {
        allow_unicode_whitespace: case.allow_unicode_whitespace,
        allow_multiple_json_values: case.allow_multiple_json_values,
        max_depth: case.max_depth.map(usize::from),
    };
    let reader = Chunked {
        data: &bytes,
        chunk: usize::from(case.chunk).max(1),
    };

    let counters: Vec<_> = PATHS.iter().map(|_| Rc::new(RefCell::new(0))).collect();
    let mut dispatcher = Dispatcher::from_reader_with_options(reader, options);
    for (path, open) in PATHS.iter().zip(&counters) {
        let handler = Balance {
            open: Rc::clone(open),
        };
        dispatcher
            .register(*path, handler)
            .expect("paths are non-empty");
    }

    match dispatcher.scan() {
        Ok(()) => {
            for (path, open) in PATHS.iter().zip(&counters) {
                assert_eq!(*open.borrow(), 0, "unbalanced begin/end at {path}");
            }
        }
        Err(DispatchError::Structural(_) | DispatchError::Source(_)) if !well_formed => {}
        Err(DispatchError::Structural(err)) if case.max_depth.is_some() => {
            assert!(matches!(
                err,
                jsondispatch::StructuralError::DepthLimitExceeded { .. }
            ));
        }
        Err(err) => panic!("well-formed document failed: {err}"),
    }
}

fuzz_target!(|case: Case| dispatch(case));
