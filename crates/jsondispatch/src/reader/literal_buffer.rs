#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Literal {
    Null,
    True,
    False,
}

/// What happened after feeding one more byte into the literal matcher?
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Step {
    /// Byte matched, but the literal is not finished yet.
    NeedMore,
    /// Byte matched *and* it was the last byte of the literal.
    Done(Literal),
    /// Byte did **not** match the expected one.
    Reject,
}

/// Remaining bytes of the literal being matched, with its kind.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct ExpectedLiteralBuffer(Option<(&'static [u8], Literal)>);

impl ExpectedLiteralBuffer {
    /// Start matching after the *first* byte (`n`, `t`, or `f`).
    pub(crate) fn new(first: u8) -> Self {
        match first {
            b'n' => ExpectedLiteralBuffer(Some((b"ull", Literal::Null))),
            b't' => ExpectedLiteralBuffer(Some((b"rue", Literal::True))),
            b'f' => ExpectedLiteralBuffer(Some((b"alse", Literal::False))),
            _ => ExpectedLiteralBuffer(None),
        }
    }

    pub(crate) fn step(&mut self, byte: u8) -> Step {
        let Some((bytes, kind)) = self.0 else {
            return Step::Reject;
        };

        match bytes.split_first() {
            Some((expected, rest)) if *expected == byte => {
                if rest.is_empty() {
                    self.0 = None;
                    Step::Done(kind)
                } else {
                    self.0 = Some((rest, kind));
                    Step::NeedMore
                }
            }
            _ => Step::Reject,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_true() {
        let mut buf = ExpectedLiteralBuffer::new(b't');
        assert_eq!(buf.step(b'r'), Step::NeedMore);
        assert_eq!(buf.step(b'u'), Step::NeedMore);
        assert_eq!(buf.step(b'e'), Step::Done(Literal::True));
        assert_eq!(buf.step(b'e'), Step::Reject);
    }

    #[test]
    fn rejects_mismatch_and_keeps_state() {
        let mut buf = ExpectedLiteralBuffer::new(b'n');
        assert_eq!(buf.step(b'o'), Step::Reject);
        assert_eq!(buf.step(b'u'), Step::NeedMore);
    }

    #[test]
    fn unknown_first_byte_rejects() {
        let mut buf = ExpectedLiteralBuffer::new(b'x');
        assert_eq!(buf.step(b'u'), Step::Reject);
    }
}
