/// A string literal, possibly carrying `{expr}` interpolations.
///
/// Interpolation is resolved at evaluation time, because the embedded
/// expressions read the evaluator's current environment.
#[derive(Debug, Clone, PartialEq)]
pub struct ChString {
    pub text:         String,
    pub interpolated: bool,
}

/// A piece of an interpolated string.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Literal text, with `\{` and `\}` already unescaped.
    Literal(String),
    /// Source text of an embedded expression.
    Expression(String),
}

impl ChString {
    #[must_use]
    pub const fn new(text: String, interpolated: bool) -> Self {
        Self { text, interpolated }
    }

    /// Splits the text into literal and expression segments.
    ///
    /// Braces nest: `{x^{2}}` is a single expression segment. Escaped
    /// braces stay literal.
    ///
    /// # Errors
    /// Returns a message when braces are unbalanced.
    pub fn segments(&self) -> Result<Vec<Segment>, String> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut expression = String::new();
        let mut depth = 0usize;
        let mut escaped = false;

        for c in self.text.chars() {
            let target = if depth == 0 { &mut literal } else { &mut expression };

            if escaped {
                if !matches!(c, '{' | '}') {
                    target.push('\\');
                }
                target.push(c);
                escaped = false;
                continue;
            }

            match c {
                '\\' => escaped = true,
                '{' => {
                    if depth == 0 {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    } else {
                        expression.push('{');
                    }
                    depth += 1;
                },
                '}' => match depth {
                    0 => return Err("unmatched '}' in string".to_string()),
                    1 => {
                        segments.push(Segment::Expression(std::mem::take(&mut expression)));
                        depth = 0;
                    },
                    _ => {
                        expression.push('}');
                        depth -= 1;
                    },
                },
                _ => target.push(c),
            }
        }

        if depth != 0 {
            return Err("unmatched '{' in string".to_string());
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }
        Ok(segments)
    }
}
