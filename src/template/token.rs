/// One `%...%` match found in a template.
///
/// Every field borrows from the scanned string. Absent parts are empty
/// strings, so `%REQ%` and a missing argument group look the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Token<'a> {
    /// The entire match, delimiters included.
    pub whole_match: &'a str,
    /// Operator identifier; empty for the `%%` literal.
    pub operator_name: &'a str,
    /// Argument including its parentheses, e.g. `(:METHOD)`.
    pub args: &'a str,
    /// Truncation suffix including its colon, e.g. `:3`.
    pub truncation: &'a str,
}

impl Token<'_> {
    /// `%%`, an escaped percent sign rather than an operator.
    pub fn is_literal_percent(&self) -> bool {
        self.operator_name.is_empty()
    }

    pub fn has_args(&self) -> bool {
        !self.args.is_empty()
    }

    pub fn has_truncation(&self) -> bool {
        !self.truncation.is_empty()
    }
}
