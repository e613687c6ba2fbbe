use std::fmt;

/// Characters trimmed from both ends of a user's query.
static TRIM_CHARS: &[char] = &['\r', '\n', '\t', ' ', '(', ')'];

/// The key a function or method is filed under in the PHP manual,
/// e.g. `function.strlen` or `splstack.construct`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FunctionReference(String);

impl FunctionReference {

    /// Normalizes a name typed by a user into a manual reference.
    ///
    /// Surrounding whitespace and parentheses are dropped, a method is
    /// split off its class at the rightmost `::`, and the result is
    /// lowercased with underscores turned into hyphens.  Inputs with
    /// nothing useful in them still produce a reference: an empty
    /// query gives `function.` and a bare `::` gives `.`, neither of
    /// which will match anything in the manual.
    ///
    /// ```
    /// use irc_phpdoc::php::FunctionReference;
    ///
    /// assert_eq!(FunctionReference::normalize("str_replace()").as_str(), "function.str-replace");
    /// assert_eq!(FunctionReference::normalize("SplStack::__construct").as_str(), "splstack.construct");
    /// ```
    pub fn normalize(raw: &str) -> FunctionReference {
        let trimmed = raw.trim_matches(TRIM_CHARS);
        let (scope, name) = trimmed.rsplit_once("::").unwrap_or(("function", trimmed));
        let reference = format!("{}.{}", scope, name.trim_matches('_'));
        FunctionReference(reference.replace('_', "-").to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

}

impl fmt::Display for FunctionReference {

    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }

}

impl AsRef<str> for FunctionReference {

    fn as_ref(&self) -> &str {
        &self.0
    }

}
