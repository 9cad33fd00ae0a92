//! Rewrites obfuscated fully-qualified names in log text.
//!
//! The engine performs literal substring replacement: for every member of
//! every indexed class, `<class>.<member>` in obfuscated form is replaced by
//! its golden form everywhere in the text. Replacement is not boundary aware,
//! so an obfuscated name that happens to be a substring of a longer,
//! unrelated token is replaced inside that token as well. Likewise, when one
//! class's golden name textually matches another class's obfuscated name, a
//! chained double substitution can occur; classes are visited in
//! lexicographic order of their obfuscated names, which makes the outcome of
//! such collisions reproducible but does not prevent them.

use crate::index::MappingIndex;

/// A log rewriter.
///
/// Replaces every occurrence of an obfuscated fully-qualified member name in
/// a block of text with its golden equivalent.
///
/// # Examples
///
/// ```
/// let mapping = "com.example.Greeter -> a.a:\n    java.lang.String message -> a\n";
/// let rewriter = golden_retrace::LogRewriter::from(mapping);
///
/// assert_eq!(
///     rewriter.rewrite("a.a.a is empty\n"),
///     "com.example.Greeter.message is empty\n",
/// );
/// ```
#[derive(Clone, Debug, Default)]
pub struct LogRewriter<'s> {
    index: MappingIndex<'s>,
}

impl<'s> LogRewriter<'s> {
    /// Create a new log rewriter over a completed index.
    pub fn new(index: MappingIndex<'s>) -> Self {
        Self { index }
    }

    /// The index backing this rewriter.
    pub fn index(&self) -> &MappingIndex<'s> {
        &self.index
    }

    /// Rewrites every obfuscated fully-qualified member name in `log` to its
    /// golden form.
    ///
    /// Each replacement operates on the latest state of the working text, so
    /// the output of one member's substitution is visible to the next.
    pub fn rewrite(&self, log: &str) -> String {
        let mut text = log.to_owned();

        for class in self.index.classes() {
            for member in class.members() {
                let obfuscated = format!("{}.{}", class.obfuscated, member.obfuscated);
                if text.contains(&obfuscated) {
                    let golden = format!("{}.{}", class.golden, member.golden);
                    text = text.replace(&obfuscated, &golden);
                }
            }
        }

        text
    }
}

impl<'s> From<&'s str> for LogRewriter<'s> {
    fn from(mapping: &'s str) -> Self {
        Self::new(MappingIndex::from(mapping))
    }
}

/// Reassembles text as a sequence of lines, each terminated by a single
/// newline character.
///
/// This normalizes `\r\n` line terminators and guarantees a trailing newline,
/// matching how log input is materialized before rewriting.
///
/// # Examples
///
/// ```
/// use golden_retrace::normalize_log;
///
/// assert_eq!(normalize_log("one\r\ntwo"), "one\ntwo\n");
/// ```
pub fn normalize_log(input: &str) -> String {
    let mut text = String::with_capacity(input.len() + 1);
    for line in input.lines() {
        text.push_str(line);
        text.push('\n');
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_fields_and_methods() {
        let rewriter = LogRewriter::from(
            "\
com.example.Original -> com.example.a:
    int value -> b
    11:15:void doThing(int) -> c
",
        );

        let log = "com.example.a.b = 5\ncom.example.a.c() called\n";
        assert_eq!(
            rewriter.rewrite(log),
            "com.example.Original.value = 5\ncom.example.Original.doThing() called\n",
        );
    }

    #[test]
    fn unmapped_text_is_untouched() {
        let rewriter = LogRewriter::from("com.example.Original -> com.example.a:\n");
        let log = "nothing to see here\n";
        assert_eq!(rewriter.rewrite(log), log);
    }

    #[test]
    fn replaces_every_occurrence() {
        let rewriter = LogRewriter::from(
            "com.example.Original -> a:\n    int value -> b\n",
        );

        assert_eq!(
            rewriter.rewrite("a.b a.b a.b"),
            "com.example.Original.value com.example.Original.value com.example.Original.value",
        );
    }

    #[test]
    fn normalize_log_appends_missing_trailing_newline() {
        assert_eq!(normalize_log("one\ntwo"), "one\ntwo\n");
    }

    #[test]
    fn normalize_log_flattens_crlf() {
        assert_eq!(normalize_log("one\r\ntwo\r\n"), "one\ntwo\n");
    }

    #[test]
    fn normalize_log_empty_input() {
        assert_eq!(normalize_log(""), "");
    }
}
