//! Ordered rewrite rule table and per-line classification.
//!
//! Each rule is a whole-line pattern. Rules are tried in declaration order and
//! the first one that matches decides what the line is; nothing else is tried.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Rule patterns in precedence order. All are anchored at both ends.
///
/// Identifiers and indentation are ASCII only.
const RULE_PATTERNS: &[(RuleKind, &str)] = &[
    // let x = expr;  /  var x = expr;
    (
        RuleKind::Binding,
        r"^(?P<indent>(?-u:\s)*)(?P<kw>let|var) (?P<name>[A-Za-z0-9_]+) = (?P<expr>.*);$",
    ),
    // var x: Type(args);  (type must not contain a paren)
    (
        RuleKind::CallInit,
        r"^(?P<indent>(?-u:\s)*)var (?P<name>[A-Za-z0-9_]+): (?P<ty>[^(]+)\((?P<args>.*)\);$",
    ),
    // var x: Type;
    (RuleKind::Field, r"^(?P<indent>(?-u:\s)*)var (?P<name>[A-Za-z0-9_]+): (?P<ty>.+);$"),
    // static var x: Type;
    (
        RuleKind::StaticField,
        r"^(?P<indent>(?-u:\s)*)static var (?P<name>[A-Za-z0-9_]+): (?P<ty>.+);$",
    ),
    // func name(params): Ret;
    (
        RuleKind::Function,
        r"^(?P<indent>(?-u:\s)*)func (?P<name>[A-Za-z0-9_]+)\((?P<params>.*)\): (?P<ret>.+?)(?P<semi>;?)$",
    ),
    // init(params) ...
    (
        RuleKind::Initializer,
        r"^(?P<indent>(?-u:\s)*)init\((?P<params>.*)\)(?P<trailing>.*)$",
    ),
    // class Name ...
    (RuleKind::TypeDecl, r"^(?-u:\s)*class (?P<name>[A-Za-z0-9_]+).*$"),
];

static RULES: Lazy<Vec<(RuleKind, Regex)>> = Lazy::new(|| {
    RULE_PATTERNS
        .iter()
        .map(|(kind, pat)| (*kind, Regex::new(pat).expect("rule pattern is a valid regex")))
        .collect()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RuleKind
{
    Binding,
    CallInit,
    Field,
    StaticField,
    Function,
    Initializer,
    TypeDecl,
}

/// Whether a local binding may be reassigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutability
{
    /// `let`: bound once
    Once,
    /// `var`: rebindable
    Rebindable,
}

impl Mutability
{
    /// Target-language qualifier for this kind of binding.
    pub fn qualifier(self) -> &'static str
    {
        match self
        {
            Mutability::Once => "auto const",
            Mutability::Rebindable => "auto",
        }
    }
}

/// A line recognized by one of the rewrite rules, borrowing its captures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineMatch<'a>
{
    Binding
    {
        indent: &'a str,
        mutability: Mutability,
        name: &'a str,
        expr: &'a str,
    },
    CallInit
    {
        indent: &'a str,
        name: &'a str,
        ty: &'a str,
        args: &'a str,
    },
    Field
    {
        indent: &'a str,
        name: &'a str,
        ty: &'a str,
    },
    StaticField
    {
        indent: &'a str,
        name: &'a str,
        ty: &'a str,
    },
    Function
    {
        indent: &'a str,
        name: &'a str,
        params: &'a str,
        ret: &'a str,
        semi: &'a str,
    },
    Initializer
    {
        indent: &'a str,
        params: &'a str,
        trailing: &'a str,
    },
    TypeDecl
    {
        name: &'a str,
    },
}

/// Classify one line (without its line terminator) against the rule table.
///
/// Returns `None` when no rule matches the entire line.
pub fn match_line(line: &str) -> Option<LineMatch<'_>>
{
    RULES
        .iter()
        .find_map(|(kind, re)| {
            re.captures(line)
                .map(|caps| build(*kind, &caps, line))
        })
}

fn build<'a>(
    kind: RuleKind,
    caps: &Captures<'a>,
    line: &'a str,
) -> LineMatch<'a>
{
    // Every named group is non-optional in its own pattern
    let get = |name: &str| {
        caps.name(name)
            .map_or(&line[..0], |m| m.as_str())
    };

    match kind
    {
        RuleKind::Binding => LineMatch::Binding {
            indent: get("indent"),
            mutability: if get("kw") == "let" { Mutability::Once } else { Mutability::Rebindable },
            name: get("name"),
            expr: get("expr"),
        },
        RuleKind::CallInit => LineMatch::CallInit {
            indent: get("indent"),
            name: get("name"),
            ty: get("ty"),
            args: get("args"),
        },
        RuleKind::Field => LineMatch::Field {
            indent: get("indent"),
            name: get("name"),
            ty: get("ty"),
        },
        RuleKind::StaticField => LineMatch::StaticField {
            indent: get("indent"),
            name: get("name"),
            ty: get("ty"),
        },
        RuleKind::Function => LineMatch::Function {
            indent: get("indent"),
            name: get("name"),
            params: get("params"),
            ret: get("ret"),
            semi: get("semi"),
        },
        RuleKind::Initializer => LineMatch::Initializer {
            indent: get("indent"),
            params: get("params"),
            trailing: get("trailing"),
        },
        RuleKind::TypeDecl => LineMatch::TypeDecl { name: get("name") },
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn all_patterns_compile()
    {
        assert_eq!(RULES.len(), RULE_PATTERNS.len());
    }

    #[test]
    fn binding_keywords_map_to_mutability()
    {
        assert_eq!(
            match_line("let a = 1;"),
            Some(LineMatch::Binding {
                indent: "",
                mutability: Mutability::Once,
                name: "a",
                expr: "1",
            })
        );
        assert!(matches!(
            match_line("  var b = f(x);"),
            Some(LineMatch::Binding { mutability: Mutability::Rebindable, indent: "  ", .. })
        ));
    }

    #[test]
    fn call_init_wins_over_plain_field()
    {
        assert_eq!(
            match_line("var x: Int(5);"),
            Some(LineMatch::CallInit { indent: "", name: "x", ty: "Int", args: "5" })
        );
    }

    #[test]
    fn function_semicolon_is_optional()
    {
        assert_eq!(
            match_line("func f(): Void;"),
            Some(LineMatch::Function {
                indent: "",
                name: "f",
                params: "",
                ret: "Void",
                semi: ";",
            })
        );
        assert!(matches!(
            match_line("func g(n: Int): Value"),
            Some(LineMatch::Function { ret: "Value", semi: "", .. })
        ));
    }

    #[test]
    fn partial_resemblance_does_not_match()
    {
        // No terminating semicolon
        assert_eq!(match_line("let a = 1"), None);
        // Keyword not at start of the statement
        assert_eq!(match_line("x = let a = 1;"), None);
        // Missing space after colon
        assert_eq!(match_line("var x:Int;"), None);
        assert_eq!(match_line("classic Foo {"), None);
    }

    #[test]
    fn identifiers_are_ascii_words()
    {
        assert_eq!(match_line("let é = 1;"), None);
        assert_eq!(match_line("func naïve(): int;"), None);
        // Non-breaking space is not indentation
        assert_eq!(match_line("\u{a0}var x: int;"), None);
        assert_eq!(
            match_line("\tlet e_1 = 1;"),
            Some(LineMatch::Binding {
                indent: "\t",
                mutability: Mutability::Once,
                name: "e_1",
                expr: "1",
            })
        );
    }

    #[test]
    fn class_forward_declaration_is_a_type_decl()
    {
        assert_eq!(match_line("class SystemImpl;"), Some(LineMatch::TypeDecl { name: "SystemImpl" }));
    }
}
