use std::sync::LazyLock;

use regex::Regex;

/// `[access] [static] ReturnType Name(params) [{]`. Group 3 is the name.
static SIGNATURE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(public|private|internal|protected)?(?:^|\s+)(static)?\s*[\w<>\[\]]+\s+([\w<>]+)\s*\([^)]*\)\s*\{*",
    )
    .unwrap_or_else(|e| panic!("signature regex: {e}"))
});

/// Reasons a line matching the signature pattern is still not a definition.
///
/// The pattern alone also matches call expressions, control statements and
/// declarations. A candidate is a pattern match that no rule rejects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    /// Ends with `;` or `,`: a statement, declaration or argument list.
    StatementTerminator,
    /// `new ` object construction.
    ObjectConstruction,
    /// `return ` statement.
    ReturnKeyword,
    /// `if ` or `foreach ` control flow.
    ControlFlow,
    /// `//` or `/*` comment.
    Comment,
    /// `async` methods are left alone.
    AsyncMarker,
}

impl Exclusion {
    /// Evaluation order of the exclusion pipeline.
    pub const ALL: [Exclusion; 6] = [
        Exclusion::StatementTerminator,
        Exclusion::ObjectConstruction,
        Exclusion::ReturnKeyword,
        Exclusion::ControlFlow,
        Exclusion::Comment,
        Exclusion::AsyncMarker,
    ];

    /// Whether this rule rejects `line`.
    ///
    /// The `return` rule only looks at the text before the first `{`, so a
    /// body written on the signature line (`int F() { return 1; }`) does not
    /// disqualify its own signature. Every other rule sees the whole line.
    pub fn applies(self, line: &str) -> bool {
        match self {
            Exclusion::StatementTerminator => {
                let trimmed = line.trim_end();
                trimmed.ends_with(';') || trimmed.ends_with(',')
            }
            Exclusion::ObjectConstruction => line.contains("new "),
            Exclusion::ReturnKeyword => signature_head(line).contains("return "),
            Exclusion::ControlFlow => line.contains("if ") || line.contains("foreach "),
            Exclusion::Comment => line.contains("//") || line.contains("/*"),
            Exclusion::AsyncMarker => line.contains("async"),
        }
    }
}

fn signature_head(line: &str) -> &str {
    line.split('{').next().unwrap_or(line)
}

/// Run only the signature pattern. Returns the method name it captured,
/// which may be imprecise for unusual formatting.
pub fn match_signature(line: &str) -> Option<&str> {
    SIGNATURE_RE
        .captures(line)
        .map(|caps| caps.get(3).map_or("", |m| m.as_str()))
}

/// First exclusion rule that rejects `line`, if any.
pub fn exclusion_for(line: &str) -> Option<Exclusion> {
    Exclusion::ALL.into_iter().find(|rule| rule.applies(line))
}

/// Full candidate check: pattern match, then exclusions. Returns the method
/// name for candidate definition lines.
pub fn candidate(line: &str) -> Option<&str> {
    let name = match_signature(line)?;
    if exclusion_for(line).is_some() {
        return None;
    }
    Some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_common_signatures() {
        let cases = [
            ("    public void Update()", "Update"),
            ("    private static int Add(int a, int b) {", "Add"),
            ("\tprotected override void OnEnable()", "OnEnable"),
            ("    internal List<int> Collect(string[] names)", "Collect"),
            ("    T Get<T>(int id) {", "Get<T>"),
            ("void Top()", "Top"),
            ("    public static void Main(string[] args)", "Main"),
            ("    int F() { return 1; }", "F"),
        ];
        for (line, name) in cases {
            assert_eq!(candidate(line), Some(name), "line: {line:?}");
        }
    }

    #[test]
    fn pattern_rejects_non_signatures() {
        for line in [
            "    Update();",
            "    x = 1",
            "    while (Check(x)) {",
            "    {",
            "    public int Hp { get; set; }",
            "",
        ] {
            assert!(
                match_signature(line.trim_end_matches(';')).is_none(),
                "should not match: {line:?}"
            );
        }
    }

    #[test]
    fn statement_terminator_excludes() {
        assert_eq!(
            exclusion_for("    int Count(int x);"),
            Some(Exclusion::StatementTerminator)
        );
        assert_eq!(
            exclusion_for("    Call(a, b),"),
            Some(Exclusion::StatementTerminator)
        );
        assert_eq!(
            exclusion_for("    public abstract void Tick();   "),
            Some(Exclusion::StatementTerminator)
        );
        assert!(candidate("    public abstract void Tick();").is_none());
    }

    #[test]
    fn object_construction_excludes() {
        let line = "    var list = new List<int>(capacity)";
        assert!(match_signature(line).is_some());
        assert_eq!(exclusion_for(line), Some(Exclusion::ObjectConstruction));
        assert!(candidate(line).is_none());
    }

    #[test]
    fn return_statement_excludes() {
        let line = "        return Compute(x)";
        assert!(match_signature(line).is_some());
        assert_eq!(exclusion_for(line), Some(Exclusion::ReturnKeyword));
    }

    #[test]
    fn control_flow_excludes() {
        let line = "        foreach (var item in Items())";
        assert!(match_signature(line).is_some());
        assert_eq!(exclusion_for(line), Some(Exclusion::ControlFlow));
        assert_eq!(
            exclusion_for("        else if (Ready(x))"),
            Some(Exclusion::ControlFlow)
        );
    }

    #[test]
    fn comments_exclude() {
        let line = "    // void Old(int x)";
        assert!(match_signature(line).is_some());
        assert_eq!(exclusion_for(line), Some(Exclusion::Comment));
        assert_eq!(
            exclusion_for("    /* void Old(int x) */"),
            Some(Exclusion::Comment)
        );
    }

    #[test]
    fn async_methods_exclude() {
        let line = "    public async Task Load(string path)";
        assert!(match_signature(line).is_some());
        assert_eq!(exclusion_for(line), Some(Exclusion::AsyncMarker));
        assert!(candidate(line).is_none());
    }

    #[test]
    fn return_after_opening_brace_does_not_exclude() {
        assert_eq!(exclusion_for("    int F() { return x; }"), None);
        assert_eq!(candidate("    int F() { return x; }"), Some("F"));
    }

    #[test]
    fn other_keywords_anywhere_on_the_line_exclude() {
        assert_eq!(
            exclusion_for("    int F() { return new X(); }"),
            Some(Exclusion::ObjectConstruction)
        );
        assert_eq!(
            exclusion_for("    void G() { if (a) b(); }"),
            Some(Exclusion::ControlFlow)
        );
        assert_eq!(
            exclusion_for("    void Load() { Run(async () => Fetch()); }"),
            Some(Exclusion::AsyncMarker)
        );
    }

    #[test]
    fn trailing_comment_excludes_one_liner() {
        let line = "    void F() { } // done";
        assert!(match_signature(line).is_some());
        assert_eq!(exclusion_for(line), Some(Exclusion::Comment));
        assert!(candidate(line).is_none());
    }

    #[test]
    fn comment_holding_a_brace_excludes_signature() {
        let line = "    void Update() { // was: while (x) {";
        assert!(match_signature(line).is_some());
        assert_eq!(exclusion_for(line), Some(Exclusion::Comment));
    }

    #[test]
    fn exclusions_are_checked_in_order() {
        // Both a terminator and a `new` apply; the terminator rule runs first.
        assert_eq!(
            exclusion_for("    var x = new Foo(a);"),
            Some(Exclusion::StatementTerminator)
        );
    }
}
