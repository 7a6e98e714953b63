/// A language the runner can execute, with the runtime version requested from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Runtime {
    pub language: &'static str,
    pub version: &'static str,
}

/// Editor language ids mapped to runner runtimes.
pub const RUNTIMES: &[Runtime] = &[
    Runtime {
        language: "javascript",
        version: "18.15.0",
    },
    Runtime {
        language: "typescript",
        version: "5.0.3",
    },
    Runtime {
        language: "python",
        version: "3.10.0",
    },
    Runtime {
        language: "java",
        version: "15.0.2",
    },
    Runtime {
        language: "go",
        version: "1.16.2",
    },
    Runtime {
        language: "rust",
        version: "1.68.2",
    },
    Runtime {
        language: "cpp",
        version: "10.2.0",
    },
    Runtime {
        language: "csharp",
        version: "6.12.0",
    },
    Runtime {
        language: "ruby",
        version: "3.0.1",
    },
    Runtime {
        language: "swift",
        version: "5.3.3",
    },
];

/// Case-insensitive lookup by editor language id.
pub fn runtime_for(language: &str) -> Option<Runtime> {
    let language = language.trim();
    RUNTIMES
        .iter()
        .copied()
        .find(|r| r.language.eq_ignore_ascii_case(language))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_lookup() {
        assert_eq!(runtime_for("python").unwrap().version, "3.10.0");
        assert_eq!(runtime_for(" Rust ").unwrap().language, "rust");
        assert!(runtime_for("cobol").is_none());
        assert!(runtime_for("").is_none());
    }

    #[test]
    fn test_runtime_languages_unique() {
        let mut names: Vec<_> = RUNTIMES.iter().map(|r| r.language).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), RUNTIMES.len());
    }
}
