//! hierarchy::classifier
//!
//! Content vs structural classification of vault paths.
//!
//! # Rule Table
//!
//! Classification is an ordered list of `(predicate, outcome)` rules. The
//! first rule whose predicate matches decides; order is significant and
//! must not be changed (an `index` file inside a `videos` folder is
//! structural because rule 1 fires before rule 3).
//!
//! | # | Rule | Outcome |
//! |---|------|---------|
//! | 1 | filename contains `index`, `readme`, `template`, `module-` | structural |
//! | 2 | filename stem is `overview` | structural |
//! | 3 | filename or parent folder contains a content keyword | content |
//! | 4 | extension is `.mp4`, `.pdf`, `.pptx`, `.docx` | content |
//! | 5 | full path contains a content-area keyword | content |
//! | 6 | anything else | structural |
//!
//! All comparisons are case-insensitive.
//!
//! # Example
//!
//! ```
//! use vaultkit::hierarchy::classifier::{extract_numeric_module_prefix, is_likely_content_file};
//! use std::path::Path;
//!
//! assert!(is_likely_content_file(Path::new("/vault/MBA/Finance/Week1/lecture.md")));
//! assert!(!is_likely_content_file(Path::new("/vault/MBA/Finance/index.md")));
//! assert_eq!(extract_numeric_module_prefix("module03_name"), "03");
//! ```

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::{debug, warn};

/// Filename fragments that mark a structural note.
pub const STRUCTURAL_NAME_MARKERS: &[&str] = &["index", "readme", "template", "module-"];

/// Keywords that mark a filename or its parent folder as content.
pub const CONTENT_KEYWORDS: &[&str] = &[
    "video",
    "reading",
    "instruction",
    "assignment",
    "quiz",
    "exercise",
    "activity",
    "discussion",
    "transcript",
    "slides",
    "presentation",
    "notes",
    "summary",
    "lecture",
    "content",
    "material",
];

/// Extensions that are always content.
pub const CONTENT_EXTENSIONS: &[&str] = &[".mp4", ".pdf", ".pptx", ".docx"];

/// Keywords anywhere in the path that mark a content area.
pub const CONTENT_AREA_KEYWORDS: &[&str] = &["video", "reading", "resource", "content", "material"];

/// Lowercased views of a path that the rules inspect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathFacts {
    /// Filename including extension.
    pub file_name: String,
    /// Filename without extension.
    pub stem: String,
    /// Extension with leading dot, or empty.
    pub extension: String,
    /// Name of the parent directory, or empty.
    pub parent: String,
    /// The whole path, separators unified.
    pub full: String,
}

impl PathFacts {
    /// Extract facts from a path. Never touches the filesystem.
    pub fn from_path(path: &Path) -> Self {
        let lower = |s: Option<&std::ffi::OsStr>| {
            s.map(|s| s.to_string_lossy().to_lowercase())
                .unwrap_or_default()
        };

        let extension = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
            .unwrap_or_default();

        Self {
            file_name: lower(path.file_name()),
            stem: lower(path.file_stem()),
            extension,
            parent: lower(path.parent().and_then(Path::file_name)),
            full: path.to_string_lossy().replace('\\', "/").to_lowercase(),
        }
    }
}

/// One row of the classification table.
#[derive(Debug, Clone, Copy)]
pub struct ClassifierRule {
    /// Rule name, reported by [`Classification::rule`].
    pub name: &'static str,
    /// Predicate over the path facts.
    pub applies: fn(&PathFacts) -> bool,
    /// Whether a match means content.
    pub is_content: bool,
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

fn structural_name(facts: &PathFacts) -> bool {
    contains_any(&facts.file_name, STRUCTURAL_NAME_MARKERS)
}

fn overview_stem(facts: &PathFacts) -> bool {
    facts.stem == "overview"
}

fn content_keyword(facts: &PathFacts) -> bool {
    contains_any(&facts.file_name, CONTENT_KEYWORDS) || contains_any(&facts.parent, CONTENT_KEYWORDS)
}

fn content_extension(facts: &PathFacts) -> bool {
    CONTENT_EXTENSIONS.contains(&facts.extension.as_str())
}

fn content_area(facts: &PathFacts) -> bool {
    contains_any(&facts.full, CONTENT_AREA_KEYWORDS)
}

fn fallthrough(_facts: &PathFacts) -> bool {
    true
}

/// The classification table, evaluated top to bottom.
pub const CLASSIFIER_RULES: &[ClassifierRule] = &[
    ClassifierRule {
        name: "structural-name",
        applies: structural_name,
        is_content: false,
    },
    ClassifierRule {
        name: "overview",
        applies: overview_stem,
        is_content: false,
    },
    ClassifierRule {
        name: "content-keyword",
        applies: content_keyword,
        is_content: true,
    },
    ClassifierRule {
        name: "content-extension",
        applies: content_extension,
        is_content: true,
    },
    ClassifierRule {
        name: "content-area",
        applies: content_area,
        is_content: true,
    },
    ClassifierRule {
        name: "default",
        applies: fallthrough,
        is_content: false,
    },
];

/// Outcome of classifying a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    /// Whether the path is learning material.
    pub is_content: bool,
    /// Name of the rule that decided.
    pub rule: &'static str,
}

/// Classifies vault paths as content or structural.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentClassifier;

impl ContentClassifier {
    /// Create a classifier using [`CLASSIFIER_RULES`].
    pub fn new() -> Self {
        Self
    }

    /// Classify a path, reporting which rule decided.
    pub fn classify(&self, path: &Path) -> Classification {
        let facts = PathFacts::from_path(path);
        let decided = CLASSIFIER_RULES
            .iter()
            .find(|rule| (rule.applies)(&facts))
            .map(|rule| Classification {
                is_content: rule.is_content,
                rule: rule.name,
            })
            .unwrap_or(Classification {
                is_content: false,
                rule: "default",
            });

        debug!(
            path = %path.display(),
            is_content = decided.is_content,
            rule = decided.rule,
            "classified path"
        );
        decided
    }

    /// Whether the path is likely learning material.
    pub fn is_likely_content_file(&self, path: &Path) -> bool {
        self.classify(path).is_content
    }
}

/// Whether the path is likely learning material.
///
/// See the module docs for the rule table.
pub fn is_likely_content_file(path: &Path) -> bool {
    ContentClassifier::new().is_likely_content_file(path)
}

/// Optional letters, a one- or two-digit number, then `_` or `-`.
const MODULE_PREFIX_PATTERN: &str = r"^[A-Za-z]*(\d{1,2})[_-]";

static MODULE_PREFIX_REGEX: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(MODULE_PREFIX_PATTERN)
        .map_err(|err| warn!(%err, "module prefix pattern does not compile"))
        .ok()
});

/// Reduce a module folder name to its numeric prefix.
///
/// Matches a leading one- or two-digit number, optionally preceded by
/// letters and followed by `_` or `-`. Anything else is returned unchanged.
///
/// ```
/// use vaultkit::hierarchy::classifier::extract_numeric_module_prefix;
///
/// assert_eq!(extract_numeric_module_prefix("05_operations-resilience"), "05");
/// assert_eq!(extract_numeric_module_prefix("introduction"), "introduction");
/// ```
pub fn extract_numeric_module_prefix(module: &str) -> String {
    MODULE_PREFIX_REGEX
        .as_ref()
        .and_then(|regex| regex.captures(module))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| module.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(path: &str) -> Classification {
        ContentClassifier::new().classify(Path::new(path))
    }

    mod rules {
        use super::*;

        #[test]
        fn structural_names_win_first() {
            assert_eq!(classify("/v/MBA/videos/index.md").rule, "structural-name");
            assert!(!classify("/v/MBA/videos/README.md").is_content);
            assert!(!classify("/v/MBA/video-template.md").is_content);
            assert!(!classify("/v/MBA/Finance/module-overview.md").is_content);
        }

        #[test]
        fn overview_is_structural() {
            let c = classify("/v/MBA/Finance/Week1/Overview.md");
            assert_eq!(c, Classification { is_content: false, rule: "overview" });
        }

        #[test]
        fn overview_stem_only() {
            // "overview-video" is not exactly "overview"
            assert!(classify("/v/MBA/overview-video.md").is_content);
        }

        #[test]
        fn keyword_in_filename() {
            assert_eq!(classify("/v/MBA/Finance/Quiz 1.md").rule, "content-keyword");
            assert!(classify("/v/MBA/Finance/Lecture-Notes.md").is_content);
        }

        #[test]
        fn keyword_in_parent() {
            assert_eq!(classify("/v/MBA/Readings/chapter1.md").rule, "content-keyword");
        }

        #[test]
        fn extension() {
            assert_eq!(classify("/v/MBA/Finance/Week1/intro.MP4").rule, "content-extension");
            assert!(classify("/v/MBA/Finance/case.pdf").is_content);
            assert!(classify("/v/MBA/Finance/deck.pptx").is_content);
            assert!(classify("/v/MBA/Finance/paper.docx").is_content);
        }

        #[test]
        fn content_area_in_path() {
            assert_eq!(
                classify("/v/Resources/MBA/Finance/chapter.md").rule,
                "content-area"
            );
        }

        #[test]
        fn default_structural() {
            assert_eq!(
                classify("/v/MBA/Finance/Week1/plan.md"),
                Classification { is_content: false, rule: "default" }
            );
        }

        #[test]
        fn week_folder_video() {
            assert!(is_likely_content_file(Path::new(
                "/vault/MBA/Finance/Accounting/Week1/video.mp4"
            )));
        }
    }

    mod prefix {
        use super::*;

        #[test]
        fn pattern_compiles() {
            assert!(MODULE_PREFIX_REGEX.is_some());
        }

        #[test]
        fn leading_digits_with_separator() {
            assert_eq!(extract_numeric_module_prefix("05_operations-resilience"), "05");
            assert_eq!(extract_numeric_module_prefix("05_ops"), "05");
            assert_eq!(extract_numeric_module_prefix("1-intro"), "1");
        }

        #[test]
        fn letters_before_digits() {
            assert_eq!(extract_numeric_module_prefix("module03_name"), "03");
            assert_eq!(extract_numeric_module_prefix("Week2-finance"), "2");
        }

        #[test]
        fn unchanged_without_prefix() {
            assert_eq!(extract_numeric_module_prefix("introduction"), "introduction");
            assert_eq!(extract_numeric_module_prefix("Week1"), "Week1");
            assert_eq!(extract_numeric_module_prefix("123_too-long"), "123_too-long");
            assert_eq!(extract_numeric_module_prefix(""), "");
        }
    }

    #[test]
    fn facts_from_path() {
        let facts = PathFacts::from_path(Path::new(r"C:\Vault\MBA\Videos\Intro.MP4"));
        assert_eq!(facts.full, "c:/vault/mba/videos/intro.mp4");
        let facts = PathFacts::from_path(Path::new("/vault/MBA/Videos/Intro.MP4"));
        assert_eq!(facts.file_name, "intro.mp4");
        assert_eq!(facts.stem, "intro");
        assert_eq!(facts.extension, ".mp4");
        assert_eq!(facts.parent, "videos");
    }
}
