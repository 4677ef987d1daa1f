//! Keyword and size rules deciding whether a task suits the Qwen executor.
//!
//! Each rule looks at the lowercased content, the token estimate and the
//! number of context files. A task is eligible when any rule fires.

use qsa_core::Task;

/// Token estimate at or above which a task counts as large.
pub const LARGE_CONTENT_TOKENS: u64 = 15_000;
/// Context file count above which a task counts as codebase analysis.
pub const CODEBASE_ANALYSIS_FILES: usize = 10;

const FORMAT_TERMS: &[&str] = &["format", "格式化", "格式"];
const BULK_TERMS: &[&str] = &["批量", "batch", "bulk"];
const DOC_TERMS: &[&str] = &["docs", "document", "文档"];
const TRANSLATION_TERMS: &[&str] = &["translate", "翻译", "trans"];
const REFACTOR_TERMS: &[&str] = &["rename", "refactor", "重构"];
const SEARCH_TERMS: &[&str] = &["find pattern", "search", "搜索"];

/// Task features the rules are evaluated against.
#[derive(Debug, Clone)]
pub struct TaskFeatures {
    content: String,
    estimated_tokens: u64,
    file_count: usize,
}

impl TaskFeatures {
    pub fn of(task: &Task) -> Self {
        Self {
            content: task.content().to_lowercase(),
            estimated_tokens: task.estimated_tokens(),
            file_count: task.context_files().len(),
        }
    }

    fn mentions(&self, terms: &[&str]) -> bool {
        terms.iter().any(|term| self.content.contains(term))
    }

    fn is_large(&self) -> bool {
        self.estimated_tokens >= LARGE_CONTENT_TOKENS
    }
}

/// A named eligibility rule.
pub type Rule = (&'static str, fn(&TaskFeatures) -> bool);

/// Rules in evaluation order.
pub const RULES: &[Rule] = &[
    ("batch_format", batch_format),
    ("documentation", documentation),
    ("translation", translation),
    ("simple_refactor", simple_refactor),
    ("codebase_analysis", codebase_analysis),
    ("pattern_search", pattern_search),
    ("large_content", large_content),
];

fn batch_format(f: &TaskFeatures) -> bool {
    let format = f.mentions(FORMAT_TERMS);
    (f.is_large() && format) || (f.mentions(BULK_TERMS) && format)
}

fn documentation(f: &TaskFeatures) -> bool {
    f.mentions(DOC_TERMS)
}

fn translation(f: &TaskFeatures) -> bool {
    f.mentions(TRANSLATION_TERMS)
}

fn simple_refactor(f: &TaskFeatures) -> bool {
    f.mentions(REFACTOR_TERMS)
}

fn codebase_analysis(f: &TaskFeatures) -> bool {
    f.file_count > CODEBASE_ANALYSIS_FILES
}

fn pattern_search(f: &TaskFeatures) -> bool {
    f.mentions(SEARCH_TERMS)
}

fn large_content(f: &TaskFeatures) -> bool {
    f.is_large()
}

/// Names of every rule that fires for `task`, in table order.
pub fn matching_rules(task: &Task) -> Vec<&'static str> {
    let features = TaskFeatures::of(task);
    RULES
        .iter()
        .filter(|(_, rule)| rule(&features))
        .map(|(name, _)| *name)
        .collect()
}

/// `true` if at least one rule fires for `task`.
pub fn any_rule_matches(task: &Task) -> bool {
    let features = TaskFeatures::of(task);
    RULES.iter().any(|(_, rule)| rule(&features))
}
