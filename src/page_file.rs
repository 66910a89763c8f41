//! File-backed page host.
//!
//! A JSON description stands in for a rendered quiz page: the viewport plus
//! every question block with its geometry, computed style flags and texts.
//!
//! ```json
//! {
//!   "viewport": { "width": 1280, "height": 720 },
//!   "questions": [
//!     {
//!       "id": 1,
//!       "bounds": { "x": 0, "y": 120, "width": 800, "height": 300 },
//!       "question": "2+2=?",
//!       "answers": ["3", "4", "5"]
//!     }
//!   ]
//! }
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::Context;
use parking_lot::{Mutex, RwLock};
use serde::Deserialize;
use tracing::debug;

use quizlens_protocols::{
    AnswerItem, BoundingBox, CandidateElement, ElementRef, PageSource, ParsedQuestion, Viewport,
};

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct PageDescription {
    #[serde(default)]
    pub viewport: Viewport,
    #[serde(default)]
    pub questions: Vec<QuestionBlock>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QuestionBlock {
    pub id: u64,
    pub bounds: BoundingBox,
    #[serde(default)]
    pub display_none: bool,
    #[serde(default)]
    pub visibility_hidden: bool,
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answers: Vec<String>,
}

impl QuestionBlock {
    fn question_text(&self) -> &str {
        self.question.trim()
    }

    /// Non-blank answers in display order.
    fn answer_texts(&self) -> Vec<String> {
        self.answers
            .iter()
            .map(|answer| answer.trim())
            .filter(|answer| !answer.is_empty())
            .map(str::to_string)
            .collect()
    }

    fn same_content(&self, other: &QuestionBlock) -> bool {
        self.question == other.question && self.answers == other.answers
    }
}

/// Answer rows get handles derived from their question block.
fn answer_ref(question: u64, index: usize) -> ElementRef {
    ElementRef((question << 16) | (index as u64 + 1))
}

/// Page source reading a JSON page description from disk.
///
/// Markers live in memory. Reloading keeps the marker of a block whose
/// question and answers are unchanged and drops it otherwise, the way a
/// re-rendered DOM node loses injected children.
pub(crate) struct JsonPageSource {
    path: PathBuf,
    page: RwLock<PageDescription>,
    marked: Mutex<HashSet<ElementRef>>,
}

impl JsonPageSource {
    pub fn load(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        let page = read_description(&path)?;
        Ok(Self {
            path,
            page: RwLock::new(page),
            marked: Mutex::new(HashSet::new()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read the file. On error the previous page stays in place.
    pub fn reload(&self) -> anyhow::Result<()> {
        let next = read_description(&self.path)?;
        let mut page = self.page.write();
        self.marked.lock().retain(|element| {
            let before = page.questions.iter().find(|b| ElementRef(b.id) == *element);
            let after = next.questions.iter().find(|b| ElementRef(b.id) == *element);
            matches!((before, after), (Some(before), Some(after)) if before.same_content(after))
        });
        *page = next;
        debug!("Reloaded page description from {}", self.path.display());
        Ok(())
    }

    pub fn set_marker(&self, element: ElementRef) {
        self.marked.lock().insert(element);
    }

    pub fn clear_markers(&self) {
        self.marked.lock().clear();
    }

    fn block(&self, element: ElementRef) -> Option<QuestionBlock> {
        self.page
            .read()
            .questions
            .iter()
            .find(|block| ElementRef(block.id) == element)
            .cloned()
    }
}

fn read_description(path: &Path) -> anyhow::Result<PageDescription> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading page description {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("parsing page description {}", path.display()))
}

impl PageSource for JsonPageSource {
    fn viewport(&self) -> Viewport {
        self.page.read().viewport
    }

    fn question_candidates(&self) -> Vec<CandidateElement> {
        self.page
            .read()
            .questions
            .iter()
            .map(|block| CandidateElement {
                element: ElementRef(block.id),
                bounds: block.bounds,
                display_none: block.display_none,
                visibility_hidden: block.visibility_hidden,
            })
            .collect()
    }

    fn parse_question(&self, element: ElementRef) -> ParsedQuestion {
        self.block(element)
            .map(|block| ParsedQuestion::new(block.question_text(), block.answer_texts()))
            .unwrap_or_default()
    }

    fn extract_answer_items(&self, element: ElementRef) -> Vec<AnswerItem> {
        let Some(block) = self.block(element) else {
            return Vec::new();
        };
        block
            .answer_texts()
            .into_iter()
            .enumerate()
            .map(|(index, text)| AnswerItem {
                text,
                element: answer_ref(block.id, index),
                container: Some(element),
            })
            .collect()
    }

    fn has_marker(&self, element: ElementRef) -> bool {
        self.marked.lock().contains(&element)
    }
}
