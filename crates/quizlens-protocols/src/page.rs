//! Page collaborator trait and geometry types.

use serde::{Deserialize, Serialize};

use crate::types::{AnswerItem, ElementRef, ParsedQuestion};

/// Viewport size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

/// Client rectangle of an element, relative to the viewport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Whether the box has a rendered size.
    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Check if this box intersects the viewport rectangle.
    pub fn intersects_viewport(&self, viewport: &Viewport) -> bool {
        self.bottom() > 0.0 && self.y < viewport.height && self.right() > 0.0 && self.x < viewport.width
    }

    /// Area of the part of this box inside the viewport.
    pub fn visible_area(&self, viewport: &Viewport) -> f64 {
        let width = self.right().min(viewport.width) - self.x.max(0.0);
        let height = self.bottom().min(viewport.height) - self.y.max(0.0);
        if width <= 0.0 || height <= 0.0 {
            return 0.0;
        }
        width * height
    }
}

/// An element matching one of the question-container markers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateElement {
    pub element: ElementRef,
    pub bounds: BoundingBox,
    /// Computed `display: none`.
    #[serde(default)]
    pub display_none: bool,
    /// Computed `visibility: hidden`.
    #[serde(default)]
    pub visibility_hidden: bool,
}

impl CandidateElement {
    /// Rendered, sized, and intersecting the viewport.
    pub fn is_visible(&self, viewport: &Viewport) -> bool {
        !self.display_none
            && !self.visibility_hidden
            && self.bounds.has_area()
            && self.bounds.intersects_viewport(viewport)
    }
}

/// Page changes that may alter which question is current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageEvent {
    /// Subtree, child list or character data mutation.
    Mutation,
    Scroll,
    Resize,
    HashChange,
    PopState,
}

/// Page scraping capability.
///
/// Locating question and answer text nodes is page-specific; the pipeline
/// only consumes these results.
pub trait PageSource: Send + Sync {
    fn viewport(&self) -> Viewport;

    /// Elements matching known question-container markers, in document order.
    fn question_candidates(&self) -> Vec<CandidateElement>;

    /// Question text and answer texts for an element. Empty when the element
    /// is gone or has no recognizable content.
    fn parse_question(&self, element: ElementRef) -> ParsedQuestion;

    /// Answer items in displayed order.
    fn extract_answer_items(&self, element: ElementRef) -> Vec<AnswerItem>;

    /// Whether a suggestion marker is currently rendered inside the element.
    fn has_marker(&self, element: ElementRef) -> bool;
}
