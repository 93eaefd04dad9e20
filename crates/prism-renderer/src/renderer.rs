//! The renderer abstraction.

use crate::ast::Document;
use crate::context::RenderContext;

/// Turns a [`Document`] into one output representation.
///
/// Renderers are pure: the same document, configuration and starting context
/// always produce the same output, and rendering has no error path. New
/// output formats implement this trait, usually by driving
/// [`walk_document`](crate::walk_document) with their own
/// [`RenderBackend`](crate::RenderBackend).
pub trait Renderer {
    /// Rendered representation.
    type Output;

    /// Render with caller-supplied state (color mode, footnote numbering,
    /// heading ids). The context is updated in place.
    fn render_with_context(&self, document: &Document, context: &mut RenderContext) -> Self::Output;

    /// Render with a fresh [`RenderContext`].
    fn render(&self, document: &Document) -> Self::Output {
        let mut context = RenderContext::new();
        self.render_with_context(document, &mut context)
    }
}
