use labkit_state::{PlaceholderController, ToolController};

use crate::ViewResult;
use crate::frame::Frame;
use crate::view::{Presentation, ToolView};

const NOTICE: &str = "This tool is not yet implemented. Coming soon!";

/// Stand-in for a tool listed on the start menu but not implemented yet.
#[derive(Debug)]
pub struct PlaceholderView {
    view: ToolView<PlaceholderController>,
}

impl PlaceholderView {
    /// Binds a placeholder titled `title`.
    #[must_use]
    pub fn new(controller: PlaceholderController, title: impl Into<String>) -> Self {
        Self {
            view: ToolView::new(controller, title),
        }
    }
}

impl Presentation for PlaceholderView {
    fn controller(&self) -> &dyn ToolController {
        self.view.controller()
    }

    fn title(&self) -> &str {
        self.view.title()
    }

    fn edit(&mut self, field: &str, text: &str) -> ViewResult<bool> {
        self.view.edit(field, text)
    }

    fn select_mode(&mut self, mode: &str) -> ViewResult<bool> {
        self.view.select_mode(mode)
    }

    fn needs_redraw(&self) -> bool {
        self.view.needs_redraw()
    }

    fn render(&mut self) -> Frame {
        self.view.frame(None, vec![NOTICE.to_owned()])
    }

    fn redraw_count(&self) -> u64 {
        self.view.redraw_count()
    }
}
