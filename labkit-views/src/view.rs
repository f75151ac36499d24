//! The presentation contract and the shared view core.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

use labkit_primitives::{InstanceId, ToolId};
use labkit_state::{StateEvent, SubscriptionId, ToolController};
use tracing::{debug, warn};

use crate::frame::{Frame, Row};
use crate::{ViewError, ViewResult};

/// What a host drives: one mounted tool.
pub trait Presentation {
    /// Controller backing this presentation.
    fn controller(&self) -> &dyn ToolController;

    /// Title shown above the tool.
    fn title(&self) -> &str;

    /// Parses `text` and forwards it to the controller as the value of
    /// `field`. Returns `true` if the stored value changed.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::InvalidNumber`] for unparsable text and
    /// [`ViewError::State`] when the controller rejects the field. Either way
    /// the message is also kept as the frame's status line.
    fn edit(&mut self, field: &str, text: &str) -> ViewResult<bool>;

    /// Switches the controller's calculation mode.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::State`] for modes the tool does not offer.
    fn select_mode(&mut self, mode: &str) -> ViewResult<bool>;

    /// Returns `true` when a notification arrived since the last render.
    fn needs_redraw(&self) -> bool;

    /// Re-derives every displayed value from the controller.
    fn render(&mut self) -> Frame;

    /// Number of frames rendered so far.
    fn redraw_count(&self) -> u64;

    /// Registry id of the tool.
    fn tool_id(&self) -> &ToolId {
        self.controller().tool_id()
    }

    /// Instance id of the tool.
    fn instance_id(&self) -> InstanceId {
        self.controller().instance_id()
    }
}

#[derive(Debug, Default)]
struct Dirty {
    all: bool,
    elements: BTreeSet<&'static str>,
}

impl Dirty {
    fn mark(&mut self, event: &StateEvent) {
        match event {
            StateEvent::StateChanged { field } | StateEvent::ResultComputed { field, .. } => {
                self.elements.insert(field);
            }
            StateEvent::SeriesUpdated { series } => {
                self.elements.insert(series);
            }
            StateEvent::InvalidInput { .. } => {
                self.elements.insert("status");
            }
            StateEvent::ModeChanged { .. } => self.all = true,
        }
    }

    fn is_dirty(&self) -> bool {
        self.all || !self.elements.is_empty()
    }
}

/// Controller binding shared by every concrete view.
///
/// Subscribes to the controller on construction and unsubscribes when dropped.
/// The only state it keeps besides the controller is the dirty set, the redraw
/// counter and the status message of the last rejected edit.
pub struct ToolView<C: ToolController> {
    controller: C,
    title: String,
    subscription: SubscriptionId,
    dirty: Rc<RefCell<Dirty>>,
    redraws: u64,
    edit_status: Option<String>,
}

impl<C: ToolController> fmt::Debug for ToolView<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolView")
            .field("tool_id", self.controller.tool_id())
            .field("title", &self.title)
            .field("subscription", &format_args!("{}", self.subscription))
            .field("redraws", &self.redraws)
            .finish_non_exhaustive()
    }
}

impl<C: ToolController> ToolView<C> {
    /// Binds a view to `controller`.
    pub fn new(controller: C, title: impl Into<String>) -> Self {
        let dirty = Rc::new(RefCell::new(Dirty {
            all: true,
            elements: BTreeSet::new(),
        }));
        let sink = Rc::clone(&dirty);
        let subscription = controller.subscribe(Box::new(move |event| sink.borrow_mut().mark(event)));
        debug!(tool = %controller.tool_id(), instance = %controller.instance_id(), %subscription, "view bound");
        Self {
            controller,
            title: title.into(),
            subscription,
            dirty,
            redraws: 0,
            edit_status: None,
        }
    }

    /// Borrow the controller.
    pub fn controller(&self) -> &C {
        &self.controller
    }

    /// Mutable access for tool-specific operations. Changes still flow back
    /// through notifications.
    pub fn controller_mut(&mut self) -> &mut C {
        &mut self.controller
    }

    /// Title shown above the tool.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Names of elements changed since the last render, sorted.
    pub fn dirty_elements(&self) -> Vec<&'static str> {
        self.dirty.borrow().elements.iter().copied().collect()
    }

    /// See [`Presentation::needs_redraw`].
    pub fn needs_redraw(&self) -> bool {
        self.dirty.borrow().is_dirty()
    }

    /// See [`Presentation::redraw_count`].
    pub fn redraw_count(&self) -> u64 {
        self.redraws
    }

    /// See [`Presentation::edit`].
    ///
    /// # Errors
    ///
    /// See [`Presentation::edit`].
    pub fn edit(&mut self, field: &str, text: &str) -> ViewResult<bool> {
        let result = text
            .trim()
            .parse::<f64>()
            .map_err(|_| ViewError::InvalidNumber {
                field: field.to_owned(),
                text: text.to_owned(),
            })
            .and_then(|value| {
                self.controller
                    .set_input(field, value)
                    .map_err(ViewError::from)
            });
        self.settle(result)
    }

    /// See [`Presentation::select_mode`].
    ///
    /// # Errors
    ///
    /// See [`Presentation::select_mode`].
    pub fn select_mode(&mut self, mode: &str) -> ViewResult<bool> {
        let result = self.controller.set_mode(mode).map_err(ViewError::from);
        self.settle(result)
    }

    fn settle(&mut self, result: ViewResult<bool>) -> ViewResult<bool> {
        match &result {
            Ok(_) => self.edit_status = None,
            Err(err) => {
                warn!(tool = %self.controller.tool_id(), error = %err, "edit rejected");
                self.edit_status = Some(err.to_string());
                self.dirty.borrow_mut().elements.insert("status");
            }
        }
        result
    }

    /// Builds a frame from the controller, adding tool-specific extras.
    pub fn frame(&mut self, equation: Option<&'static str>, notes: Vec<String>) -> Frame {
        let status = self
            .edit_status
            .clone()
            .or_else(|| self.controller.last_error().map(ToString::to_string));
        let frame = Frame {
            title: self.title.clone(),
            mode: self.controller.mode(),
            equation,
            inputs: self.controller.inputs().into_iter().map(Row::from).collect(),
            outputs: self.controller.outputs().into_iter().map(Row::from).collect(),
            notes,
            status,
        };
        {
            let mut dirty = self.dirty.borrow_mut();
            dirty.all = false;
            dirty.elements.clear();
        }
        self.redraws += 1;
        frame
    }
}

impl<C: ToolController> Drop for ToolView<C> {
    fn drop(&mut self) {
        if self.controller.unsubscribe(self.subscription) {
            debug!(tool = %self.controller.tool_id(), subscription = %self.subscription, "view released");
        }
    }
}

#[cfg(test)]
mod tests {
    use labkit_calc::CalcError;
    use labkit_state::{
        BeerLambertController, FieldValue, Listener, Notifier, StateError, StateResult,
    };

    use super::*;

    /// Controller whose notifier outlives it, so delivery can be observed after
    /// the view is gone.
    struct SharedNotifier {
        tool_id: ToolId,
        instance_id: InstanceId,
        notifier: Rc<Notifier>,
    }

    impl ToolController for SharedNotifier {
        fn tool_id(&self) -> &ToolId {
            &self.tool_id
        }

        fn instance_id(&self) -> InstanceId {
            self.instance_id
        }

        fn set_mode(&mut self, mode: &str) -> StateResult<bool> {
            Err(StateError::UnknownMode {
                tool: self.tool_id.clone(),
                mode: mode.to_owned(),
            })
        }

        fn inputs(&self) -> Vec<FieldValue> {
            Vec::new()
        }

        fn outputs(&self) -> Vec<FieldValue> {
            Vec::new()
        }

        fn set_input(&mut self, _field: &str, _value: f64) -> StateResult<bool> {
            Ok(false)
        }

        fn last_error(&self) -> Option<&CalcError> {
            None
        }

        fn subscribe(&self, listener: Listener) -> SubscriptionId {
            self.notifier.subscribe(listener)
        }

        fn unsubscribe(&self, id: SubscriptionId) -> bool {
            self.notifier.unsubscribe(id)
        }
    }

    fn view() -> ToolView<BeerLambertController> {
        let tool = ToolId::new("beer_lambert").unwrap();
        ToolView::new(BeerLambertController::new(tool), "Beer-Lambert Calculator")
    }

    #[test]
    fn starts_dirty_and_clears_on_render() {
        let mut v = view();
        assert!(v.needs_redraw());
        let frame = v.frame(None, Vec::new());
        assert_eq!(frame.title, "Beer-Lambert Calculator");
        assert!(!v.needs_redraw());
        assert_eq!(v.redraw_count(), 1);
    }

    #[test]
    fn notifications_mark_elements_dirty() {
        let mut v = view();
        v.frame(None, Vec::new());
        assert!(v.edit("epsilon", "2").unwrap());
        assert_eq!(v.dirty_elements(), vec!["epsilon"]);
        v.edit("path_length", "1").unwrap();
        v.edit("concentration", "0.5").unwrap();
        assert!(v.dirty_elements().contains(&"absorbance"));
        assert_eq!(v.frame(None, Vec::new()).row("absorbance").unwrap().value, 1.0);
    }

    #[test]
    fn unparsable_text_becomes_status() {
        let mut v = view();
        let err = v.edit("epsilon", "abc").unwrap_err();
        assert!(matches!(err, ViewError::InvalidNumber { .. }));
        assert_eq!(v.controller().epsilon(), 0.0);
        let frame = v.frame(None, Vec::new());
        assert_eq!(frame.status.as_deref(), Some("`abc` is not a valid number for epsilon"));

        v.edit("epsilon", " 3 ").unwrap();
        assert!(v.frame(None, Vec::new()).status.is_none());
    }

    #[test]
    fn unknown_mode_is_reported() {
        let mut v = view();
        assert!(v.select_mode("concentration").unwrap());
        assert!(v.select_mode("sideways").is_err());
        assert!(v.frame(None, Vec::new()).status.unwrap().contains("sideways"));
        assert!(format!("{v:?}").contains("sub-1"));
    }

    #[test]
    fn dropping_the_view_stops_delivery() {
        let notifier = Rc::new(Notifier::new());
        let controller = SharedNotifier {
            tool_id: ToolId::new("shared").unwrap(),
            instance_id: InstanceId::random(),
            notifier: Rc::clone(&notifier),
        };
        let mut v = ToolView::new(controller, "Shared");
        assert_eq!(notifier.subscriber_count(), 1);
        v.frame(None, Vec::new());

        notifier.emit(StateEvent::StateChanged { field: "x" });
        assert_eq!(v.dirty_elements(), vec!["x"]);
        v.frame(None, Vec::new());

        let dirty = Rc::clone(&v.dirty);
        drop(v);
        assert_eq!(notifier.subscriber_count(), 0);
        notifier.emit(StateEvent::StateChanged { field: "y" });
        assert!(!dirty.borrow().is_dirty());
    }
}
