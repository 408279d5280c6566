//! Editor session: element list, history and selection behind one API.
//!
//! Every committed edit goes through [`History::record`] exactly once and then
//! reports the new [`TemplateConfig`] to the change listener. The session
//! never persists anything itself.

use crate::boundary::{
    ImageLoad, ImageResolver, ImageResult, PendingImage, TemplateConfig, from_external,
};
use crate::config::EditorConfig;
use crate::editing::{self, PropertyResult};
use crate::elements::{
    Element, ElementId, ElementKind, ElementList, ElementResult, Image, ImageHandle, Shape,
    create_default,
};
use crate::history::History;
use crate::selection::{Selection, element_at};
use crate::transform::{TransformEnd, apply_drag, apply_transform_end};
use kurbo::Point;
use serde_json::{Map, Value};

/// Callback receiving the external design after every change.
pub type ChangeListener = Box<dyn FnMut(&TemplateConfig)>;

/// Single-writer editing state for one design.
pub struct EditorSession {
    config: EditorConfig,
    width: f64,
    height: f64,
    history: History,
    selection: Selection,
    listener: Option<ChangeListener>,
}

impl EditorSession {
    /// Open a saved design.
    ///
    /// The session is usable right away; feed each returned load into
    /// [`finish_load`](Self::finish_load) as it completes.
    pub fn new(
        config: EditorConfig,
        template: TemplateConfig,
        resolver: &dyn ImageResolver,
    ) -> (Self, Vec<PendingImage>) {
        let (elements, pending) = from_external(template.elements, resolver);
        let session = Self {
            width: template.width,
            height: template.height,
            history: History::with_limit(elements, config.history_limit),
            selection: Selection::new(),
            listener: None,
            config,
        };
        (session, pending)
    }

    /// Start from live elements, sized from `config`.
    pub fn from_elements(config: EditorConfig, elements: ElementList) -> Self {
        Self {
            width: config.canvas_width,
            height: config.canvas_height,
            history: History::with_limit(elements, config.history_limit),
            selection: Selection::new(),
            listener: None,
            config,
        }
    }

    /// Register the callback notified after every change.
    pub fn set_change_listener(&mut self, listener: impl FnMut(&TemplateConfig) + 'static) {
        self.listener = Some(Box::new(listener));
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// The current element list.
    pub fn elements(&self) -> &ElementList {
        self.history.current()
    }

    pub fn element(&self, id: &ElementId) -> Option<&Element> {
        self.elements().iter().find(|el| &el.id == id)
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn selected_id(&self) -> Option<&ElementId> {
        self.selection.get()
    }

    pub fn selected_element(&self) -> Option<&Element> {
        self.selection.element(self.history.current())
    }

    /// The design in its external form.
    pub fn template(&self) -> TemplateConfig {
        TemplateConfig::new(self.width, self.height, self.elements())
    }

    fn notify(&mut self) {
        if self.listener.is_none() {
            return;
        }
        let template = self.template();
        if let Some(listener) = self.listener.as_mut() {
            listener(&template);
        }
    }

    fn commit(&mut self, next: ElementList) {
        self.history.record(next);
        self.selection.retain(self.history.current());
        self.notify();
    }

    /// Replace element `id` with `f(element)` and commit.
    /// Returns false if no element has that id.
    fn update_element(&mut self, id: &ElementId, f: impl FnOnce(&Element) -> Element) -> bool {
        let current = self.history.current();
        let Some(index) = current.iter().position(|el| &el.id == id) else {
            log::debug!("Edit targets missing element {}", id);
            return false;
        };
        let mut next = current.clone();
        next[index] = f(&current[index]);
        self.commit(next);
        true
    }

    /// Append a new element of `kind` with `overrides` applied, and select it.
    pub fn add_element(
        &mut self,
        kind: &str,
        overrides: &Map<String, Value>,
    ) -> ElementResult<ElementId> {
        let element = create_default(kind, overrides)?;
        Ok(self.push_element(element))
    }

    /// Append an image sized to the configured maximum width, and select it.
    ///
    /// Start its load with [`load_image`](Self::load_image).
    pub fn add_image(
        &mut self,
        src: impl Into<String>,
        natural_width: f64,
        natural_height: f64,
    ) -> ElementId {
        let mut element = Element::with_defaults(ElementKind::Image);
        element.shape = Shape::Image(Image::fit_width(
            src,
            natural_width,
            natural_height,
            self.config.image_max_width,
        ));
        self.push_element(element)
    }

    fn push_element(&mut self, element: Element) -> ElementId {
        let id = element.id.clone();
        if self.element(&id).is_some() {
            log::warn!("Adding element with duplicate id {}", id);
        }
        let mut next = self.history.current().clone();
        next.push(element);
        self.commit(next);
        self.selection.select(Some(&id), self.history.current());
        id
    }

    /// Start (or retry) the image load for element `id` from its current `src`.
    pub fn load_image(&self, id: &ElementId, resolver: &dyn ImageResolver) -> Option<PendingImage> {
        let src = self.element(id)?.shape.as_image()?.src.clone();
        if src.is_empty() {
            return None;
        }
        Some(PendingImage::new(id.clone(), src, resolver))
    }

    /// Commit the end of a drag gesture.
    pub fn drag(&mut self, id: &ElementId, x: f64, y: f64) -> bool {
        self.update_element(id, |el| apply_drag(el, x, y))
    }

    /// Commit the end of a resize/rotate gesture.
    pub fn transform_end(&mut self, id: &ElementId, gesture: &TransformEnd) -> bool {
        self.update_element(id, |el| apply_transform_end(el, gesture))
    }

    /// Set one field of element `id`. Rejected values leave everything as is.
    pub fn apply_property(&mut self, id: &ElementId, key: &str, value: &Value) -> PropertyResult<()> {
        let next = editing::apply_property(self.history.current(), id, key, value)?;
        self.commit(next);
        Ok(())
    }

    /// Set one field of the selected element.
    /// Returns false if nothing is selected.
    pub fn set_property(&mut self, key: &str, value: &Value) -> PropertyResult<bool> {
        let Some(id) = self.selection.get().cloned() else {
            return Ok(false);
        };
        self.apply_property(&id, key, value)?;
        Ok(true)
    }

    /// Remove the selected element and clear the selection.
    /// Returns false if nothing is selected.
    pub fn delete_selected(&mut self) -> bool {
        let Some(id) = self.selection.get().cloned() else {
            return false;
        };
        self.selection.clear();
        let next = editing::delete(self.history.current(), &id);
        self.commit(next);
        true
    }

    pub fn undo(&mut self) -> bool {
        if !self.history.undo() {
            return false;
        }
        self.selection.retain(self.history.current());
        self.notify();
        true
    }

    pub fn redo(&mut self) -> bool {
        if !self.history.redo() {
            return false;
        }
        self.selection.retain(self.history.current());
        self.notify();
        true
    }

    /// Select `id`, or clear with `None`. Unknown ids are ignored.
    pub fn select(&mut self, id: Option<&ElementId>) -> bool {
        self.selection.select(id, self.history.current())
    }

    /// Select the top-most element under `point`; clears on empty canvas.
    pub fn select_at(&mut self, point: Point) -> Option<ElementId> {
        let hit = element_at(self.history.current(), point, self.config.hit_tolerance)
            .map(|el| el.id.clone());
        self.selection.select(hit.as_ref(), self.history.current());
        hit
    }

    /// Attach the outcome of an image load started for `src`.
    ///
    /// Dropped if the element is gone or now points at another source.
    /// Returns true if a handle was attached.
    pub fn attach_image(
        &mut self,
        id: &ElementId,
        src: &str,
        result: ImageResult<ImageHandle>,
    ) -> bool {
        let handle = match result {
            Ok(handle) => handle,
            Err(e) => {
                log::warn!("Failed to load image {} for {}: {}", src, id, e);
                return false;
            }
        };
        let current_src = self
            .element(id)
            .and_then(|el| el.shape.as_image())
            .map(|img| img.src.as_str());
        if current_src != Some(src) {
            log::debug!("Discarding image load for {} ({})", id, src);
            return false;
        }

        self.history.patch_all(id, |el| {
            if let Some(img) = el.shape.as_image_mut() {
                if img.src == src {
                    img.set_handle(Some(handle.clone()));
                }
            }
        });
        true
    }

    /// [`attach_image`](Self::attach_image) for a finished [`PendingImage`].
    pub fn finish_load(&mut self, load: ImageLoad) -> bool {
        self.attach_image(&load.id, &load.src, load.result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::{ImageError, MemoryResolver};
    use crate::editing::PropertyError;
    use crate::elements::png_header;
    use pollster::block_on;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn overrides(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    fn r1_template() -> TemplateConfig {
        serde_json::from_value(json!({
            "width": 1200,
            "height": 800,
            "elements": [{
                "id": "r1", "type": "rect", "x": 10, "y": 10, "width": 100, "height": 50,
                "fill": "#fff", "rotation": 0, "opacity": 1
            }]
        }))
        .unwrap()
    }

    fn open(template: TemplateConfig) -> EditorSession {
        let (session, pending) =
            EditorSession::new(EditorConfig::default(), template, &MemoryResolver::new());
        assert!(pending.is_empty());
        session
    }

    fn rect_width(el: &Element) -> f64 {
        match &el.shape {
            Shape::Rect(r) => r.width,
            _ => panic!("expected rect"),
        }
    }

    /// Count listener calls and keep the last template.
    fn watch(session: &mut EditorSession) -> Rc<RefCell<Vec<TemplateConfig>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        session.set_change_listener(move |t| sink.borrow_mut().push(t.clone()));
        seen
    }

    #[test]
    fn test_transform_record_undo_scenario() {
        init();
        let mut session = open(r1_template());
        let original = session.elements().clone();
        let id = ElementId::from("r1");

        assert!(session.transform_end(&id, &TransformEnd::new(2.0, 1.0, 10.0, 10.0, 0.0)));
        let el = session.element(&id).unwrap();
        assert!((rect_width(el) - 200.0).abs() < f64::EPSILON);
        let Shape::Rect(r) = &el.shape else { unreachable!() };
        assert!((r.height - 50.0).abs() < f64::EPSILON);
        assert_eq!(session.history().len(), 2);

        assert!(session.undo());
        assert_eq!(session.elements(), &original);
        assert!((rect_width(&session.elements()[0]) - 100.0).abs() < f64::EPSILON);

        assert!(session.redo());
        assert!((rect_width(&session.elements()[0]) - 200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_each_edit_records_once_and_notifies() {
        init();
        let mut session = open(r1_template());
        let seen = watch(&mut session);
        let id = ElementId::from("r1");

        session.drag(&id, 40.0, 50.0);
        session.apply_property(&id, "fill", &json!("#000")).unwrap();
        session.transform_end(&id, &TransformEnd::identity(session.element(&id).unwrap()));
        assert_eq!(session.history().len(), 4);
        assert_eq!(seen.borrow().len(), 3);

        let last = seen.borrow().last().cloned().unwrap();
        assert_eq!(last, session.template());
        assert!((last.elements[0].x - 40.0).abs() < f64::EPSILON);

        // Undo/redo notify without recording.
        assert!(session.undo());
        assert!(session.redo());
        assert_eq!(session.history().len(), 4);
        assert_eq!(seen.borrow().len(), 5);

        // Edits on missing ids change nothing.
        assert!(!session.drag(&ElementId::from("ghost"), 0.0, 0.0));
        assert_eq!(session.history().len(), 4);
        assert_eq!(seen.borrow().len(), 5);
    }

    #[test]
    fn test_apply_property_on_missing_id_still_records() {
        init();
        let mut session = open(r1_template());
        let seen = watch(&mut session);
        let before = session.elements().clone();

        session
            .apply_property(&ElementId::from("ghost"), "x", &json!(1))
            .unwrap();
        assert_eq!(session.history().len(), 2);
        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(session.elements(), &before);
    }

    #[test]
    fn test_add_element_selects_it() {
        init();
        let mut session = EditorSession::from_elements(EditorConfig::default(), Vec::new());
        let id = session
            .add_element("star", &overrides(json!({"fill": "#ff0000"})))
            .unwrap();
        assert_eq!(session.selected_id(), Some(&id));
        assert_eq!(session.elements().len(), 1);
        assert!(session.can_undo());

        assert!(session.add_element("hexagon", &Map::new()).is_err());
        assert_eq!(session.elements().len(), 1);
        assert_eq!(session.history().len(), 2);
    }

    #[test]
    fn test_add_image_scales_to_max_width() {
        init();
        let mut session = EditorSession::from_elements(EditorConfig::default(), Vec::new());
        let id = session.add_image("photo.png", 1200.0, 900.0);
        let img = session.element(&id).unwrap().shape.as_image().unwrap();
        assert!((img.width - 300.0).abs() < f64::EPSILON);
        assert!((img.height - 225.0).abs() < f64::EPSILON);
        assert_eq!(session.selected_id(), Some(&id));
    }

    #[test]
    fn test_delete_selected_clears_selection() {
        init();
        let mut session = open(r1_template());
        let id = ElementId::from("r1");
        assert!(!session.delete_selected());

        assert!(session.select(Some(&id)));
        assert!(session.delete_selected());
        assert!(session.selected_id().is_none());
        assert!(session.element(&id).is_none());
        assert_eq!(session.history().len(), 2);

        // Undo brings the element back without reselecting it.
        assert!(session.undo());
        assert!(session.element(&id).is_some());
        assert!(session.selected_id().is_none());
    }

    #[test]
    fn test_undo_past_creation_clears_selection() {
        init();
        let mut session = EditorSession::from_elements(EditorConfig::default(), Vec::new());
        let id = session.add_element("rect", &Map::new()).unwrap();
        assert_eq!(session.selected_id(), Some(&id));
        assert!(session.undo());
        assert!(session.selected_id().is_none());
    }

    #[test]
    fn test_dangling_select_is_ignored() {
        init();
        let mut session = open(r1_template());
        let id = ElementId::from("r1");
        session.select(Some(&id));
        assert!(!session.select(Some(&ElementId::from("ghost"))));
        assert_eq!(session.selected_id(), Some(&id));
    }

    #[test]
    fn test_select_at_hits_and_clears() {
        init();
        let mut session = open(r1_template());
        assert_eq!(
            session.select_at(Point::new(50.0, 30.0)),
            Some(ElementId::from("r1"))
        );
        assert_eq!(session.selected_id(), Some(&ElementId::from("r1")));
        assert_eq!(session.select_at(Point::new(900.0, 700.0)), None);
        assert!(session.selected_id().is_none());
    }

    #[test]
    fn test_set_property_on_selection() {
        init();
        let mut session = open(r1_template());
        assert!(!session.set_property("width", &json!(10)).unwrap());

        session.select(Some(&ElementId::from("r1")));
        assert!(session.set_property("width", &json!(10)).unwrap());
        assert!((rect_width(&session.elements()[0]) - 10.0).abs() < f64::EPSILON);

        let err = session.set_property("id", &json!("r2")).unwrap_err();
        assert!(matches!(err, PropertyError::Immutable(_)));
        assert_eq!(session.history().len(), 2);
    }

    #[test]
    fn test_history_limit_from_config() {
        init();
        let config = EditorConfig {
            history_limit: Some(2),
            ..EditorConfig::default()
        };
        let mut session = EditorSession::from_elements(config, Vec::new());
        for _ in 0..3 {
            session.add_element("text", &Map::new()).unwrap();
        }
        assert_eq!(session.history().len(), 2);
        assert!(session.undo());
        assert!(!session.undo());
        assert_eq!(session.elements().len(), 2);
    }

    #[test]
    fn test_loaded_image_attaches_to_all_snapshots() {
        init();
        let resolver = MemoryResolver::new();
        resolver.insert("logo.png", png_header()).unwrap();
        let template: TemplateConfig = serde_json::from_value(json!({
            "elements": [{"id": "i1", "type": "image", "width": 100, "height": 50, "src": "logo.png"}]
        }))
        .unwrap();

        let (mut session, pending) = EditorSession::new(EditorConfig::default(), template, &resolver);
        let seen = watch(&mut session);
        let id = ElementId::from("i1");
        session.drag(&id, 5.0, 5.0);
        assert!(!session.element(&id).unwrap().has_image_handle());

        for load in pending {
            assert!(session.finish_load(block_on(load.resolve())));
        }
        assert!(session.element(&id).unwrap().has_image_handle());
        assert!(session.undo());
        assert!(session.element(&id).unwrap().has_image_handle());
        // Loading neither records nor leaks the handle into the external form.
        assert_eq!(session.history().len(), 2);
        assert!(seen.borrow().iter().all(|t| !t.elements[0].has_image_handle()));
    }

    #[test]
    fn test_load_after_delete_is_discarded() {
        init();
        let resolver = MemoryResolver::new();
        resolver.insert("logo.png", png_header()).unwrap();
        let mut session = EditorSession::from_elements(EditorConfig::default(), Vec::new());
        let id = session.add_image("logo.png", 100.0, 100.0);
        let pending = session.load_image(&id, &resolver).unwrap();

        assert!(session.delete_selected());
        let load = block_on(pending.resolve());
        assert!(!session.finish_load(load));
        assert!(session.element(&id).is_none());
        // The earlier snapshot still holding the element is left alone too.
        assert!(session.undo());
        assert!(!session.element(&id).unwrap().has_image_handle());
    }

    #[test]
    fn test_load_for_replaced_src_is_discarded() {
        init();
        let resolver = MemoryResolver::new();
        resolver.insert("old.png", png_header()).unwrap();
        let mut session = EditorSession::from_elements(EditorConfig::default(), Vec::new());
        let id = session.add_image("old.png", 100.0, 100.0);
        let pending = session.load_image(&id, &resolver).unwrap();

        session.apply_property(&id, "src", &json!("new.png")).unwrap();
        assert!(!session.finish_load(block_on(pending.resolve())));
        assert!(!session.element(&id).unwrap().has_image_handle());
    }

    #[test]
    fn test_failed_load_leaves_element_undrawable() {
        init();
        let mut session = EditorSession::from_elements(EditorConfig::default(), Vec::new());
        let id = session.add_image("broken.png", 100.0, 100.0);
        let attached = session.attach_image(
            &id,
            "broken.png",
            Err(ImageError::NotFound("broken.png".to_string())),
        );
        assert!(!attached);
        assert!(!session.element(&id).unwrap().has_image_handle());
        assert_eq!(session.history().len(), 2);
    }

    #[test]
    fn test_template_uses_config_size_for_new_designs() {
        let config = EditorConfig {
            canvas_width: 640.0,
            canvas_height: 480.0,
            ..EditorConfig::default()
        };
        let session = EditorSession::from_elements(config, Vec::new());
        let template = session.template();
        assert!((template.width - 640.0).abs() < f64::EPSILON);
        assert!((template.height - 480.0).abs() < f64::EPSILON);
    }
}
