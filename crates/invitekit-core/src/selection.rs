//! Single-element selection and hit testing.

use crate::elements::{Element, ElementId};
use kurbo::Point;

/// Find the top-most element under a canvas point.
///
/// Later elements are drawn on top, so the list is searched back to front.
pub fn element_at(elements: &[Element], point: Point, tolerance: f64) -> Option<&Element> {
    elements.iter().rev().find(|el| el.hit_test(point, tolerance))
}

/// IDs of every element under a canvas point, front to back.
pub fn elements_at(elements: &[Element], point: Point, tolerance: f64) -> Vec<ElementId> {
    elements
        .iter()
        .rev()
        .filter(|el| el.hit_test(point, tolerance))
        .map(|el| el.id.clone())
        .collect()
}

/// The currently selected element, if any.
///
/// Never refers to an id missing from the list it was checked against.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    selected: Option<ElementId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<&ElementId> {
        self.selected.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_none()
    }

    pub fn is_selected(&self, id: &ElementId) -> bool {
        self.selected.as_ref() == Some(id)
    }

    /// Select `id`, or clear with `None`.
    ///
    /// An id that is not present in `elements` is ignored and the previous
    /// selection is kept. Returns true if the selection changed.
    pub fn select(&mut self, id: Option<&ElementId>, elements: &[Element]) -> bool {
        let next = match id {
            None => None,
            Some(id) if elements.iter().any(|el| &el.id == id) => Some(id.clone()),
            Some(id) => {
                log::debug!("Ignoring selection of missing element {}", id);
                return false;
            }
        };
        let changed = next != self.selected;
        self.selected = next;
        changed
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    /// Drop the selection if its element is no longer in `elements`.
    /// Returns true if the selection was cleared.
    pub fn retain(&mut self, elements: &[Element]) -> bool {
        match &self.selected {
            Some(id) if !elements.iter().any(|el| &el.id == id) => {
                self.selected = None;
                true
            }
            _ => false,
        }
    }

    /// The selected element within `elements`.
    pub fn element<'a>(&self, elements: &'a [Element]) -> Option<&'a Element> {
        let id = self.selected.as_ref()?;
        elements.iter().find(|el| &el.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::create_default;
    use serde_json::{Value, json};

    fn element(kind: &str, overrides: Value) -> Element {
        let Value::Object(map) = overrides else {
            unreachable!()
        };
        create_default(kind, &map).unwrap()
    }

    fn sample() -> Vec<Element> {
        vec![
            element("rect", json!({"id": "back", "x": 0, "y": 0, "width": 100, "height": 100})),
            element("rect", json!({"id": "front", "x": 50, "y": 50, "width": 100, "height": 100})),
        ]
    }

    #[test]
    fn test_select_existing() {
        let elements = sample();
        let mut selection = Selection::new();
        assert!(selection.select(Some(&ElementId::from("back")), &elements));
        assert!(selection.is_selected(&ElementId::from("back")));
        assert_eq!(selection.element(&elements).unwrap().id.as_str(), "back");
    }

    #[test]
    fn test_select_missing_keeps_previous() {
        let elements = sample();
        let mut selection = Selection::new();
        selection.select(Some(&ElementId::from("front")), &elements);
        assert!(!selection.select(Some(&ElementId::from("ghost")), &elements));
        assert_eq!(selection.get(), Some(&ElementId::from("front")));
    }

    #[test]
    fn test_select_none_clears() {
        let elements = sample();
        let mut selection = Selection::new();
        selection.select(Some(&ElementId::from("front")), &elements);
        assert!(selection.select(None, &elements));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_retain_clears_removed() {
        let mut elements = sample();
        let mut selection = Selection::new();
        selection.select(Some(&ElementId::from("front")), &elements);
        elements.pop();
        assert!(selection.retain(&elements));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_element_at_prefers_front() {
        let elements = sample();
        let hit = element_at(&elements, Point::new(75.0, 75.0), 0.0).unwrap();
        assert_eq!(hit.id.as_str(), "front");
        let hit = element_at(&elements, Point::new(25.0, 25.0), 0.0).unwrap();
        assert_eq!(hit.id.as_str(), "back");
        assert!(element_at(&elements, Point::new(500.0, 500.0), 0.0).is_none());

        let ids = elements_at(&elements, Point::new(75.0, 75.0), 0.0);
        assert_eq!(ids, vec![ElementId::from("front"), ElementId::from("back")]);
    }
}
