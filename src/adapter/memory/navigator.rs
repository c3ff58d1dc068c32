use std::sync::{Arc, Mutex};

use super::lock;
use crate::surface::{Editor, KeyPress, ListNavigator, NavAction, NavigatorFactory, SurfaceRef};

#[derive(Debug, Default)]
struct Tally {
    created: usize,
    live: usize,
    selected: Option<usize>,
}

/// Navigator factory that counts the navigators it hands out
#[derive(Debug, Default)]
pub struct MemoryNavigators {
    tally: Arc<Mutex<Tally>>,
}

impl MemoryNavigators {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn created(&self) -> usize {
        lock(&self.tally).created
    }

    /// Navigators started and not destroyed yet
    pub fn live(&self) -> usize {
        lock(&self.tally).live
    }

    /// Selected option index of the most recent navigator
    pub fn selected(&self) -> Option<usize> {
        lock(&self.tally).selected
    }
}

impl NavigatorFactory for MemoryNavigators {
    fn create(&self, _input: &dyn Editor, surface: SurfaceRef) -> Box<dyn ListNavigator> {
        let mut tally = lock(&self.tally);
        tally.created += 1;
        tally.selected = None;
        Box::new(MemoryNavigator {
            surface,
            tally: self.tally.clone(),
            selected: None,
            running: false,
        })
    }
}

/// Wrapping option list navigation.
///
/// `ArrowDown`/`ArrowUp` move the selection, `Enter` and `Tab` commit it.
#[derive(Debug)]
pub struct MemoryNavigator {
    surface: SurfaceRef,
    tally: Arc<Mutex<Tally>>,
    selected: Option<usize>,
    running: bool,
}

impl ListNavigator for MemoryNavigator {
    fn start(&mut self) {
        if !self.running {
            self.running = true;
            lock(&self.tally).live += 1;
        }
    }

    fn destroy(&mut self) {
        if self.running {
            self.running = false;
            lock(&self.tally).live -= 1;
        }
    }

    fn navigate(&mut self, delta: isize) {
        let count = self.surface.child_count() as isize;
        if count == 0 {
            return;
        }

        let current = self.selected.map_or(-1, |i| i as isize);
        let next = (current + delta).rem_euclid(count) as usize;
        self.selected = Some(next);
        lock(&self.tally).selected = Some(next);
    }

    fn handle_key(&mut self, key: &KeyPress) -> NavAction {
        match key.key.as_str() {
            "ArrowDown" => {
                self.navigate(1);
                NavAction::Moved
            }
            "ArrowUp" => {
                self.navigate(-1);
                NavAction::Moved
            }
            "Enter" | "Tab" => self
                .selected
                .and_then(|i| self.surface.options().into_iter().nth(i))
                .map_or(NavAction::Ignored, NavAction::Commit),
            _ => NavAction::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{MemoryEditor, MemorySurface};
    use crate::surface::OptionItem;

    fn navigator(options: &[&str]) -> (MemoryNavigators, Box<dyn ListNavigator>) {
        let factory = MemoryNavigators::new();
        let surface = MemorySurface::new(options.iter().map(|o| OptionItem::new(*o)).collect());
        let navigator = factory.create(&MemoryEditor::rich(), surface);
        (factory, navigator)
    }

    #[test]
    fn test_selection_wraps() {
        let (factory, mut nav) = navigator(&["a", "b", "c"]);
        nav.navigate(1);
        assert_eq!(factory.selected(), Some(0));
        nav.navigate(-1);
        assert_eq!(factory.selected(), Some(2));
        nav.navigate(1);
        assert_eq!(factory.selected(), Some(0));
    }

    #[test]
    fn test_up_from_nothing_selects_last() {
        let (factory, mut nav) = navigator(&["a", "b"]);
        assert_eq!(nav.handle_key(&KeyPress::new("ArrowUp")), NavAction::Moved);
        assert_eq!(factory.selected(), Some(1));
    }

    #[test]
    fn test_commit_keys() {
        let (_factory, mut nav) = navigator(&["a", "b"]);
        assert_eq!(nav.handle_key(&KeyPress::new("Enter")), NavAction::Ignored);

        nav.navigate(2);
        assert_eq!(
            nav.handle_key(&KeyPress::new("Tab")),
            NavAction::Commit(OptionItem::new("b"))
        );
    }

    #[test]
    fn test_empty_surface_has_no_selection() {
        let (factory, mut nav) = navigator(&[]);
        nav.navigate(1);
        assert_eq!(factory.selected(), None);
    }

    #[test]
    fn test_live_count() {
        let (factory, mut nav) = navigator(&["a"]);
        nav.start();
        nav.start();
        assert_eq!(factory.live(), 1);
        nav.destroy();
        nav.destroy();
        assert_eq!(factory.live(), 0);
        assert_eq!(factory.created(), 1);
    }
}
