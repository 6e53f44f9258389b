use crate::frame::FrameId;
use crate::frame::FrameTree;

use winsys::geometry::Region;
use winsys::screen::Screen;
use winsys::window::Window as XWindow;

/// One connected output and the partition covering it.
pub struct Monitor {
    screen: Screen,
    tree: FrameTree,
}

impl Monitor {
    pub fn new(screen: Screen) -> Self {
        let tree = FrameTree::new(screen.full_region());

        Self {
            screen,
            tree,
        }
    }

    #[inline]
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    #[inline]
    pub fn region(&self) -> Region {
        self.screen.full_region()
    }

    #[inline]
    pub fn tree(&self) -> &FrameTree {
        &self.tree
    }

    #[inline]
    pub fn tree_mut(&mut self) -> &mut FrameTree {
        &mut self.tree
    }
}

/// The set of live monitors. The monitor at index zero is the primary;
/// windows of a disconnected output migrate there.
pub struct Monitors {
    monitors: Vec<Monitor>,
    focused: usize,
}

impl Monitors {
    pub fn new(outputs: Vec<Screen>) -> Self {
        let monitors = outputs.into_iter().map(Monitor::new).collect::<Vec<_>>();

        debug_assert!(!monitors.is_empty(), "no connected outputs");

        Self {
            monitors,
            focused: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Monitor> {
        self.monitors.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Monitor> {
        self.monitors.iter_mut()
    }

    #[inline]
    pub fn focused_monitor(&self) -> &Monitor {
        &self.monitors[self.focused]
    }

    #[inline]
    pub fn focused_monitor_mut(&mut self) -> &mut Monitor {
        &mut self.monitors[self.focused]
    }

    #[inline]
    pub fn primary_mut(&mut self) -> &mut Monitor {
        &mut self.monitors[0]
    }

    pub fn monitor_containing(
        &self,
        id: FrameId,
    ) -> Option<&Monitor> {
        self.monitors.iter().find(|monitor| monitor.tree.contains(id))
    }

    pub fn monitor_containing_mut(
        &mut self,
        id: FrameId,
    ) -> Option<&mut Monitor> {
        self.monitors
            .iter_mut()
            .find(|monitor| monitor.tree.contains(id))
    }

    /// Move the focus to the monitor holding @id.
    pub fn focus_monitor_of_frame(
        &mut self,
        id: FrameId,
    ) {
        if let Some(index) = self
            .monitors
            .iter()
            .position(|monitor| monitor.tree.contains(id))
        {
            self.focused = index;
        }
    }

    /// Fold a fresh output query into the current set. Outputs are
    /// matched by id: retained monitors keep their tree and pick up the
    /// new rectangle, new outputs start with an empty tree, and the
    /// windows of vanished outputs are handed back for rehoming.
    pub fn merge(
        &mut self,
        outputs: Vec<Screen>,
    ) -> Vec<XWindow> {
        if outputs.is_empty() {
            return Vec::new();
        }

        let focused_output = self.monitors[self.focused].screen.output();
        let mut displaced = Vec::new();
        let mut merged = Vec::with_capacity(outputs.len());
        let mut old = std::mem::take(&mut self.monitors);

        for (number, screen) in outputs.into_iter().enumerate() {
            let mut screen = screen;
            screen.set_number(number);

            match old
                .iter()
                .position(|monitor| monitor.screen.output() == screen.output())
            {
                Some(index) => {
                    let mut monitor = old.swap_remove(index);
                    monitor.screen = screen;
                    monitor.tree.resize_root(screen.full_region());
                    merged.push(monitor);
                },
                None => merged.push(Monitor::new(screen)),
            }
        }

        for monitor in old {
            let mut windows = monitor.tree.leaves();
            windows.retain(|id| monitor.tree.frame(*id).unwrap().window().is_some());

            displaced.extend(
                windows
                    .into_iter()
                    .map(|id| monitor.tree.frame(id).unwrap().window().unwrap()),
            );
        }

        self.monitors = merged;
        self.focused = self
            .monitors
            .iter()
            .position(|monitor| monitor.screen.output() == focused_output)
            .unwrap_or(0);

        displaced
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::frame::SplitAxis;

    fn output(
        number: usize,
        id: u32,
        region: Region,
    ) -> Screen {
        Screen::new(region, number, id)
    }

    #[test]
    fn merge_retains_trees_of_surviving_outputs() {
        let mut monitors = Monitors::new(vec![
            output(0, 10, Region::new(0, 0, 1920, 1080)),
            output(1, 11, Region::new(1920, 0, 1280, 1024)),
        ]);

        monitors.focused_monitor_mut().tree_mut().split(SplitAxis::Vertical);
        assert_eq!(monitors.focused_monitor().tree().leaves().len(), 2);

        let displaced = monitors.merge(vec![
            output(0, 10, Region::new(0, 0, 2560, 1440)),
            output(1, 11, Region::new(2560, 0, 1280, 1024)),
        ]);

        assert!(displaced.is_empty());
        assert_eq!(monitors.len(), 2);
        assert_eq!(monitors.focused_monitor().tree().leaves().len(), 2);
        assert_eq!(
            monitors.focused_monitor().region(),
            Region::new(0, 0, 2560, 1440)
        );
    }

    #[test]
    fn merge_displaces_windows_of_vanished_outputs() {
        let mut monitors = Monitors::new(vec![
            output(0, 10, Region::new(0, 0, 1920, 1080)),
            output(1, 11, Region::new(1920, 0, 1280, 1024)),
        ]);

        {
            let tree = monitors.monitors[1].tree_mut();
            let leaf = tree.focused_leaf();
            tree.assign(leaf, 0xdead);
        }

        let displaced = monitors.merge(vec![output(0, 10, Region::new(0, 0, 1920, 1080))]);

        assert_eq!(displaced, vec![0xdead]);
        assert_eq!(monitors.len(), 1);
    }

    #[test]
    fn merge_with_no_outputs_changes_nothing() {
        let mut monitors = Monitors::new(vec![output(0, 10, Region::new(0, 0, 1920, 1080))]);

        let displaced = monitors.merge(Vec::new());

        assert!(displaced.is_empty());
        assert_eq!(monitors.len(), 1);
    }
}
