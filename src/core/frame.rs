use crate::common::MIN_FRAME_DIM;

use winsys::geometry::Edge;
use winsys::geometry::Padding;
use winsys::geometry::Region;
use winsys::window::Window as XWindow;

use std::collections::HashMap;
use std::sync::atomic;

static INSTANCE_COUNT: atomic::AtomicU32 = atomic::AtomicU32::new(1);
fn next_id() -> FrameId {
    INSTANCE_COUNT.fetch_add(1, atomic::Ordering::Relaxed)
}

pub type FrameId = u32;

/// The orientation of the cut line a split makes. A vertical split puts
/// its children side by side, a horizontal split stacks them.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SplitAxis {
    Horizontal,
    Vertical,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FrameError {
    TooSmall,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FrameContent {
    Leaf {
        window: Option<XWindow>,
    },
    Split {
        axis: SplitAxis,
        ratio: f64,
        first: FrameId,
        second: FrameId,
    },
}

#[derive(Debug, Clone)]
pub struct Frame {
    id: FrameId,
    parent: Option<FrameId>,
    region: Region,
    content: FrameContent,
}

impl Frame {
    fn new_leaf(
        parent: Option<FrameId>,
        region: Region,
        window: Option<XWindow>,
    ) -> Self {
        Self {
            id: next_id(),
            parent,
            region,
            content: FrameContent::Leaf {
                window,
            },
        }
    }

    #[inline]
    pub fn id(&self) -> FrameId {
        self.id
    }

    #[inline]
    pub fn parent(&self) -> Option<FrameId> {
        self.parent
    }

    #[inline]
    pub fn region(&self) -> Region {
        self.region
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self.content, FrameContent::Leaf { .. })
    }

    #[inline]
    pub fn window(&self) -> Option<XWindow> {
        match self.content {
            FrameContent::Leaf {
                window,
            } => window,
            _ => None,
        }
    }
}

/// The binary partition of one monitor. Every node lives in an id-keyed
/// arena; leaves hold at most one window.
pub struct FrameTree {
    frames: HashMap<FrameId, Frame>,
    region: Region,
    root: FrameId,
    focus: FrameId,
}

impl FrameTree {
    pub fn new(region: Region) -> Self {
        let root = Frame::new_leaf(None, region, None);
        let root_id = root.id;

        let mut frames = HashMap::new();
        frames.insert(root_id, root);

        Self {
            frames,
            region,
            root: root_id,
            focus: root_id,
        }
    }

    #[inline]
    pub fn root(&self) -> FrameId {
        self.root
    }

    #[inline]
    pub fn focus(&self) -> FrameId {
        self.focus
    }

    #[inline]
    pub fn frame(
        &self,
        id: FrameId,
    ) -> Option<&Frame> {
        self.frames.get(&id)
    }

    #[inline]
    pub fn contains(
        &self,
        id: FrameId,
    ) -> bool {
        self.frames.contains_key(&id)
    }

    pub fn set_focus(
        &mut self,
        id: FrameId,
    ) {
        if self.frames.contains_key(&id) {
            self.focus = id;
        }
    }

    pub fn focus_parent(&mut self) {
        if let Some(parent) = self.frames[&self.focus].parent {
            self.focus = parent;
        }
    }

    pub fn focus_child(&mut self) {
        if let FrameContent::Split {
            first, ..
        } = self.frames[&self.focus].content
        {
            self.focus = first;
        }
    }

    pub fn focus_root(&mut self) {
        self.focus = self.root;
    }

    /// The first leaf below the focus, the focus itself when it is one.
    pub fn focused_leaf(&self) -> FrameId {
        self.first_leaf_below(self.focus)
    }

    fn first_leaf_below(
        &self,
        id: FrameId,
    ) -> FrameId {
        let mut id = id;

        while let FrameContent::Split {
            first, ..
        } = self.frames[&id].content
        {
            id = first;
        }

        id
    }

    /// All leaves in pre-order.
    pub fn leaves(&self) -> Vec<FrameId> {
        let mut leaves = Vec::new();
        self.collect_leaves(self.root, &mut leaves);

        leaves
    }

    fn collect_leaves(
        &self,
        id: FrameId,
        leaves: &mut Vec<FrameId>,
    ) {
        match self.frames[&id].content {
            FrameContent::Leaf {
                ..
            } => leaves.push(id),
            FrameContent::Split {
                first,
                second,
                ..
            } => {
                self.collect_leaves(first, leaves);
                self.collect_leaves(second, leaves);
            },
        }
    }

    /// The first empty leaf discovered in pre-order.
    pub fn first_empty_leaf(&self) -> Option<FrameId> {
        self.leaves()
            .into_iter()
            .find(|id| self.frames[id].window().is_none())
    }

    pub fn find_window(
        &self,
        window: XWindow,
    ) -> Option<FrameId> {
        self.leaves()
            .into_iter()
            .find(|id| self.frames[id].window() == Some(window))
    }

    /// Put @window into @id, handing back a displaced occupant.
    pub fn assign(
        &mut self,
        id: FrameId,
        window: XWindow,
    ) -> Option<XWindow> {
        debug_assert!(
            self.find_window(window).is_none(),
            "window assigned to two frames"
        );

        let frame = self.frames.get_mut(&id)?;

        match frame.content {
            FrameContent::Leaf {
                window: ref mut occupant,
            } => occupant.replace(window),
            _ => None,
        }
    }

    pub fn vacate(
        &mut self,
        window: XWindow,
    ) -> Option<FrameId> {
        let id = self.find_window(window)?;

        if let Some(frame) = self.frames.get_mut(&id) {
            frame.content = FrameContent::Leaf {
                window: None,
            };
        }

        Some(id)
    }

    /// Split the focused leaf. The original window moves into the first
    /// child, which also takes the focus.
    pub fn split(
        &mut self,
        axis: SplitAxis,
    ) -> (FrameId, FrameId) {
        let id = self.focused_leaf();
        let (region, window) = {
            let frame = &self.frames[&id];
            (frame.region, frame.window())
        };

        let first = Frame::new_leaf(Some(id), region, window);
        let second = Frame::new_leaf(Some(id), region, None);
        let (first_id, second_id) = (first.id, second.id);

        self.frames.insert(first_id, first);
        self.frames.insert(second_id, second);

        let frame = self.frames.get_mut(&id).unwrap();
        frame.content = FrameContent::Split {
            axis,
            ratio: 0.5,
            first: first_id,
            second: second_id,
        };

        self.focus = first_id;
        self.arrange();

        (first_id, second_id)
    }

    /// Remove the focused frame. The sibling takes the removed frame's
    /// place in the grandparent; the windows of the removed subtree are
    /// handed back for hiding. With @auto_remove_void, the collapse
    /// cascades through empty leaves.
    pub fn remove(
        &mut self,
        auto_remove_void: bool,
    ) -> Vec<XWindow> {
        let mut evicted = Vec::new();
        let mut id = self.focus;

        loop {
            if id == self.root {
                // the root cannot go away, it only empties out
                self.collect_windows(id, &mut evicted);
                self.discard_children(id);

                let root = self.frames.get_mut(&id).unwrap();
                root.content = FrameContent::Leaf {
                    window: None,
                };

                self.focus = id;
                break;
            }

            let parent = self.frames[&id].parent.unwrap();
            let sibling = match self.frames[&parent].content {
                FrameContent::Split {
                    first,
                    second,
                    ..
                } => {
                    if first == id {
                        second
                    } else {
                        first
                    }
                },
                _ => unreachable!("leaf with a child"),
            };

            self.collect_windows(id, &mut evicted);
            self.discard_children(id);
            self.frames.remove(&id);

            // the sibling replaces the parent
            let grandparent = self.frames[&parent].parent;
            self.frames.remove(&parent);

            let sibling_frame = self.frames.get_mut(&sibling).unwrap();
            sibling_frame.parent = grandparent;

            match grandparent {
                None => self.root = sibling,
                Some(grandparent) => {
                    if let FrameContent::Split {
                        ref mut first,
                        ref mut second,
                        ..
                    } = self.frames.get_mut(&grandparent).unwrap().content
                    {
                        if *first == parent {
                            *first = sibling;
                        } else if *second == parent {
                            *second = sibling;
                        }
                    }
                },
            }

            self.focus = self.first_leaf_below(sibling);

            let sibling_is_void = self.frames[&sibling].is_leaf()
                && self.frames[&sibling].window().is_none();

            if auto_remove_void && sibling_is_void && sibling != self.root {
                id = sibling;
                continue;
            }

            break;
        }

        self.arrange();

        evicted
    }

    fn collect_windows(
        &self,
        id: FrameId,
        windows: &mut Vec<XWindow>,
    ) {
        match self.frames[&id].content {
            FrameContent::Leaf {
                window,
            } => {
                if let Some(window) = window {
                    windows.push(window);
                }
            },
            FrameContent::Split {
                first,
                second,
                ..
            } => {
                self.collect_windows(first, windows);
                self.collect_windows(second, windows);
            },
        }
    }

    fn discard_children(
        &mut self,
        id: FrameId,
    ) {
        if let FrameContent::Split {
            first,
            second,
            ..
        } = self.frames[&id].content.clone()
        {
            self.discard_children(first);
            self.discard_children(second);
            self.frames.remove(&first);
            self.frames.remove(&second);
        }
    }

    fn is_below(
        &self,
        id: FrameId,
        ancestor: FrameId,
    ) -> bool {
        let mut id = Some(id);

        while let Some(current) = id {
            if current == ancestor {
                return true;
            }

            id = self.frames[&current].parent;
        }

        false
    }

    /// The nearest leaf whose center lies in the half-plane towards
    /// @edge, by Manhattan distance, ties broken by the axis-aligned
    /// distance and then by tree position.
    pub fn directional_target(
        &self,
        edge: Edge,
    ) -> Option<FrameId> {
        let center = self.frames[&self.focus].region.center();

        self.leaves()
            .into_iter()
            .enumerate()
            .filter(|&(_, id)| !self.is_below(id, self.focus))
            .filter(|&(_, id)| {
                let candidate = self.frames[&id].region.center();

                match edge {
                    Edge::Left => candidate.x < center.x,
                    Edge::Right => candidate.x > center.x,
                    Edge::Top => candidate.y < center.y,
                    Edge::Bottom => candidate.y > center.y,
                }
            })
            .min_by_key(|&(index, id)| {
                let candidate = self.frames[&id].region.center();
                let axis_dist = if edge.is_horizontal() {
                    (candidate.x - center.x).abs()
                } else {
                    (candidate.y - center.y).abs()
                };

                (center.manhattan_dist(candidate), axis_dist, index)
            })
            .map(|(_, id)| id)
    }

    pub fn focus_direction(
        &mut self,
        edge: Edge,
    ) -> Option<FrameId> {
        let target = self.directional_target(edge)?;
        self.focus = target;

        Some(target)
    }

    /// Swap the windows held by the focused leaf and the directional
    /// target; the frame geometries stay put.
    pub fn exchange(
        &mut self,
        edge: Edge,
    ) -> Option<(FrameId, FrameId)> {
        let target = self.directional_target(edge)?;
        let source = self.focused_leaf();
        let target = self.first_leaf_below(target);

        let source_window = self.frames[&source].window();
        let target_window = self.frames[&target].window();

        self.frames.get_mut(&source).unwrap().content = FrameContent::Leaf {
            window: target_window,
        };
        self.frames.get_mut(&target).unwrap().content = FrameContent::Leaf {
            window: source_window,
        };

        self.focus = target;

        Some((source, target))
    }

    /// Move the four edges of the focused frame by pixel deltas,
    /// positive values growing the frame. Edges on the monitor boundary
    /// have no neighbor and stay put. The whole operation is rejected
    /// when any leaf would be squeezed below the minimum.
    pub fn resize_by(
        &mut self,
        quad: [i32; 4],
    ) -> Result<(), FrameError> {
        let [left, top, right, bottom] = quad;
        let mut frames = self.frames.clone();

        for (edge, delta) in [
            (Edge::Left, left),
            (Edge::Top, top),
            (Edge::Right, right),
            (Edge::Bottom, bottom),
        ] {
            if delta == 0 {
                continue;
            }

            self.adjust_edge(&mut frames, edge, delta)?;
        }

        Self::arrange_frames(&mut frames, self.root, self.region);

        let too_small = frames.values().any(|frame| {
            frame.is_leaf()
                && (frame.region.dim.w < MIN_FRAME_DIM.w
                    || frame.region.dim.h < MIN_FRAME_DIM.h)
        });

        if too_small {
            return Err(FrameError::TooSmall);
        }

        self.frames = frames;

        Ok(())
    }

    /// Shift the boundary that forms @edge of the focused frame. The
    /// owning split is the nearest ancestor whose cut line touches that
    /// edge.
    fn adjust_edge(
        &self,
        frames: &mut HashMap<FrameId, Frame>,
        edge: Edge,
        delta: i32,
    ) -> Result<(), FrameError> {
        let axis = if edge.is_horizontal() {
            SplitAxis::Vertical
        } else {
            SplitAxis::Horizontal
        };

        // the cut line is the right/bottom edge of the first child
        let from_first = edge == Edge::Right || edge == Edge::Bottom;

        let mut child = self.focus;
        let mut owner = None;

        while let Some(parent) = frames[&child].parent {
            if let FrameContent::Split {
                axis: split_axis,
                first,
                ..
            } = frames[&parent].content
            {
                if split_axis == axis && (first == child) == from_first {
                    owner = Some(parent);
                    break;
                }
            }

            child = parent;
        }

        let owner = match owner {
            Some(owner) => owner,
            None => return Ok(()),
        };

        let region = frames[&owner].region;

        if let FrameContent::Split {
            axis,
            ref mut ratio,
            ..
        } = frames.get_mut(&owner).unwrap().content
        {
            let (total, min_extent) = match axis {
                SplitAxis::Vertical => (region.dim.w, MIN_FRAME_DIM.w),
                SplitAxis::Horizontal => (region.dim.h, MIN_FRAME_DIM.h),
            };

            let first_extent = (total as f64 * *ratio).round() as i32;
            let first_extent = if from_first {
                first_extent + delta
            } else {
                first_extent - delta
            };

            if first_extent < min_extent || total - first_extent < min_extent {
                return Err(FrameError::TooSmall);
            }

            *ratio = first_extent as f64 / total as f64;
        }

        Ok(())
    }

    /// Recompute every rectangle from the root down.
    pub fn arrange(&mut self) {
        Self::arrange_frames(&mut self.frames, self.root, self.region);
    }

    /// Re-root the partition in a new monitor rectangle.
    pub fn resize_root(
        &mut self,
        region: Region,
    ) {
        self.region = region;
        self.arrange();
    }

    fn arrange_frames(
        frames: &mut HashMap<FrameId, Frame>,
        id: FrameId,
        region: Region,
    ) {
        frames.get_mut(&id).unwrap().region = region;

        if let FrameContent::Split {
            axis,
            ratio,
            first,
            second,
        } = frames[&id].content
        {
            let (first_region, second_region) = match axis {
                SplitAxis::Vertical => {
                    let width = ((region.dim.w as f64 * ratio).round() as i32)
                        .max(1)
                        .min(std::cmp::max(1, region.dim.w - 1));

                    region.split_at_width(width)
                },
                SplitAxis::Horizontal => {
                    let height = ((region.dim.h as f64 * ratio).round() as i32)
                        .max(1)
                        .min(std::cmp::max(1, region.dim.h - 1));

                    region.split_at_height(height)
                },
            };

            Self::arrange_frames(frames, first, first_region);
            Self::arrange_frames(frames, second, second_region);
        }
    }

    /// The rectangle a window occupies inside @id, the inner gaps
    /// applied.
    pub fn window_region(
        &self,
        id: FrameId,
        inner: [i32; 4],
    ) -> Region {
        self.frames[&id]
            .region
            .with_padding(Padding::new(inner[0], inner[2], inner[1], inner[3]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monitor() -> Region {
        Region::new(0, 0, 1920, 1080)
    }

    fn assert_exact_tiling(tree: &FrameTree) {
        let root_region = tree.frames[&tree.root].region;
        let leaves = tree.leaves();

        let area: i64 = leaves
            .iter()
            .map(|id| {
                let region = tree.frames[id].region;
                region.dim.w as i64 * region.dim.h as i64
            })
            .sum();

        assert_eq!(
            area,
            root_region.dim.w as i64 * root_region.dim.h as i64,
            "leaf areas do not sum to the root area"
        );

        for (i, &a) in leaves.iter().enumerate() {
            let ra = tree.frames[&a].region;

            assert!(ra.pos.x >= root_region.pos.x);
            assert!(ra.pos.y >= root_region.pos.y);
            assert!(ra.pos.x + ra.dim.w <= root_region.pos.x + root_region.dim.w);
            assert!(ra.pos.y + ra.dim.h <= root_region.pos.y + root_region.dim.h);

            for &b in leaves.iter().skip(i + 1) {
                let rb = tree.frames[&b].region;
                let overlap = ra.pos.x < rb.pos.x + rb.dim.w
                    && rb.pos.x < ra.pos.x + ra.dim.w
                    && ra.pos.y < rb.pos.y + rb.dim.h
                    && rb.pos.y < ra.pos.y + ra.dim.h;

                assert!(!overlap, "leaves {} and {} overlap", a, b);
            }
        }
    }

    #[test]
    fn a_fresh_tree_is_one_leaf_covering_the_monitor() {
        let tree = FrameTree::new(monitor());

        assert_eq!(tree.leaves().len(), 1);
        assert_eq!(tree.frames[&tree.root()].region, monitor());
    }

    #[test]
    fn vertical_split_puts_the_children_side_by_side() {
        let mut tree = FrameTree::new(monitor());
        tree.assign(tree.focused_leaf(), 0x100001);

        let (first, second) = tree.split(SplitAxis::Vertical);

        assert_eq!(tree.frames[&first].region, Region::new(0, 0, 960, 1080));
        assert_eq!(tree.frames[&second].region, Region::new(960, 0, 960, 1080));
        assert_eq!(tree.frames[&first].window(), Some(0x100001));
        assert_eq!(tree.frames[&second].window(), None);
        assert_eq!(tree.focus(), first);
        assert_exact_tiling(&tree);
    }

    #[test]
    fn horizontal_split_stacks_the_children() {
        let mut tree = FrameTree::new(monitor());

        let (first, second) = tree.split(SplitAxis::Horizontal);

        assert_eq!(tree.frames[&first].region, Region::new(0, 0, 1920, 540));
        assert_eq!(tree.frames[&second].region, Region::new(0, 540, 1920, 540));
        assert_exact_tiling(&tree);
    }

    #[test]
    fn resize_by_moves_the_shared_edge() {
        let mut tree = FrameTree::new(monitor());
        tree.assign(tree.focused_leaf(), 0x1);

        let (first, second) = tree.split(SplitAxis::Vertical);
        tree.assign(second, 0x2);

        tree.set_focus(first);
        tree.resize_by([0, 0, -100, 0]).unwrap();

        assert_eq!(tree.frames[&first].region, Region::new(0, 0, 860, 1080));
        assert_eq!(tree.frames[&second].region, Region::new(860, 0, 1060, 1080));
        assert_exact_tiling(&tree);
    }

    #[test]
    fn resize_against_the_monitor_boundary_is_inert() {
        let mut tree = FrameTree::new(monitor());
        let (first, _) = tree.split(SplitAxis::Vertical);

        tree.set_focus(first);
        tree.resize_by([50, 0, 0, 0]).unwrap();

        assert_eq!(tree.frames[&first].region, Region::new(0, 0, 960, 1080));
    }

    #[test]
    fn degenerate_resize_is_rejected_wholesale() {
        let mut tree = FrameTree::new(monitor());
        let (first, second) = tree.split(SplitAxis::Vertical);

        tree.set_focus(first);
        let result = tree.resize_by([0, 0, 1000, 0]);

        assert_eq!(result, Err(FrameError::TooSmall));
        // nothing moved
        assert_eq!(tree.frames[&first].region, Region::new(0, 0, 960, 1080));
        assert_eq!(tree.frames[&second].region, Region::new(960, 0, 960, 1080));
    }

    #[test]
    fn exchange_swaps_windows_but_not_geometry() {
        let mut tree = FrameTree::new(monitor());
        tree.assign(tree.focused_leaf(), 0x1);

        let (first, second) = tree.split(SplitAxis::Vertical);
        tree.assign(second, 0x2);

        tree.set_focus(first);
        tree.exchange(Edge::Right).unwrap();

        assert_eq!(tree.frames[&first].window(), Some(0x2));
        assert_eq!(tree.frames[&second].window(), Some(0x1));
        assert_eq!(tree.frames[&first].region, Region::new(0, 0, 960, 1080));
        assert_eq!(tree.frames[&second].region, Region::new(960, 0, 960, 1080));
        assert_eq!(tree.focus(), second);
    }

    #[test]
    fn removing_a_leaf_collapses_the_parent() {
        let mut tree = FrameTree::new(monitor());
        tree.assign(tree.focused_leaf(), 0x1);

        let (first, second) = tree.split(SplitAxis::Vertical);
        tree.assign(second, 0x2);

        tree.set_focus(first);
        let evicted = tree.remove(true);

        assert_eq!(evicted, vec![0x1]);
        assert_eq!(tree.leaves().len(), 1);
        assert_eq!(tree.root(), second);
        assert_eq!(tree.frames[&second].region, monitor());
        assert_eq!(tree.frames[&second].window(), Some(0x2));
        assert_exact_tiling(&tree);
    }

    #[test]
    fn removal_cascades_through_empty_siblings() {
        let mut tree = FrameTree::new(monitor());

        // left | (top / bottom), only bottom occupied
        let (left, right) = tree.split(SplitAxis::Vertical);
        tree.set_focus(right);
        let (_top, bottom) = tree.split(SplitAxis::Horizontal);
        tree.assign(left, 0x1);

        tree.set_focus(bottom);
        let evicted = tree.remove(true);

        // the empty top leaf cascades away as well
        assert_eq!(evicted, Vec::<XWindow>::new());
        assert_eq!(tree.leaves(), vec![left]);
        assert_eq!(tree.frames[&left].region, monitor());
        assert_exact_tiling(&tree);
    }

    #[test]
    fn removing_the_root_only_empties_it() {
        let mut tree = FrameTree::new(monitor());
        tree.assign(tree.focused_leaf(), 0x1);

        let evicted = tree.remove(false);

        assert_eq!(evicted, vec![0x1]);
        assert_eq!(tree.leaves().len(), 1);
        assert_eq!(tree.frames[&tree.root()].window(), None);
    }

    #[test]
    fn first_empty_leaf_is_found_in_pre_order() {
        let mut tree = FrameTree::new(monitor());
        tree.assign(tree.focused_leaf(), 0x1);

        let (_, second) = tree.split(SplitAxis::Vertical);
        assert_eq!(tree.first_empty_leaf(), Some(second));

        tree.assign(second, 0x2);
        assert_eq!(tree.first_empty_leaf(), None);
    }

    #[test]
    fn directional_focus_is_involutive_on_symmetric_splits() {
        let mut tree = FrameTree::new(monitor());
        let (first, second) = tree.split(SplitAxis::Vertical);

        tree.set_focus(first);
        assert_eq!(tree.focus_direction(Edge::Right), Some(second));
        assert_eq!(tree.focus_direction(Edge::Left), Some(first));
        assert_eq!(tree.focus(), first);
    }

    #[test]
    fn directional_focus_prefers_the_aligned_leaf() {
        let mut tree = FrameTree::new(monitor());

        // (top-left / bottom-left) | right
        let (left, right) = tree.split(SplitAxis::Vertical);
        tree.set_focus(left);
        let (top_left, bottom_left) = tree.split(SplitAxis::Horizontal);

        tree.set_focus(right);
        let target = tree.directional_target(Edge::Left);

        // both left leaves qualify; the tie breaks towards the first in
        // pre-order
        assert_eq!(target, Some(top_left));

        tree.set_focus(bottom_left);
        assert_eq!(tree.directional_target(Edge::Right), Some(right));
    }

    #[test]
    fn arbitrary_operation_sequences_keep_the_tiling_exact() {
        let mut tree = FrameTree::new(monitor());
        let mut seed = 0x2545f491u64;
        let mut window = 0x1000u32;

        for _ in 0..200 {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let choice = (seed >> 33) % 6;

            let leaves = tree.leaves();
            let pick = leaves[(seed >> 17) as usize % leaves.len()];
            tree.set_focus(pick);

            match choice {
                0 => {
                    tree.split(SplitAxis::Vertical);
                },
                1 => {
                    tree.split(SplitAxis::Horizontal);
                },
                2 => {
                    window += 1;
                    if tree.find_window(window).is_none()
                        && tree.frames[&pick].window().is_none()
                    {
                        tree.assign(pick, window);
                    }
                },
                3 => {
                    tree.remove((seed & 1) == 0);
                },
                4 => {
                    drop(tree.resize_by([
                        (seed % 60) as i32 - 30,
                        0,
                        0,
                        (seed % 40) as i32 - 20,
                    ]));
                },
                _ => {
                    drop(tree.focus_direction(Edge::Right));
                    drop(tree.exchange(Edge::Bottom));
                },
            }

            assert_exact_tiling(&tree);
        }
    }
}
