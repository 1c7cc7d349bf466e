//! Render-state of an object's visual hierarchy.
//!
//! A live obstacle may be made of any number of parts (a hoop is a backboard, a rim and a net),
//! some of which draw something and some of which are pure grouping nodes. Shadow duplicates
//! clone this hierarchy and then switch every renderable part off.

#[derive(Clone, Debug, PartialEq)]
pub struct VisualNode {
    pub name: String,
    /// `None` for grouping nodes that have nothing to draw.
    pub renderer: Option<RenderState>,
    pub children: Vec<VisualNode>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderState {
    pub enabled: bool,
}

impl VisualNode {
    /// A node with an enabled renderer.
    pub fn mesh(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            renderer: Some(RenderState { enabled: true }),
            children: Vec::new(),
        }
    }

    /// A node with nothing to draw.
    pub fn group(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            renderer: None,
            children: Vec::new(),
        }
    }

    pub fn with_child(mut self, child: VisualNode) -> Self {
        self.children.push(child);
        self
    }

    /// Number of renderable parts in this hierarchy whose renderer is enabled.
    pub fn visible_parts(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if node.renderer.is_some_and(|r| r.enabled) {
                count += 1;
            }
            stack.extend(node.children.iter());
        }
        count
    }
}

/// Set the render state of `root` and every descendant.
///
/// Iterative so arbitrarily deep hierarchies cannot overflow the stack.
pub fn set_render_state(root: &mut VisualNode, enabled: bool) {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if let Some(renderer) = node.renderer.as_mut() {
            renderer.enabled = enabled;
        }
        stack.extend(node.children.iter_mut());
    }
}
