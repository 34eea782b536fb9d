use std::fmt;
use std::str::FromStr;

use slotmap::new_key_type;

use crate::foundation::error::{StrataError, StrataResult};
use crate::scene::node::{HandlerId, NodeId};

new_key_type! {
    /// Handle to a surface binding owned by a [`Scene`](crate::Scene).
    pub struct SurfaceId;
}

/// Pointer event kinds a node can listen for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum EventKind {
    /// Pointer clicked over the node.
    #[serde(rename = "click")]
    Click,
    /// Pointer clicked over the node; resolved before [`EventKind::Click`].
    #[serde(rename = "clickOver")]
    ClickOver,
}

impl EventKind {
    /// Canonical event name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::ClickOver => "clickOver",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = StrataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "click" => Ok(Self::Click),
            "clickOver" => Ok(Self::ClickOver),
            other => Err(StrataError::unknown_event(other)),
        }
    }
}

/// A `(node, handler)` pair registered on a surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Target {
    /// Node hit-tested for this entry.
    pub node: NodeId,
    /// Handler invoked when the node is hit.
    pub handler: HandlerId,
}

/// Registered targets of one event kind, plus whether they are currently in hit-test order.
#[derive(Clone, Debug, Default)]
pub(crate) struct TargetList {
    pub(crate) entries: Vec<Target>,
    pub(crate) in_order: bool,
}

impl TargetList {
    pub(crate) fn push(&mut self, target: Target) {
        self.entries.push(target);
        self.in_order = false;
    }

    fn remove_handler(&mut self, handler: HandlerId) -> bool {
        match self.entries.iter().position(|t| t.handler == handler) {
            Some(idx) => {
                self.entries.remove(idx);
                true
            }
            None => false,
        }
    }
}

/// Pointer dispatch tables of one render surface.
#[derive(Clone, Debug)]
pub struct SurfaceBinding {
    click_handling: bool,
    click: TargetList,
    click_over: TargetList,
}

impl SurfaceBinding {
    pub(crate) fn new(click_handling: bool) -> Self {
        Self {
            click_handling,
            click: TargetList::default(),
            click_over: TargetList::default(),
        }
    }

    /// Whether this surface was built with pointer dispatch.
    pub fn click_handling(&self) -> bool {
        self.click_handling
    }

    /// Registered targets of `kind`, in their current order.
    pub fn targets(&self, kind: EventKind) -> &[Target] {
        &self.list(kind).entries
    }

    /// Whether the `kind` targets are currently in hit-test order.
    pub fn is_in_order(&self, kind: EventKind) -> bool {
        self.list(kind).in_order
    }

    pub(crate) fn ensure_click_handling(&self) -> StrataResult<()> {
        if self.click_handling {
            Ok(())
        } else {
            Err(StrataError::unsupported(
                "click handling is disabled for this surface (enable it when building the view)",
            ))
        }
    }

    pub(crate) fn on(&mut self, kind: EventKind, target: Target) -> StrataResult<()> {
        self.ensure_click_handling()?;
        self.list_mut(kind).push(target);
        Ok(())
    }

    pub(crate) fn off(&mut self, kind: EventKind, handler: HandlerId) -> StrataResult<bool> {
        self.ensure_click_handling()?;
        Ok(self.list_mut(kind).remove_handler(handler))
    }

    pub(crate) fn forget_node(&mut self, node: NodeId) {
        self.click.entries.retain(|t| t.node != node);
        self.click_over.entries.retain(|t| t.node != node);
    }

    pub(crate) fn invalidate_order(&mut self) {
        self.click.in_order = false;
        self.click_over.in_order = false;
    }

    pub(crate) fn list(&self, kind: EventKind) -> &TargetList {
        match kind {
            EventKind::Click => &self.click,
            EventKind::ClickOver => &self.click_over,
        }
    }

    pub(crate) fn list_mut(&mut self, kind: EventKind) -> &mut TargetList {
        match kind {
            EventKind::Click => &mut self.click,
            EventKind::ClickOver => &mut self.click_over,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/surface/binding.rs"]
mod tests;
