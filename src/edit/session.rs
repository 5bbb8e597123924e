//! Interactive editing state for a single path.
//!
//! The session is the only writer of its path. Pointer input arrives already
//! converted to path coordinates; the session answers with insertion
//! candidates and keeps a revision counter the host compares against to know
//! when the drawing is stale. While hidden, pointer-driven edits are ignored.

use serde::{Deserialize, Serialize};

use super::handles::{HandleId, HandleTable};
use crate::geom::{AnchorId, PiecewisePath, Point2};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum EditError {
    #[error("point ({x}, {y}) is not finite")]
    NonFinitePoint { x: f64, y: f64 },
    #[error("anchor {0} is not part of the path")]
    UnknownAnchor(AnchorId),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditOptions {
    /// Maximum pointer distance from the path for an insertion candidate.
    pub snap_radius: f64,
    /// Minimum distance between a candidate and both ends of its segment.
    pub endpoint_clearance: f64,
}

impl Default for EditOptions {
    fn default() -> Self {
        Self {
            snap_radius: 20.0,
            endpoint_clearance: 20.0,
        }
    }
}

/// A place on the path where a click would insert a new anchor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InsertionCandidate {
    pub proj: Point2,
    pub insert_at: usize,
    pub mdist: f64,
}

#[derive(Debug, Clone)]
pub struct EditSession {
    path: PiecewisePath,
    handles: HandleTable,
    options: EditOptions,
    visible: bool,
    revision: u64,
    hover: Option<InsertionCandidate>,
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new(EditOptions::default())
    }
}

fn check_finite(point: Point2) -> Result<(), EditError> {
    if point.is_finite() {
        Ok(())
    } else {
        Err(EditError::NonFinitePoint {
            x: point.x,
            y: point.y,
        })
    }
}

impl EditSession {
    #[must_use]
    pub fn new(options: EditOptions) -> Self {
        Self {
            path: PiecewisePath::new(),
            handles: HandleTable::new(),
            options,
            visible: true,
            revision: 0,
            hover: None,
        }
    }

    /// Starts a session over an initial list of anchors.
    pub fn with_points<I>(points: I, options: EditOptions) -> Result<Self, EditError>
    where
        I: IntoIterator<Item = Point2>,
    {
        let mut session = Self::new(options);
        for point in points {
            session.add_point(point, None)?;
        }
        Ok(session)
    }

    #[must_use]
    pub fn path(&self) -> &PiecewisePath {
        &self.path
    }

    #[must_use]
    pub fn handles(&self) -> &HandleTable {
        &self.handles
    }

    #[must_use]
    pub fn handle_of(&self, anchor: AnchorId) -> Option<HandleId> {
        self.handles.get(anchor)
    }

    #[must_use]
    pub fn options(&self) -> &EditOptions {
        &self.options
    }

    /// Replaces the options and drops the current hover result.
    pub fn set_options(&mut self, options: EditOptions) {
        self.options = options;
        self.hover = None;
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    #[must_use]
    pub fn last_hover(&self) -> Option<InsertionCandidate> {
        self.hover
    }

    fn touch(&mut self) {
        self.revision += 1;
        self.hover = None;
    }

    // ── pointer ─────────────────────────────────────────────────────────────

    /// Evaluates the pointer position and remembers the result for
    /// [`insert_at_hover`](Self::insert_at_hover).
    pub fn hover(&mut self, pointer: Point2) -> Option<InsertionCandidate> {
        self.hover = self.candidate_at(pointer);
        self.hover
    }

    fn candidate_at(&self, pointer: Point2) -> Option<InsertionCandidate> {
        if !self.visible || !pointer.is_finite() {
            return None;
        }
        let best = self.path.closest(pointer)?;
        if best.mdist >= self.options.snap_radius {
            return None;
        }
        let segment = &self.path.segments()[best.curve_index];
        let clearance = self.options.endpoint_clearance;
        if segment.start().distance_to(best.proj) <= clearance
            || segment.end().distance_to(best.proj) <= clearance
        {
            return None;
        }
        Some(InsertionCandidate {
            proj: best.proj,
            insert_at: best.curve_index + 1,
            mdist: best.mdist,
        })
    }

    /// Commits the last hover candidate as a new anchor.
    pub fn insert_at_hover(&mut self) -> Option<AnchorId> {
        if !self.visible {
            return None;
        }
        let candidate = self.hover.take()?;
        let id = self.insert(candidate.proj, Some(candidate.insert_at));
        log::debug!(
            "inserted anchor {id} at index {} ({:.3} from pointer)",
            candidate.insert_at,
            candidate.mdist
        );
        Some(id)
    }

    // ── anchors ─────────────────────────────────────────────────────────────

    pub fn add_point(&mut self, point: Point2, index: Option<usize>) -> Result<AnchorId, EditError> {
        check_finite(point)?;
        Ok(self.insert(point, index))
    }

    fn insert(&mut self, point: Point2, index: Option<usize>) -> AnchorId {
        let id = self.path.add_point(point, index);
        self.handles.attach(id);
        self.touch();
        id
    }

    /// Moves an anchor to follow its dragged handle. Returns `Ok(false)`
    /// while hidden.
    pub fn drag_anchor(&mut self, id: AnchorId, to: Point2) -> Result<bool, EditError> {
        check_finite(to)?;
        if !self.visible {
            return Ok(false);
        }
        if !self.path.move_point(id, to) {
            return Err(EditError::UnknownAnchor(id));
        }
        self.touch();
        Ok(true)
    }

    /// Removes an anchor and its handle. Unknown anchors and hidden sessions
    /// report `Ok(false)`.
    pub fn delete_anchor(&mut self, id: AnchorId) -> Result<bool, EditError> {
        if !self.visible {
            return Ok(false);
        }
        if self.path.delete_point(id).is_none() {
            return Ok(false);
        }
        self.handles.detach(id);
        self.touch();
        log::debug!("deleted anchor {id}, {} left", self.path.len());
        Ok(true)
    }

    /// Removes every listed anchor, as when a selection of handles is
    /// deleted at once. Returns how many were removed.
    pub fn delete_anchors(&mut self, ids: &[AnchorId]) -> Result<usize, EditError> {
        let mut deleted = 0;
        for &id in ids {
            if self.delete_anchor(id)? {
                deleted += 1;
            }
        }
        Ok(deleted)
    }

    pub fn clear(&mut self) {
        self.path.clear();
        self.handles.clear();
        self.touch();
    }

    // ── visibility ──────────────────────────────────────────────────────────

    pub fn show(&mut self) {
        if !self.visible {
            self.visible = true;
            self.revision += 1;
        }
    }

    pub fn hide(&mut self) {
        if self.visible {
            self.visible = false;
            self.touch();
        }
    }
}
