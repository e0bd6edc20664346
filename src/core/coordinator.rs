use crate::models::{BoundingBox, GeoPoint, Property, RouteResult};

/// What the map is currently centered or framed on.
///
/// Exactly one variant is active at a time; all mutation flows through the
/// named transitions on [`ViewCoordinator`].
#[derive(Debug, Clone, PartialEq)]
pub enum Focus {
    None,
    Property(Property),
    Route(RouteResult),
    Pin(GeoPoint),
}

/// Command issued to the rendering surface.
///
/// The engine decides what the map should show; drawing markers, polylines
/// and viewport moves is the surface's job.
#[derive(Debug, Clone, PartialEq)]
pub enum MapCommand {
    /// Recenter the viewport; `zoom: None` keeps the current zoom level
    Recenter { center: GeoPoint, zoom: Option<u8> },
    /// Fit the viewport to a bounding rectangle
    FitBounds(BoundingBox),
}

/// Coordinator behavior knobs
#[derive(Debug, Clone, Copy)]
pub struct CoordinatorConfig {
    /// Zoom level used when recentering on a selected property
    pub property_zoom: u8,
    /// Whether dragging an already-placed pin re-emits a recenter.
    /// First placement always recenters.
    pub recenter_on_pin_update: bool,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            property_zoom: 16,
            recenter_on_pin_update: false,
        }
    }
}

/// Owns the single map-focus value and arbitrates competing focus requests
///
/// # Transition rules
/// - Every event is legal from every state; there is no terminal state.
/// - The one priority rule: a pending or active route outranks a plain
///   property recenter, so the map never snaps away from a route the user
///   just requested.
/// - A failed route request ends in the focus that was active immediately
///   before the request, never in an undefined state.
#[derive(Debug, Clone)]
pub struct ViewCoordinator {
    focus: Focus,
    pending_route: Option<(GeoPoint, GeoPoint)>,
    prior_focus: Option<Focus>,
    config: CoordinatorConfig,
}

impl ViewCoordinator {
    pub fn new(config: CoordinatorConfig) -> Self {
        Self {
            focus: Focus::None,
            pending_route: None,
            prior_focus: None,
            config,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(CoordinatorConfig::default())
    }

    /// The currently active focus
    pub fn focus(&self) -> &Focus {
        &self.focus
    }

    /// Endpoints of a route request still waiting on the routing service
    pub fn pending_route(&self) -> Option<(GeoPoint, GeoPoint)> {
        self.pending_route
    }

    /// True while a route is pending or displayed
    pub fn route_active(&self) -> bool {
        self.pending_route.is_some() || matches!(self.focus, Focus::Route(_))
    }

    /// Focus on a property and recenter on its location.
    ///
    /// Ignored while a route is pending or active; the route remains
    /// authoritative and no command is emitted.
    pub fn select_property(&mut self, property: Property) -> Option<MapCommand> {
        if self.route_active() {
            tracing::debug!(id = property.id, "property selection ignored, route active");
            return None;
        }

        let center = property.location;
        self.focus = Focus::Property(property);
        Some(MapCommand::Recenter {
            center,
            zoom: Some(self.config.property_zoom),
        })
    }

    /// Mark a route request as pending, snapshotting the focus to restore
    /// if the request fails
    pub fn begin_route(&mut self, start: GeoPoint, end: GeoPoint) {
        if self.pending_route.is_none() {
            self.prior_focus = Some(self.focus.clone());
        }
        self.pending_route = Some((start, end));
    }

    /// Apply a completed route and frame the map to its bounds
    pub fn complete_route(&mut self, result: RouteResult) -> MapCommand {
        self.pending_route = None;
        self.prior_focus = None;
        let bounds = result.bounds;
        self.focus = Focus::Route(result);
        MapCommand::FitBounds(bounds)
    }

    /// Abandon the pending route, reverting to the focus that was active
    /// immediately before the request
    pub fn fail_route(&mut self) {
        self.pending_route = None;
        if let Some(prior) = self.prior_focus.take() {
            self.focus = prior;
        }
    }

    /// Drop or drag a manual pin.
    ///
    /// Recenters (at the current zoom) on first placement; updates recenter
    /// only when configured.
    pub fn drop_pin(&mut self, point: GeoPoint) -> Option<MapCommand> {
        let is_update = matches!(self.focus, Focus::Pin(_));
        self.focus = Focus::Pin(point);

        if !is_update || self.config.recenter_on_pin_update {
            Some(MapCommand::Recenter {
                center: point,
                zoom: None,
            })
        } else {
            None
        }
    }

    /// Drop all focus from any state
    pub fn clear(&mut self) {
        self.focus = Focus::None;
        self.pending_route = None;
        self.prior_focus = None;
    }
}
