//! Fetch-and-rebuild cycle and the store holding the latest view model

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;
use tracing::{debug, info, instrument, warn};

use crate::builder::ViewModelBuilder;
use crate::geocode::{Geocoder, validate_query};
use crate::models::{Location, UnitSystem, ViewModel};
use crate::weather::WeatherSource;
use crate::Result;

/// Inputs that trigger a new fetch cycle when any of them changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inputs {
    pub city: String,
    pub country: String,
    pub unit: UnitSystem,
}

impl Inputs {
    pub fn new<S: Into<String>>(city: S, country: S, unit: UnitSystem) -> Self {
        Self {
            city: city.into(),
            country: country.into(),
            unit,
        }
    }
}

/// Geocoder plus forecast source, wired into one refresh operation
#[derive(Clone)]
pub struct Dashboard {
    geocoder: Arc<dyn Geocoder>,
    weather: Arc<dyn WeatherSource>,
}

impl Dashboard {
    pub fn new(geocoder: Arc<dyn Geocoder>, weather: Arc<dyn WeatherSource>) -> Self {
        Self { geocoder, weather }
    }

    /// Runs one cycle. Every failure collapses into [`ViewModel::Failed`].
    #[instrument(skip(self), fields(city = %inputs.city, country = %inputs.country, unit = %inputs.unit))]
    pub async fn refresh(&self, inputs: &Inputs) -> ViewModel {
        match self.try_refresh(inputs).await {
            Ok(view_model) => view_model,
            Err(e) => {
                warn!("Refresh failed: {}", e);
                ViewModel::failed(e.user_message())
            }
        }
    }

    async fn try_refresh(&self, inputs: &Inputs) -> Result<ViewModel> {
        validate_query(&inputs.city, &inputs.country)?;

        let place = self.geocoder.resolve(&inputs.city, &inputs.country).await?;
        let location = Location::new(place, inputs.unit);
        let raw = self
            .weather
            .fetch(location.latitude, location.longitude, inputs.unit)
            .await?;

        Ok(ViewModelBuilder::build(location, &raw, inputs.unit))
    }
}

/// Marks one started cycle; newer tickets supersede older ones
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    /// A newer cycle started before this one finished
    Discarded,
}

/// The applied view model and the inputs it was built for
#[derive(Debug, Clone)]
struct Applied {
    inputs: Option<Inputs>,
    view_model: Arc<ViewModel>,
}

/// Holds one client's current view model with last-input-wins replacement
#[derive(Debug)]
pub struct ViewModelStore {
    generation: AtomicU64,
    current: RwLock<Applied>,
}

impl Default for ViewModelStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewModelStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            generation: AtomicU64::new(0),
            current: RwLock::new(Applied {
                inputs: None,
                view_model: Arc::new(ViewModel::default()),
            }),
        }
    }

    /// Starts a cycle, invalidating every ticket handed out before
    pub fn begin(&self) -> Ticket {
        Ticket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Replaces the view model unless a newer cycle has started
    pub async fn apply(&self, ticket: Ticket, inputs: &Inputs, view_model: Arc<ViewModel>) -> ApplyOutcome {
        let mut current = self.current.write().await;
        if ticket.0 != self.generation.load(Ordering::SeqCst) {
            debug!("Discarding stale view model from cycle {}", ticket.0);
            return ApplyOutcome::Discarded;
        }
        *current = Applied {
            inputs: Some(inputs.clone()),
            view_model,
        };
        ApplyOutcome::Applied
    }

    pub async fn current(&self) -> Arc<ViewModel> {
        Arc::clone(&self.current.read().await.view_model)
    }

    /// Inputs of the applied view model, `None` before the first cycle lands
    pub async fn current_inputs(&self) -> Option<Inputs> {
        self.current.read().await.inputs.clone()
    }

    /// Full cycle: begin, refresh, apply.
    ///
    /// A superseded cycle serves the newest applied view model when that one
    /// was built for the same inputs, and its own result otherwise. The
    /// returned view model always belongs to `inputs`.
    pub async fn refresh(&self, dashboard: &Dashboard, inputs: &Inputs) -> Arc<ViewModel> {
        let ticket = self.begin();
        let view_model = Arc::new(dashboard.refresh(inputs).await);

        match self.apply(ticket, inputs, Arc::clone(&view_model)).await {
            ApplyOutcome::Applied => {
                info!("Applied view model for {}, {}", inputs.city, inputs.country);
                view_model
            }
            ApplyOutcome::Discarded => {
                let current = self.current.read().await;
                if current.inputs.as_ref() == Some(inputs) {
                    Arc::clone(&current.view_model)
                } else {
                    view_model
                }
            }
        }
    }
}

/// Upper bound on tracked clients; the oldest session is dropped first
pub const MAX_SESSIONS: usize = 1024;

/// One [`ViewModelStore`] per client session, so last-input-wins never
/// crosses clients.
#[derive(Debug)]
pub struct SessionStores {
    capacity: usize,
    sessions: Mutex<Sessions>,
}

#[derive(Debug, Default)]
struct Sessions {
    stores: HashMap<Uuid, Arc<ViewModelStore>>,
    order: VecDeque<Uuid>,
}

impl Default for SessionStores {
    fn default() -> Self {
        Self::new(MAX_SESSIONS)
    }
}

impl SessionStores {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            sessions: Mutex::new(Sessions::default()),
        }
    }

    /// Store for `id`, created on first use
    pub async fn store(&self, id: Uuid) -> Arc<ViewModelStore> {
        let mut sessions = self.sessions.lock().await;
        if let Some(store) = sessions.stores.get(&id) {
            return Arc::clone(store);
        }

        while sessions.order.len() >= self.capacity {
            if let Some(oldest) = sessions.order.pop_front() {
                debug!(session = %oldest, "Evicting session store");
                sessions.stores.remove(&oldest);
            }
        }

        let store = Arc::new(ViewModelStore::new());
        sessions.stores.insert(id, Arc::clone(&store));
        sessions.order.push_back(id);
        store
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.stores.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
