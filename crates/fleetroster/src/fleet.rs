//! The fleet roster model.
//!
//! [`FleetStore`] owns the authoritative vehicle list, enforces field
//! invariants, and writes the whole list back to its key-value backend after
//! every mutation. Mutations are all-or-nothing: when the write fails the
//! in-memory list is restored to its prior state before the error is returned.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::error::{Error, Result};
use crate::filter::{Filter, VehicleFilter};
use crate::storage::KeyValueStore;
use crate::vehicle::{
    require_text, Availability, IdGenerator, Vehicle, DEFAULT_IMAGE, FIELD_CATEGORY,
    FIELD_DRIVER_NAME, FIELD_REG_NO,
};

/// Storage key the roster is kept under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "fleets_v1";

/// A change that was applied to the roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FleetEvent {
    /// A vehicle was added at the front of the roster.
    Added(Vehicle),
    /// A vehicle's driver changed.
    DriverUpdated {
        /// The vehicle id.
        id: String,
        /// The stored (trimmed) driver name.
        driver_name: String,
    },
    /// A vehicle's availability flipped.
    AvailabilityToggled {
        /// The vehicle id.
        id: String,
        /// The new availability.
        availability: Availability,
    },
    /// A vehicle was removed.
    Deleted {
        /// The vehicle id.
        id: String,
    },
}

type Listener = Box<dyn FnMut(&FleetEvent)>;

/// Counts over the current roster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FleetStats {
    /// Total number of vehicles.
    pub total: usize,
    /// Vehicles marked available.
    pub available: usize,
    /// Vehicles marked unavailable.
    pub unavailable: usize,
    /// Vehicle count per category.
    pub by_category: BTreeMap<String, usize>,
}

/// The in-memory roster plus its persistence.
pub struct FleetStore<S: KeyValueStore> {
    backend: S,
    key: String,
    default_image: String,
    vehicles: Vec<Vehicle>,
    ids: IdGenerator,
    load_error: Option<Error>,
    listeners: Vec<Listener>,
}

impl<S: KeyValueStore> std::fmt::Debug for FleetStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FleetStore")
            .field("key", &self.key)
            .field("vehicles", &self.vehicles.len())
            .field("load_error", &self.load_error)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl<S: KeyValueStore> FleetStore<S> {
    /// Restore the roster stored under [`DEFAULT_STORAGE_KEY`].
    ///
    /// # Errors
    ///
    /// Returns an error only if the backend itself cannot be read. Corrupt
    /// stored data is not an error; see [`FleetStore::load_with_key`].
    pub fn load(backend: S) -> Result<Self> {
        Self::load_with_key(backend, DEFAULT_STORAGE_KEY)
    }

    /// Restore the roster stored under `key`.
    ///
    /// A missing or blank value yields an empty roster. A value that does not
    /// decode as a vehicle list is logged, kept available through
    /// [`FleetStore::load_error`], and replaced by an empty roster. The
    /// stored value is left untouched until the next mutation.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    pub fn load_with_key(backend: S, key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        let raw = backend.get(&key)?;

        let (vehicles, load_error) = match raw.as_deref().map(str::trim) {
            None | Some("") => {
                debug!("No roster stored under {}, starting empty", key);
                (Vec::new(), None)
            }
            Some(raw) => match serde_json::from_str::<Vec<Vehicle>>(raw) {
                Ok(vehicles) => {
                    info!("Loaded {} vehicles from {}", vehicles.len(), key);
                    warn_on_incomplete(&vehicles);
                    (vehicles, None)
                }
                Err(source) => {
                    error!("Could not parse roster stored under {}: {}", key, source);
                    (Vec::new(), Some(Error::StorageParse { key: key.clone(), source }))
                }
            },
        };

        Ok(Self {
            backend,
            key,
            default_image: DEFAULT_IMAGE.to_string(),
            vehicles,
            ids: IdGenerator::new(),
            load_error,
            listeners: Vec::new(),
        })
    }

    /// Use `image` for vehicles added from now on.
    #[must_use]
    pub fn with_default_image(mut self, image: impl Into<String>) -> Self {
        self.default_image = image.into();
        self
    }

    /// The decode failure recovered from at load time, if any.
    #[must_use]
    pub fn load_error(&self) -> Option<&Error> {
        self.load_error.as_ref()
    }

    /// The storage key the roster is written under.
    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.key
    }

    /// The key-value backend.
    #[must_use]
    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Register a callback invoked after every applied mutation.
    pub fn subscribe(&mut self, listener: impl FnMut(&FleetEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Add a vehicle at the front of the roster.
    ///
    /// `reg_no` and `driver_name` are trimmed before they are stored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] naming `regNo`, `category` or
    /// `driverName` (checked in that order) if that field is blank, or a
    /// storage error if the roster could not be written. Nothing changes on
    /// failure.
    pub fn add(
        &mut self,
        reg_no: &str,
        category: &str,
        driver_name: &str,
        availability: Availability,
    ) -> Result<Vehicle> {
        let reg_no = require_text(FIELD_REG_NO, reg_no)?;
        let category = require_text(FIELD_CATEGORY, category)?;
        let driver_name = require_text(FIELD_DRIVER_NAME, driver_name)?;

        let vehicles = &self.vehicles;
        let id = self
            .ids
            .next_id(|candidate| vehicles.iter().any(|v| v.id == candidate));

        let vehicle = Vehicle {
            id,
            reg_no,
            category,
            driver_name,
            availability,
            image: self.default_image.clone(),
        };

        self.vehicles.insert(0, vehicle.clone());
        if let Err(e) = self.persist() {
            self.vehicles.remove(0);
            return Err(e);
        }

        info!(
            "Added vehicle {} ({}, {})",
            vehicle.id, vehicle.reg_no, vehicle.category
        );
        self.emit(&FleetEvent::Added(vehicle.clone()));
        Ok(vehicle)
    }

    /// Vehicles passing both filters, most recently added first.
    #[must_use]
    pub fn list(
        &self,
        category: &Filter<String>,
        availability: &Filter<Availability>,
    ) -> Vec<&Vehicle> {
        self.vehicles
            .iter()
            .filter(|v| category.matches(&v.category) && availability.matches(&v.availability))
            .collect()
    }

    /// Vehicles passing a combined filter, most recently added first.
    #[must_use]
    pub fn list_matching(&self, filter: &VehicleFilter) -> Vec<&Vehicle> {
        self.list(&filter.category, &filter.availability)
    }

    /// Every vehicle, most recently added first.
    #[must_use]
    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    /// Look up a vehicle by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.id == id)
    }

    /// Number of vehicles in the roster.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    /// Check if the roster is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    /// Replace a vehicle's driver.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown id, [`Error::Validation`]
    /// if the trimmed name is empty, or a storage error if the roster could
    /// not be written. Nothing changes on failure.
    pub fn update_driver(&mut self, id: &str, new_name: &str) -> Result<&Vehicle> {
        let index = self.index_of(id)?;
        let name = require_text(FIELD_DRIVER_NAME, new_name)?;

        let previous = std::mem::replace(&mut self.vehicles[index].driver_name, name.clone());
        if let Err(e) = self.persist() {
            self.vehicles[index].driver_name = previous;
            return Err(e);
        }

        info!("Updated driver of vehicle {} to {}", id, name);
        self.emit(&FleetEvent::DriverUpdated {
            id: id.to_string(),
            driver_name: name,
        });
        Ok(&self.vehicles[index])
    }

    /// Flip a vehicle between available and unavailable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown id, or a storage error if
    /// the roster could not be written. Nothing changes on failure.
    pub fn toggle_availability(&mut self, id: &str) -> Result<&Vehicle> {
        let index = self.index_of(id)?;

        let availability = self.vehicles[index].availability.toggled();
        self.vehicles[index].availability = availability;
        if let Err(e) = self.persist() {
            self.vehicles[index].availability = availability.toggled();
            return Err(e);
        }

        info!("Vehicle {} is now {}", id, availability);
        self.emit(&FleetEvent::AvailabilityToggled {
            id: id.to_string(),
            availability,
        });
        Ok(&self.vehicles[index])
    }

    /// Remove a vehicle.
    ///
    /// Every record carrying `id` is removed, so a roster restored with a
    /// repeated id is cleared of it in one call. Returns `true` if anything
    /// was removed. An unknown id is a no-op and leaves storage untouched.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the roster could not be written, in which
    /// case the roster is left as it was.
    pub fn delete(&mut self, id: &str) -> Result<bool> {
        if !self.vehicles.iter().any(|v| v.id == id) {
            warn!("Delete ignored, no vehicle with id {}", id);
            return Ok(false);
        }

        let previous = self.vehicles.clone();
        self.vehicles.retain(|v| v.id != id);
        if let Err(e) = self.persist() {
            self.vehicles = previous;
            return Err(e);
        }

        let removed = previous.len() - self.vehicles.len();
        if removed > 1 {
            warn!("Deleted {} vehicles sharing id {}", removed, id);
        } else {
            info!("Deleted vehicle {}", id);
        }
        self.emit(&FleetEvent::Deleted { id: id.to_string() });
        Ok(true)
    }

    /// Counts over the current roster.
    #[must_use]
    pub fn stats(&self) -> FleetStats {
        let mut stats = FleetStats {
            total: self.vehicles.len(),
            ..FleetStats::default()
        };
        for vehicle in &self.vehicles {
            if vehicle.is_available() {
                stats.available += 1;
            } else {
                stats.unavailable += 1;
            }
            *stats
                .by_category
                .entry(vehicle.category.clone())
                .or_default() += 1;
        }
        stats
    }

    fn index_of(&self, id: &str) -> Result<usize> {
        self.vehicles
            .iter()
            .position(|v| v.id == id)
            .ok_or_else(|| Error::not_found(id))
    }

    fn persist(&mut self) -> Result<()> {
        let json = serde_json::to_string(&self.vehicles)?;
        self.backend.set(&self.key, &json)?;
        debug!("Persisted {} vehicles under {}", self.vehicles.len(), self.key);
        Ok(())
    }

    fn emit(&mut self, event: &FleetEvent) {
        for listener in &mut self.listeners {
            listener(event);
        }
    }
}

/// Stored records are not re-validated, but blank text fields are reported.
fn warn_on_incomplete(vehicles: &[Vehicle]) {
    for vehicle in vehicles {
        for (field, value) in [
            (FIELD_REG_NO, &vehicle.reg_no),
            (FIELD_CATEGORY, &vehicle.category),
            (FIELD_DRIVER_NAME, &vehicle.driver_name),
        ] {
            if value.trim().is_empty() {
                warn!("Stored vehicle {} has a blank {}", vehicle.id, field);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::storage::{MemoryStore, SqliteStore};

    fn create_test_store() -> FleetStore<MemoryStore> {
        FleetStore::load(MemoryStore::new()).expect("failed to load empty store")
    }

    fn add_sample(store: &mut FleetStore<MemoryStore>, reg_no: &str, category: &str) -> Vehicle {
        store
            .add(reg_no, category, "Asha", Availability::Available)
            .unwrap()
    }

    fn all(store: &FleetStore<MemoryStore>) -> Vec<&Vehicle> {
        store.list(&Filter::All, &Filter::All)
    }

    /// Backend whose writes can be switched off.
    #[derive(Debug, Default)]
    struct FlakyStore {
        inner: MemoryStore,
        fail_writes: bool,
    }

    impl KeyValueStore for FlakyStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<()> {
            if self.fail_writes {
                return Err(Error::Io(std::io::Error::other("disk full")));
            }
            self.inner.set(key, value)
        }

    }

    #[test]
    fn test_load_missing_key_is_empty() {
        let store = create_test_store();
        assert!(store.is_empty());
        assert!(store.load_error().is_none());
        assert_eq!(store.storage_key(), DEFAULT_STORAGE_KEY);
    }

    #[test]
    fn test_load_blank_value_is_empty() {
        let store = FleetStore::load(MemoryStore::with_entry(DEFAULT_STORAGE_KEY, "  ")).unwrap();
        assert!(store.is_empty());
        assert!(store.load_error().is_none());
    }

    #[test]
    fn test_load_corrupt_value_falls_back_to_empty() {
        let backend = MemoryStore::with_entry(DEFAULT_STORAGE_KEY, "{not json");
        let store = FleetStore::load(backend).unwrap();

        assert!(store.is_empty());
        assert!(matches!(
            store.load_error(),
            Some(Error::StorageParse { key, .. }) if key == DEFAULT_STORAGE_KEY
        ));
        // The corrupt value stays until the next write.
        assert_eq!(
            store.backend().get(DEFAULT_STORAGE_KEY).unwrap().as_deref(),
            Some("{not json")
        );
    }

    #[test]
    fn test_load_wrong_shape_falls_back_to_empty() {
        for raw in ["null", r#"{"id":"1"}"#, r#"[{"id":"1","regNo":"X"}]"#] {
            let store = FleetStore::load(MemoryStore::with_entry(DEFAULT_STORAGE_KEY, raw)).unwrap();
            assert!(store.is_empty(), "expected empty roster for {raw}");
            assert!(store.load_error().is_some());
        }
    }

    #[test]
    fn test_corrupt_value_overwritten_by_next_add() {
        let backend = MemoryStore::with_entry(DEFAULT_STORAGE_KEY, "garbage");
        let mut store = FleetStore::load(backend).unwrap();
        store
            .add("KA01", "SUV", "Asha", Availability::Available)
            .unwrap();

        let raw = store.backend().get(DEFAULT_STORAGE_KEY).unwrap().unwrap();
        let decoded: Vec<Vehicle> = serde_json::from_str(&raw).unwrap();
        assert_eq!(decoded.len(), 1);
    }

    #[test]
    fn test_add_inserts_at_front_and_persists() {
        let mut store = create_test_store();
        let vehicle = store
            .add("KA01AB1234", "SUV", "Asha", Availability::Available)
            .unwrap();

        let listed = all(&store);
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0], &vehicle);
        assert_eq!(vehicle.image, DEFAULT_IMAGE);

        let raw = store.backend().get(DEFAULT_STORAGE_KEY).unwrap().unwrap();
        let decoded: Vec<Vehicle> = serde_json::from_str(&raw).unwrap();
        assert_eq!(decoded, vec![vehicle]);
    }

    #[test]
    fn test_add_trims_text_fields() {
        let mut store = create_test_store();
        let vehicle = store
            .add("  KA01  ", "Sedan", "  Asha ", Availability::Unavailable)
            .unwrap();
        assert_eq!(vehicle.reg_no, "KA01");
        assert_eq!(vehicle.driver_name, "Asha");
    }

    #[test]
    fn test_add_rejects_blank_fields() {
        let mut store = create_test_store();
        add_sample(&mut store, "KA01", "SUV");

        let cases = [
            ("", "SUV", "Asha", FIELD_REG_NO),
            ("KA02", "", "Asha", FIELD_CATEGORY),
            ("KA02", "SUV", "   ", FIELD_DRIVER_NAME),
            ("", "", "", FIELD_REG_NO),
        ];
        for (reg_no, category, driver, field) in cases {
            let err = store
                .add(reg_no, category, driver, Availability::Available)
                .unwrap_err();
            assert!(err.is_validation());
            assert_eq!(err.invalid_field(), Some(field));
            assert_eq!(store.len(), 1);
        }
    }

    #[test]
    fn test_add_order_is_most_recent_first() {
        let mut store = create_test_store();
        let a = add_sample(&mut store, "A", "SUV");
        let b = add_sample(&mut store, "B", "SUV");

        let listed = all(&store);
        assert_eq!(listed, vec![&b, &a]);
    }

    #[test]
    fn test_add_assigns_unique_ids() {
        let mut store = create_test_store();
        for i in 0..50 {
            add_sample(&mut store, &format!("R{i}"), "Truck");
        }
        let mut ids: Vec<&str> = store.vehicles().iter().map(|v| v.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn test_add_avoids_ids_already_stored() {
        let mut store = create_test_store();
        let first = add_sample(&mut store, "A", "SUV");

        let raw = store.backend().get(DEFAULT_STORAGE_KEY).unwrap().unwrap();
        let mut reloaded = FleetStore::load(MemoryStore::with_entry(DEFAULT_STORAGE_KEY, raw)).unwrap();
        let second = reloaded
            .add("B", "SUV", "Ravi", Availability::Available)
            .unwrap();
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_list_scenario_by_category() {
        let mut store = create_test_store();
        let vehicle = store
            .add("KA01AB1234", "SUV", "Asha", Availability::Available)
            .unwrap();

        let suvs = store.list(&Filter::Only("SUV".to_string()), &Filter::All);
        assert_eq!(suvs, vec![&vehicle]);

        let sedans = store.list(&Filter::Only("Sedan".to_string()), &Filter::All);
        assert!(sedans.is_empty());
    }

    #[test]
    fn test_list_combines_filters() {
        let mut store = create_test_store();
        let a = store
            .add("A", "Truck", "Asha", Availability::Available)
            .unwrap();
        let b = store
            .add("B", "Truck", "Ravi", Availability::Unavailable)
            .unwrap();
        store
            .add("C", "SUV", "Mei", Availability::Unavailable)
            .unwrap();

        let trucks_out = store.list(
            &Filter::Only("Truck".to_string()),
            &Filter::Only(Availability::Unavailable),
        );
        assert_eq!(trucks_out, vec![&b]);

        let available = store.list(&Filter::All, &Filter::Only(Availability::Available));
        assert_eq!(available, vec![&a]);
    }

    #[test]
    fn test_list_matching_uses_both_filters() {
        let mut store = create_test_store();
        add_sample(&mut store, "A", "SUV");
        let mut filter = VehicleFilter::new(
            Filter::Only("SUV".to_string()),
            Filter::Only(Availability::Unavailable),
        );
        assert!(store.list_matching(&filter).is_empty());

        filter.clear();
        assert_eq!(store.list_matching(&filter).len(), 1);
    }

    #[test]
    fn test_update_driver() {
        let mut store = create_test_store();
        let vehicle = add_sample(&mut store, "A", "SUV");

        let updated = store.update_driver(&vehicle.id, "  Ravi ").unwrap();
        assert_eq!(updated.driver_name, "Ravi");

        let reloaded = FleetStore::load(store.backend().clone()).unwrap();
        assert_eq!(reloaded.get(&vehicle.id).unwrap().driver_name, "Ravi");
    }

    #[test]
    fn test_update_driver_is_idempotent() {
        let mut store = create_test_store();
        let vehicle = add_sample(&mut store, "A", "SUV");

        store.update_driver(&vehicle.id, "Ravi").unwrap();
        let once = store.backend().clone();
        store.update_driver(&vehicle.id, "Ravi").unwrap();
        assert_eq!(store.backend(), &once);
    }

    #[test]
    fn test_update_driver_rejects_blank_name() {
        let mut store = create_test_store();
        let vehicle = add_sample(&mut store, "A", "SUV");

        let err = store.update_driver(&vehicle.id, "   ").unwrap_err();
        assert!(err.is_validation());
        assert_eq!(store.get(&vehicle.id).unwrap().driver_name, "Asha");
    }

    #[test]
    fn test_update_driver_unknown_id() {
        let mut store = create_test_store();
        let err = store.update_driver("missing", "Ravi").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_toggle_availability_is_involution() {
        let mut store = create_test_store();
        let vehicle = add_sample(&mut store, "A", "SUV");

        let once = store.toggle_availability(&vehicle.id).unwrap().availability;
        assert_eq!(once, Availability::Unavailable);
        let twice = store.toggle_availability(&vehicle.id).unwrap().availability;
        assert_eq!(twice, vehicle.availability);
    }

    #[test]
    fn test_toggle_availability_unknown_id() {
        let mut store = create_test_store();
        assert!(store.toggle_availability("missing").unwrap_err().is_not_found());
    }

    #[test]
    fn test_delete_twice_is_noop() {
        let mut store = create_test_store();
        let keep = add_sample(&mut store, "A", "SUV");
        let gone = add_sample(&mut store, "B", "SUV");

        assert!(store.delete(&gone.id).unwrap());
        let after_first = store.backend().clone();
        assert_eq!(all(&store), vec![&keep]);

        assert!(!store.delete(&gone.id).unwrap());
        assert_eq!(all(&store), vec![&keep]);
        assert_eq!(store.backend(), &after_first);
    }

    #[test]
    fn test_delete_removes_every_record_sharing_an_id() {
        let raw = r#"[
            {"id":"1","regNo":"A","category":"SUV","driverName":"Asha","availability":"Available"},
            {"id":"2","regNo":"B","category":"SUV","driverName":"Ravi","availability":"Available"},
            {"id":"1","regNo":"C","category":"Truck","driverName":"Mei","availability":"Unavailable"}
        ]"#;
        let mut store = FleetStore::load(MemoryStore::with_entry(DEFAULT_STORAGE_KEY, raw)).unwrap();
        assert_eq!(store.len(), 3);

        let events = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&events);
        store.subscribe(move |_| *sink.borrow_mut() += 1);

        assert!(store.delete("1").unwrap());
        assert_eq!(store.len(), 1);
        assert!(store.get("1").is_none());
        let after_first = store.backend().clone();

        assert!(!store.delete("1").unwrap());
        assert_eq!(store.len(), 1);
        assert_eq!(store.backend(), &after_first);
        assert_eq!(*events.borrow(), 1);
    }

    #[test]
    fn test_load_keeps_records_with_blank_text() {
        let raw = r#"[{"id":"1","regNo":"","category":"SUV","driverName":" ","availability":"Available"}]"#;
        let store = FleetStore::load(MemoryStore::with_entry(DEFAULT_STORAGE_KEY, raw)).unwrap();

        assert_eq!(store.len(), 1);
        assert!(store.load_error().is_none());
        warn_on_incomplete(store.vehicles());
    }

    #[test]
    fn test_persist_then_load_roundtrip() {
        let mut store = create_test_store();
        add_sample(&mut store, "A", "SUV");
        let b = add_sample(&mut store, "B", "Truck");
        store.toggle_availability(&b.id).unwrap();
        store.update_driver(&b.id, "Ravi").unwrap();

        let reloaded = FleetStore::load(store.backend().clone()).unwrap();
        assert_eq!(reloaded.vehicles(), store.vehicles());
    }

    #[test]
    fn test_roundtrip_through_sqlite() {
        let mut store = FleetStore::load(SqliteStore::open_in_memory().unwrap()).unwrap();
        store
            .add("KA01AB1234", "SUV", "Asha", Availability::Available)
            .unwrap();
        let expected = store.vehicles().to_vec();

        let raw = store.backend().get(DEFAULT_STORAGE_KEY).unwrap().unwrap();
        let reloaded = FleetStore::load(MemoryStore::with_entry(DEFAULT_STORAGE_KEY, raw)).unwrap();
        assert_eq!(reloaded.vehicles(), expected.as_slice());
    }

    #[test]
    fn test_custom_key_and_image() {
        let mut store = FleetStore::load_with_key(MemoryStore::new(), "roster")
            .unwrap()
            .with_default_image("file:///car.png");
        let vehicle = add_sample(&mut store, "A", "SUV");

        assert_eq!(vehicle.image, "file:///car.png");
        assert!(store.backend().get("roster").unwrap().is_some());
        assert!(store.backend().get(DEFAULT_STORAGE_KEY).unwrap().is_none());
    }

    #[test]
    fn test_failed_write_leaves_state_unchanged() {
        let mut store = FleetStore::load(FlakyStore::default()).unwrap();
        let vehicle = store
            .add("A", "SUV", "Asha", Availability::Available)
            .unwrap();
        store.backend.fail_writes = true;

        assert!(store.add("B", "SUV", "Ravi", Availability::Available).is_err());
        assert_eq!(store.len(), 1);

        assert!(store.update_driver(&vehicle.id, "Ravi").is_err());
        assert_eq!(store.get(&vehicle.id).unwrap().driver_name, "Asha");

        assert!(store.toggle_availability(&vehicle.id).is_err());
        assert!(store.get(&vehicle.id).unwrap().is_available());

        assert!(store.delete(&vehicle.id).is_err());
        assert_eq!(store.vehicles(), &[vehicle]);
    }

    #[test]
    fn test_subscribers_see_applied_changes_only() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut store = create_test_store();
        let sink = Rc::clone(&events);
        store.subscribe(move |event| sink.borrow_mut().push(event.clone()));

        let vehicle = add_sample(&mut store, "A", "SUV");
        store.update_driver(&vehicle.id, "Ravi").unwrap();
        store.toggle_availability(&vehicle.id).unwrap();
        let _ = store.update_driver(&vehicle.id, " ");
        let _ = store.toggle_availability("missing");
        store.delete(&vehicle.id).unwrap();
        store.delete(&vehicle.id).unwrap();

        assert_eq!(
            *events.borrow(),
            vec![
                FleetEvent::Added(vehicle.clone()),
                FleetEvent::DriverUpdated {
                    id: vehicle.id.clone(),
                    driver_name: "Ravi".to_string(),
                },
                FleetEvent::AvailabilityToggled {
                    id: vehicle.id.clone(),
                    availability: Availability::Unavailable,
                },
                FleetEvent::Deleted {
                    id: vehicle.id.clone(),
                },
            ]
        );
    }

    #[test]
    fn test_stats() {
        let mut store = create_test_store();
        assert_eq!(store.stats(), FleetStats::default());

        add_sample(&mut store, "A", "SUV");
        add_sample(&mut store, "B", "SUV");
        let c = add_sample(&mut store, "C", "Truck");
        store.toggle_availability(&c.id).unwrap();

        let stats = store.stats();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.available, 2);
        assert_eq!(stats.unavailable, 1);
        assert_eq!(stats.by_category.get("SUV"), Some(&2));
        assert_eq!(stats.by_category.get("Truck"), Some(&1));
    }

    #[test]
    fn test_debug_output() {
        let store = create_test_store();
        let debug_str = format!("{store:?}");
        assert!(debug_str.contains("FleetStore"));
        assert!(debug_str.contains(DEFAULT_STORAGE_KEY));
    }
}
