//! Profile Registry
//!
//! Central, thread-safe lookup of turbine profiles by name. The embedded
//! generic profiles are loaded with [`ProfileRegistry::load_defaults`];
//! site-specific ones come from a directory of `*.json` files, each with its
//! reference sheet next to it.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::RwLock;

use include_dir::{include_dir, Dir};

use crate::{ProfileError, TurbineProfile};

static EMBEDDED_PROFILES: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/profiles");

fn poisoned() -> ProfileError {
    ProfileError::Invalid("registry lock poisoned".to_string())
}

/// Thread-safe profile registry
pub struct ProfileRegistry {
    profiles: RwLock<BTreeMap<String, TurbineProfile>>,
}

impl ProfileRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            profiles: RwLock::new(BTreeMap::new()),
        }
    }

    /// Register a profile; names must be unique
    pub fn register(&self, profile: TurbineProfile) -> Result<(), ProfileError> {
        profile.validate()?;
        let mut profiles = self.profiles.write().map_err(|_| poisoned())?;
        if profiles.contains_key(&profile.name) {
            return Err(ProfileError::Invalid(format!(
                "profile {} already registered",
                profile.name
            )));
        }
        profiles.insert(profile.name.clone(), profile);
        Ok(())
    }

    /// Register or overwrite a profile
    pub fn replace(
        &self,
        profile: TurbineProfile,
    ) -> Result<Option<TurbineProfile>, ProfileError> {
        profile.validate()?;
        let mut profiles = self.profiles.write().map_err(|_| poisoned())?;
        Ok(profiles.insert(profile.name.clone(), profile))
    }

    /// Profile by name
    pub fn get(&self, name: &str) -> Result<TurbineProfile, ProfileError> {
        let profiles = self.profiles.read().map_err(|_| poisoned())?;
        profiles
            .get(name)
            .cloned()
            .ok_or_else(|| ProfileError::NotFound(name.to_string()))
    }

    /// Registered names, sorted
    pub fn names(&self) -> Result<Vec<String>, ProfileError> {
        let profiles = self.profiles.read().map_err(|_| poisoned())?;
        Ok(profiles.keys().cloned().collect())
    }

    /// Number of registered profiles
    pub fn len(&self) -> usize {
        self.profiles.read().map(|p| p.len()).unwrap_or(0)
    }

    /// True when nothing is registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Register the profiles embedded in the crate
    pub fn load_defaults(&self) -> Result<usize, ProfileError> {
        let mut loaded = 0;
        for file in EMBEDDED_PROFILES.files() {
            if file.path().extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let json = file.contents_utf8().ok_or_else(|| {
                ProfileError::Parse(format!("{} is not UTF-8", file.path().display()))
            })?;
            let mut profile = TurbineProfile::from_json(json)?;
            if let Some(sheet_name) = profile.power_curve_sheet.clone() {
                let sheet = EMBEDDED_PROFILES
                    .get_file(&sheet_name)
                    .and_then(|f| f.contents_utf8())
                    .ok_or_else(|| {
                        ProfileError::NotFound(format!("{}: sheet {}", profile.name, sheet_name))
                    })?;
                profile = profile.with_sheet(sheet);
            }
            self.register(profile)?;
            loaded += 1;
        }
        log::info!("loaded {} embedded turbine profiles", loaded);
        Ok(loaded)
    }

    /// Register every `*.json` profile in `dir`; sheets are read from the
    /// same directory. Nothing is registered unless every profile loads.
    pub fn load_dir(&self, dir: impl AsRef<Path>) -> Result<usize, ProfileError> {
        let dir = dir.as_ref();
        let mut paths: Vec<_> = fs::read_dir(dir)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<_, _>>()?;
        paths.retain(|p| p.extension().and_then(|e| e.to_str()) == Some("json"));
        paths.sort();

        let mut batch = BTreeMap::new();
        for path in &paths {
            let profile = Self::read_profile(dir, path).map_err(|e| {
                log::warn!("rejected profile {}: {}", path.display(), e);
                e
            })?;
            if batch.contains_key(&profile.name) {
                return Err(ProfileError::Invalid(format!(
                    "profile {} defined twice in {}",
                    profile.name,
                    dir.display()
                )));
            }
            batch.insert(profile.name.clone(), profile);
        }

        let mut profiles = self.profiles.write().map_err(|_| poisoned())?;
        if let Some(name) = batch.keys().find(|name| profiles.contains_key(*name)) {
            return Err(ProfileError::Invalid(format!(
                "profile {} already registered",
                name
            )));
        }
        let loaded = batch.len();
        profiles.extend(batch);
        log::info!("loaded {} turbine profiles from {}", loaded, dir.display());
        Ok(loaded)
    }

    fn read_profile(dir: &Path, path: &Path) -> Result<TurbineProfile, ProfileError> {
        let json = fs::read_to_string(path)?;
        let mut profile = TurbineProfile::from_json(&json)?;
        if let Some(sheet_name) = profile.power_curve_sheet.clone() {
            let sheet = fs::read_to_string(dir.join(&sheet_name))?;
            profile = profile.with_sheet(sheet);
        }
        Ok(profile)
    }
}

impl Default for ProfileRegistry {
    fn default() -> Self {
        Self::new()
    }
}

lazy_static::lazy_static! {
    /// Global profile registry with the embedded profiles loaded
    pub static ref GLOBAL_REGISTRY: ProfileRegistry = {
        let registry = ProfileRegistry::new();
        if let Err(e) = registry.load_defaults() {
            log::warn!("embedded profiles failed to load: {}", e);
        }
        registry
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_embedded() {
        let registry = ProfileRegistry::new();
        assert_eq!(registry.load_defaults().unwrap(), 2);
        assert_eq!(
            registry.names().unwrap(),
            vec!["coastal_3mw".to_string(), "generic_2mw".to_string()]
        );

        let profile = registry.get("generic_2mw").unwrap();
        assert_eq!(profile.rated_power_kw, 2000.0);
        assert!(profile.sheet().is_some());
    }

    #[test]
    fn duplicate_names_rejected() {
        let registry = ProfileRegistry::new();
        registry
            .register(TurbineProfile::new("t1", "Acme", 1500.0, 65.0))
            .unwrap();
        assert!(matches!(
            registry.register(TurbineProfile::new("t1", "Acme", 1800.0, 65.0)),
            Err(ProfileError::Invalid(_))
        ));

        let old = registry
            .replace(TurbineProfile::new("t1", "Acme", 1800.0, 65.0))
            .unwrap();
        assert_eq!(old.map(|p| p.rated_power_kw), Some(1500.0));
        assert_eq!(registry.get("t1").unwrap().rated_power_kw, 1800.0);
    }

    #[test]
    fn missing_profile() {
        let registry = ProfileRegistry::new();
        assert!(registry.is_empty());
        assert!(matches!(registry.get("nope"), Err(ProfileError::NotFound(_))));
    }

    fn write_profile(dir: &Path, file: &str, name: &str) {
        let json = format!(
            r#"{{"name": "{name}", "manufacturer": "Acme", "rated_power_kw": 1500.0, "hub_height_m": 65.0}}"#
        );
        fs::write(dir.join(file), json).unwrap();
    }

    #[test]
    fn load_dir_is_all_or_nothing() {
        let dir = tempfile::tempdir().unwrap();
        write_profile(dir.path(), "a.json", "site_a");
        fs::write(dir.path().join("b.json"), "{ broken").unwrap();

        let registry = ProfileRegistry::new();
        assert!(matches!(
            registry.load_dir(dir.path()),
            Err(ProfileError::Parse(_))
        ));
        assert!(registry.is_empty());

        fs::remove_file(dir.path().join("b.json")).unwrap();
        assert_eq!(registry.load_dir(dir.path()).unwrap(), 1);
        assert!(registry.get("site_a").is_ok());
    }

    #[test]
    fn load_dir_rejects_name_clashes() {
        let dir = tempfile::tempdir().unwrap();
        write_profile(dir.path(), "a.json", "site_a");
        write_profile(dir.path(), "b.json", "site_b");

        let registry = ProfileRegistry::new();
        registry
            .register(TurbineProfile::new("site_b", "Acme", 1800.0, 80.0))
            .unwrap();
        assert!(matches!(
            registry.load_dir(dir.path()),
            Err(ProfileError::Invalid(_))
        ));
        assert_eq!(registry.names().unwrap(), vec!["site_b".to_string()]);
        assert_eq!(registry.get("site_b").unwrap().rated_power_kw, 1800.0);

        let twice = tempfile::tempdir().unwrap();
        write_profile(twice.path(), "a.json", "site_c");
        write_profile(twice.path(), "b.json", "site_c");
        assert!(matches!(
            registry.load_dir(twice.path()),
            Err(ProfileError::Invalid(_))
        ));
        assert!(registry.get("site_c").is_err());
    }

    #[test]
    fn global_registry_is_populated() {
        assert!(GLOBAL_REGISTRY.get("coastal_3mw").is_ok());
    }
}
