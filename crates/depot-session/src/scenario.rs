use std::path::Path;

use serde::Deserialize;

use depot_core::config::SimConfig;

use crate::error::SessionError;

/// A curated set of floor presets, loaded from a `scenarios.ron` file.
#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioSet {
    pub title: String,
    pub scenarios: Vec<ScenarioEntry>,
}

/// One named preset. Omitted config fields fall back to the reference
/// floor's defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioEntry {
    pub id: String,
    pub title: String,
    pub summary: String,
    #[serde(default)]
    pub config: SimConfig,
}

/// Load a scenario set from a `scenarios.ron` file in `dir`.
pub fn load_scenarios(dir: &Path) -> Result<ScenarioSet, SessionError> {
    let path = dir.join("scenarios.ron");
    let content = std::fs::read_to_string(&path)?;
    ron::from_str(&content).map_err(|e| SessionError::Parse {
        file: path,
        detail: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_scenario_set() {
        let input = r#"(
            title: "Warehouse floor presets",
            scenarios: [
                (
                    id: "standard_floor",
                    title: "Standard floor",
                    summary: "The reference 20x20 floor.",
                ),
                (
                    id: "dense_floor",
                    title: "Dense floor",
                    summary: "More cartons, more robots.",
                    config: (carton_count: 40, robot_count: 8, max_time_secs: 45),
                ),
            ],
        )"#;

        let set: ScenarioSet = ron::from_str(input).unwrap();
        assert_eq!(set.title, "Warehouse floor presets");
        assert_eq!(set.scenarios.len(), 2);

        let standard = &set.scenarios[0];
        assert_eq!(standard.id, "standard_floor");
        assert_eq!(standard.config, SimConfig::default());

        let dense = &set.scenarios[1];
        assert_eq!(dense.config.carton_count, 40);
        assert_eq!(dense.config.robot_count, 8);
        assert_eq!(dense.config.max_time_secs, 45);
        // Unspecified fields keep their defaults.
        assert_eq!(dense.config.width, 20);
    }

    #[test]
    fn load_scenarios_from_file() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("scenarios");
        let set = load_scenarios(&dir).unwrap();
        assert!(!set.title.is_empty());
        assert!(!set.scenarios.is_empty());
        for entry in &set.scenarios {
            assert!(entry.config.validate().is_ok(), "preset '{}'", entry.id);
        }
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_scenarios(Path::new("/nonexistent")).unwrap_err();
        assert!(matches!(err, SessionError::Io(_)));
    }
}
