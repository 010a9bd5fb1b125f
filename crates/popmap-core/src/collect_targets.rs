use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::stores::StoreCategory;
use crate::ConfigError;

/// Keywords searched for one category, and how many stores it may hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTarget {
    pub category: StoreCategory,
    pub keywords: Vec<String>,
    /// Cumulative cap on stores tagged with this category.
    pub limit: usize,
}

/// Paging window for local search queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchWindow {
    #[serde(default = "default_display")]
    pub display: u32,
    #[serde(default = "default_start")]
    pub start: u32,
    #[serde(default = "default_end")]
    pub end: u32,
    #[serde(default = "default_step")]
    pub step: u32,
}

fn default_display() -> u32 {
    5
}

fn default_start() -> u32 {
    1
}

fn default_end() -> u32 {
    300
}

fn default_step() -> u32 {
    5
}

impl Default for SearchWindow {
    fn default() -> Self {
        Self {
            display: default_display(),
            start: default_start(),
            end: default_end(),
            step: default_step(),
        }
    }
}

impl SearchWindow {
    /// Page offsets to request, `start..=end` by `step`.
    pub fn offsets(&self) -> impl Iterator<Item = u32> {
        (self.start..=self.end).step_by(self.step.max(1) as usize)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectTargets {
    /// Seoul districts, searched in order.
    pub districts: Vec<String>,
    pub categories: Vec<CategoryTarget>,
    /// New stores added per run before stopping.
    pub daily_target: usize,
    /// Stop once the snapshot holds this many stores in total.
    pub total_hard_cap: usize,
    #[serde(default)]
    pub search: SearchWindow,
}

impl CollectTargets {
    #[must_use]
    pub fn limit_for(&self, category: StoreCategory) -> usize {
        self.categories
            .iter()
            .find(|t| t.category == category)
            .map_or(0, |t| t.limit)
    }
}

/// Load and validate collector targets from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_collect_targets(path: &Path) -> Result<CollectTargets, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::TargetsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let targets: CollectTargets =
        serde_yaml::from_str(&content).map_err(ConfigError::TargetsFileParse)?;

    validate_targets(&targets)?;

    Ok(targets)
}

fn validate_targets(targets: &CollectTargets) -> Result<(), ConfigError> {
    if targets.districts.is_empty() {
        return Err(ConfigError::Validation(
            "at least one district is required".to_string(),
        ));
    }

    let mut seen_districts = HashSet::new();
    for district in &targets.districts {
        if district.trim().is_empty() {
            return Err(ConfigError::Validation(
                "district names must be non-empty".to_string(),
            ));
        }
        if !seen_districts.insert(district.trim()) {
            return Err(ConfigError::Validation(format!(
                "duplicate district: '{district}'"
            )));
        }
    }

    let mut seen_categories = HashSet::new();
    for target in &targets.categories {
        if !seen_categories.insert(target.category) {
            return Err(ConfigError::Validation(format!(
                "duplicate category target: '{}'",
                target.category
            )));
        }
        if target.keywords.is_empty() {
            return Err(ConfigError::Validation(format!(
                "category '{}' has no keywords",
                target.category
            )));
        }
        if target.keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "category '{}' has a blank keyword",
                target.category
            )));
        }
    }

    if targets.total_hard_cap == 0 {
        return Err(ConfigError::Validation(
            "total_hard_cap must be at least 1".to_string(),
        ));
    }

    let window = &targets.search;
    if !(1..=5).contains(&window.display) {
        return Err(ConfigError::Validation(format!(
            "search.display {} is out of range; must be 1 to 5",
            window.display
        )));
    }
    if window.start == 0 || window.step == 0 || window.start > window.end {
        return Err(ConfigError::Validation(format!(
            "search window {}..={} step {} is empty or invalid",
            window.start, window.end, window.step
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const VALID: &str = r"
daily_target: 50
total_hard_cap: 4000
districts: [강남구, 마포구]
categories:
  - category: dubai
    limit: 1000
    keywords: [두바이쫀득쿠키]
  - category: bungeoppang
    limit: 1000
    keywords: [붕어빵, 팥붕, 슈붕]
";

    fn write_yaml(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn parse(content: &str) -> CollectTargets {
        serde_yaml::from_str(content).unwrap()
    }

    #[test]
    fn loads_valid_file_with_default_window() {
        let file = write_yaml(VALID);
        let targets = load_collect_targets(file.path()).unwrap();
        assert_eq!(targets.districts, vec!["강남구", "마포구"]);
        assert_eq!(targets.categories.len(), 2);
        assert_eq!(targets.search, SearchWindow::default());
        assert_eq!(targets.limit_for(StoreCategory::Dubai), 1000);
        assert_eq!(targets.limit_for(StoreCategory::Cake), 0);
    }

    #[test]
    fn offsets_cover_one_to_296_by_five() {
        let offsets: Vec<u32> = SearchWindow::default().offsets().collect();
        assert_eq!(offsets.len(), 60);
        assert_eq!(offsets.first(), Some(&1));
        assert_eq!(offsets.last(), Some(&296));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_collect_targets(Path::new("/nonexistent/collect.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::TargetsFileIo { .. }));
    }

    #[test]
    fn unknown_category_is_parse_error() {
        let file = write_yaml(&VALID.replace("category: dubai", "category: macaron"));
        let err = load_collect_targets(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::TargetsFileParse(_)));
    }

    #[test]
    fn duplicate_district_fails_validation() {
        let targets = parse(&VALID.replace("[강남구, 마포구]", "[강남구, 강남구]"));
        let err = validate_targets(&targets).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref m) if m.contains("duplicate district")));
    }

    #[test]
    fn duplicate_category_fails_validation() {
        let targets = parse(&VALID.replace("category: bungeoppang", "category: dubai"));
        let err = validate_targets(&targets).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref m) if m.contains("duplicate category")));
    }

    #[test]
    fn blank_keyword_fails_validation() {
        let targets = parse(&VALID.replace("[붕어빵, 팥붕, 슈붕]", "[붕어빵, \"\"]"));
        let err = validate_targets(&targets).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref m) if m.contains("blank keyword")));
    }

    #[test]
    fn oversized_display_fails_validation() {
        let mut targets = parse(VALID);
        targets.search.display = 10;
        assert!(validate_targets(&targets).is_err());
    }

    #[test]
    fn bundled_config_is_valid() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config/collect.yaml");
        let targets = load_collect_targets(&path).unwrap();
        assert_eq!(targets.districts.len(), 10);
        assert_eq!(targets.daily_target, 50);
        assert_eq!(targets.total_hard_cap, 4000);
        assert_eq!(targets.categories.len(), StoreCategory::ALL.len());
    }
}
