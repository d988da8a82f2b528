use std::collections::HashSet;
use std::path::Path;

use crate::error::AppError;
use crate::model::{CareerRecord, Level};

/// Load the career catalog from a JSON file.
///
/// The whole file must parse and validate, otherwise nothing is returned.
pub fn load_catalog(path: &Path) -> Result<Vec<CareerRecord>, AppError> {
    let content = std::fs::read_to_string(path).map_err(|e| AppError::CatalogLoad {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    parse_catalog(&content).map_err(|message| AppError::CatalogLoad {
        path: path.to_path_buf(),
        message,
    })
}

/// Parse and validate catalog JSON: an array of records with every field present,
/// non-blank career names, no duplicate names, and no task repeated within a
/// career's roadmap.
pub fn parse_catalog(content: &str) -> Result<Vec<CareerRecord>, String> {
    let careers: Vec<CareerRecord> =
        serde_json::from_str(content).map_err(|e| format!("invalid catalog JSON: {e}"))?;

    let mut seen = HashSet::with_capacity(careers.len());
    for (index, record) in careers.iter().enumerate() {
        if record.career.trim().is_empty() {
            return Err(format!("record {index} has an empty career name"));
        }
        if !seen.insert(record.career.as_str()) {
            return Err(format!("duplicate career name: {}", record.career));
        }
        let mut tasks = HashSet::new();
        for level in Level::ALL {
            for task in record.roadmap.tasks(level) {
                if !tasks.insert(task.as_str()) {
                    return Err(format!(
                        "duplicate task {task:?} in roadmap of {}",
                        record.career
                    ));
                }
            }
        }
    }
    Ok(careers)
}

/// Text fed to the embedding model for a catalog entry: skills then interest tags.
pub fn compose_embedding_text(record: &CareerRecord) -> String {
    record
        .required_skills
        .iter()
        .chain(&record.interest_tags)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const TWO_CAREERS: &str = r#"[
        {
            "career": "Data Scientist",
            "required_skills": ["Python", "Statistics"],
            "interest_tags": ["data", "research"],
            "roadmap": {
                "Beginner": ["Learn Python"],
                "Intermediate": ["Learn stats"],
                "Advanced": []
            },
            "resources": ["https://www.kaggle.com/learn"]
        },
        {
            "career": "Web Developer",
            "required_skills": ["HTML", "CSS", "JavaScript"],
            "interest_tags": ["design"],
            "roadmap": {"Beginner": [], "Intermediate": [], "Advanced": ["Ship a SaaS"]},
            "resources": []
        }
    ]"#;

    #[test]
    fn parses_catalog_in_file_order() {
        let careers = parse_catalog(TWO_CAREERS).unwrap();
        assert_eq!(careers.len(), 2);
        assert_eq!(careers[0].career, "Data Scientist");
        assert_eq!(careers[0].roadmap.intermediate, vec!["Learn stats"]);
        assert_eq!(careers[1].roadmap.advanced, vec!["Ship a SaaS"]);
    }

    #[test]
    fn empty_catalog_is_valid() {
        assert!(parse_catalog("[]").unwrap().is_empty());
    }

    #[test]
    fn missing_field_fails_whole_catalog() {
        let content = r#"[{"career": "Analyst", "required_skills": [], "interest_tags": [],
            "roadmap": {"Beginner": [], "Intermediate": [], "Advanced": []}}]"#;
        let err = parse_catalog(content).unwrap_err();
        assert!(err.contains("resources"), "unexpected message: {err}");
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let record = r#"{"career": "Analyst", "required_skills": [], "interest_tags": [],
            "roadmap": {"Beginner": [], "Intermediate": [], "Advanced": []}, "resources": []}"#;
        let content = format!("[{record}, {record}]");
        let err = parse_catalog(&content).unwrap_err();
        assert!(err.contains("duplicate"));
    }

    #[test]
    fn repeated_task_within_a_career_is_rejected() {
        let content = r#"[{"career": "Analyst", "required_skills": [], "interest_tags": [],
            "roadmap": {"Beginner": ["Learn SQL"], "Intermediate": [], "Advanced": ["Learn SQL"]},
            "resources": []}]"#;
        let err = parse_catalog(content).unwrap_err();
        assert!(err.contains("Learn SQL") && err.contains("Analyst"), "unexpected message: {err}");
    }

    #[test]
    fn same_task_in_different_careers_is_allowed() {
        let content = r#"[
            {"career": "Analyst", "required_skills": [], "interest_tags": [],
             "roadmap": {"Beginner": ["Learn SQL"], "Intermediate": [], "Advanced": []},
             "resources": []},
            {"career": "Engineer", "required_skills": [], "interest_tags": [],
             "roadmap": {"Beginner": ["Learn SQL"], "Intermediate": [], "Advanced": []},
             "resources": []}
        ]"#;
        assert_eq!(parse_catalog(content).unwrap().len(), 2);
    }

    #[test]
    fn load_reports_path_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("careers.json");
        let err = load_catalog(&missing).unwrap_err();
        assert!(matches!(err, AppError::CatalogLoad { ref path, .. } if path == &missing));

        let mut corrupt = tempfile::NamedTempFile::new_in(dir.path()).unwrap();
        corrupt.write_all(b"{not json").unwrap();
        assert!(matches!(
            load_catalog(corrupt.path()),
            Err(AppError::CatalogLoad { .. })
        ));
    }

    #[test]
    fn load_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(TWO_CAREERS.as_bytes()).unwrap();
        let careers = load_catalog(file.path()).unwrap();
        assert_eq!(careers.len(), 2);
    }

    #[test]
    fn embedding_text_puts_skills_before_tags() {
        let careers = parse_catalog(TWO_CAREERS).unwrap();
        assert_eq!(
            compose_embedding_text(&careers[0]),
            "Python Statistics data research"
        );
    }

    #[test]
    fn shipped_catalog_is_valid() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../data/careers.json");
        if !path.exists() {
            eprintln!("skipping shipped_catalog_is_valid: {} not found", path.display());
            return;
        }
        let careers = load_catalog(&path).expect("shipped catalog should load");
        assert!(careers.len() >= 3, "expected at least three careers");
    }
}
