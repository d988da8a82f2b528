use crate::model::{CareerRecord, Level, RoadmapStep};

/// Flatten a career's roadmap into the work remaining from `level`.
///
/// Beginner covers all three tiers, Intermediate covers Intermediate and Advanced,
/// Advanced covers only Advanced. Tiers are concatenated in that fixed order and
/// each tier keeps its source order.
pub fn build_roadmap(record: &CareerRecord, level: Level) -> Vec<RoadmapStep> {
    Level::ALL
        .into_iter()
        .filter(|tier| *tier >= level)
        .flat_map(|tier| {
            record.roadmap.tasks(tier).iter().map(move |task| RoadmapStep {
                level: tier,
                task: task.clone(),
            })
        })
        .collect()
}

/// Task texts of a flattened roadmap, in order.
pub fn task_texts(steps: &[RoadmapStep]) -> Vec<String> {
    steps.iter().map(|step| step.task.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Roadmap;

    fn record() -> CareerRecord {
        CareerRecord {
            career: "Cloud Engineer".to_string(),
            required_skills: vec!["linux".to_string()],
            interest_tags: vec!["infrastructure".to_string()],
            roadmap: Roadmap {
                beginner: vec!["Learn Linux".to_string(), "Learn networking".to_string()],
                intermediate: vec!["Learn Terraform".to_string()],
                advanced: vec!["Design multi-region failover".to_string(), "Get certified".to_string()],
            },
            resources: vec![],
        }
    }

    fn tasks(steps: &[RoadmapStep]) -> Vec<&str> {
        steps.iter().map(|s| s.task.as_str()).collect()
    }

    #[test]
    fn beginner_gets_the_full_path_in_tier_order() {
        let steps = build_roadmap(&record(), Level::Beginner);
        assert_eq!(
            tasks(&steps),
            vec![
                "Learn Linux",
                "Learn networking",
                "Learn Terraform",
                "Design multi-region failover",
                "Get certified",
            ]
        );
        assert_eq!(steps[0].level, Level::Beginner);
        assert_eq!(steps[2].level, Level::Intermediate);
        assert_eq!(steps[4].level, Level::Advanced);
    }

    #[test]
    fn intermediate_skips_beginner_tier() {
        let steps = build_roadmap(&record(), Level::Intermediate);
        assert_eq!(
            tasks(&steps),
            vec!["Learn Terraform", "Design multi-region failover", "Get certified"]
        );
    }

    #[test]
    fn advanced_gets_only_advanced_tier() {
        let steps = build_roadmap(&record(), Level::Advanced);
        assert!(steps.iter().all(|s| s.level == Level::Advanced));
        assert_eq!(task_texts(&steps), record().roadmap.advanced);
    }

    #[test]
    fn empty_tiers_contribute_nothing() {
        let mut record = record();
        record.roadmap.intermediate.clear();
        let steps = build_roadmap(&record, Level::Intermediate);
        assert_eq!(steps.len(), 2);
    }
}
