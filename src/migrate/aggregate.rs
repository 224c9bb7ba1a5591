use crate::model::target::{MilestoneRecord, TargetIssueRecord};

/// Everything the writer must create before issues can reference it.
/// Each list keeps first-seen order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Aggregate {
    pub milestones: Vec<MilestoneRecord>,
    /// Distinct status names, one board column each.
    pub statuses: Vec<String>,
    /// Distinct project names, one board each.
    pub projects: Vec<String>,
}

fn push_unique<T: PartialEq>(items: &mut Vec<T>, item: T) {
    if !items.contains(&item) {
        items.push(item);
    }
}

pub fn aggregate(issues: &[TargetIssueRecord]) -> Aggregate {
    let mut out = Aggregate::default();
    for issue in issues {
        // Issues without a sprint carry no milestone at all, so no sentinel
        // tuple ever reaches the list.
        if let Some(milestone) = issue.milestone.as_ref().filter(|m| !m.is_empty()) {
            push_unique(&mut out.milestones, milestone.clone());
        }
        push_unique(&mut out.statuses, issue.status.clone());
        push_unique(&mut out.projects, issue.project.clone());
    }
    out
}
