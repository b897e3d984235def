//! Marketplace search.

use crate::domain::Workflow;

/// Case-insensitive substring match on workflow names. The query is used
/// as typed, whitespace included; an empty query matches everything.
#[must_use]
pub fn filter_by_name<'a>(workflows: &'a [Workflow], query: &str) -> Vec<&'a Workflow> {
    let needle = query.to_lowercase();
    workflows
        .iter()
        .filter(|w| w.name.to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
#[allow(clippy::panic)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::{TokenAmount, WalletAddress, WorkflowId};

    pub(crate) fn workflow(id: &str, name: &str) -> Workflow {
        let Ok(price) = TokenAmount::parse("1") else {
            panic!("valid price");
        };
        let Ok(seller) = "0x00000000000000000000000000000000000000a1".parse::<WalletAddress>()
        else {
            panic!("valid address");
        };
        Workflow {
            id: WorkflowId::from(id),
            name: name.to_string(),
            desc: String::new(),
            price,
            seller,
            image_url: None,
            file_url: None,
            is_active: Some(true),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn matches_case_insensitive_substring() {
        let all = vec![workflow("w1", "Data Workflow"), workflow("w2", "Report Tool")];
        let hits = filter_by_name(&all, "work");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits.first().map(|w| w.name.as_str()), Some("Data Workflow"));
    }

    #[test]
    fn uppercase_query_matches() {
        let all = vec![workflow("w1", "Data Workflow")];
        assert_eq!(filter_by_name(&all, "DATA").len(), 1);
    }

    #[test]
    fn empty_query_matches_all() {
        let all = vec![workflow("w1", "Data Workflow"), workflow("w2", "Report Tool")];
        assert_eq!(filter_by_name(&all, "").len(), 2);
    }

    #[test]
    fn whitespace_in_query_is_significant() {
        let all = vec![workflow("w1", "Data Workflow"), workflow("w2", "Report Tool")];
        assert!(filter_by_name(&all, "work ").is_empty());
        let hits = filter_by_name(&all, "a w");
        assert_eq!(hits.first().map(|w| w.name.as_str()), Some("Data Workflow"));
        assert!(filter_by_name(&all, "   ").is_empty());
    }
}
