use std::collections::HashMap;

use hms_records::LabResultRecord;

/// Group records by test name, keeping groups in order of first appearance
/// and records within a group in input order.
pub(crate) fn group_by_test(records: &[LabResultRecord]) -> Vec<(&str, Vec<&LabResultRecord>)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Vec<&LabResultRecord>)> = Vec::new();
    for record in records {
        let name = record.test_name.as_str();
        match index.get(name) {
            Some(&i) => groups[i].1.push(record),
            None => {
                index.insert(name, groups.len());
                groups.push((name, vec![record]));
            }
        }
    }
    groups
}

/// Oldest first. The sort is stable, so same-day records keep input order.
pub(crate) fn chronological<'a>(group: &[&'a LabResultRecord]) -> Vec<&'a LabResultRecord> {
    let mut sorted = group.to_vec();
    sorted.sort_by(|a, b| a.ordered_date.cmp(&b.ordered_date));
    sorted
}
